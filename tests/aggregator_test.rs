//! Aggregation pipeline tests: tick feed → bars → history → snapshot →
//! engine, including the CSV replay adapter.

mod common;

use common::*;
use std::io::Write;
use tempfile::NamedTempFile;
use tickscore::adapters::csv_tick_adapter::CsvTickAdapter;
use tickscore::domain::aggregator::CandleAggregator;
use tickscore::domain::engine::{self, Decision};
use tickscore::domain::reason::ReasonCode;
use tickscore::domain::settings::EngineSettings;
use tickscore::domain::signal::Side;
use tickscore::ports::tick_port::TickSource;

mod history_growth {
    use super::*;

    #[test]
    fn history_never_shrinks_on_ordered_ticks() {
        let mut aggregator = CandleAggregator::new(INSTRUMENT, 60);
        let mut previous_len = 0;

        for i in 0..300 {
            let tick = make_tick(1_700_000_000 + i * 30, 270.0 + (i % 5) as f64);
            aggregator.ingest(&tick);

            let len = aggregator.history().len();
            assert!(len >= previous_len, "history shrank at tick {i}");
            previous_len = len;
        }

        assert!(previous_len > 0);
    }

    #[test]
    fn open_bar_stays_ahead_of_history() {
        let mut aggregator = CandleAggregator::new(INSTRUMENT, 60);

        for i in 0..300 {
            aggregator.ingest(&make_tick(1_700_000_000 + i * 30, 270.0));

            if let (Some(last), Some(current)) =
                (aggregator.history().last(), aggregator.current())
            {
                assert!(
                    last.period_start < current.period_start,
                    "open bar fell behind history at tick {i}"
                );
            }
        }
    }

    #[test]
    fn history_caps_at_200_bars() {
        let mut aggregator = CandleAggregator::new(INSTRUMENT, 60);
        // One tick per frame: 250 frames → 249 completed bars, capped at 200.
        for i in 0..250 {
            aggregator.ingest(&make_tick(1_700_000_000 + i * 60, 270.0));
        }
        assert_eq!(aggregator.history().len(), 200);
    }
}

mod timestamp_units {
    use super::*;

    #[test]
    fn second_and_millisecond_feeds_build_identical_history() {
        let mut seconds_agg = CandleAggregator::new(INSTRUMENT, 60);
        let mut millis_agg = CandleAggregator::new(INSTRUMENT, 60);

        for i in 0..120 {
            let time_s = 1_700_000_000 + i * 30;
            let close = 270.0 + (i % 7) as f64;
            seconds_agg.ingest(&make_tick(time_s, close));
            millis_agg.ingest(&make_tick(time_s * 1000, close));
        }

        let seconds: Vec<_> = seconds_agg.history().iter().cloned().collect();
        let millis: Vec<_> = millis_agg.history().iter().cloned().collect();
        assert_eq!(seconds, millis);
    }
}

mod csv_replay {
    use super::*;

    fn write_tick_file(rows: usize, frame_secs: i64) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "time,open,high,low,close,volume").unwrap();
        for i in 0..rows {
            let time = 1_700_000_000 + i as i64 * frame_secs;
            let close = 100.0 + i as f64 * 0.1;
            writeln!(
                file,
                "{},{:.2},{:.2},{:.2},{:.2},100",
                time,
                close,
                close + 1.0,
                close - 1.0,
                close
            )
            .unwrap();
        }
        file
    }

    #[test]
    fn replayed_file_feeds_the_aggregator() {
        let file = write_tick_file(80, 60);
        let mut source = CsvTickAdapter::from_file(file.path(), INSTRUMENT).unwrap();
        let mut aggregator = CandleAggregator::new(INSTRUMENT, 60);

        while let Some(tick) = source.next_tick().unwrap() {
            aggregator.ingest(&tick);
        }

        // 80 one-per-frame rows → 79 completed bars + 1 partial.
        assert_eq!(aggregator.history().len(), 79);
        let snapshot = aggregator.snapshot();
        assert_eq!(snapshot.candles.len(), 80);
        assert!(!snapshot.candles.last().unwrap().complete);
    }

    #[test]
    fn engine_rejects_then_scores_as_history_fills() {
        let file = write_tick_file(120, 60);
        let mut source = CsvTickAdapter::from_file(file.path(), INSTRUMENT).unwrap();
        let mut aggregator = CandleAggregator::new(INSTRUMENT, 60);
        let settings = EngineSettings::default();
        let signal = make_signal(Side::Buy, 112.0, 110.0, 122.0, 2.0);

        let mut saw_reject = false;
        let mut saw_scored = false;

        while let Some(tick) = source.next_tick().unwrap() {
            aggregator.ingest(&tick);
            let result = engine::evaluate(&signal, &aggregator.snapshot(), &settings);
            match result.decision {
                Decision::Reject => {
                    assert!(
                        !saw_scored,
                        "rejects must precede scored outcomes as history fills"
                    );
                    assert_eq!(result.reasons[0].code, ReasonCode::NoMarketData);
                    saw_reject = true;
                }
                Decision::Take | Decision::Skip => saw_scored = true,
            }
        }

        assert!(saw_reject, "early evaluations should lack history");
        assert!(saw_scored, "late evaluations should score");
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn vec_source_drives_a_full_evaluation() {
        let ticks: Vec<_> = (0..240)
            .map(|i| make_tick(1_700_000_000 + i * 60, 100.0 + i as f64 * 0.1))
            .collect();
        let mut source = VecTickSource::new(ticks);
        let mut aggregator = CandleAggregator::new(INSTRUMENT, 60);

        while let Some(tick) = source.next_tick().unwrap() {
            aggregator.ingest(&tick);
        }

        let signal = make_signal(Side::Buy, 124.0, 122.0, 134.0, 2.0);
        let result =
            engine::evaluate(&signal, &aggregator.snapshot(), &EngineSettings::default());

        assert!(matches!(result.decision, Decision::Take | Decision::Skip));
        assert!(result.metrics.ema50.is_some());
        assert!(result.metrics.atr14.is_some());
    }
}
