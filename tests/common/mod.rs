#![allow(dead_code)]

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tickscore::domain::bar::{Bar, Tick};
use tickscore::domain::engine::MarketSnapshot;
use tickscore::domain::error::TickscoreError;
use tickscore::domain::signal::{CandidateSignal, Side};
use tickscore::ports::tick_port::TickSource;

pub const INSTRUMENT: &str = "TQBR:SBER";

pub fn dec(v: f64) -> Decimal {
    Decimal::from_f64(v).unwrap()
}

pub fn make_tick(time: i64, close: f64) -> Tick {
    Tick {
        instrument: INSTRUMENT.into(),
        time,
        open: dec(close),
        high: dec(close + 1.0),
        low: dec(close - 1.0),
        close: dec(close),
        volume: 100,
        complete: false,
    }
}

pub fn make_bar(i: usize, close: f64) -> Bar {
    Bar {
        instrument: INSTRUMENT.into(),
        period_start: 1_700_000_040 + (i as i64) * 60,
        open: dec(close),
        high: dec(close + 1.0),
        low: dec(close - 1.0),
        close: dec(close),
        volume: 100,
        complete: true,
    }
}

fn snapshot_from_closes(closes: Vec<f64>) -> MarketSnapshot {
    let candles: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, close)| make_bar(i, *close))
        .collect();
    let last_price = candles.last().map(|b| b.close).unwrap_or_default();
    MarketSnapshot { candles, last_price }
}

/// A mild uptrend with a small alternating wiggle, wide enough bars for a
/// sane ATR.
pub fn uptrend_snapshot(n: usize) -> MarketSnapshot {
    let closes: Vec<f64> = (0..n)
        .map(|i| 100.0 + i as f64 * 0.1 + if i % 2 == 0 { 0.02 } else { -0.02 })
        .collect();
    snapshot_from_closes(closes)
}

/// Direction-free chop around a base price.
pub fn choppy_snapshot(n: usize) -> MarketSnapshot {
    let closes: Vec<f64> = (0..n)
        .map(|i| 1000.0 + if i % 2 == 0 { 1.0 } else { -1.0 })
        .collect();
    snapshot_from_closes(closes)
}

pub fn make_signal(side: Side, entry: f64, sl: f64, tp: f64, r: f64) -> CandidateSignal {
    CandidateSignal {
        instrument: INSTRUMENT.into(),
        side,
        entry: dec(entry),
        stop_loss: dec(sl),
        take_profit: dec(tp),
        size: dec(1.0),
        r: dec(r),
    }
}

/// In-memory tick source for pipeline tests without files.
pub struct VecTickSource {
    ticks: std::vec::IntoIter<Tick>,
}

impl VecTickSource {
    pub fn new(ticks: Vec<Tick>) -> Self {
        VecTickSource {
            ticks: ticks.into_iter(),
        }
    }
}

impl TickSource for VecTickSource {
    fn next_tick(&mut self) -> Result<Option<Tick>, TickscoreError> {
        Ok(self.ticks.next())
    }
}
