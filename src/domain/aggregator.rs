//! Tick-to-bar rollup.
//!
//! One aggregator owns the open bar and completed-bar history for a single
//! instrument, so a worker loop per instrument needs no locking. Ticks are
//! trusted to arrive roughly in order: a tick whose frame differs from the
//! open bar's frame finalizes that bar and opens a new one; no reordering
//! or gap filling is attempted.

use crate::domain::bar::{normalize_timestamp, Bar, Tick};
use crate::domain::engine::MarketSnapshot;
use crate::domain::history::HistoryBuffer;
use std::time::{Duration, Instant};

/// Result of ingesting one tick: the (possibly partial) bar for the tick's
/// frame, plus the previously open bar if this tick closed it.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub current: Bar,
    pub finalized: Option<Bar>,
}

#[derive(Debug, Clone)]
pub struct CandleAggregator {
    instrument: String,
    frame_secs: i64,
    current: Option<Bar>,
    history: HistoryBuffer,
}

impl CandleAggregator {
    pub fn new(instrument: impl Into<String>, frame_secs: i64) -> Self {
        CandleAggregator {
            instrument: instrument.into(),
            frame_secs,
            current: None,
            history: HistoryBuffer::new(),
        }
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn frame_secs(&self) -> i64 {
        self.frame_secs
    }

    pub fn current(&self) -> Option<&Bar> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Roll one tick into the open bar. Rollover finalizes the open bar
    /// (marked complete, appended to history) and seeds a new bar from the
    /// tick's own OHLC. Same-frame ticks merge into the open bar.
    pub fn ingest(&mut self, tick: &Tick) -> IngestOutcome {
        let time = normalize_timestamp(tick.time);
        let frame_start = (time / self.frame_secs) * self.frame_secs;

        let rollover = match &self.current {
            Some(bar) => bar.period_start != frame_start,
            None => true,
        };

        let finalized = if rollover {
            let closed = self.current.take().map(|mut bar| {
                bar.complete = true;
                self.history.push(bar.clone());
                bar
            });
            self.current = Some(Bar::open_from_tick(tick, frame_start));
            closed
        } else {
            if let Some(bar) = self.current.as_mut() {
                bar.apply_tick(tick);
            }
            None
        };

        IngestOutcome {
            current: self.current.clone().unwrap_or_else(|| Bar::open_from_tick(tick, frame_start)),
            finalized,
        }
    }

    /// Completed history plus the current partial bar appended last; the
    /// shape the decision engine evaluates against.
    pub fn snapshot(&self) -> MarketSnapshot {
        let mut candles = self.history.to_vec();
        let last_price = match &self.current {
            Some(bar) => {
                candles.push(bar.clone());
                bar.close
            }
            None => candles
                .last()
                .map(|b| b.close)
                .unwrap_or_default(),
        };
        MarketSnapshot { candles, last_price }
    }
}

/// Caps downstream publish volume to at most one emission per interval.
/// Aggregation correctness never depends on this; it only gates emission
/// cadence.
#[derive(Debug, Clone)]
pub struct EmitThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl EmitThrottle {
    pub fn new(interval: Duration) -> Self {
        EmitThrottle { interval, last: None }
    }

    /// One-second throttle, the default publish cadence per instrument.
    pub fn per_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Returns true when an emission is allowed at `now`, and records it.
    pub fn allow(&mut self, now: Instant) -> bool {
        let permitted = match self.last {
            Some(last) => now.saturating_duration_since(last) > self.interval,
            None => true,
        };
        if permitted {
            self.last = Some(now);
        }
        permitted
    }
}
