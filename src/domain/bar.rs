//! Tick and OHLCV bar representations.
//!
//! Bars are aligned to fixed frame boundaries:
//! `period_start = floor(time / frame_secs) * frame_secs`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

/// Timestamps above this are assumed to be milliseconds and divided by 1000.
/// Unix seconds are currently ~1.7e9, milliseconds ~1.7e12.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// Normalize a feed timestamp to unix seconds, auto-detecting milliseconds
/// by magnitude.
pub fn normalize_timestamp(time: i64) -> i64 {
    if time > MILLIS_THRESHOLD {
        time / 1000
    } else {
        time
    }
}

/// A single market-data update for one instrument. Feeds may deliver these
/// as raw trades or as rolling sub-frame candles; the aggregator treats both
/// the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub instrument: String,
    /// Unix timestamp, seconds or milliseconds (normalized on ingest).
    pub time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
    /// Set by feeds that mark their own frame closes. Aggregation relies on
    /// frame boundaries instead, so this is informational only.
    pub complete: bool,
}

/// A fixed-width OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub instrument: String,
    /// Frame-aligned unix seconds.
    pub period_start: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
    pub complete: bool,
}

impl Bar {
    /// Open a new bar from the first tick of a frame.
    pub fn open_from_tick(tick: &Tick, period_start: i64) -> Self {
        Bar {
            instrument: tick.instrument.clone(),
            period_start,
            open: tick.open,
            high: tick.high,
            low: tick.low,
            close: tick.close,
            volume: tick.volume,
            complete: false,
        }
    }

    /// Merge a same-frame tick into this bar.
    pub fn apply_tick(&mut self, tick: &Tick) {
        self.high = self.high.max(tick.high);
        self.low = self.low.min(tick.low);
        self.close = tick.close;
        self.volume += tick.volume;
    }

    /// Frame start as a UTC timestamp for logs and reports.
    pub fn period_start_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.period_start, 0)
    }
}

/// Bar width. Parsed from the short feed notation ("1m", "5m", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    H1,
}

impl Timeframe {
    pub fn frame_secs(&self) -> i64 {
        match self {
            Timeframe::M1 => 60,
            Timeframe::M5 => 5 * 60,
            Timeframe::M15 => 15 * 60,
            Timeframe::H1 => 3600,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Timeframe::M1),
            "5m" => Ok(Timeframe::M5),
            "15m" => Ok(Timeframe::M15),
            "1h" => Ok(Timeframe::H1),
            other => Err(format!("unknown timeframe '{other}', expected 1m|5m|15m|1h")),
        }
    }
}
