//! Candidate trade signals.
//!
//! Signals arrive fully formed from an external generator; the engine never
//! mutates one. Prices stay decimal-accurate until indicator math needs f64.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(format!("unknown side '{other}', expected BUY or SELL")),
        }
    }
}

/// An externally generated trade proposal: entry, protective stop,
/// take-profit target, position size, and the reward-to-risk multiple `r`
/// the generator claims for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSignal {
    pub instrument: String,
    pub side: Side,
    pub entry: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub size: Decimal,
    pub r: Decimal,
}
