//! Technical indicators.
//!
//! All indicators are pure functions over a price slice and return `None`
//! while the series is still inside the warm-up window:
//!
//! - [`ema::ema`]: needs `period` values
//! - [`rsi::rsi`]: needs `period + 1` values
//! - [`atr::atr`]: needs `period + 1` values
//! - [`macd::macd`]: needs `slow + signal` values
//!
//! A `None` from any of them means "no market data" to the decision engine.

pub mod ema;
pub mod rsi;
pub mod atr;
pub mod macd;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Latest MACD triplet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Indicator outputs are rounded to 6 fractional digits so that results are
/// reproducible across platforms and serialization round-trips.
pub(crate) fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Lossy conversion for indicator math; decimal accuracy is preserved on
/// prices, indicators tolerate f64.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round6_truncates_noise() {
        assert_eq!(round6(1.234_567_89), 1.234_568);
        assert_eq!(round6(-1.234_567_89), -1.234_568);
        assert_eq!(round6(2.0), 2.0);
    }

    #[test]
    fn to_f64_preserves_scale() {
        let d: Decimal = "270.25".parse().unwrap();
        assert_eq!(to_f64(d), 270.25);
    }
}
