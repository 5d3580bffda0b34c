//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the SMA of the first n values, then
//! `ema = value*k + ema*(1-k)` over the remainder.

use crate::domain::indicator::round6;

/// Latest EMA over `values`, or `None` while `values.len() < period`.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut current = values[..period].iter().sum::<f64>() / period as f64;

    for value in &values[period..] {
        current = value * k + current * (1.0 - k);
    }

    Some(round6(current))
}
