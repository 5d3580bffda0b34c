//! Relative Strength Index with Wilder smoothing.
//!
//! Seed averages are the simple mean of the first n gains/losses, then
//! `avg = (avg*(n-1) + new)/n` over the rest. avg_loss == 0 maps to 100.

use crate::domain::indicator::round6;

pub const DEFAULT_PERIOD: usize = 14;

/// Latest RSI over `values`, or `None` while `values.len() < period + 1`.
pub fn rsi(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period + 1 {
        return None;
    }

    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let gains: Vec<f64> = deltas.iter().map(|d| if *d > 0.0 { *d } else { 0.0 }).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| if *d < 0.0 { -*d } else { 0.0 }).collect();

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    for i in period..deltas.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(round6(100.0 - 100.0 / (1.0 + rs)))
}
