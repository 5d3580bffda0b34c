//! Moving Average Convergence Divergence.
//!
//! MACD line = EMA(fast) - EMA(slow), computed over full aligned series;
//! signal line = EMA(signal) of the MACD line; histogram = line - signal.
//! Each EMA is seeded with the SMA over its own window.

use crate::domain::indicator::{round6, MacdValue};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

/// Latest (line, signal, histogram), or `None` while
/// `values.len() < slow + signal`.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> Option<MacdValue> {
    if fast == 0 || slow == 0 || signal == 0 || values.len() < slow + signal {
        return None;
    }

    let fast_series = ema_series(values, fast);
    let slow_series = ema_series(values, slow);

    // fast_series[0] sits at index fast-1 of `values`, slow_series[0] at
    // slow-1; shift the fast series to align both at the slow seed.
    let offset = (slow - 1) - (fast - 1);
    let mut line_series = Vec::with_capacity(slow_series.len());
    for (i, slow_value) in slow_series.iter().enumerate() {
        let fast_idx = i + offset;
        if fast_idx < fast_series.len() {
            line_series.push(fast_series[fast_idx] - slow_value);
        }
    }

    if line_series.len() < signal {
        return None;
    }

    let k = 2.0 / (signal as f64 + 1.0);
    let mut signal_value = line_series[..signal].iter().sum::<f64>() / signal as f64;
    for value in &line_series[signal..] {
        signal_value = value * k + signal_value * (1.0 - k);
    }

    let line = fast_series[fast_series.len() - 1] - slow_series[slow_series.len() - 1];
    Some(MacdValue {
        line: round6(line),
        signal: round6(signal_value),
        histogram: round6(line - signal_value),
    })
}

pub fn macd_default(values: &[f64]) -> Option<MacdValue> {
    macd(values, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

/// EMA at every index from the seed onward: element 0 is the SMA over the
/// first `period` values, element i continues the recurrence.
fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut series = Vec::with_capacity(values.len() - period + 1);
    let mut current = values[..period].iter().sum::<f64>() / period as f64;
    series.push(current);
    for value in &values[period..] {
        current = value * k + current * (1.0 - k);
        series.push(current);
    }
    series
}
