//! Average True Range with Wilder smoothing.
//!
//! TR[0] = high-low; TR[i] = max(high-low, |high-prev_close|, |low-prev_close|).
//! Seed with the SMA of the first n true ranges, Wilder-smooth the rest.

use crate::domain::indicator::round6;

pub const DEFAULT_PERIOD: usize = 14;

/// Latest ATR, or `None` while `closes.len() < period + 1`. The three slices
/// must agree in length; a mismatched feed row counts as missing data.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<f64> {
    let n = closes.len();
    if period == 0 || n < period + 1 || highs.len() != n || lows.len() != n {
        return None;
    }

    let mut tr_values = Vec::with_capacity(n);
    tr_values.push(highs[0] - lows[0]);
    for i in 1..n {
        let hl = highs[i] - lows[i];
        let hc = (highs[i] - closes[i - 1]).abs();
        let lc = (lows[i] - closes[i - 1]).abs();
        tr_values.push(hl.max(hc).max(lc));
    }

    let mut atr = tr_values[..period].iter().sum::<f64>() / period as f64;
    for tr in &tr_values[period..] {
        atr = (atr * (period - 1) as f64 + tr) / period as f64;
    }

    Some(round6(atr))
}
