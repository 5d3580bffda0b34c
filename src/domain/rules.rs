//! Hard-reject checks and soft scorers.
//!
//! Hard checks return `Some(Reason)` with BLOCK severity when a signal must
//! be rejected outright. Soft scorers return an integer contribution in
//! `[0, weight]` plus the reasons explaining it; they only run once no hard
//! check fired. Everything here is pure and panic-free for any input.

use crate::domain::reason::{Reason, ReasonCode, Severity};
use crate::domain::signal::{CandidateSignal, Side};
use rust_decimal::Decimal;

// --- Hard blocks ---

pub fn check_invalid_signal(signal: &CandidateSignal) -> Option<Reason> {
    if signal.size <= Decimal::ZERO {
        return Some(Reason::new(
            ReasonCode::InvalidSignal,
            Severity::Block,
            "Size must be > 0",
        ));
    }

    match signal.side {
        Side::Buy => {
            if signal.stop_loss >= signal.entry {
                return Some(Reason::new(
                    ReasonCode::InvalidSignal,
                    Severity::Block,
                    "BUY: SL must be < Entry",
                ));
            }
            if signal.take_profit <= signal.entry {
                return Some(Reason::new(
                    ReasonCode::InvalidSignal,
                    Severity::Block,
                    "BUY: TP must be > Entry",
                ));
            }
        }
        Side::Sell => {
            if signal.stop_loss <= signal.entry {
                return Some(Reason::new(
                    ReasonCode::InvalidSignal,
                    Severity::Block,
                    "SELL: SL must be > Entry",
                ));
            }
            if signal.take_profit >= signal.entry {
                return Some(Reason::new(
                    ReasonCode::InvalidSignal,
                    Severity::Block,
                    "SELL: TP must be < Entry",
                ));
            }
        }
    }

    None
}

/// Stop distance in ATR units outside `[min_dist, max_dist]` is a hard
/// reject; so is a degenerate ATR, with its own message.
pub fn check_volatility_hard(
    entry: f64,
    stop_loss: f64,
    atr: f64,
    min_dist: f64,
    max_dist: f64,
) -> Option<Reason> {
    if atr <= 0.0 {
        return Some(Reason::new(
            ReasonCode::VolatilitySanityBad,
            Severity::Block,
            "ATR is zero/negative",
        ));
    }

    let sl_atr = (entry - stop_loss).abs() / atr;

    if sl_atr < min_dist {
        return Some(Reason::new(
            ReasonCode::VolatilitySanityBad,
            Severity::Block,
            format!("Stop too tight ({sl_atr:.2} ATR)"),
        ));
    }
    if sl_atr > max_dist {
        return Some(Reason::new(
            ReasonCode::VolatilitySanityBad,
            Severity::Block,
            format!("Stop too wide ({sl_atr:.2} ATR)"),
        ));
    }

    None
}

pub fn check_risk_reward(r: f64, target: f64) -> Option<Reason> {
    if r < target {
        return Some(Reason::new(
            ReasonCode::RrTooLow,
            Severity::Block,
            format!("R is too low ({r:.2} < {target})"),
        ));
    }
    None
}

// --- Soft scores ---

/// Full credit iff price sits on the trend side of the EMA and the EMA
/// slope agrees with the trade direction; counter-trend entries score 0.
pub fn score_regime(
    close: f64,
    ema: f64,
    ema_prev: f64,
    side: Side,
    weight: u32,
) -> (u32, Vec<Reason>) {
    let slope = ema - ema_prev;

    let aligned = match side {
        Side::Buy => close > ema && slope > 0.0,
        Side::Sell => close < ema && slope < 0.0,
    };

    if aligned {
        let msg = match side {
            Side::Buy => "Uptrend confirmed (Price > EMA, Slope > 0)",
            Side::Sell => "Downtrend confirmed (Price < EMA, Slope < 0)",
        };
        (
            weight,
            vec![Reason::new(ReasonCode::RegimeMatch, Severity::Info, msg)],
        )
    } else {
        (
            0,
            vec![Reason::new(
                ReasonCode::RegimeMatch,
                Severity::Warn,
                "Aggressive entry (Counter-trend or Flat)",
            )],
        )
    }
}

/// Full credit inside the soft band, one-third credit outside it.
pub fn score_volatility(
    entry: f64,
    stop_loss: f64,
    atr: f64,
    min_soft: f64,
    max_soft: f64,
    weight: u32,
) -> (u32, Vec<Reason>) {
    if atr <= 0.0 {
        return (
            0,
            vec![Reason::new(
                ReasonCode::VolatilitySanityBad,
                Severity::Warn,
                "ATR is zero/negative",
            )],
        );
    }

    let sl_atr = (entry - stop_loss).abs() / atr;

    if (min_soft..=max_soft).contains(&sl_atr) {
        (
            weight,
            vec![Reason::new(
                ReasonCode::VolatilitySanityOk,
                Severity::Info,
                format!("Stop distance valid ({sl_atr:.2} ATR)"),
            )],
        )
    } else {
        (
            weight / 3,
            vec![Reason::new(
                ReasonCode::VolatilitySanityBad,
                Severity::Warn,
                format!("Stop distance suspicious ({sl_atr:.2} ATR)"),
            )],
        )
    }
}

/// RSI carries about two thirds of the weight, MACD the remainder.
pub fn score_momentum(rsi: f64, macd_hist: f64, side: Side, weight: u32) -> (u32, Vec<Reason>) {
    let rsi_weight = (weight as f64 * 0.67) as u32;
    let macd_weight = weight - rsi_weight;

    let mut score = 0;
    let mut reasons = Vec::new();

    match side {
        Side::Buy => {
            if (45.0..=70.0).contains(&rsi) {
                score += rsi_weight;
                reasons.push(Reason::new(
                    ReasonCode::MomentumOk,
                    Severity::Info,
                    format!("RSI bullish ({rsi:.1})"),
                ));
            } else if rsi > 70.0 {
                reasons.push(Reason::new(
                    ReasonCode::RsiOverheat,
                    Severity::Warn,
                    format!("RSI Overbought ({rsi:.1})"),
                ));
            } else {
                reasons.push(Reason::new(
                    ReasonCode::MomentumWeak,
                    Severity::Warn,
                    format!("RSI weak ({rsi:.1})"),
                ));
            }

            if macd_hist > 0.0 {
                score += macd_weight;
                reasons.push(Reason::new(
                    ReasonCode::MomentumOk,
                    Severity::Info,
                    "MACD Hist > 0",
                ));
            } else {
                reasons.push(Reason::new(
                    ReasonCode::MomentumWeak,
                    Severity::Warn,
                    "MACD Hist < 0",
                ));
            }
        }
        Side::Sell => {
            if (30.0..=55.0).contains(&rsi) {
                score += rsi_weight;
                reasons.push(Reason::new(
                    ReasonCode::MomentumOk,
                    Severity::Info,
                    format!("RSI bearish ({rsi:.1})"),
                ));
            } else if rsi < 30.0 {
                reasons.push(Reason::new(
                    ReasonCode::RsiOversold,
                    Severity::Warn,
                    format!("RSI Oversold ({rsi:.1})"),
                ));
            } else {
                reasons.push(Reason::new(
                    ReasonCode::MomentumWeak,
                    Severity::Warn,
                    format!("RSI weak ({rsi:.1})"),
                ));
            }

            if macd_hist < 0.0 {
                score += macd_weight;
                reasons.push(Reason::new(
                    ReasonCode::MomentumOk,
                    Severity::Info,
                    "MACD Hist < 0",
                ));
            } else {
                reasons.push(Reason::new(
                    ReasonCode::MomentumWeak,
                    Severity::Warn,
                    "MACD Hist > 0",
                ));
            }
        }
    }

    (score, reasons)
}

/// Nearest opposing level in the scan window: for BUY the lowest high
/// strictly above entry (resistance), for SELL the highest low strictly
/// below entry (support).
pub fn find_nearest_level(
    highs: &[f64],
    lows: &[f64],
    entry: f64,
    side: Side,
    window: usize,
) -> Option<f64> {
    match side {
        Side::Buy => highs
            .iter()
            .rev()
            .take(window)
            .copied()
            .filter(|h| *h > entry)
            .fold(None, |acc: Option<f64>, h| {
                Some(acc.map_or(h, |best| best.min(h)))
            }),
        Side::Sell => lows
            .iter()
            .rev()
            .take(window)
            .copied()
            .filter(|l| *l < entry)
            .fold(None, |acc: Option<f64>, l| {
                Some(acc.map_or(l, |best| best.max(l)))
            }),
    }
}

/// Linear clearance score: how much of the take-profit distance is free of
/// the nearest opposing level. An unknown level is neutral (half credit),
/// not a penalty. The `side` parameter is reserved for future
/// support/resistance asymmetry.
pub fn score_levels(
    entry: f64,
    take_profit: f64,
    nearest_level: Option<f64>,
    _side: Side,
    weight: u32,
) -> (u32, Vec<Reason>) {
    let Some(level) = nearest_level else {
        return (
            weight / 2,
            vec![Reason::new(
                ReasonCode::LevelUnknown,
                Severity::Info,
                "No level found in window",
            )],
        );
    };

    let tp_dist = (entry - take_profit).abs();
    if tp_dist == 0.0 {
        return (0, Vec::new());
    }

    let ratio = ((entry - level).abs() / tp_dist).clamp(0.0, 1.0);
    let score = (weight as f64 * ratio) as u32;

    if ratio >= 0.7 {
        (
            score,
            vec![Reason::new(
                ReasonCode::LevelClearanceOk,
                Severity::Info,
                format!("Room to move (Ratio {ratio:.2})"),
            )],
        )
    } else {
        (
            score,
            vec![Reason::new(
                ReasonCode::LevelTooClose,
                Severity::Warn,
                format!("Level too close (Ratio {ratio:.2})"),
            )],
        )
    }
}

/// Fees and slippage in basis points, charged on entry and exit. Full
/// credit when the net reward-to-risk still clears 1.5, one-third credit
/// above break-even, nothing below it.
pub fn score_costs(
    entry: f64,
    stop_loss: f64,
    take_profit: f64,
    fees_bps: u32,
    slippage_bps: u32,
    weight: u32,
) -> (u32, Vec<Reason>) {
    let total_cost_pct = (fees_bps + slippage_bps) as f64 / 10_000.0;
    let cost_price = entry * total_cost_pct;

    let raw_profit = (take_profit - entry).abs();
    let raw_loss = (entry - stop_loss).abs();

    let net_profit = raw_profit - cost_price * 2.0;
    let net_loss = raw_loss + cost_price * 2.0;

    if net_loss <= 0.0 {
        return (
            0,
            vec![Reason::new(
                ReasonCode::CostsTooHigh,
                Severity::Warn,
                "Costs exceed risk",
            )],
        );
    }

    let rr = net_profit / net_loss;

    if rr >= 1.5 {
        (
            weight,
            vec![Reason::new(
                ReasonCode::CostsOk,
                Severity::Info,
                format!("Net RR {rr:.2} OK"),
            )],
        )
    } else if rr > 1.0 {
        (
            weight / 3,
            vec![Reason::new(
                ReasonCode::CostsTooHigh,
                Severity::Warn,
                format!("Net RR {rr:.2} Low"),
            )],
        )
    } else {
        (
            0,
            vec![Reason::new(
                ReasonCode::CostsTooHigh,
                Severity::Warn,
                format!("Net RR {rr:.2} Negative Exp"),
            )],
        )
    }
}

/// Stub until a real depth/volume check exists: always full credit,
/// flagged so consumers can see the assumption.
pub fn score_liquidity(weight: u32) -> (u32, Vec<Reason>) {
    (
        weight,
        vec![Reason::new(
            ReasonCode::LiquidityUnknown,
            Severity::Info,
            "Liquidity assumed (Stub)",
        )],
    )
}
