//! Decision engine.
//!
//! Sequences hard rejects, indicator computation, and the six soft scorers
//! into one auditable TAKE/SKIP/REJECT result. `evaluate` is a pure
//! function of (signal, snapshot, settings): identical inputs always
//! produce identical results.

use crate::domain::bar::Bar;
use crate::domain::indicator::{atr, ema, macd, rsi, to_f64};
use crate::domain::reason::{sort_reasons, Reason, ReasonCode, Severity};
use crate::domain::rules;
use crate::domain::settings::EngineSettings;
use crate::domain::signal::CandidateSignal;
use rust_decimal::Decimal;
use serde::Serialize;

/// Evaluation needs this many candles before indicators are trusted.
pub const MIN_HISTORY_BARS: usize = 50;

/// Bars scanned backwards for the nearest support/resistance level.
pub const LEVEL_SCAN_WINDOW: usize = 50;

/// Regime EMA period; long enough to define trend on intraday frames.
pub const EMA_PERIOD: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Take,
    Skip,
    Reject,
}

/// Recent completed bars with the current partial bar appended last.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub candles: Vec<Bar>,
    pub last_price: Decimal,
}

/// Indicator values captured for the audit trail. Keys are the wire names
/// downstream consumers already parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecisionMetrics {
    pub ema50: Option<f64>,
    pub rsi14: Option<f64>,
    pub atr14: Option<f64>,
    pub macd_hist: Option<f64>,
    pub sl_atr: Option<f64>,
    pub nearest_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionResult {
    pub decision: Decision,
    /// Normalized percentage 0-100; primary for decision logic.
    pub score_pct: u32,
    pub threshold_pct: u32,
    pub score_raw: u32,
    pub score_max: u32,
    /// Legacy aliases of `score_pct`/`threshold_pct`, kept for consumers
    /// that predate normalization.
    pub score: u32,
    pub threshold: u32,
    pub reasons: Vec<Reason>,
    pub metrics: DecisionMetrics,
}

/// Evaluate one candidate signal against the bar snapshot under an
/// immutable settings value.
pub fn evaluate(
    signal: &CandidateSignal,
    snapshot: &MarketSnapshot,
    settings: &EngineSettings,
) -> DecisionResult {
    let threshold_pct = settings.decision_threshold;
    let mut metrics = DecisionMetrics::default();

    // 1. Hard rejects, fixed order; first hit finalizes with score 0.
    if let Some(reason) = rules::check_invalid_signal(signal) {
        return finalize(Decision::Reject, 0, 0, 0, threshold_pct, vec![reason], metrics);
    }

    if snapshot.candles.len() < MIN_HISTORY_BARS {
        let reason = Reason::new(
            ReasonCode::NoMarketData,
            Severity::Block,
            format!("Not enough candles ({})", snapshot.candles.len()),
        );
        return finalize(Decision::Reject, 0, 0, 0, threshold_pct, vec![reason], metrics);
    }

    // 2. Indicators, computed once per evaluation.
    let closes: Vec<f64> = snapshot.candles.iter().map(|c| to_f64(c.close)).collect();
    let highs: Vec<f64> = snapshot.candles.iter().map(|c| to_f64(c.high)).collect();
    let lows: Vec<f64> = snapshot.candles.iter().map(|c| to_f64(c.low)).collect();

    let ema50 = ema::ema(&closes, EMA_PERIOD);
    let ema50_prev = ema::ema(&closes[..closes.len() - 1], EMA_PERIOD);
    let rsi14 = rsi::rsi(&closes, rsi::DEFAULT_PERIOD);
    let atr14 = atr::atr(&highs, &lows, &closes, atr::DEFAULT_PERIOD);
    let macd_out = macd::macd_default(&closes);

    let (Some(ema50), Some(rsi14), Some(atr14), Some(macd_out)) =
        (ema50, rsi14, atr14, macd_out)
    else {
        let reason = Reason::new(
            ReasonCode::NoMarketData,
            Severity::Block,
            "Indicators unavailable",
        );
        return finalize(Decision::Reject, 0, 0, 0, threshold_pct, vec![reason], metrics);
    };

    metrics.ema50 = Some(ema50);
    metrics.rsi14 = Some(rsi14);
    metrics.atr14 = Some(atr14);
    metrics.macd_hist = Some(macd_out.histogram);

    let entry = to_f64(signal.entry);
    let stop_loss = to_f64(signal.stop_loss);
    let take_profit = to_f64(signal.take_profit);

    // 3. Post-indicator hard rejects.
    let (hard_min, hard_max) = settings.hard_band();
    if let Some(reason) = rules::check_volatility_hard(entry, stop_loss, atr14, hard_min, hard_max)
    {
        return finalize(Decision::Reject, 0, 0, 0, threshold_pct, vec![reason], metrics);
    }

    if let Some(reason) = rules::check_risk_reward(to_f64(signal.r), settings.rr_min_target()) {
        return finalize(Decision::Reject, 0, 0, 0, threshold_pct, vec![reason], metrics);
    }

    // 4. Soft scorers under resolved weights (explicit zeros honored).
    let w_regime = settings.regime_weight();
    let w_volatility = settings.volatility_weight();
    let w_momentum = settings.momentum_weight();
    let w_levels = settings.levels_weight();
    let w_costs = settings.costs_weight();
    let w_liquidity = settings.liquidity_weight();

    let mut score_raw = 0;
    let mut reasons = Vec::new();

    let ema50_prev = ema50_prev.unwrap_or(ema50);
    let close = to_f64(snapshot.last_price);

    let (s, r) = rules::score_regime(close, ema50, ema50_prev, signal.side, w_regime);
    score_raw += s;
    reasons.extend(r);

    let (soft_min, soft_max) = settings.soft_band();
    let (s, r) = rules::score_volatility(entry, stop_loss, atr14, soft_min, soft_max, w_volatility);
    score_raw += s;
    reasons.extend(r);
    metrics.sl_atr = Some(round2((entry - stop_loss).abs() / atr14));

    let (s, r) = rules::score_momentum(rsi14, macd_out.histogram, signal.side, w_momentum);
    score_raw += s;
    reasons.extend(r);

    let nearest =
        rules::find_nearest_level(&highs, &lows, entry, signal.side, LEVEL_SCAN_WINDOW);
    metrics.nearest_level = nearest;
    let (s, r) = rules::score_levels(entry, take_profit, nearest, signal.side, w_levels);
    score_raw += s;
    reasons.extend(r);

    let (s, r) = rules::score_costs(
        entry,
        stop_loss,
        take_profit,
        settings.fee_bps(),
        settings.slip_bps(),
        w_costs,
    );
    score_raw += s;
    reasons.extend(r);

    let (s, r) = rules::score_liquidity(w_liquidity);
    score_raw += s;
    reasons.extend(r);

    // 5. Normalize and decide.
    let score_max = w_regime + w_volatility + w_momentum + w_levels + w_costs + w_liquidity;
    let score_pct = if score_max > 0 {
        // round-half-up on the real quotient
        ((score_raw as f64 / score_max as f64) * 100.0).round() as u32
    } else {
        0
    };

    let decision = if score_pct >= threshold_pct {
        Decision::Take
    } else {
        Decision::Skip
    };

    finalize(
        decision,
        score_pct,
        score_raw,
        score_max,
        threshold_pct,
        reasons,
        metrics,
    )
}

fn finalize(
    decision: Decision,
    score_pct: u32,
    score_raw: u32,
    score_max: u32,
    threshold_pct: u32,
    mut reasons: Vec<Reason>,
    metrics: DecisionMetrics,
) -> DecisionResult {
    sort_reasons(&mut reasons);
    DecisionResult {
        decision,
        score_pct,
        threshold_pct,
        score_raw,
        score_max,
        score: score_pct,
        threshold: threshold_pct,
        reasons,
        metrics,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
