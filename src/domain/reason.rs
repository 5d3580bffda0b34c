//! Typed decision explanations.
//!
//! Every abnormal or noteworthy condition the engine observes becomes a
//! [`Reason`]; nothing is thrown. A closed code enumeration keeps match
//! arms exhaustive, and the serialized names are the compatibility surface
//! for downstream consumers.

use serde::Serialize;

/// BLOCK forces rejection regardless of score; WARN and INFO annotate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Block,
}

impl Severity {
    /// Presentation rank: BLOCK < WARN < INFO.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Block => 0,
            Severity::Warn => 1,
            Severity::Info => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    // Hard blocks
    InvalidSignal,
    NoMarketData,
    RrTooLow,

    // Soft scores
    RegimeMatch,
    VolatilitySanityOk,
    VolatilitySanityBad,
    MomentumOk,
    MomentumWeak,
    RsiOverheat,
    RsiOversold,
    LevelClearanceOk,
    LevelTooClose,
    LevelUnknown,
    CostsOk,
    CostsTooHigh,
    LiquidityUnknown,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::InvalidSignal => "INVALID_SIGNAL",
            ReasonCode::NoMarketData => "NO_MARKET_DATA",
            ReasonCode::RrTooLow => "RR_TOO_LOW",
            ReasonCode::RegimeMatch => "REGIME_MATCH",
            ReasonCode::VolatilitySanityOk => "VOLATILITY_SANITY_OK",
            ReasonCode::VolatilitySanityBad => "VOLATILITY_SANITY_BAD",
            ReasonCode::MomentumOk => "MOMENTUM_OK",
            ReasonCode::MomentumWeak => "MOMENTUM_WEAK",
            ReasonCode::RsiOverheat => "RSI_OVERHEAT",
            ReasonCode::RsiOversold => "RSI_OVERSOLD",
            ReasonCode::LevelClearanceOk => "LEVEL_CLEARANCE_OK",
            ReasonCode::LevelTooClose => "LEVEL_TOO_CLOSE",
            ReasonCode::LevelUnknown => "LEVEL_UNKNOWN",
            ReasonCode::CostsOk => "COSTS_OK",
            ReasonCode::CostsTooHigh => "COSTS_TOO_HIGH",
            ReasonCode::LiquidityUnknown => "LIQUIDITY_UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reason {
    pub code: ReasonCode,
    pub severity: Severity,
    pub msg: String,
}

impl Reason {
    pub fn new(code: ReasonCode, severity: Severity, msg: impl Into<String>) -> Self {
        Reason {
            code,
            severity,
            msg: msg.into(),
        }
    }
}

/// Presentation order: severity rank ascending, then code name; stable for
/// equal keys so same-code reasons keep emission order.
pub fn sort_reasons(reasons: &mut [Reason]) {
    reasons.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then_with(|| a.code.as_str().cmp(b.code.as_str()))
    });
}
