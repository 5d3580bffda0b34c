//! Engine settings snapshot.
//!
//! An immutable value passed explicitly into every evaluation, so the
//! engine can never observe a setting changing mid-call and evaluation is
//! trivially parallelizable across instruments.
//!
//! Weights distinguish "unset" from "explicitly zero": an absent key falls
//! back to its default, a configured 0 disables the scorer and shrinks the
//! normalization denominator.

use crate::domain::error::TickscoreError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_DECISION_THRESHOLD: u32 = 70;
pub const DEFAULT_RR_MIN: f64 = 1.5;
pub const DEFAULT_ATR_STOP_HARD_MIN: f64 = 0.3;
pub const DEFAULT_ATR_STOP_HARD_MAX: f64 = 5.0;
pub const DEFAULT_ATR_STOP_SOFT_MIN: f64 = 0.6;
pub const DEFAULT_ATR_STOP_SOFT_MAX: f64 = 2.5;
pub const DEFAULT_W_REGIME: u32 = 20;
pub const DEFAULT_W_VOLATILITY: u32 = 15;
pub const DEFAULT_W_MOMENTUM: u32 = 15;
pub const DEFAULT_W_LEVELS: u32 = 20;
pub const DEFAULT_W_COSTS: u32 = 15;
pub const DEFAULT_W_LIQUIDITY: u32 = 5;
pub const DEFAULT_FEES_BPS: u32 = 3;
pub const DEFAULT_SLIPPAGE_BPS: u32 = 5;

const SECTION: &str = "engine";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Integer percentage; TAKE at or above, SKIP below.
    pub decision_threshold: u32,
    pub rr_min: Option<f64>,
    pub atr_stop_hard_min: Option<f64>,
    pub atr_stop_hard_max: Option<f64>,
    pub atr_stop_soft_min: Option<f64>,
    pub atr_stop_soft_max: Option<f64>,
    pub w_regime: Option<u32>,
    pub w_volatility: Option<u32>,
    pub w_momentum: Option<u32>,
    pub w_levels: Option<u32>,
    pub w_costs: Option<u32>,
    pub w_liquidity: Option<u32>,
    pub fees_bps: Option<u32>,
    pub slippage_bps: Option<u32>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            decision_threshold: DEFAULT_DECISION_THRESHOLD,
            rr_min: None,
            atr_stop_hard_min: None,
            atr_stop_hard_max: None,
            atr_stop_soft_min: None,
            atr_stop_soft_max: None,
            w_regime: None,
            w_volatility: None,
            w_momentum: None,
            w_levels: None,
            w_costs: None,
            w_liquidity: None,
            fees_bps: None,
            slippage_bps: None,
        }
    }
}

impl EngineSettings {
    pub fn rr_min_target(&self) -> f64 {
        self.rr_min.unwrap_or(DEFAULT_RR_MIN)
    }

    /// (min, max) stop-distance-in-ATR band that hard-rejects outside it.
    pub fn hard_band(&self) -> (f64, f64) {
        (
            self.atr_stop_hard_min.unwrap_or(DEFAULT_ATR_STOP_HARD_MIN),
            self.atr_stop_hard_max.unwrap_or(DEFAULT_ATR_STOP_HARD_MAX),
        )
    }

    /// (min, max) stop-distance-in-ATR band that earns full volatility credit.
    pub fn soft_band(&self) -> (f64, f64) {
        (
            self.atr_stop_soft_min.unwrap_or(DEFAULT_ATR_STOP_SOFT_MIN),
            self.atr_stop_soft_max.unwrap_or(DEFAULT_ATR_STOP_SOFT_MAX),
        )
    }

    pub fn regime_weight(&self) -> u32 {
        self.w_regime.unwrap_or(DEFAULT_W_REGIME)
    }

    pub fn volatility_weight(&self) -> u32 {
        self.w_volatility.unwrap_or(DEFAULT_W_VOLATILITY)
    }

    pub fn momentum_weight(&self) -> u32 {
        self.w_momentum.unwrap_or(DEFAULT_W_MOMENTUM)
    }

    pub fn levels_weight(&self) -> u32 {
        self.w_levels.unwrap_or(DEFAULT_W_LEVELS)
    }

    pub fn costs_weight(&self) -> u32 {
        self.w_costs.unwrap_or(DEFAULT_W_COSTS)
    }

    pub fn liquidity_weight(&self) -> u32 {
        self.w_liquidity.unwrap_or(DEFAULT_W_LIQUIDITY)
    }

    pub fn fee_bps(&self) -> u32 {
        self.fees_bps.unwrap_or(DEFAULT_FEES_BPS)
    }

    pub fn slip_bps(&self) -> u32 {
        self.slippage_bps.unwrap_or(DEFAULT_SLIPPAGE_BPS)
    }

    /// Read the `[engine]` section. Absent keys stay unset; present keys
    /// that fail to parse are config errors, not silent defaults.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TickscoreError> {
        let settings = EngineSettings {
            decision_threshold: parse_key(config, "decision_threshold")?
                .unwrap_or(DEFAULT_DECISION_THRESHOLD),
            rr_min: parse_key(config, "rr_min")?,
            atr_stop_hard_min: parse_key(config, "atr_stop_hard_min")?,
            atr_stop_hard_max: parse_key(config, "atr_stop_hard_max")?,
            atr_stop_soft_min: parse_key(config, "atr_stop_soft_min")?,
            atr_stop_soft_max: parse_key(config, "atr_stop_soft_max")?,
            w_regime: parse_key(config, "w_regime")?,
            w_volatility: parse_key(config, "w_volatility")?,
            w_momentum: parse_key(config, "w_momentum")?,
            w_levels: parse_key(config, "w_levels")?,
            w_costs: parse_key(config, "w_costs")?,
            w_liquidity: parse_key(config, "w_liquidity")?,
            fees_bps: parse_key(config, "fees_bps")?,
            slippage_bps: parse_key(config, "slippage_bps")?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), TickscoreError> {
        if self.decision_threshold > 100 {
            return Err(invalid(
                "decision_threshold",
                "must be a percentage in 0..=100",
            ));
        }

        let (hard_min, hard_max) = self.hard_band();
        if hard_min < 0.0 || hard_max <= hard_min {
            return Err(invalid(
                "atr_stop_hard_min",
                "hard band must satisfy 0 <= min < max",
            ));
        }

        let (soft_min, soft_max) = self.soft_band();
        if soft_min < 0.0 || soft_max <= soft_min {
            return Err(invalid(
                "atr_stop_soft_min",
                "soft band must satisfy 0 <= min < max",
            ));
        }

        if self.rr_min_target() < 0.0 {
            return Err(invalid("rr_min", "must be non-negative"));
        }

        const MAX_WEIGHT: u32 = 10_000;
        let weights = [
            ("w_regime", self.regime_weight()),
            ("w_volatility", self.volatility_weight()),
            ("w_momentum", self.momentum_weight()),
            ("w_levels", self.levels_weight()),
            ("w_costs", self.costs_weight()),
            ("w_liquidity", self.liquidity_weight()),
        ];
        for (key, weight) in weights {
            if weight > MAX_WEIGHT {
                return Err(invalid(key, "weight is implausibly large"));
            }
        }

        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> TickscoreError {
    TickscoreError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_key<T: std::str::FromStr>(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<T>, TickscoreError> {
    match config.get_string(SECTION, key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            TickscoreError::ConfigInvalid {
                section: SECTION.to_string(),
                key: key.to_string(),
                reason: format!("cannot parse '{raw}'"),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn defaults_resolve() {
        let settings = EngineSettings::default();
        assert_eq!(settings.decision_threshold, 70);
        assert_eq!(settings.rr_min_target(), 1.5);
        assert_eq!(settings.hard_band(), (0.3, 5.0));
        assert_eq!(settings.soft_band(), (0.6, 2.5));
        assert_eq!(settings.regime_weight(), 20);
        assert_eq!(settings.volatility_weight(), 15);
        assert_eq!(settings.momentum_weight(), 15);
        assert_eq!(settings.levels_weight(), 20);
        assert_eq!(settings.costs_weight(), 15);
        assert_eq!(settings.liquidity_weight(), 5);
        assert_eq!(settings.fee_bps(), 3);
        assert_eq!(settings.slip_bps(), 5);
    }

    #[test]
    fn explicit_zero_weight_is_honored() {
        let settings = EngineSettings {
            w_levels: Some(0),
            ..EngineSettings::default()
        };
        assert_eq!(settings.levels_weight(), 0);
    }

    #[test]
    fn from_config_reads_engine_section() {
        let config = FileConfigAdapter::from_string(
            "[engine]\ndecision_threshold = 60\nw_regime = 30\nrr_min = 2.0\n",
        )
        .unwrap();
        let settings = EngineSettings::from_config(&config).unwrap();

        assert_eq!(settings.decision_threshold, 60);
        assert_eq!(settings.w_regime, Some(30));
        assert_eq!(settings.rr_min, Some(2.0));
        // Untouched keys stay unset.
        assert_eq!(settings.w_volatility, None);
    }

    #[test]
    fn from_config_rejects_garbage_values() {
        let config =
            FileConfigAdapter::from_string("[engine]\nw_regime = plenty\n").unwrap();
        assert!(EngineSettings::from_config(&config).is_err());
    }

    #[test]
    fn validate_rejects_inverted_bands() {
        let settings = EngineSettings {
            atr_stop_hard_min: Some(6.0),
            atr_stop_hard_max: Some(5.0),
            ..EngineSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_implausible_weights() {
        let settings = EngineSettings {
            w_momentum: Some(50_000),
            ..EngineSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_threshold_above_100() {
        let settings = EngineSettings {
            decision_threshold: 101,
            ..EngineSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
