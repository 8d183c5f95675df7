//! Serializable backtest configuration.
//!
//! One TOML file describes a full run: capital, risk limits, fee schedule,
//! and the strategy selection. The config validates before a run starts and
//! hashes to a deterministic run id, so identical configs share identity.

use serde::{Deserialize, Serialize};
use std::path::Path;

use quantlab_core::costs::FeeSchedule;
use quantlab_core::engine::{EngineConfig, ValuationPolicy};
use quantlab_core::error::ConfigError;
use quantlab_core::risk::DrawdownBasis;
use quantlab_core::strategy::StrategySpec;

/// Unique identifier for a run configuration (content-addressable hash).
pub type RunId = String;

/// Errors while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Complete configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    pub position: PositionSection,
    pub fees: FeesSection,
    pub strategy: StrategySpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    pub initial_capital: f64,
    /// Annual risk-free rate for the Sharpe ratio.
    pub risk_free_rate: f64,
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            initial_capital: 1_000_000.0,
            risk_free_rate: 0.02,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionSection {
    pub max_drawdown: f64,
    pub max_position_fraction: f64,
    pub lot_size: u32,
    pub valuation_policy: ValuationPolicy,
    pub drawdown_basis: DrawdownBasis,
}

impl Default for PositionSection {
    fn default() -> Self {
        Self {
            max_drawdown: 0.10,
            max_position_fraction: 0.95,
            lot_size: 100,
            valuation_policy: ValuationPolicy::default(),
            drawdown_basis: DrawdownBasis::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeesSection {
    pub commission_rate: f64,
    pub min_commission: f64,
    pub transfer_fee_rate: f64,
    pub exit_tax_rate: f64,
}

impl Default for FeesSection {
    fn default() -> Self {
        let fees = FeeSchedule::default();
        Self {
            commission_rate: fees.commission_rate,
            min_commission: fees.min_commission,
            transfer_fee_rate: fees.transfer_fee_rate,
            exit_tax_rate: fees.exit_tax_rate,
        }
    }
}

impl BacktestConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule::new(
            self.fees.commission_rate,
            self.fees.min_commission,
            self.fees.transfer_fee_rate,
            self.fees.exit_tax_rate,
        )
    }

    /// Lower into the engine-level configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            initial_capital: self.backtest.initial_capital,
            max_drawdown: self.position.max_drawdown,
            max_position_fraction: self.position.max_position_fraction,
            lot_size: self.position.lot_size,
            fees: self.fee_schedule(),
            valuation_policy: self.position.valuation_policy,
            drawdown_basis: self.position.drawdown_basis,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine_config().validate()?;
        if !self.backtest.risk_free_rate.is_finite() {
            return Err(ConfigError::InvalidRiskFreeRate(
                self.backtest.risk_free_rate,
            ));
        }
        Ok(())
    }

    /// Deterministic content hash: identical configs share a run id.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("BacktestConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
