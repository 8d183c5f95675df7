//! Engine configuration and per-run mutable state.

use serde::{Deserialize, Serialize};

use crate::costs::FeeSchedule;
use crate::domain::{EquitySnapshot, Portfolio, TradeRecord};
use crate::error::ConfigError;
use crate::risk::DrawdownBasis;

/// How to value a held instrument on a date where it has no bar.
///
/// `CarryLastClose` freezes the contribution at the last known close (the
/// default; the position did not vanish just because the venue was closed).
/// `ExcludeMissing` drops the instrument from that day's valuation entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationPolicy {
    CarryLastClose,
    ExcludeMissing,
}

impl Default for ValuationPolicy {
    fn default() -> Self {
        ValuationPolicy::CarryLastClose
    }
}

/// Configuration for a single simulation run. Immutable once validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Drawdown ceiling in (0, 1] beyond which the risk gate vetoes.
    pub max_drawdown: f64,
    /// Fraction of available capital committed per entry, in (0, 1].
    pub max_position_fraction: f64,
    /// Minimum tradable quantity increment.
    pub lot_size: u32,
    pub fees: FeeSchedule,
    #[serde(default)]
    pub valuation_policy: ValuationPolicy,
    #[serde(default)]
    pub drawdown_basis: DrawdownBasis,
}

impl EngineConfig {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            max_drawdown: 0.10,
            max_position_fraction: 0.95,
            lot_size: 100,
            fees: FeeSchedule::default(),
            valuation_policy: ValuationPolicy::default(),
            drawdown_basis: DrawdownBasis::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(ConfigError::InvalidInitialCapital(self.initial_capital));
        }
        if !(self.max_drawdown > 0.0 && self.max_drawdown <= 1.0) {
            return Err(ConfigError::InvalidMaxDrawdown(self.max_drawdown));
        }
        if !(self.max_position_fraction > 0.0 && self.max_position_fraction <= 1.0) {
            return Err(ConfigError::InvalidPositionFraction(self.max_position_fraction));
        }
        if self.lot_size == 0 {
            return Err(ConfigError::InvalidLotSize);
        }
        for (name, value) in [
            ("commission_rate", self.fees.commission_rate),
            ("min_commission", self.fees.min_commission),
            ("transfer_fee_rate", self.fees.transfer_fee_rate),
            ("exit_tax_rate", self.fees.exit_tax_rate),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidFeeParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Everything one run accumulates: cash account, holdings, ledger, curve.
///
/// Created fresh at the start of every run and mutated only by the engine,
/// strictly in date order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub portfolio: Portfolio,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquitySnapshot>,
    pub peak_equity: f64,
    pub max_drawdown: f64,
}

impl RunState {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            portfolio: Portfolio::new(initial_capital),
            trades: Vec::new(),
            equity_curve: Vec::new(),
            peak_equity: initial_capital,
            max_drawdown: 0.0,
        }
    }

    pub fn initial_capital(&self) -> f64 {
        self.portfolio.initial_capital
    }

    /// Final portfolio value (initial capital before any date is simulated).
    pub fn final_value(&self) -> f64 {
        self.equity_curve
            .last()
            .map(|snap| snap.total_value)
            .unwrap_or(self.portfolio.initial_capital)
    }

    /// Non-zero holdings, for the report.
    pub fn open_holdings(&self) -> impl Iterator<Item = (&str, f64)> {
        self.portfolio
            .holdings
            .iter()
            .filter(|(_, qty)| **qty > 0.0)
            .map(|(sym, qty)| (sym.as_str(), *qty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::new(1_000_000.0).validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_capital() {
        let config = EngineConfig::new(0.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidInitialCapital(0.0))
        );
    }

    #[test]
    fn rejects_out_of_range_drawdown() {
        let mut config = EngineConfig::new(1_000_000.0);
        config.max_drawdown = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMaxDrawdown(_))
        ));
    }

    #[test]
    fn rejects_zero_lot() {
        let mut config = EngineConfig::new(1_000_000.0);
        config.lot_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidLotSize));
    }

    #[test]
    fn rejects_negative_fee() {
        let mut config = EngineConfig::new(1_000_000.0);
        config.fees.exit_tax_rate = -0.001;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFeeParameter { name: "exit_tax_rate", .. })
        ));
    }

    #[test]
    fn fresh_state_is_flat() {
        let state = RunState::new(1_000_000.0);
        assert_eq!(state.portfolio.cash, 1_000_000.0);
        assert_eq!(state.final_value(), 1_000_000.0);
        assert!(state.trades.is_empty());
        assert_eq!(state.max_drawdown, 0.0);
        assert_eq!(state.open_holdings().count(), 0);
    }
}
