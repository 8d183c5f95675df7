//! Signal generation — the pluggable Signal Source.
//!
//! Strategies are portfolio-agnostic: bars in, decorated signal series out.
//! The engine never sees indicator math; it consumes the finished series.
//! Concrete variants are registered by name through `StrategySpec`, which
//! doubles as the serializable configuration surface.

pub mod ma_crossover;
pub mod price_action;
pub mod rsi_reversal;

pub use ma_crossover::{MaCrossover, MaKind};
pub use price_action::PriceAction;
pub use rsi_reversal::RsiReversal;

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, SeriesError, SignalSeries};

/// Portfolio-agnostic signal generator.
///
/// # Invariants
/// - `generate()` must not depend on portfolio state
/// - `generate()` must be deterministic for the same bar sequence
/// - the returned series is aligned 1:1 with the input bars
pub trait Strategy: Send + Sync {
    /// Strategy name for config/report labelling.
    fn name(&self) -> &str;

    /// Bars required before the first signal can fire.
    fn min_bars(&self) -> usize;

    /// Decorate a bar series with directions and strengths.
    ///
    /// Errors only when the bar series itself is malformed (out-of-order or
    /// duplicate dates) — that is an adapter-level data fault.
    fn generate(&self, bars: &[Bar]) -> Result<SignalSeries, SeriesError>;
}

/// Invalid strategy parameters, rejected at construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FactoryError {
    #[error("strategy '{strategy}': {reason}")]
    InvalidParams {
        strategy: &'static str,
        reason: String,
    },
}

/// Serializable strategy selection — the name registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategySpec {
    MaCrossover {
        #[serde(default = "default_fast")]
        fast: usize,
        #[serde(default = "default_slow")]
        slow: usize,
        #[serde(default)]
        kind: MaKind,
    },
    RsiReversal {
        #[serde(default = "default_rsi_period")]
        period: usize,
        #[serde(default = "default_oversold")]
        oversold: f64,
        #[serde(default = "default_overbought")]
        overbought: f64,
    },
    PriceAction {
        #[serde(default = "default_lookback")]
        lookback: usize,
        #[serde(default = "default_breakout_threshold")]
        breakout_threshold: f64,
    },
}

fn default_fast() -> usize {
    10
}
fn default_slow() -> usize {
    30
}
fn default_rsi_period() -> usize {
    14
}
fn default_oversold() -> f64 {
    30.0
}
fn default_overbought() -> f64 {
    70.0
}
fn default_lookback() -> usize {
    20
}
fn default_breakout_threshold() -> f64 {
    0.02
}

impl Default for StrategySpec {
    fn default() -> Self {
        StrategySpec::MaCrossover {
            fast: default_fast(),
            slow: default_slow(),
            kind: MaKind::default(),
        }
    }
}

impl StrategySpec {
    pub fn name(&self) -> &'static str {
        match self {
            StrategySpec::MaCrossover { .. } => "ma_crossover",
            StrategySpec::RsiReversal { .. } => "rsi_reversal",
            StrategySpec::PriceAction { .. } => "price_action",
        }
    }
}

/// Build the concrete strategy a spec names, validating its parameters.
pub fn build_strategy(spec: &StrategySpec) -> Result<Box<dyn Strategy>, FactoryError> {
    match *spec {
        StrategySpec::MaCrossover { fast, slow, kind } => {
            Ok(Box::new(MaCrossover::new(fast, slow, kind)?))
        }
        StrategySpec::RsiReversal {
            period,
            oversold,
            overbought,
        } => Ok(Box::new(RsiReversal::new(period, oversold, overbought)?)),
        StrategySpec::PriceAction {
            lookback,
            breakout_threshold,
        } => Ok(Box::new(PriceAction::new(lookback, breakout_threshold)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_each_variant() {
        let specs = [
            StrategySpec::default(),
            StrategySpec::RsiReversal {
                period: 14,
                oversold: 30.0,
                overbought: 70.0,
            },
            StrategySpec::PriceAction {
                lookback: 20,
                breakout_threshold: 0.02,
            },
        ];
        for spec in &specs {
            let strategy = build_strategy(spec).unwrap();
            assert_eq!(strategy.name(), spec.name());
        }
    }

    #[test]
    fn factory_rejects_bad_params() {
        let spec = StrategySpec::MaCrossover {
            fast: 30,
            slow: 10,
            kind: MaKind::Sma,
        };
        assert!(build_strategy(&spec).is_err());
    }

    #[test]
    fn spec_serde_roundtrip() {
        let spec = StrategySpec::RsiReversal {
            period: 10,
            oversold: 25.0,
            overbought: 75.0,
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("rsi_reversal"));
        let deser: StrategySpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, deser);
    }

    #[test]
    fn spec_defaults_fill_missing_fields() {
        let spec: StrategySpec = serde_json::from_str(r#"{"type":"ma_crossover"}"#).unwrap();
        assert_eq!(
            spec,
            StrategySpec::MaCrossover {
                fast: 10,
                slow: 30,
                kind: MaKind::Sma,
            }
        );
    }
}
