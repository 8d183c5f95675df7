//! Error types for configuration and engine faults.

use chrono::NaiveDate;
use thiserror::Error;

/// Invalid construction-time parameters, rejected before a run starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial capital must be positive and finite, got {0}")]
    InvalidInitialCapital(f64),

    #[error("max drawdown must be in (0, 1], got {0}")]
    InvalidMaxDrawdown(f64),

    #[error("max position fraction must be in (0, 1], got {0}")]
    InvalidPositionFraction(f64),

    #[error("lot size must be a positive integer")]
    InvalidLotSize,

    #[error("fee parameter '{name}' must be non-negative and finite, got {value}")]
    InvalidFeeParameter { name: &'static str, value: f64 },

    #[error("risk-free rate must be finite, got {0}")]
    InvalidRiskFreeRate(f64),
}

/// Per-run faults that abort the simulation.
///
/// A fault discards the partial run state: a half-simulated equity curve is
/// misleading, so the caller gets a structured failure instead of a report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("no trading dates in signal data")]
    NoTradingDates,

    #[error("bad close price for '{symbol}' on {date}: {close}")]
    BadPrice {
        symbol: String,
        date: NaiveDate,
        close: f64,
    },

    #[error("engine already finished a run; create a fresh instance")]
    AlreadyFinished,
}
