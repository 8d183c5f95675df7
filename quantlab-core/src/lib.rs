//! QuantLab Core — domain types, cost model, risk controls, and the
//! day-by-day simulation engine.
//!
//! The heart of the backtester:
//! - Domain types (bars, signal series, trades, portfolio, equity curve)
//! - Fee schedule with commission floor, transfer fee, and exit tax
//! - Confidence-scaled position sizer and portfolio-level risk gate
//! - Deterministic date-loop simulator with a strict run lifecycle
//! - Indicator helpers and the pluggable strategy (signal source) trait

pub mod costs;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod risk;
pub mod strategy;
