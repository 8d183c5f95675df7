//! QuantLab Runner — analytics, report assembly, configuration, sweeps.
//!
//! Builds on `quantlab-core` to provide:
//! - Pure analytics over a completed run state (summary, risk, trades)
//! - Benchmark comparison with explicit date intersection
//! - Calendar-period (monthly/quarterly) return breakdowns
//! - TOML run configuration with deterministic run ids
//! - Single-run orchestration and parallel parameter sweeps
//! - CSV/JSON artifact export

pub mod analytics;
pub mod benchmark;
pub mod config;
pub mod export;
pub mod period;
pub mod report;
pub mod risk_metrics;
pub mod runner;
pub mod sweep;
pub mod trade_stats;

pub use analytics::{daily_returns, sharpe_ratio, summarize, Summary};
pub use benchmark::{compare_to_benchmark, BenchmarkComparison};
pub use config::{BacktestConfig, ConfigLoadError, RunId};
pub use export::{export_report, ArtifactPaths};
pub use period::{analyze_periods, PeriodAnalysis};
pub use report::BacktestReport;
pub use risk_metrics::{compute_risk_metrics, RiskMetrics};
pub use runner::{run_backtest, run_backtest_from_signals, RunError};
pub use sweep::{best_by_sharpe, run_sweep, SweepEntry};
pub use trade_stats::{
    analyze_costs, compute_trade_stats, round_trips, CostAnalysis, RoundTrip, TradeStats,
};
