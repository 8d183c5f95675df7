//! Backtest orchestration — wires strategy, engine, and report together.
//!
//! Two entry points:
//! - `run_backtest()`: bars in, report out. Builds the configured strategy,
//!   generates signals per symbol, simulates, and assembles the report.
//! - `run_backtest_from_signals()`: pre-generated signal series in. Used by
//!   the sweep (signals are strategy-dependent, so each run regenerates its
//!   own) and by tests that drive the engine directly.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::warn;

use quantlab_core::domain::{Bar, SeriesError, SignalSeries};
use quantlab_core::engine::Simulator;
use quantlab_core::error::{ConfigError, EngineError};
use quantlab_core::strategy::{build_strategy, FactoryError};

use crate::config::BacktestConfig;
use crate::report::BacktestReport;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("strategy error: {0}")]
    Strategy(#[from] FactoryError),

    #[error("signal data error: {0}")]
    Series(#[from] SeriesError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Run a full backtest: generate signals for every symbol, simulate, report.
///
/// Symbols with fewer bars than the strategy's minimum are skipped with a
/// warning, the way a data layer would drop an instrument it cannot serve;
/// if every symbol is skipped the engine fails with its no-trading-dates
/// fault.
pub fn run_backtest(
    config: &BacktestConfig,
    bars: &BTreeMap<String, Vec<Bar>>,
    benchmark: Option<&BTreeMap<NaiveDate, f64>>,
) -> Result<BacktestReport, RunError> {
    config.validate()?;
    let strategy = build_strategy(&config.strategy)?;

    let mut signals: BTreeMap<String, SignalSeries> = BTreeMap::new();
    for (symbol, symbol_bars) in bars {
        if symbol_bars.len() < strategy.min_bars() {
            warn!(
                symbol,
                bars = symbol_bars.len(),
                required = strategy.min_bars(),
                "skipping symbol: not enough bars for the strategy"
            );
            continue;
        }
        let series = strategy.generate(symbol_bars)?;
        signals.insert(symbol.clone(), series);
    }

    run_backtest_from_signals(config, &signals, benchmark)
}

/// Simulate pre-generated signal series and assemble the report.
pub fn run_backtest_from_signals(
    config: &BacktestConfig,
    signals: &BTreeMap<String, SignalSeries>,
    benchmark: Option<&BTreeMap<NaiveDate, f64>>,
) -> Result<BacktestReport, RunError> {
    let mut simulator = Simulator::new(config.engine_config())?;
    let state = simulator.run(signals)?;
    Ok(BacktestReport::from_state(
        &state,
        config.backtest.risk_free_rate,
        benchmark,
    ))
}
