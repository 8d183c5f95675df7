//! Parameter sweep — independent runs in parallel.
//!
//! Each configuration gets its own engine and run state, so nothing is
//! shared mutable across the rayon pool; within a run the date loop stays
//! strictly sequential.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;

use quantlab_core::domain::Bar;

use crate::config::{BacktestConfig, RunId};
use crate::report::BacktestReport;
use crate::runner::run_backtest;

/// Outcome of one sweep leg.
#[derive(Debug)]
pub struct SweepEntry {
    pub run_id: RunId,
    pub strategy: &'static str,
    /// The report, or the run's failure rendered for display.
    pub outcome: Result<BacktestReport, String>,
}

impl SweepEntry {
    pub fn sharpe(&self) -> Option<f64> {
        self.outcome
            .as_ref()
            .ok()
            .map(|report| report.summary.sharpe_ratio)
    }
}

/// Run every configuration against the same bar set, in parallel.
///
/// Results come back in input order regardless of scheduling.
pub fn run_sweep(
    configs: &[BacktestConfig],
    bars: &BTreeMap<String, Vec<Bar>>,
    benchmark: Option<&BTreeMap<NaiveDate, f64>>,
) -> Vec<SweepEntry> {
    configs
        .par_iter()
        .map(|config| SweepEntry {
            run_id: config.run_id(),
            strategy: config.strategy.name(),
            outcome: run_backtest(config, bars, benchmark).map_err(|err| err.to_string()),
        })
        .collect()
}

/// The completed entry with the highest Sharpe ratio, if any completed.
pub fn best_by_sharpe(entries: &[SweepEntry]) -> Option<&SweepEntry> {
    entries
        .iter()
        .filter(|entry| entry.outcome.is_ok())
        .max_by(|a, b| {
            let sa = a.sharpe().unwrap_or(f64::MIN);
            let sb = b.sharpe().unwrap_or(f64::MIN);
            sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
        })
}
