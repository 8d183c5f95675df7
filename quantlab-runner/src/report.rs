//! Report assembly — the read-only aggregate handed to presentation layers.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use quantlab_core::domain::{EquitySnapshot, TradeRecord};
use quantlab_core::engine::RunState;

use crate::analytics::{daily_returns, summarize, Summary};
use crate::benchmark::{compare_to_benchmark, BenchmarkComparison};
use crate::period::{analyze_periods, PeriodAnalysis};
use crate::risk_metrics::{compute_risk_metrics, RiskMetrics};
use crate::trade_stats::{analyze_costs, compute_trade_stats, CostAnalysis, TradeStats};

/// Complete backtest report.
///
/// A pure, idempotent function of a completed run state plus an optional
/// benchmark: building it twice yields identical values, and it is never
/// mutated after construction. Report generation always succeeds for a
/// completed run — soft conditions (no trades, no benchmark overlap, runs
/// too short for risk statistics) degrade to `None`/`Unavailable` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub summary: Summary,
    pub trade_stats: TradeStats,
    pub cost_analysis: Option<CostAnalysis>,
    pub risk_metrics: Option<RiskMetrics>,
    pub period_analysis: PeriodAnalysis,
    pub benchmark: BenchmarkComparison,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquitySnapshot>,
    /// Final non-zero holdings, symbol-ascending.
    pub holdings: BTreeMap<String, f64>,
}

impl BacktestReport {
    pub fn from_state(
        state: &RunState,
        risk_free_rate: f64,
        benchmark: Option<&BTreeMap<NaiveDate, f64>>,
    ) -> Self {
        let returns = daily_returns(&state.equity_curve);
        Self {
            summary: summarize(state, risk_free_rate),
            trade_stats: compute_trade_stats(&state.trades),
            cost_analysis: analyze_costs(&state.trades),
            risk_metrics: compute_risk_metrics(&returns),
            period_analysis: analyze_periods(&state.equity_curve),
            benchmark: compare_to_benchmark(&state.equity_curve, benchmark),
            trades: state.trades.clone(),
            equity_curve: state.equity_curve.clone(),
            holdings: state
                .open_holdings()
                .map(|(symbol, qty)| (symbol.to_string(), qty))
                .collect(),
        }
    }
}
