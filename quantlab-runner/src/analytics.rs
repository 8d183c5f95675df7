//! Summary statistics — pure functions over a completed run state.
//!
//! Every metric is a pure function: equity curve in, scalar out. Percentage
//! fields are fractional returns times 100, matching the report contract.

use serde::{Deserialize, Serialize};

use quantlab_core::domain::EquitySnapshot;
use quantlab_core::engine::RunState;

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Headline performance figures for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub initial_capital: f64,
    pub final_value: f64,
    pub total_return_pct: f64,
    pub annual_return_pct: f64,
    /// Taken from the engine's incrementally tracked figure, not recomputed.
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub trading_days: usize,
}

/// Compute the headline summary from a completed run state.
pub fn summarize(state: &RunState, risk_free_rate: f64) -> Summary {
    let initial_capital = state.initial_capital();
    let final_value = state.final_value();
    let trading_days = state.equity_curve.len();

    let total_return = if initial_capital > 0.0 {
        (final_value - initial_capital) / initial_capital
    } else {
        0.0
    };
    let annual_return = annualized_return(initial_capital, final_value, trading_days);
    let returns = daily_returns(&state.equity_curve);
    let sharpe = sharpe_ratio(&returns, risk_free_rate);

    Summary {
        initial_capital,
        final_value,
        total_return_pct: total_return * 100.0,
        annual_return_pct: annual_return * 100.0,
        max_drawdown_pct: state.max_drawdown * 100.0,
        sharpe_ratio: sharpe,
        trading_days,
    }
}

/// Annualized return: `(final/initial)^(252/n_days) - 1`.
pub fn annualized_return(initial: f64, final_value: f64, trading_days: usize) -> f64 {
    if initial <= 0.0 || final_value <= 0.0 || trading_days == 0 {
        return 0.0;
    }
    (final_value / initial).powf(TRADING_DAYS_PER_YEAR / trading_days as f64) - 1.0
}

/// Daily percentage changes of the equity curve.
pub fn daily_returns(equity_curve: &[EquitySnapshot]) -> Vec<f64> {
    if equity_curve.len() < 2 {
        return Vec::new();
    }
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0].total_value > 0.0 {
                (w[1].total_value - w[0].total_value) / w[0].total_value
            } else {
                0.0
            }
        })
        .collect()
}

/// Annualized Sharpe ratio from daily returns.
///
/// `(mean_daily_excess / std_daily) * sqrt(252)` with
/// `excess = mean - rf/252`. Defined as 0 for an empty or zero-variance
/// return series.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let std = std_dev(returns);
    if std < 1e-15 {
        return 0.0;
    }
    let excess = mean_f64(returns) - risk_free_rate / TRADING_DAYS_PER_YEAR;
    (excess / std) * TRADING_DAYS_PER_YEAR.sqrt()
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Linear-interpolated percentile, `pct` in [0, 100].
pub(crate) fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
