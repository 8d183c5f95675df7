//! Calendar-period resampling: monthly and quarterly return analysis.
//!
//! The equity curve is resampled to the last value of each calendar month
//! (or quarter); period returns are the percentage changes between those
//! resampled values.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::analytics::mean_f64;
use quantlab_core::domain::EquitySnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAnalysis {
    pub best_month_pct: f64,
    pub worst_month_pct: f64,
    pub avg_monthly_return_pct: f64,
    pub positive_months: usize,
    pub negative_months: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyAnalysis {
    pub best_quarter_pct: f64,
    pub worst_quarter_pct: f64,
    pub positive_quarters: usize,
    pub negative_quarters: usize,
}

/// Period breakdown; a field is `None` when the run spans fewer than two
/// of that period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAnalysis {
    pub monthly: Option<MonthlyAnalysis>,
    pub quarterly: Option<QuarterlyAnalysis>,
}

/// Resample the curve by calendar period and analyze the period returns.
pub fn analyze_periods(equity_curve: &[EquitySnapshot]) -> PeriodAnalysis {
    let monthly_returns = period_returns(equity_curve, |snap| {
        (snap.date.year(), snap.date.month())
    });
    let quarterly_returns = period_returns(equity_curve, |snap| {
        (snap.date.year(), (snap.date.month() - 1) / 3)
    });

    let monthly = (!monthly_returns.is_empty()).then(|| MonthlyAnalysis {
        best_month_pct: max_of(&monthly_returns) * 100.0,
        worst_month_pct: min_of(&monthly_returns) * 100.0,
        avg_monthly_return_pct: mean_f64(&monthly_returns) * 100.0,
        positive_months: monthly_returns.iter().filter(|r| **r > 0.0).count(),
        negative_months: monthly_returns.iter().filter(|r| **r < 0.0).count(),
    });
    let quarterly = (!quarterly_returns.is_empty()).then(|| QuarterlyAnalysis {
        best_quarter_pct: max_of(&quarterly_returns) * 100.0,
        worst_quarter_pct: min_of(&quarterly_returns) * 100.0,
        positive_quarters: quarterly_returns.iter().filter(|r| **r > 0.0).count(),
        negative_quarters: quarterly_returns.iter().filter(|r| **r < 0.0).count(),
    });

    PeriodAnalysis { monthly, quarterly }
}

/// Last equity value per period key, then percentage changes between
/// consecutive periods. The curve is date-ordered, so one pass suffices.
fn period_returns<K: PartialEq>(
    equity_curve: &[EquitySnapshot],
    key: impl Fn(&EquitySnapshot) -> K,
) -> Vec<f64> {
    let mut closes: Vec<f64> = Vec::new();
    let mut current_key: Option<K> = None;
    for snap in equity_curve {
        let k = key(snap);
        if current_key.as_ref() == Some(&k) {
            if let Some(last) = closes.last_mut() {
                *last = snap.total_value;
            }
        } else {
            current_key = Some(k);
            closes.push(snap.total_value);
        }
    }
    closes
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::MIN, f64::max)
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::MAX, f64::min)
}
