//! Tail and dispersion risk metrics on the daily-return series.
//!
//! Historical VaR uses the linear-interpolated 5th percentile; CVaR is the
//! mean of the returns at or below it. All percentage fields are x100.

use serde::{Deserialize, Serialize};

use crate::analytics::{mean_f64, percentile, std_dev, TRADING_DAYS_PER_YEAR};

/// Risk statistics for one run. Absent from the report when the run was too
/// short to produce any daily returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Annualized volatility of daily returns, percent.
    pub volatility_pct: f64,
    /// 5th-percentile historical VaR of daily returns, percent.
    pub var_95_pct: f64,
    /// Mean of the daily returns at or below the VaR cutoff, percent.
    pub cvar_95_pct: f64,
    /// Longest run of consecutive negative-return days.
    pub max_consecutive_losses: usize,
    pub positive_days: usize,
    pub negative_days: usize,
    pub flat_days: usize,
}

/// Compute risk metrics from daily returns; `None` when the series is empty.
pub fn compute_risk_metrics(returns: &[f64]) -> Option<RiskMetrics> {
    if returns.is_empty() {
        return None;
    }

    let var_cutoff = percentile(returns, 5.0);
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var_cutoff).collect();
    let cvar = mean_f64(&tail);

    let mut max_losses = 0usize;
    let mut current = 0usize;
    for &r in returns {
        if r < 0.0 {
            current += 1;
            max_losses = max_losses.max(current);
        } else {
            current = 0;
        }
    }

    Some(RiskMetrics {
        volatility_pct: std_dev(returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0,
        var_95_pct: var_cutoff * 100.0,
        cvar_95_pct: cvar * 100.0,
        max_consecutive_losses: max_losses,
        positive_days: returns.iter().filter(|r| **r > 0.0).count(),
        negative_days: returns.iter().filter(|r| **r < 0.0).count(),
        flat_days: returns.iter().filter(|r| **r == 0.0).count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_returns_give_none() {
        assert!(compute_risk_metrics(&[]).is_none());
    }

    #[test]
    fn var_is_the_interpolated_fifth_percentile() {
        // 21 returns: ranks 0..20, 5th percentile at rank 1.0 exactly.
        let returns: Vec<f64> = (0..21).map(|i| -0.02 + i as f64 * 0.002).collect();
        let metrics = compute_risk_metrics(&returns).unwrap();
        assert!((metrics.var_95_pct - (-1.8)).abs() < 1e-9);
    }

    #[test]
    fn cvar_averages_the_tail() {
        let returns: Vec<f64> = (0..21).map(|i| -0.02 + i as f64 * 0.002).collect();
        let metrics = compute_risk_metrics(&returns).unwrap();
        // Tail at or below -0.018 is {-0.02, -0.018}: mean -0.019.
        assert!((metrics.cvar_95_pct - (-1.9)).abs() < 1e-9);
        assert!(metrics.cvar_95_pct <= metrics.var_95_pct);
    }

    #[test]
    fn consecutive_loss_streak() {
        let returns = vec![0.01, -0.01, -0.02, -0.01, 0.02, -0.01, 0.0];
        let metrics = compute_risk_metrics(&returns).unwrap();
        assert_eq!(metrics.max_consecutive_losses, 3);
        assert_eq!(metrics.positive_days, 2);
        assert_eq!(metrics.negative_days, 4);
        assert_eq!(metrics.flat_days, 1);
    }

    #[test]
    fn volatility_annualizes_sample_std() {
        let returns: Vec<f64> = (0..100)
            .map(|i| if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();
        let metrics = compute_risk_metrics(&returns).unwrap();
        let expected = std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;
        assert!((metrics.volatility_pct - expected).abs() < 1e-12);
        assert!(metrics.volatility_pct > 0.0);
    }

    #[test]
    fn all_positive_returns_still_have_a_var() {
        let returns = vec![0.01, 0.02, 0.03, 0.015, 0.025];
        let metrics = compute_risk_metrics(&returns).unwrap();
        assert!(metrics.var_95_pct > 0.0);
        assert_eq!(metrics.negative_days, 0);
        assert_eq!(metrics.max_consecutive_losses, 0);
    }
}
