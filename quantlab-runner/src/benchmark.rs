//! Benchmark comparison over the explicit date intersection.
//!
//! No alignment is assumed between the equity curve and the benchmark
//! series; the intersection is computed here, and every soft failure
//! degrades to `Unavailable` with a stated reason instead of an error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::mean_f64;
use quantlab_core::domain::EquitySnapshot;

/// Benchmark-relative statistics, or the reason they could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BenchmarkComparison {
    Available {
        benchmark_return_pct: f64,
        portfolio_return_pct: f64,
        excess_return_pct: f64,
        /// cov(portfolio, benchmark) / var(benchmark) over the intersection.
        beta: f64,
        tracking_days: usize,
    },
    Unavailable {
        reason: String,
    },
}

impl BenchmarkComparison {
    pub fn is_available(&self) -> bool {
        matches!(self, BenchmarkComparison::Available { .. })
    }
}

/// Compare the equity curve to an optional benchmark close series.
pub fn compare_to_benchmark(
    equity_curve: &[EquitySnapshot],
    benchmark: Option<&BTreeMap<NaiveDate, f64>>,
) -> BenchmarkComparison {
    let Some(benchmark) = benchmark else {
        return BenchmarkComparison::Unavailable {
            reason: "no benchmark series supplied".into(),
        };
    };
    if benchmark.is_empty() {
        return BenchmarkComparison::Unavailable {
            reason: "benchmark series is empty".into(),
        };
    }

    // Intersect dates, preserving equity-curve (ascending) order.
    let aligned: Vec<(f64, f64)> = equity_curve
        .iter()
        .filter_map(|snap| {
            benchmark
                .get(&snap.date)
                .map(|close| (snap.total_value, *close))
        })
        .collect();
    if aligned.is_empty() {
        return BenchmarkComparison::Unavailable {
            reason: "benchmark shares no dates with the equity curve".into(),
        };
    }

    let (first_portfolio, first_benchmark) = aligned[0];
    let (last_portfolio, last_benchmark) = aligned[aligned.len() - 1];
    if first_portfolio <= 0.0 || first_benchmark <= 0.0 {
        return BenchmarkComparison::Unavailable {
            reason: "non-positive value at the start of the intersection".into(),
        };
    }

    let portfolio_return_pct = (last_portfolio - first_portfolio) / first_portfolio * 100.0;
    let benchmark_return_pct = (last_benchmark - first_benchmark) / first_benchmark * 100.0;

    let portfolio_returns = pct_changes(aligned.iter().map(|(p, _)| *p));
    let benchmark_returns = pct_changes(aligned.iter().map(|(_, b)| *b));
    let beta = compute_beta(&portfolio_returns, &benchmark_returns);

    BenchmarkComparison::Available {
        benchmark_return_pct,
        portfolio_return_pct,
        excess_return_pct: portfolio_return_pct - benchmark_return_pct,
        beta,
        tracking_days: aligned.len(),
    }
}

fn pct_changes(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let values: Vec<f64> = values.collect();
    values
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

/// Sample covariance over sample variance; 0 when the overlap is too short
/// or the benchmark never moves.
fn compute_beta(portfolio_returns: &[f64], benchmark_returns: &[f64]) -> f64 {
    let n = portfolio_returns.len().min(benchmark_returns.len());
    if n < 2 {
        return 0.0;
    }
    let mean_p = mean_f64(&portfolio_returns[..n]);
    let mean_b = mean_f64(&benchmark_returns[..n]);
    let covariance: f64 = portfolio_returns[..n]
        .iter()
        .zip(&benchmark_returns[..n])
        .map(|(p, b)| (p - mean_p) * (b - mean_b))
        .sum::<f64>()
        / (n - 1) as f64;
    let variance: f64 = benchmark_returns[..n]
        .iter()
        .map(|b| (b - mean_b).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;
    if variance < 1e-15 {
        return 0.0;
    }
    covariance / variance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(start_day: u32, values: &[f64]) -> Vec<EquitySnapshot> {
        values
            .iter()
            .enumerate()
            .map(|(i, &total_value)| EquitySnapshot {
                date: NaiveDate::from_ymd_opt(2024, 1, start_day).unwrap()
                    + chrono::Duration::days(i as i64),
                total_value,
                cash: total_value,
                holdings_value: 0.0,
            })
            .collect()
    }

    fn bench(start_day: u32, closes: &[f64]) -> BTreeMap<NaiveDate, f64> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                (
                    NaiveDate::from_ymd_opt(2024, 1, start_day).unwrap()
                        + chrono::Duration::days(i as i64),
                    close,
                )
            })
            .collect()
    }

    #[test]
    fn missing_benchmark_is_unavailable() {
        let comparison = compare_to_benchmark(&curve(2, &[100.0, 110.0]), None);
        assert!(matches!(
            comparison,
            BenchmarkComparison::Unavailable { reason } if reason.contains("no benchmark")
        ));
    }

    #[test]
    fn disjoint_dates_are_unavailable_with_reason() {
        let equity = curve(2, &[100.0, 110.0, 120.0]);
        let benchmark = bench(20, &[3000.0, 3030.0]);
        let comparison = compare_to_benchmark(&equity, Some(&benchmark));
        assert!(matches!(
            comparison,
            BenchmarkComparison::Unavailable { reason } if reason.contains("no dates")
        ));
    }

    #[test]
    fn full_overlap_compares_returns() {
        let equity = curve(2, &[100.0, 105.0, 110.0]);
        let benchmark = bench(2, &[3000.0, 3000.0, 3150.0]);
        let comparison = compare_to_benchmark(&equity, Some(&benchmark));
        match comparison {
            BenchmarkComparison::Available {
                benchmark_return_pct,
                portfolio_return_pct,
                excess_return_pct,
                tracking_days,
                ..
            } => {
                assert!((portfolio_return_pct - 10.0).abs() < 1e-10);
                assert!((benchmark_return_pct - 5.0).abs() < 1e-10);
                assert!((excess_return_pct - 5.0).abs() < 1e-10);
                assert_eq!(tracking_days, 3);
            }
            BenchmarkComparison::Unavailable { reason } => {
                panic!("expected available comparison, got: {reason}")
            }
        }
    }

    #[test]
    fn partial_overlap_uses_the_intersection_only() {
        // Equity runs Jan 2..6, benchmark Jan 4..8: overlap is Jan 4..6.
        let equity = curve(2, &[100.0, 102.0, 104.0, 106.0, 108.0]);
        let benchmark = bench(4, &[3000.0, 3060.0, 3120.0, 3180.0, 3240.0]);
        let comparison = compare_to_benchmark(&equity, Some(&benchmark));
        match comparison {
            BenchmarkComparison::Available {
                portfolio_return_pct,
                tracking_days,
                ..
            } => {
                // Over the overlap the portfolio went 104 -> 108.
                assert!((portfolio_return_pct - (108.0 - 104.0) / 104.0 * 100.0).abs() < 1e-10);
                assert_eq!(tracking_days, 3);
            }
            BenchmarkComparison::Unavailable { reason } => {
                panic!("expected available comparison, got: {reason}")
            }
        }
    }

    #[test]
    fn beta_of_identical_series_is_one() {
        let equity = curve(2, &[100.0, 102.0, 101.0, 105.0, 104.0]);
        let benchmark = bench(2, &[100.0, 102.0, 101.0, 105.0, 104.0]);
        let comparison = compare_to_benchmark(&equity, Some(&benchmark));
        match comparison {
            BenchmarkComparison::Available { beta, .. } => {
                assert!((beta - 1.0).abs() < 1e-9);
            }
            BenchmarkComparison::Unavailable { reason } => panic!("unexpected: {reason}"),
        }
    }

    #[test]
    fn flat_benchmark_has_zero_beta() {
        let equity = curve(2, &[100.0, 102.0, 101.0]);
        let benchmark = bench(2, &[3000.0, 3000.0, 3000.0]);
        let comparison = compare_to_benchmark(&equity, Some(&benchmark));
        match comparison {
            BenchmarkComparison::Available { beta, .. } => assert_eq!(beta, 0.0),
            BenchmarkComparison::Unavailable { reason } => panic!("unexpected: {reason}"),
        }
    }

    #[test]
    fn single_common_date_is_available_with_zero_beta() {
        let equity = curve(2, &[100.0]);
        let benchmark = bench(2, &[3000.0, 3100.0]);
        let comparison = compare_to_benchmark(&equity, Some(&benchmark));
        match comparison {
            BenchmarkComparison::Available {
                beta,
                portfolio_return_pct,
                tracking_days,
                ..
            } => {
                assert_eq!(beta, 0.0);
                assert_eq!(portfolio_return_pct, 0.0);
                assert_eq!(tracking_days, 1);
            }
            BenchmarkComparison::Unavailable { reason } => panic!("unexpected: {reason}"),
        }
    }

    #[test]
    fn serde_tags_the_status() {
        let comparison = BenchmarkComparison::Unavailable {
            reason: "benchmark shares no dates with the equity curve".into(),
        };
        let json = serde_json::to_string(&comparison).unwrap();
        assert!(json.contains("\"status\":\"unavailable\""));
        let deser: BenchmarkComparison = serde_json::from_str(&json).unwrap();
        assert_eq!(comparison, deser);
    }
}
