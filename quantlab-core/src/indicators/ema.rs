//! Exponential Moving Average (EMA).
//!
//! Seeded with the SMA of the first `period` closes, then smoothed with
//! alpha = 2 / (period + 1). Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        debug_assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period {
            return result;
        }

        let seed: f64 =
            bars[..self.period].iter().map(|bar| bar.close).sum::<f64>() / self.period as f64;
        result[self.period - 1] = seed;

        let alpha = 2.0 / (self.period as f64 + 1.0);
        let mut prev = seed;
        for i in self.period..n {
            prev = alpha * bars[i].close + (1.0 - alpha) * prev;
            result[i] = prev;
        }
        result
    }
}
