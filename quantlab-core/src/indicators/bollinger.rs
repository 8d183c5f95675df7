//! Bollinger %B — position of the close inside its bands.
//!
//! %B = (close - lower) / (upper - lower) with bands at the rolling mean
//! +/- `width` rolling standard deviations. 0.5 when the band is degenerate
//! (zero variance). Lookback: period - 1.

use crate::domain::Bar;
use crate::indicators::{rolling_mean, Indicator};

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    width: f64,
    name: String,
}

impl Bollinger {
    pub fn new(period: usize, width: f64) -> Self {
        debug_assert!(period >= 2, "Bollinger period must be >= 2");
        debug_assert!(width > 0.0, "Bollinger width must be positive");
        Self {
            period,
            width,
            name: format!("bollinger_{period}"),
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let n = closes.len();
        let mean = rolling_mean(&closes, self.period);
        let mut result = vec![f64::NAN; n];
        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let window = &closes[i + 1 - self.period..=i];
            let mu = mean[i];
            let variance =
                window.iter().map(|c| (c - mu).powi(2)).sum::<f64>() / self.period as f64;
            let sigma = variance.sqrt();
            if sigma < 1e-12 {
                result[i] = 0.5;
            } else {
                let lower = mu - self.width * sigma;
                let upper = mu + self.width * sigma;
                result[i] = (closes[i] - lower) / (upper - lower);
            }
        }
        result
    }
}
