//! Dual moving-average crossover strategy.
//!
//! Buy on the golden cross (fast MA crossing above slow), sell on the death
//! cross. Strength blends the MA gap ratio with a volume surge ratio, so a
//! wide cross on heavy volume sizes larger than a marginal one.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Direction, SeriesError, SignalPoint, SignalSeries};
use crate::indicators::{rolling_mean, Ema, Indicator, Sma};
use crate::strategy::{FactoryError, Strategy};

/// Volume averaging window for the strength blend.
const VOLUME_WINDOW: usize = 20;

/// Moving-average flavor for both legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaKind {
    Sma,
    Ema,
}

impl Default for MaKind {
    fn default() -> Self {
        MaKind::Sma
    }
}

#[derive(Debug, Clone)]
pub struct MaCrossover {
    fast: usize,
    slow: usize,
    kind: MaKind,
}

impl MaCrossover {
    pub fn new(fast: usize, slow: usize, kind: MaKind) -> Result<Self, FactoryError> {
        if fast == 0 || slow == 0 {
            return Err(FactoryError::InvalidParams {
                strategy: "ma_crossover",
                reason: "periods must be positive".into(),
            });
        }
        if fast >= slow {
            return Err(FactoryError::InvalidParams {
                strategy: "ma_crossover",
                reason: format!("fast period {fast} must be below slow period {slow}"),
            });
        }
        Ok(Self { fast, slow, kind })
    }

    fn ma(&self, bars: &[Bar], period: usize) -> Vec<f64> {
        match self.kind {
            MaKind::Sma => Sma::new(period).compute(bars),
            MaKind::Ema => Ema::new(period).compute(bars),
        }
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn min_bars(&self) -> usize {
        self.slow + 1
    }

    fn generate(&self, bars: &[Bar]) -> Result<SignalSeries, SeriesError> {
        let symbol = bars.first().map(|bar| bar.symbol.clone()).unwrap_or_default();
        let fast_ma = self.ma(bars, self.fast);
        let slow_ma = self.ma(bars, self.slow);
        let volumes: Vec<f64> = bars.iter().map(|bar| bar.volume as f64).collect();
        let volume_ma = rolling_mean(&volumes, VOLUME_WINDOW);

        let points = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let (direction, strength) = if i == 0 {
                    (Direction::Hold, 0.0)
                } else {
                    cross_signal(
                        fast_ma[i],
                        slow_ma[i],
                        fast_ma[i - 1],
                        slow_ma[i - 1],
                        volumes[i],
                        volume_ma[i],
                    )
                };
                SignalPoint {
                    date: bar.date,
                    close: bar.close,
                    direction,
                    strength,
                }
            })
            .collect();

        SignalSeries::new(symbol, points)
    }
}

fn cross_signal(
    fast: f64,
    slow: f64,
    prev_fast: f64,
    prev_slow: f64,
    volume: f64,
    volume_ma: f64,
) -> (Direction, f64) {
    if fast.is_nan() || slow.is_nan() || prev_fast.is_nan() || prev_slow.is_nan() {
        return (Direction::Hold, 0.0);
    }
    let golden = fast > slow && prev_fast <= prev_slow;
    let death = fast < slow && prev_fast >= prev_slow;
    if !golden && !death {
        return (Direction::Hold, 0.0);
    }

    // Gap ratio weighted 0.7, volume surge (capped at 2x average) 0.3.
    // A NaN volume average (warmup) leaves strength at NaN; the series
    // constructor clamps that to 0, so the cross fires but sizes nothing.
    let gap_ratio = ((fast - slow) / slow).abs();
    let volume_ratio = (volume / volume_ma).clamp(0.0, 2.0);
    let strength = gap_ratio * 0.7 + volume_ratio * 0.3;

    if golden {
        (Direction::Buy, strength)
    } else {
        (Direction::Sell, strength)
    }
}
