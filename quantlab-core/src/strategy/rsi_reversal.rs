//! RSI mean-reversion strategy.
//!
//! Buy when RSI falls under the oversold line, sell when it rises over the
//! overbought line. Strength grows with the distance past the threshold.

use crate::domain::{Bar, Direction, SeriesError, SignalPoint, SignalSeries};
use crate::indicators::{Indicator, Rsi};
use crate::strategy::{FactoryError, Strategy};

#[derive(Debug, Clone)]
pub struct RsiReversal {
    period: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiReversal {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Result<Self, FactoryError> {
        if period == 0 {
            return Err(FactoryError::InvalidParams {
                strategy: "rsi_reversal",
                reason: "period must be positive".into(),
            });
        }
        if !(0.0 < oversold && oversold < overbought && overbought < 100.0) {
            return Err(FactoryError::InvalidParams {
                strategy: "rsi_reversal",
                reason: format!(
                    "thresholds must satisfy 0 < oversold < overbought < 100, got {oversold}/{overbought}"
                ),
            });
        }
        Ok(Self {
            period,
            oversold,
            overbought,
        })
    }
}

impl Strategy for RsiReversal {
    fn name(&self) -> &str {
        "rsi_reversal"
    }

    fn min_bars(&self) -> usize {
        self.period + 1
    }

    fn generate(&self, bars: &[Bar]) -> Result<SignalSeries, SeriesError> {
        let symbol = bars.first().map(|bar| bar.symbol.clone()).unwrap_or_default();
        let rsi = Rsi::new(self.period).compute(bars);

        let points = bars
            .iter()
            .zip(rsi.iter())
            .map(|(bar, &value)| {
                let (direction, strength) = if value.is_nan() {
                    (Direction::Hold, 0.0)
                } else if value < self.oversold {
                    (Direction::Buy, (self.oversold - value) / self.oversold)
                } else if value > self.overbought {
                    (
                        Direction::Sell,
                        (value - self.overbought) / (100.0 - self.overbought),
                    )
                } else {
                    (Direction::Hold, 0.0)
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                symbol: "600519".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 1_000_000,
            })
            .collect()
    }

    #[test]
    fn rejects_bad_thresholds() {
        assert!(RsiReversal::new(14, 70.0, 30.0).is_err());
        assert!(RsiReversal::new(0, 30.0, 70.0).is_err());
        assert!(RsiReversal::new(14, 30.0, 120.0).is_err());
    }

    #[test]
    fn steady_decline_signals_buy() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 - 1.5 * i as f64).collect();
        let strategy = RsiReversal::new(14, 30.0, 70.0).unwrap();
        let series = strategy.generate(&bars(&closes)).unwrap();
        let last = series.points().last().unwrap();
        assert_eq!(last.direction, Direction::Buy);
        assert!(last.strength > 0.9, "hard selloff means RSI near 0");
    }

    #[test]
    fn steady_rally_signals_sell() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + 1.5 * i as f64).collect();
        let strategy = RsiReversal::new(14, 30.0, 70.0).unwrap();
        let series = strategy.generate(&bars(&closes)).unwrap();
        let last = series.points().last().unwrap();
        assert_eq!(last.direction, Direction::Sell);
        assert!(last.strength > 0.9);
    }

    #[test]
    fn warmup_holds() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 - 1.5 * i as f64).collect();
        let strategy = RsiReversal::new(14, 30.0, 70.0).unwrap();
        let series = strategy.generate(&bars(&closes)).unwrap();
        for point in &series.points()[..14] {
            assert_eq!(point.direction, Direction::Hold);
        }
    }

    #[test]
    fn neutral_band_holds() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let strategy = RsiReversal::new(14, 30.0, 70.0).unwrap();
        let series = strategy.generate(&bars(&closes)).unwrap();
        assert!(series.points()[20..]
            .iter()
            .all(|p| p.direction == Direction::Hold));
    }
}
