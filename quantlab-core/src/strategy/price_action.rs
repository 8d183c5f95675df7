//! Price-action strategy: breakouts plus band reversals.
//!
//! Levels are the rolling extremes of the *prior* `lookback` bars, so the
//! current bar cannot be its own resistance. A breakout needs the close
//! through the level with volume at 1.5x its 20-day average; where no
//! breakout fires, a bounce off support (or rejection at resistance) inside
//! the Bollinger tails signals a reversal at fixed half strength.

use crate::domain::{Bar, Direction, SeriesError, SignalPoint, SignalSeries};
use crate::indicators::{rolling_max, rolling_mean, rolling_min, Bollinger, Indicator};
use crate::strategy::{FactoryError, Strategy};

const VOLUME_WINDOW: usize = 20;
const VOLUME_SURGE: f64 = 1.5;
const BAND_PERIOD: usize = 20;
const BAND_WIDTH: f64 = 2.0;
const REVERSAL_STRENGTH: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct PriceAction {
    lookback: usize,
    breakout_threshold: f64,
}

impl PriceAction {
    pub fn new(lookback: usize, breakout_threshold: f64) -> Result<Self, FactoryError> {
        if lookback < 2 {
            return Err(FactoryError::InvalidParams {
                strategy: "price_action",
                reason: "lookback must be at least 2".into(),
            });
        }
        if !(breakout_threshold.is_finite() && breakout_threshold > 0.0) {
            return Err(FactoryError::InvalidParams {
                strategy: "price_action",
                reason: format!("breakout threshold must be positive, got {breakout_threshold}"),
            });
        }
        Ok(Self {
            lookback,
            breakout_threshold,
        })
    }
}

impl Strategy for PriceAction {
    fn name(&self) -> &str {
        "price_action"
    }

    fn min_bars(&self) -> usize {
        self.lookback.max(BAND_PERIOD) + 1
    }

    fn generate(&self, bars: &[Bar]) -> Result<SignalSeries, SeriesError> {
        let symbol = bars.first().map(|bar| bar.symbol.clone()).unwrap_or_default();
        let highs: Vec<f64> = bars.iter().map(|bar| bar.high).collect();
        let lows: Vec<f64> = bars.iter().map(|bar| bar.low).collect();
        let volumes: Vec<f64> = bars.iter().map(|bar| bar.volume as f64).collect();

        let rolling_high = rolling_max(&highs, self.lookback);
        let rolling_low = rolling_min(&lows, self.lookback);
        let volume_ma = rolling_mean(&volumes, VOLUME_WINDOW);
        let band_position = Bollinger::new(BAND_PERIOD, BAND_WIDTH).compute(bars);

        let points = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let (direction, strength) = self.evaluate(
                    i,
                    bars,
                    &rolling_high,
                    &rolling_low,
                    &volume_ma,
                    &band_position,
                );
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

impl PriceAction {
    fn evaluate(
        &self,
        i: usize,
        bars: &[Bar],
        rolling_high: &[f64],
        rolling_low: &[f64],
        volume_ma: &[f64],
        band_position: &[f64],
    ) -> (Direction, f64) {
        // Levels come from the window ending on the previous bar.
        if i < 2 {
            return (Direction::Hold, 0.0);
        }
        let resistance = rolling_high[i - 1];
        let support = rolling_low[i - 1];
        if resistance.is_nan() || support.is_nan() {
            return (Direction::Hold, 0.0);
        }

        let close = bars[i].close;
        let prev_close = bars[i - 1].close;
        let volume = bars[i].volume as f64;
        let surged = !volume_ma[i].is_nan() && volume > volume_ma[i] * VOLUME_SURGE;

        if surged {
            let prev_resistance = rolling_high[i - 2];
            if close > resistance && !prev_resistance.is_nan() && prev_close <= prev_resistance {
                let strength = (close - resistance) / resistance / self.breakout_threshold;
                return (Direction::Buy, strength.clamp(0.0, 1.0));
            }
            let prev_support = rolling_low[i - 2];
            if close < support && !prev_support.is_nan() && prev_close >= prev_support {
                let strength = (support - close) / support / self.breakout_threshold;
                return (Direction::Sell, strength.clamp(0.0, 1.0));
            }
        }

        let position = band_position[i];
        if position.is_nan() {
            return (Direction::Hold, 0.0);
        }
        if close <= support * 1.02 && close > prev_close && position < 0.2 {
            return (Direction::Buy, REVERSAL_STRENGTH);
        }
        if close >= resistance * 0.98 && close < prev_close && position > 0.8 {
            return (Direction::Sell, REVERSAL_STRENGTH);
        }
        (Direction::Hold, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(i: usize, close: f64, volume: u64) -> Bar {
        Bar {
            symbol: "600519".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        }
    }

    /// A tight range followed by a heavy-volume thrust through the top.
    fn breakout_bars() -> Vec<Bar> {
        let mut bars: Vec<Bar> = (0..30)
            .map(|i| bar(i, 100.0 + (i % 3) as f64 * 0.2, 1_000_000))
            .collect();
        bars.push(bar(30, 108.0, 4_000_000));
        bars
    }

    #[test]
    fn rejects_bad_params() {
        assert!(PriceAction::new(1, 0.02).is_err());
        assert!(PriceAction::new(20, 0.0).is_err());
    }

    #[test]
    fn high_volume_breakout_signals_buy() {
        let strategy = PriceAction::new(20, 0.02).unwrap();
        let series = strategy.generate(&breakout_bars()).unwrap();
        let last = series.points().last().unwrap();
        assert_eq!(last.direction, Direction::Buy);
        assert!(last.strength > 0.0);
    }

    #[test]
    fn breakout_without_volume_does_not_fire() {
        let mut bars = breakout_bars();
        let last_index = bars.len() - 1;
        bars[last_index].volume = 1_000_000; // same as the range average
        let strategy = PriceAction::new(20, 0.02).unwrap();
        let series = strategy.generate(&bars).unwrap();
        let last = series.points().last().unwrap();
        assert_ne!(last.direction, Direction::Buy);
    }

    #[test]
    fn heavy_volume_breakdown_signals_sell() {
        let mut bars: Vec<Bar> = (0..30)
            .map(|i| bar(i, 100.0 + (i % 3) as f64 * 0.2, 1_000_000))
            .collect();
        bars.push(bar(30, 92.0, 4_000_000));
        let strategy = PriceAction::new(20, 0.02).unwrap();
        let series = strategy.generate(&bars).unwrap();
        let last = series.points().last().unwrap();
        assert_eq!(last.direction, Direction::Sell);
    }

    #[test]
    fn quiet_range_mostly_holds() {
        let bars: Vec<Bar> = (0..40)
            .map(|i| bar(i, 100.0 + (i % 2) as f64 * 0.1, 1_000_000))
            .collect();
        let strategy = PriceAction::new(20, 0.02).unwrap();
        let series = strategy.generate(&bars).unwrap();
        let signal_count = series
            .points()
            .iter()
            .filter(|p| p.direction != Direction::Hold)
            .count();
        assert!(signal_count <= 4, "quiet tape should barely signal");
    }
}
