//! Signal points and per-symbol signal series.
//!
//! A signal series is the engine's sole input: an ordered, date-indexed
//! sequence of closes decorated with a direction and a strength. Sanitation
//! happens here, at the adapter boundary — the engine never clamps.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trading instruction attached to one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
    Hold,
}

/// One dated signal observation: close price plus instruction.
///
/// `strength` is a confidence in [0, 1]; it scales position sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub direction: Direction,
    pub strength: f64,
}

/// Errors raised while assembling a signal series.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    #[error("signal series for '{symbol}' has out-of-order dates at {date}")]
    UnorderedDates { symbol: String, date: NaiveDate },

    #[error("signal series for '{symbol}' has a duplicate date {date}")]
    DuplicateDate { symbol: String, date: NaiveDate },
}

/// Ordered signal series for one symbol.
///
/// Construction enforces strictly ascending dates and clamps every strength
/// to [0, 1] (NaN becomes 0, so a malformed strength sizes to nothing rather
/// than poisoning the run).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSeries {
    symbol: String,
    points: Vec<SignalPoint>,
}

impl SignalSeries {
    pub fn new(symbol: impl Into<String>, mut points: Vec<SignalPoint>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        for window in points.windows(2) {
            if window[1].date < window[0].date {
                return Err(SeriesError::UnorderedDates {
                    symbol,
                    date: window[1].date,
                });
            }
            if window[1].date == window[0].date {
                return Err(SeriesError::DuplicateDate {
                    symbol,
                    date: window[1].date,
                });
            }
        }
        for point in &mut points {
            point.strength = clamp_strength(point.strength);
        }
        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[SignalPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

fn clamp_strength(strength: f64) -> f64 {
    if strength.is_finite() {
        strength.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
