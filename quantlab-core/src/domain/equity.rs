//! EquitySnapshot — one row of the daily equity curve.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Portfolio valuation on one simulated date.
///
/// Appended once per date, in date order; `total_value` always equals
/// `cash + holdings_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySnapshot {
    pub date: NaiveDate,
    pub total_value: f64,
    pub cash: f64,
    pub holdings_value: f64,
}
