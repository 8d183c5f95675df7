//! Fee schedule — commission, transfer fee, and exit tax.
//!
//! Three additive, independently configurable components:
//! commission with a floor (both sides), proportional transfer fee (both
//! sides), proportional exit tax (sells only). Pure and stateless.

use serde::{Deserialize, Serialize};

use crate::domain::TradeSide;

/// Transaction-cost schedule.
///
/// All rates are non-negative fractions of traded value. The default mirrors
/// a retail A-share account: 0.03% commission floored at 5.0, 0.002%
/// transfer fee, 0.1% exit tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub commission_rate: f64,
    pub min_commission: f64,
    pub transfer_fee_rate: f64,
    pub exit_tax_rate: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            commission_rate: 0.0003,
            min_commission: 5.0,
            transfer_fee_rate: 0.00002,
            exit_tax_rate: 0.001,
        }
    }
}

impl FeeSchedule {
    pub fn new(
        commission_rate: f64,
        min_commission: f64,
        transfer_fee_rate: f64,
        exit_tax_rate: f64,
    ) -> Self {
        Self {
            commission_rate,
            min_commission,
            transfer_fee_rate,
            exit_tax_rate,
        }
    }

    /// Zero-cost schedule, used by frictionless scenarios and tests.
    pub fn frictionless() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Total cost of one order.
    ///
    /// `commission = max(value * commission_rate, min_commission)` — the
    /// floor applies only when a proportional commission is configured at
    /// all, so a frictionless schedule really is free.
    pub fn trade_cost(&self, quantity: f64, price: f64, side: TradeSide) -> f64 {
        debug_assert!(quantity >= 0.0, "negative quantity is a caller bug");
        debug_assert!(price >= 0.0, "negative price is a caller bug");

        let value = quantity * price;
        let commission = if self.commission_rate > 0.0 || self.min_commission > 0.0 {
            (value * self.commission_rate).max(self.min_commission)
        } else {
            0.0
        };
        let transfer = value * self.transfer_fee_rate;
        let exit_tax = match side {
            TradeSide::Buy => 0.0,
            TradeSide::Sell => value * self.exit_tax_rate,
        };
        commission + transfer + exit_tax
    }

    /// Combined proportional rate the sizer reserves against on entry.
    pub fn entry_rate(&self) -> f64 {
        self.commission_rate + self.transfer_fee_rate
    }
}
