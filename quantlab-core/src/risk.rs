//! Position sizing and the portfolio-level risk gate.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::costs::FeeSchedule;

/// Confidence-scaled, fee-pessimistic position sizer.
///
/// Sizing reserves `available * max_position_fraction * confidence` as the
/// gross budget, shrinks it by the proportional entry fees plus one minimum
/// commission, then floors to whole lots. The shrink overestimates the real
/// cost slightly, so every sized order is affordable including its modeled
/// cost; the engine re-checks affordability anyway before executing.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    max_position_fraction: f64,
    lot_size: u32,
    fees: FeeSchedule,
}

impl PositionSizer {
    pub fn new(max_position_fraction: f64, lot_size: u32, fees: FeeSchedule) -> Self {
        Self {
            max_position_fraction,
            lot_size,
            fees,
        }
    }

    pub fn lot_size(&self) -> u32 {
        self.lot_size
    }

    /// Quantity to acquire, in whole lots. Returns 0 when the budget does
    /// not cover a single lot.
    pub fn size(&self, available_capital: f64, price: f64, confidence: f64) -> f64 {
        if available_capital <= 0.0 || price <= 0.0 {
            return 0.0;
        }
        let confidence = confidence.clamp(0.0, 1.0);
        let gross = available_capital * self.max_position_fraction * confidence;
        let spendable = gross * (1.0 - self.fees.entry_rate()) - self.fees.min_commission;
        if spendable <= 0.0 {
            return 0.0;
        }
        let lot = self.lot_size as f64;
        let lots = (spendable / price / lot).floor();
        (lots * lot).max(0.0)
    }
}

/// Baseline against which the risk gate measures drawdown.
///
/// `InitialCapital` (the default) gates on losses relative to starting
/// capital, so paper gains never trip the stop; `PeakEquity` gates on the
/// same quantity the engine's max-drawdown figure tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawdownBasis {
    InitialCapital,
    PeakEquity,
}

impl Default for DrawdownBasis {
    fn default() -> Self {
        DrawdownBasis::InitialCapital
    }
}

/// Portfolio-level stop: vetoes new orders once drawdown exceeds a ceiling.
///
/// Advisory only — the engine keeps valuing holdings and advancing time
/// after a veto; it just stops opening or closing positions that date.
#[derive(Debug, Clone)]
pub struct RiskGate {
    initial_capital: f64,
    max_drawdown: f64,
    basis: DrawdownBasis,
    peak: f64,
}

impl RiskGate {
    pub fn new(initial_capital: f64, max_drawdown: f64, basis: DrawdownBasis) -> Self {
        Self {
            initial_capital,
            max_drawdown,
            basis,
            peak: initial_capital,
        }
    }

    /// Current drawdown fraction of `value` against the configured baseline.
    pub fn drawdown(&self, value: f64) -> f64 {
        let baseline = match self.basis {
            DrawdownBasis::InitialCapital => self.initial_capital,
            DrawdownBasis::PeakEquity => self.peak,
        };
        if baseline <= 0.0 {
            return 0.0;
        }
        (baseline - value) / baseline
    }

    /// Update the high-water mark and decide whether new orders may trade.
    pub fn allow_trading(&mut self, current_value: f64) -> bool {
        if current_value > self.peak {
            self.peak = current_value;
        }
        let drawdown = self.drawdown(current_value);
        if drawdown > self.max_drawdown {
            warn!(
                drawdown,
                ceiling = self.max_drawdown,
                "risk gate veto: drawdown over ceiling"
            );
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Sizer ──

    #[test]
    fn frictionless_sizing_matches_budget_formula() {
        let sizer = PositionSizer::new(0.95, 100, FeeSchedule::frictionless());
        // floor(1_000_000 * 0.95 / 10 / 100) * 100 = 95_000
        assert_eq!(sizer.size(1_000_000.0, 10.0, 1.0), 95_000.0);
    }

    #[test]
    fn confidence_scales_the_budget() {
        let sizer = PositionSizer::new(0.95, 100, FeeSchedule::frictionless());
        let full = sizer.size(1_000_000.0, 10.0, 1.0);
        let half = sizer.size(1_000_000.0, 10.0, 0.5);
        assert!(half < full);
        // floor(1_000_000 * 0.95 * 0.5 / 10 / 100) * 100 = 47_500
        assert_eq!(half, 47_500.0);
    }

    #[test]
    fn sizing_rounds_down_to_lot() {
        let sizer = PositionSizer::new(1.0, 100, FeeSchedule::frictionless());
        // 10_550 / 10 = 1055 shares -> 1000 after lot flooring
        assert_eq!(sizer.size(10_550.0, 10.0, 1.0), 1000.0);
    }

    #[test]
    fn zero_confidence_sizes_nothing() {
        let sizer = PositionSizer::new(0.95, 100, FeeSchedule::default());
        assert_eq!(sizer.size(1_000_000.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn tiny_budget_sizes_nothing() {
        let sizer = PositionSizer::new(0.95, 100, FeeSchedule::default());
        assert_eq!(sizer.size(500.0, 10.0, 1.0), 0.0);
    }

    #[test]
    fn sized_order_is_always_affordable() {
        use crate::domain::TradeSide;
        let fees = FeeSchedule::default();
        let sizer = PositionSizer::new(0.95, 100, fees.clone());
        for &(capital, price) in &[
            (1_000_000.0, 10.0),
            (50_000.0, 37.5),
            (8_000.0, 12.34),
            (1_000_000.0, 1234.5),
        ] {
            let qty = sizer.size(capital, price, 1.0);
            let total = qty * price + fees.trade_cost(qty, price, TradeSide::Buy);
            assert!(
                total <= capital,
                "total {total} exceeds capital {capital} at price {price}"
            );
        }
    }

    // ── Risk gate ──

    #[test]
    fn gate_allows_within_ceiling() {
        let mut gate = RiskGate::new(1_000_000.0, 0.10, DrawdownBasis::PeakEquity);
        assert!(gate.allow_trading(1_000_000.0));
        assert!(gate.allow_trading(950_000.0)); // 5% drawdown
    }

    #[test]
    fn gate_vetoes_over_ceiling() {
        let mut gate = RiskGate::new(1_000_000.0, 0.10, DrawdownBasis::PeakEquity);
        assert!(gate.allow_trading(1_000_000.0));
        assert!(!gate.allow_trading(850_000.0)); // 15% drawdown
    }

    #[test]
    fn peak_basis_tracks_high_water_mark() {
        let mut gate = RiskGate::new(1_000_000.0, 0.10, DrawdownBasis::PeakEquity);
        assert!(gate.allow_trading(1_200_000.0));
        // 1_080_000 is a 10% fall from the 1.2M peak but a gain on capital
        assert!(gate.allow_trading(1_080_000.0));
        assert!(!gate.allow_trading(1_079_000.0));
    }

    #[test]
    fn initial_capital_basis_ignores_gains() {
        let mut gate = RiskGate::new(1_000_000.0, 0.10, DrawdownBasis::InitialCapital);
        assert!(gate.allow_trading(1_200_000.0));
        // A fall from the peak that stays above capital never trips the gate
        assert!(gate.allow_trading(1_000_000.0));
        assert!(!gate.allow_trading(890_000.0));
    }
}
