//! Portfolio — aggregate state of cash + all holdings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cash plus per-symbol share quantities.
///
/// At most one open position per symbol: a holding is a plain quantity, and
/// the engine fully liquidates on exit. The accounting identity must hold at
/// every date: `equity == cash + sum(quantity * price)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub holdings: HashMap<String, f64>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            initial_capital,
            holdings: HashMap::new(),
        }
    }

    /// Quantity held for a symbol (0 when flat).
    pub fn quantity(&self, symbol: &str) -> f64 {
        self.holdings.get(symbol).copied().unwrap_or(0.0)
    }

    /// Whether a symbol has an open position.
    pub fn has_position(&self, symbol: &str) -> bool {
        self.quantity(symbol) > 0.0
    }

    /// Market value of all holdings priced from the given map.
    ///
    /// Symbols missing from `prices` contribute nothing; the caller decides
    /// what "missing" means (carry-forward vs. exclusion).
    pub fn holdings_value(&self, prices: &HashMap<String, f64>) -> f64 {
        self.holdings
            .iter()
            .filter(|(_, qty)| **qty > 0.0)
            .filter_map(|(sym, qty)| prices.get(sym).map(|price| qty * price))
            .sum()
    }

    /// Total equity = cash + holdings value.
    pub fn equity(&self, prices: &HashMap<String, f64>) -> f64 {
        self.cash + self.holdings_value(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_with_no_holdings() {
        let portfolio = Portfolio::new(1_000_000.0);
        assert_eq!(portfolio.equity(&HashMap::new()), 1_000_000.0);
    }

    #[test]
    fn equity_with_holding() {
        let mut portfolio = Portfolio::new(900_000.0);
        portfolio.holdings.insert("600519".into(), 1000.0);
        let mut prices = HashMap::new();
        prices.insert("600519".into(), 110.0);
        // 900_000 + 1000 * 110 = 1_010_000
        assert_eq!(portfolio.equity(&prices), 1_010_000.0);
    }

    #[test]
    fn missing_price_contributes_nothing() {
        let mut portfolio = Portfolio::new(900_000.0);
        portfolio.holdings.insert("600519".into(), 1000.0);
        assert_eq!(portfolio.holdings_value(&HashMap::new()), 0.0);
    }

    #[test]
    fn has_position_checks() {
        let mut portfolio = Portfolio::new(1_000_000.0);
        assert!(!portfolio.has_position("600519"));
        portfolio.holdings.insert("600519".into(), 100.0);
        assert!(portfolio.has_position("600519"));
        portfolio.holdings.insert("600519".into(), 0.0);
        assert!(!portfolio.has_position("600519"));
    }
}
