//! TradeRecord — one executed order in the append-only ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Side of an executed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Ledger entry created exactly once per executed order, immutable after.
///
/// `gross_value` is `quantity * price` before costs; `cash_after` is the
/// cash balance immediately after settlement, so the ledger alone replays
/// the cash account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: f64,
    pub price: f64,
    pub gross_value: f64,
    pub cost: f64,
    pub strength: f64,
    pub cash_after: f64,
}

impl TradeRecord {
    /// Net cash flow of this order: negative for buys, positive for sells.
    pub fn cash_flow(&self) -> f64 {
        match self.side {
            TradeSide::Buy => -(self.gross_value + self.cost),
            TradeSide::Sell => self.gross_value - self.cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade(side: TradeSide) -> TradeRecord {
        TradeRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            symbol: "600519".into(),
            side,
            quantity: 200.0,
            price: 10.0,
            gross_value: 2000.0,
            cost: 6.0,
            strength: 0.8,
            cash_after: 97_994.0,
        }
    }

    #[test]
    fn buy_cash_flow_is_negative() {
        assert_eq!(sample_trade(TradeSide::Buy).cash_flow(), -2006.0);
    }

    #[test]
    fn sell_cash_flow_is_net_of_cost() {
        assert_eq!(sample_trade(TradeSide::Sell).cash_flow(), 1994.0);
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_trade(TradeSide::Buy);
        let json = serde_json::to_string(&trade).unwrap();
        let deser: TradeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(trade.symbol, deser.symbol);
        assert_eq!(trade.side, deser.side);
        assert_eq!(trade.cash_after, deser.cash_after);
    }
}
