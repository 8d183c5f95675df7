//! Trade-ledger statistics: side counts, round-trip matching, costs.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use quantlab_core::domain::{TradeRecord, TradeSide};

/// A matched BUY -> SELL pair for one symbol, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTrip {
    pub symbol: String,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub quantity: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    /// Price move times quantity, net of the exit-side cost.
    pub profit: f64,
}

impl RoundTrip {
    pub fn is_winner(&self) -> bool {
        self.profit > 0.0
    }
}

/// Aggregate trade statistics for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    pub total_trades: usize,
    pub buy_trades: usize,
    pub sell_trades: usize,
    pub completed_round_trips: usize,
    pub profitable_round_trips: usize,
    /// Profitable round-trips over completed round-trips, percent.
    pub win_rate_pct: f64,
    pub avg_profit_per_round_trip: f64,
    pub total_profit: f64,
    /// Sum of all transaction costs paid, both sides.
    pub total_costs: f64,
}

/// Supplementary cost breakdown; absent when the run never traded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub total_trade_value: f64,
    pub total_costs: f64,
    /// Costs as a percentage of traded value.
    pub cost_ratio_pct: f64,
    pub avg_cost_per_trade: f64,
    pub max_single_cost: f64,
    pub min_single_cost: f64,
}

/// Match BUY -> SELL pairs per symbol in ledger (chronological) order.
///
/// The engine enforces at-most-one-position, so a pending entry per symbol
/// is all the state the matcher needs.
pub fn round_trips(trades: &[TradeRecord]) -> Vec<RoundTrip> {
    let mut pending: HashMap<&str, &TradeRecord> = HashMap::new();
    let mut completed = Vec::new();

    for trade in trades {
        match trade.side {
            TradeSide::Buy => {
                pending.insert(trade.symbol.as_str(), trade);
            }
            TradeSide::Sell => {
                if let Some(entry) = pending.remove(trade.symbol.as_str()) {
                    let profit =
                        (trade.price - entry.price) * trade.quantity - trade.cost;
                    completed.push(RoundTrip {
                        symbol: trade.symbol.clone(),
                        entry_date: entry.date,
                        exit_date: trade.date,
                        quantity: trade.quantity,
                        entry_price: entry.price,
                        exit_price: trade.price,
                        profit,
                    });
                }
            }
        }
    }
    completed
}

/// Compute ledger statistics; all-zero when the ledger is empty.
pub fn compute_trade_stats(trades: &[TradeRecord]) -> TradeStats {
    if trades.is_empty() {
        return TradeStats::default();
    }

    let buy_trades = trades
        .iter()
        .filter(|t| t.side == TradeSide::Buy)
        .count();
    let sell_trades = trades.len() - buy_trades;
    let total_costs = trades.iter().map(|t| t.cost).sum();

    let trips = round_trips(trades);
    let completed = trips.len();
    let profitable = trips.iter().filter(|t| t.is_winner()).count();
    let total_profit: f64 = trips.iter().map(|t| t.profit).sum();
    let win_rate_pct = if completed > 0 {
        profitable as f64 / completed as f64 * 100.0
    } else {
        0.0
    };
    let avg_profit = if completed > 0 {
        total_profit / completed as f64
    } else {
        0.0
    };

    TradeStats {
        total_trades: trades.len(),
        buy_trades,
        sell_trades,
        completed_round_trips: completed,
        profitable_round_trips: profitable,
        win_rate_pct,
        avg_profit_per_round_trip: avg_profit,
        total_profit,
        total_costs,
    }
}

/// Cost breakdown across the ledger; `None` when no trades executed.
pub fn analyze_costs(trades: &[TradeRecord]) -> Option<CostAnalysis> {
    if trades.is_empty() {
        return None;
    }
    let total_trade_value: f64 = trades.iter().map(|t| t.gross_value).sum();
    let total_costs: f64 = trades.iter().map(|t| t.cost).sum();
    let cost_ratio_pct = if total_trade_value > 0.0 {
        total_costs / total_trade_value * 100.0
    } else {
        0.0
    };
    let max_single_cost = trades.iter().map(|t| t.cost).fold(f64::MIN, f64::max);
    let min_single_cost = trades.iter().map(|t| t.cost).fold(f64::MAX, f64::min);

    Some(CostAnalysis {
        total_trade_value,
        total_costs,
        cost_ratio_pct,
        avg_cost_per_trade: total_costs / trades.len() as f64,
        max_single_cost,
        min_single_cost,
    })
}
