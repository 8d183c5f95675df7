//! Day-by-day simulation engine.
//!
//! One `Simulator` per run. The loop is an inherently sequential fold over
//! the sorted union of all symbols' dates: value the portfolio, record the
//! equity snapshot, consult the risk gate, then execute the day's signals
//! in ascending symbol order so simultaneous signals resolve the same way
//! on every run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{
    Direction, EquitySnapshot, SignalPoint, SignalSeries, TradeRecord, TradeSide,
};
use crate::engine::state::{EngineConfig, RunState, ValuationPolicy};
use crate::error::{ConfigError, EngineError};
use crate::risk::{PositionSizer, RiskGate};

/// Lifecycle of one engine instance. No transition leaves `Completed` or
/// `Failed`; a finished engine must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Initialized,
    Running,
    Completed,
    Failed,
}

/// The simulation core.
pub struct Simulator {
    config: EngineConfig,
    sizer: PositionSizer,
    gate: RiskGate,
    phase: EnginePhase,
}

impl Simulator {
    /// Build a simulator from a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sizer = PositionSizer::new(
            config.max_position_fraction,
            config.lot_size,
            config.fees.clone(),
        );
        let gate = RiskGate::new(
            config.initial_capital,
            config.max_drawdown,
            config.drawdown_basis,
        );
        Ok(Self {
            config,
            sizer,
            gate,
            phase: EnginePhase::Initialized,
        })
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Run the simulation over the given per-symbol signal series.
    ///
    /// On success the engine transitions to `Completed` and hands back the
    /// full run state. On a data fault the partial state is discarded, the
    /// engine transitions to `Failed`, and the structured error propagates.
    /// A second call on the same instance is an error in either case.
    pub fn run(
        &mut self,
        signals: &BTreeMap<String, SignalSeries>,
    ) -> Result<RunState, EngineError> {
        if self.phase != EnginePhase::Initialized {
            return Err(EngineError::AlreadyFinished);
        }
        self.phase = EnginePhase::Running;
        match self.simulate(signals) {
            Ok(state) => {
                self.phase = EnginePhase::Completed;
                Ok(state)
            }
            Err(err) => {
                self.phase = EnginePhase::Failed;
                Err(err)
            }
        }
    }

    fn simulate(
        &mut self,
        signals: &BTreeMap<String, SignalSeries>,
    ) -> Result<RunState, EngineError> {
        let dates = trading_dates(signals);
        if dates.is_empty() {
            return Err(EngineError::NoTradingDates);
        }

        let mut state = RunState::new(self.config.initial_capital);
        // BTreeMap iteration order makes the streams symbol-ascending, which
        // fixes the execution order when several signals fire the same day.
        let mut streams: Vec<Stream<'_>> = signals
            .iter()
            .map(|(symbol, series)| Stream {
                symbol: symbol.as_str(),
                points: series.points(),
                cursor: 0,
            })
            .collect();
        let mut last_close: HashMap<String, f64> = HashMap::new();

        for &date in &dates {
            // Pull today's signal point per symbol and refresh last closes.
            let mut fired: Vec<(&str, &SignalPoint)> = Vec::new();
            for stream in streams.iter_mut() {
                let Some(point) = stream.points.get(stream.cursor) else {
                    continue;
                };
                if point.date != date {
                    continue;
                }
                stream.cursor += 1;
                if !(point.close.is_finite() && point.close > 0.0) {
                    return Err(EngineError::BadPrice {
                        symbol: stream.symbol.to_string(),
                        date,
                        close: point.close,
                    });
                }
                last_close.insert(stream.symbol.to_string(), point.close);
                fired.push((stream.symbol, point));
            }

            // Mark to market under the configured missing-bar policy.
            let holdings_value = match self.config.valuation_policy {
                ValuationPolicy::CarryLastClose => state.portfolio.holdings_value(&last_close),
                ValuationPolicy::ExcludeMissing => {
                    let today: HashMap<String, f64> = fired
                        .iter()
                        .map(|(symbol, point)| (symbol.to_string(), point.close))
                        .collect();
                    state.portfolio.holdings_value(&today)
                }
            };
            let total_value = state.portfolio.cash + holdings_value;
            state.equity_curve.push(EquitySnapshot {
                date,
                total_value,
                cash: state.portfolio.cash,
                holdings_value,
            });
            if total_value > state.peak_equity {
                state.peak_equity = total_value;
            }
            let drawdown = (state.peak_equity - total_value) / state.peak_equity;
            if drawdown > state.max_drawdown {
                state.max_drawdown = drawdown;
            }

            // The gate is advisory: a veto skips order execution for the
            // date, valuation and time keep advancing.
            if !self.gate.allow_trading(total_value) {
                debug!(%date, "risk gate active, no orders executed");
                continue;
            }

            for &(symbol, point) in &fired {
                match point.direction {
                    Direction::Buy => self.execute_buy(&mut state, symbol, point, date),
                    Direction::Sell => self.execute_sell(&mut state, symbol, point, date),
                    Direction::Hold => {}
                }
            }
        }

        Ok(state)
    }

    fn execute_buy(&self, state: &mut RunState, symbol: &str, point: &SignalPoint, date: NaiveDate) {
        if state.portfolio.has_position(symbol) {
            debug!(symbol, %date, "buy skipped: position already open");
            return;
        }
        let quantity = self
            .sizer
            .size(state.portfolio.cash, point.close, point.strength);
        if quantity <= 0.0 {
            debug!(symbol, %date, "buy skipped: sized to zero");
            return;
        }
        let gross_value = quantity * point.close;
        let cost = self
            .config
            .fees
            .trade_cost(quantity, point.close, TradeSide::Buy);
        if gross_value + cost > state.portfolio.cash {
            debug!(symbol, %date, "buy skipped: unaffordable after costs");
            return;
        }
        state.portfolio.cash -= gross_value + cost;
        state.portfolio.holdings.insert(symbol.to_string(), quantity);
        state.trades.push(TradeRecord {
            date,
            symbol: symbol.to_string(),
            side: TradeSide::Buy,
            quantity,
            price: point.close,
            gross_value,
            cost,
            strength: point.strength,
            cash_after: state.portfolio.cash,
        });
    }

    fn execute_sell(
        &self,
        state: &mut RunState,
        symbol: &str,
        point: &SignalPoint,
        date: NaiveDate,
    ) {
        let quantity = state.portfolio.quantity(symbol);
        if quantity <= 0.0 {
            debug!(symbol, %date, "sell skipped: no holding");
            return;
        }
        let gross_value = quantity * point.close;
        let cost = self
            .config
            .fees
            .trade_cost(quantity, point.close, TradeSide::Sell);
        state.portfolio.cash += gross_value - cost;
        state.portfolio.holdings.insert(symbol.to_string(), 0.0);
        state.trades.push(TradeRecord {
            date,
            symbol: symbol.to_string(),
            side: TradeSide::Sell,
            quantity,
            price: point.close,
            gross_value,
            cost,
            strength: point.strength,
            cash_after: state.portfolio.cash,
        });
    }
}

struct Stream<'a> {
    symbol: &'a str,
    points: &'a [SignalPoint],
    cursor: usize,
}

/// Sorted union of every symbol's available dates.
fn trading_dates(signals: &BTreeMap<String, SignalSeries>) -> Vec<NaiveDate> {
    let mut dates = BTreeSet::new();
    for series in signals.values() {
        for point in series.points() {
            dates.insert(point.date);
        }
    }
    dates.into_iter().collect()
}
