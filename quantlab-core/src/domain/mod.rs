//! Domain types: bars, signals, trades, portfolio, equity curve.

pub mod bar;
pub mod equity;
pub mod portfolio;
pub mod signal;
pub mod trade;

pub use bar::Bar;
pub use equity::EquitySnapshot;
pub use portfolio::Portfolio;
pub use signal::{Direction, SeriesError, SignalPoint, SignalSeries};
pub use trade::{TradeRecord, TradeSide};
