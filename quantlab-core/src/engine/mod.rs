//! Simulation engine: configuration, run state, and the date loop.

pub mod simulator;
pub mod state;

pub use simulator::{EnginePhase, Simulator};
pub use state::{EngineConfig, RunState, ValuationPolicy};
