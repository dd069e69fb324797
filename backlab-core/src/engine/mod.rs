//! Simulation engine — entry logic, the per-bar exit state machine, and
//! equity/trade recording.
//!
//! Per bar, in order:
//! 1. Entry check: open a new position on a long/short signal
//! 2. Exit check: evaluate every open position against the exit rules
//! 3. Equity snapshot: one point per bar, realized cash only

pub mod config;
pub mod exit_rules;
pub mod simulator;

pub use config::{ConfigError, SimConfig};
pub use exit_rules::{ExitAction, ExitReason, TargetTier, PROTECTIVE_STOP_OFFSET};
pub use simulator::{Engine, EngineError, RunResult};
