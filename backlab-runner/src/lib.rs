//! BackLab Runner — backtest orchestration on top of `backlab-core`.
//!
//! This crate provides:
//! - Serializable run configuration (TOML) with content-hashed run ids
//! - CSV bar loading with row-attributed validation errors
//! - Deterministic synthetic bar generation for tests and offline demos
//! - A single-run entry point wiring strategy, engine, and metrics
//! - Parallel multi-dataset sweeps (Rayon)
//! - Artifact export: result JSON, equity CSV, trade CSV

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod sweep;
pub mod synthetic;

pub use config::{BacktestSection, ConfigError, RunConfig, RunId, StrategyConfig};
pub use data_loader::{load_bars_csv, LoadError};
pub use export::{read_result_json, write_equity_csv, write_result_json, write_trades_csv};
pub use runner::{run_backtest, run_backtest_from_csv, BacktestResult, RunError, SCHEMA_VERSION};
pub use sweep::{rank_by_total_return, run_sweep, SweepDataset};
pub use synthetic::synthetic_bars;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn backtest_result_is_send_sync() {
        assert_send::<BacktestResult>();
        assert_sync::<BacktestResult>();
    }

    #[test]
    fn run_error_is_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
