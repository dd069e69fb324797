//! Backtest runner — wires together strategy, engine, and metrics.
//!
//! `run_backtest()` is the single entry point: given a config and a bar
//! history, it produces signals, drives the engine over the bars, and
//! summarizes the resulting equity curve into a serializable
//! [`BacktestResult`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use backlab_core::domain::{Bar, EquityPoint, TradeRecord};
use backlab_core::engine::{Engine, EngineError};
use backlab_core::metrics::{summarize, MetricsError, PerformanceSummary};

use crate::config::{ConfigError, RunConfig, RunId};
use crate::data_loader::LoadError;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Load(#[from] LoadError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Complete serializable result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Content hash of `config`; identical configs share a run id.
    pub run_id: RunId,
    pub symbol: String,
    pub strategy_name: String,
    pub config: RunConfig,
    pub summary: PerformanceSummary,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<TradeRecord>,
    /// Positions still open when the bars ran out.
    pub open_position_count: usize,
    pub initial_balance: f64,
    pub final_balance: f64,
    pub bar_count: usize,
}

/// Runs one backtest end to end: signals, simulation, metrics.
pub fn run_backtest(config: &RunConfig, bars: &[Bar]) -> Result<BacktestResult, RunError> {
    let strategy = config.strategy.build()?;
    let signals = strategy.produce_signals(bars);

    let engine = Engine::new(config.to_sim_config()).map_err(ConfigError::Sim)?;
    let result = engine.run(bars, &signals)?;
    let summary = summarize(&result.equity_curve, result.initial_balance)?;

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        symbol: config.backtest.symbol.clone(),
        strategy_name: strategy.name().to_string(),
        config: config.clone(),
        summary,
        equity_curve: result.equity_curve,
        trades: result.trades,
        open_position_count: result.open_positions.len(),
        initial_balance: result.initial_balance,
        final_balance: result.final_balance,
        bar_count: result.bar_count,
    })
}

/// Loads bars from the CSV at `data_path` and runs the backtest.
pub fn run_backtest_from_csv(
    config: &RunConfig,
    data_path: &std::path::Path,
) -> Result<BacktestResult, RunError> {
    let bars = crate::data_loader::load_bars_csv(data_path)?;
    run_backtest(config, &bars)
}
