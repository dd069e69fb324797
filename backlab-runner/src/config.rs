//! Serializable run configuration.
//!
//! A [`RunConfig`] captures everything needed to reproduce a backtest:
//! the symbol, the engine parameters, and the strategy choice. Configs
//! load from TOML files and hash to a deterministic [`RunId`] so two
//! identical runs can be recognized as such.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use backlab_core::engine::{ConfigError as SimConfigError, SimConfig};
use backlab_core::strategy::{BollingerKeltnerChaikin, MaCrossover, NullStrategy, Strategy};

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Errors from loading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid engine parameters: {0}")]
    Sim(#[from] SimConfigError),

    #[error("strategy: fast_period ({fast_period}) must be less than slow_period ({slow_period})")]
    PeriodsNotOrdered {
        fast_period: usize,
        slow_period: usize,
    },

    #[error("strategy: {field} must be at least {min}, got {value}")]
    PeriodTooSmall {
        field: &'static str,
        min: usize,
        value: usize,
    },

    #[error("strategy: channel_width must be positive, got {0}")]
    NonPositiveChannelWidth(f64),
}

/// Serializable configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub backtest: BacktestSection,
    pub strategy: StrategyConfig,
}

/// The `[backtest]` section: symbol plus engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    /// Symbol the bars belong to. Labelling only; the engine never sees it.
    pub symbol: String,
    pub initial_balance: f64,
    pub position_size: f64,
    pub stop_loss: f64,
    pub profit_target1: f64,
    pub profit_target2: f64,
    pub partial_sell1: f64,
    pub partial_sell2: f64,
    pub days_threshold: i64,
    pub price_threshold: f64,
    #[serde(default)]
    pub allow_concurrent_positions: bool,
}

/// Strategy choice (serializable tagged enum).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyConfig {
    /// Moving average crossover: fast SMA crosses slow SMA.
    MaCrossover { fast_period: usize, slow_period: usize },

    /// Bollinger/Keltner squeeze with Chaikin direction and trend gate.
    BollingerKeltnerChaikin {
        channel_period: usize,
        channel_width: f64,
        trend_period: usize,
    },

    /// Never signals. Useful for dry runs against real data.
    Null,
}

impl StrategyConfig {
    /// Checks the parameter ranges the strategy constructors require, so a
    /// bad config surfaces as an error instead of a panic inside a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            StrategyConfig::MaCrossover {
                fast_period,
                slow_period,
            } => {
                if fast_period < 1 {
                    return Err(ConfigError::PeriodTooSmall {
                        field: "fast_period",
                        min: 1,
                        value: fast_period,
                    });
                }
                if fast_period >= slow_period {
                    return Err(ConfigError::PeriodsNotOrdered {
                        fast_period,
                        slow_period,
                    });
                }
            }
            StrategyConfig::BollingerKeltnerChaikin {
                channel_period,
                channel_width,
                trend_period,
            } => {
                if channel_period < 2 {
                    return Err(ConfigError::PeriodTooSmall {
                        field: "channel_period",
                        min: 2,
                        value: channel_period,
                    });
                }
                if trend_period < 1 {
                    return Err(ConfigError::PeriodTooSmall {
                        field: "trend_period",
                        min: 1,
                        value: trend_period,
                    });
                }
                if !(channel_width > 0.0) {
                    return Err(ConfigError::NonPositiveChannelWidth(channel_width));
                }
            }
            StrategyConfig::Null => {}
        }
        Ok(())
    }

    /// Instantiates the configured strategy.
    pub fn build(&self) -> Result<Box<dyn Strategy>, ConfigError> {
        self.validate()?;
        let strategy: Box<dyn Strategy> = match *self {
            StrategyConfig::MaCrossover {
                fast_period,
                slow_period,
            } => Box::new(MaCrossover::new(fast_period, slow_period)),
            StrategyConfig::BollingerKeltnerChaikin {
                channel_period,
                channel_width,
                trend_period,
            } => Box::new(BollingerKeltnerChaikin::new(
                channel_period,
                channel_width,
                trend_period,
            )),
            StrategyConfig::Null => Box::new(NullStrategy),
        };
        Ok(strategy)
    }
}

impl RunConfig {
    /// Loads a config from a TOML file.
    ///
    /// Parsing succeeds independently of validation; the engine and
    /// strategy parameters are checked here as well so a bad file fails
    /// before any data loads.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.to_sim_config().validate()?;
        config.strategy.validate()?;
        Ok(config)
    }

    /// Projects the `[backtest]` section onto the engine's config type.
    pub fn to_sim_config(&self) -> SimConfig {
        let b = &self.backtest;
        SimConfig {
            initial_balance: b.initial_balance,
            position_size: b.position_size,
            stop_loss: b.stop_loss,
            profit_target1: b.profit_target1,
            profit_target2: b.profit_target2,
            partial_sell1: b.partial_sell1,
            partial_sell2: b.partial_sell2,
            days_threshold: b.days_threshold,
            price_threshold: b.price_threshold,
            allow_concurrent_positions: b.allow_concurrent_positions,
        }
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs produce the same `RunId`, so results
    /// keyed by it can be compared or deduplicated across sweeps.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
