//! Simulation parameters and fail-fast validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration rejected at engine construction.
///
/// Every variant names the offending field so failures are attributable
/// without reading the message format. Values are never silently clamped.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("initial_balance must be > 0, got {0}")]
    NonPositiveBalance(f64),
    #[error("position_size must be in (0, 1], got {0}")]
    PositionSizeOutOfRange(f64),
    #[error("stop_loss must be in (0, 1), got {0}")]
    StopLossOutOfRange(f64),
    #[error("profit_target1 must be > 1, got {0}")]
    Target1OutOfRange(f64),
    #[error("profit_target2 ({target2}) must exceed profit_target1 ({target1})")]
    TargetsNotOrdered { target1: f64, target2: f64 },
    #[error("{field} must be in (0, 1], got {value}")]
    PartialSellOutOfRange { field: &'static str, value: f64 },
    #[error("days_threshold must be >= 0, got {0}")]
    NegativeDaysThreshold(i64),
}

/// All parameters of one simulation run, passed by value into the engine.
///
/// There is no ambient or global configuration: two engines constructed
/// from equal configs over equal inputs produce identical ledgers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Starting cash balance.
    pub initial_balance: f64,
    /// Fraction of the current cash balance committed per new entry.
    pub position_size: f64,
    /// Initial stop distance as a fraction of entry price.
    pub stop_loss: f64,
    /// First profit target as a multiplier on entry price (> 1).
    pub profit_target1: f64,
    /// Second profit target multiplier (> profit_target1).
    pub profit_target2: f64,
    /// Fraction of the current quantity liquidated when target 1 fires.
    pub partial_sell1: f64,
    /// Fraction of the current quantity liquidated when target 2 fires.
    pub partial_sell2: f64,
    /// Calendar days after which a position is eligible for the stale exit.
    pub days_threshold: i64,
    /// Gain ceiling for the stale exit: a position held past
    /// `days_threshold` whose unrealized gain is at or below this fraction
    /// is force-closed.
    pub price_threshold: f64,
    /// When false, a new entry is taken only if no position is open.
    /// When true, entries are independent of existing positions.
    pub allow_concurrent_positions: bool,
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite_fields = [
            ("initial_balance", self.initial_balance),
            ("position_size", self.position_size),
            ("stop_loss", self.stop_loss),
            ("profit_target1", self.profit_target1),
            ("profit_target2", self.profit_target2),
            ("partial_sell1", self.partial_sell1),
            ("partial_sell2", self.partial_sell2),
            ("price_threshold", self.price_threshold),
        ];
        for (field, value) in finite_fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        if self.initial_balance <= 0.0 {
            return Err(ConfigError::NonPositiveBalance(self.initial_balance));
        }
        if self.position_size <= 0.0 || self.position_size > 1.0 {
            return Err(ConfigError::PositionSizeOutOfRange(self.position_size));
        }
        if self.stop_loss <= 0.0 || self.stop_loss >= 1.0 {
            return Err(ConfigError::StopLossOutOfRange(self.stop_loss));
        }
        if self.profit_target1 <= 1.0 {
            return Err(ConfigError::Target1OutOfRange(self.profit_target1));
        }
        if self.profit_target2 <= self.profit_target1 {
            return Err(ConfigError::TargetsNotOrdered {
                target1: self.profit_target1,
                target2: self.profit_target2,
            });
        }
        if self.partial_sell1 <= 0.0 || self.partial_sell1 > 1.0 {
            return Err(ConfigError::PartialSellOutOfRange {
                field: "partial_sell1",
                value: self.partial_sell1,
            });
        }
        if self.partial_sell2 <= 0.0 || self.partial_sell2 > 1.0 {
            return Err(ConfigError::PartialSellOutOfRange {
                field: "partial_sell2",
                value: self.partial_sell2,
            });
        }
        if self.days_threshold < 0 {
            return Err(ConfigError::NegativeDaysThreshold(self.days_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn valid_config() -> SimConfig {
        SimConfig {
            initial_balance: 100_000.0,
            position_size: 0.1,
            stop_loss: 0.05,
            profit_target1: 2.0,
            profit_target2: 2.5,
            partial_sell1: 0.5,
            partial_sell2: 0.5,
            days_threshold: 10,
            price_threshold: 0.05,
            allow_concurrent_positions: false,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(valid_config().validate(), Ok(()));
    }

    #[test]
    fn rejects_non_positive_balance() {
        let mut c = valid_config();
        c.initial_balance = 0.0;
        assert_eq!(c.validate(), Err(ConfigError::NonPositiveBalance(0.0)));
        c.initial_balance = -5.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_position_size_out_of_range() {
        let mut c = valid_config();
        c.position_size = 0.0;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::PositionSizeOutOfRange(_))
        ));
        c.position_size = 1.0; // inclusive upper bound is allowed
        assert_eq!(c.validate(), Ok(()));
        c.position_size = 1.01;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_stop_loss_bounds() {
        let mut c = valid_config();
        c.stop_loss = 0.0;
        assert!(c.validate().is_err());
        c.stop_loss = 1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_unordered_targets() {
        let mut c = valid_config();
        c.profit_target2 = c.profit_target1;
        assert_eq!(
            c.validate(),
            Err(ConfigError::TargetsNotOrdered {
                target1: 2.0,
                target2: 2.0
            })
        );
    }

    #[test]
    fn rejects_target1_at_most_one() {
        let mut c = valid_config();
        c.profit_target1 = 1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_fields() {
        let mut c = valid_config();
        c.price_threshold = f64::NAN;
        assert!(matches!(c.validate(), Err(ConfigError::NotFinite { .. })));
        let mut c = valid_config();
        c.profit_target2 = f64::INFINITY;
        assert!(matches!(c.validate(), Err(ConfigError::NotFinite { .. })));
    }

    #[test]
    fn rejects_negative_days_threshold() {
        let mut c = valid_config();
        c.days_threshold = -1;
        assert_eq!(c.validate(), Err(ConfigError::NegativeDaysThreshold(-1)));
    }

    #[test]
    fn rejects_partial_sell_out_of_range() {
        let mut c = valid_config();
        c.partial_sell2 = 0.0;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::PartialSellOutOfRange {
                field: "partial_sell2",
                ..
            })
        ));
    }
}
