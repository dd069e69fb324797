//! Position — an open long or short stake with a protective stop.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::PositionId;

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

/// An open stake in the ledger.
///
/// Invariants maintained by the engine:
/// - `quantity > 0` while open, and non-increasing over the lifetime
/// - `entry_price` is immutable after creation
/// - the position is removed from the ledger exactly once
///
/// `stop_loss_price` may be tightened after a profit target fires. The
/// engine does not enforce stop monotonicity; moving the stop the wrong
/// way is a caller error, not a checked invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub side: PositionSide,
    pub entry_price: f64,
    pub quantity: f64,
    pub stop_loss_price: f64,
    pub opened_at: NaiveDate,
    pub entry_bar: usize,
    pub target1_reached: bool,
    pub target2_reached: bool,
}

impl Position {
    /// Unrealized fractional gain at `price`, signed so that a favorable
    /// move is positive for both sides.
    pub fn unrealized_gain(&self, price: f64) -> f64 {
        match self.side {
            PositionSide::Long => (price - self.entry_price) / self.entry_price,
            PositionSide::Short => (self.entry_price - price) / self.entry_price,
        }
    }

    /// Calendar days the position has been open as of `date`.
    pub fn days_held(&self, date: NaiveDate) -> i64 {
        (date - self.opened_at).num_days()
    }
}
