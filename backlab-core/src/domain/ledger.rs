//! Ledger — cash, open positions, and the append-only histories.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::PositionId;
use super::position::Position;
use super::trade::TradeRecord;

/// One point of the equity curve.
///
/// Balance is realized cash only: open positions are not marked to market
/// between bars, so equity moves only when cash moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub balance: f64,
}

/// Pure state owned by one engine instance.
///
/// Mutated only during bar processing; read (never mutated) by the metrics
/// calculator and reporting collaborators after the run completes.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub cash_balance: f64,
    pub open_positions: Vec<Position>,
    pub trade_history: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Ledger {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            cash_balance: initial_balance,
            open_positions: Vec::new(),
            trade_history: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn position(&self, id: PositionId) -> Option<&Position> {
        self.open_positions.iter().find(|p| p.id == id)
    }

    pub fn position_mut(&mut self, id: PositionId) -> Option<&mut Position> {
        self.open_positions.iter_mut().find(|p| p.id == id)
    }

    /// Remove a position from the ledger. Returns true if it was present.
    pub fn remove_position(&mut self, id: PositionId) -> bool {
        let before = self.open_positions.len();
        self.open_positions.retain(|p| p.id != id);
        self.open_positions.len() < before
    }

    pub fn has_open_positions(&self) -> bool {
        !self.open_positions.is_empty()
    }
}
