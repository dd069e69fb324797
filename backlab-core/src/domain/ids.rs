//! Identifier types for ledger entries.

use serde::{Deserialize, Serialize};

/// Unique identifier for an open position within one engine run.
///
/// The exit scan iterates a snapshot of ids rather than the live position
/// vector, so removals during the scan cannot invalidate iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionId(pub u64);

/// Monotonic id generator, owned by one engine instance.
#[derive(Debug, Default)]
pub struct IdGen {
    next_position: u64,
}

impl IdGen {
    pub fn next_position_id(&mut self) -> PositionId {
        let id = PositionId(self.next_position);
        self.next_position += 1;
        id
    }
}
