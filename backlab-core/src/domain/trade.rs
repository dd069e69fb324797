//! TradeRecord — one immutable entry in the audit trail.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::position::PositionSide;

/// What a trade record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeKind {
    Entry,
    PartialExit,
    FullExit,
}

/// An immutable record of one cash-moving event.
///
/// The concatenation of all records is the audit trail: folding
/// `balance_after` over the history reconstructs every balance change
/// the engine made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub kind: TradeKind,
    pub side: PositionSide,
    pub price: f64,
    pub quantity: f64,
    pub date: NaiveDate,
    /// Cash balance immediately after this record was appended.
    pub balance_after: f64,
}

impl TradeRecord {
    /// Signed cash delta this record represents: negative for entries
    /// (cash debited), positive for exits (proceeds credited).
    pub fn cash_delta(&self) -> f64 {
        match self.kind {
            TradeKind::Entry => -(self.price * self.quantity),
            TradeKind::PartialExit | TradeKind::FullExit => self.price * self.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: TradeKind) -> TradeRecord {
        TradeRecord {
            kind,
            side: PositionSide::Long,
            price: 100.0,
            quantity: 50.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            balance_after: 95_000.0,
        }
    }

    #[test]
    fn entry_delta_is_negative() {
        assert_eq!(record(TradeKind::Entry).cash_delta(), -5_000.0);
    }

    #[test]
    fn exit_delta_is_positive() {
        assert_eq!(record(TradeKind::PartialExit).cash_delta(), 5_000.0);
        assert_eq!(record(TradeKind::FullExit).cash_delta(), 5_000.0);
    }

    #[test]
    fn record_serialization_roundtrip() {
        let rec = record(TradeKind::FullExit);
        let json = serde_json::to_string(&rec).unwrap();
        let deser: TradeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec.kind, deser.kind);
        assert_eq!(rec.balance_after, deser.balance_after);
    }
}
