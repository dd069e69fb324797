//! Domain types for backlab.

pub mod bar;
pub mod ids;
pub mod ledger;
pub mod position;
pub mod trade;

pub use bar::Bar;
pub use ids::{IdGen, PositionId};
pub use ledger::{EquityPoint, Ledger};
pub use position::{Position, PositionSide};
pub use trade::{TradeKind, TradeRecord};
