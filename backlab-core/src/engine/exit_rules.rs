//! Exit rule evaluation — the per-position state machine.
//!
//! For each open position on each bar the rules are checked in a fixed
//! priority order; the first match wins and the rest are skipped for that
//! position on that bar:
//!
//! 1. Target 1 (partial)
//! 2. Target 2 (partial, only reachable after target 1)
//! 3. Extreme target (full)
//! 4. Stale position (full)
//! 5. Stop-loss breach (full)

use crate::domain::{Bar, Position, PositionSide};

use super::config::SimConfig;

/// Stop offset applied after a profit target fires: the stop moves to
/// `entry_price * (1 + offset)` for longs and `entry_price * (1 - offset)`
/// for shorts, locking in part of the gain.
pub const PROTECTIVE_STOP_OFFSET: f64 = 0.2;

/// Hard full-exit multiple for longs: close at or above 3x entry.
pub const EXTREME_LONG_MULTIPLE: f64 = 3.0;
/// Hard full-exit multiple for shorts: close at or below 0.5x entry.
pub const EXTREME_SHORT_MULTIPLE: f64 = 0.5;

/// Which profit target fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetTier {
    First,
    Second,
}

/// Why a position is being closed in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    ExtremeTarget,
    StalePosition,
    StopLoss,
}

/// Decision for one position on one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExitAction {
    /// Liquidate `fraction` of the current quantity and tighten the stop.
    Partial { tier: TargetTier, fraction: f64 },
    /// Liquidate the entire remaining quantity.
    Full { reason: ExitReason },
}

/// Evaluate the exit rules for `position` against `bar`.
///
/// Returns `None` when no rule matches (the position is held).
pub fn evaluate(position: &Position, bar: &Bar, config: &SimConfig) -> Option<ExitAction> {
    let close = bar.close;

    if !position.target1_reached && past_target(position, close, config.profit_target1) {
        return Some(ExitAction::Partial {
            tier: TargetTier::First,
            fraction: config.partial_sell1,
        });
    }

    if position.target1_reached
        && !position.target2_reached
        && past_target(position, close, config.profit_target2)
    {
        return Some(ExitAction::Partial {
            tier: TargetTier::Second,
            fraction: config.partial_sell2,
        });
    }

    let extreme = match position.side {
        PositionSide::Long => close >= position.entry_price * EXTREME_LONG_MULTIPLE,
        PositionSide::Short => close <= position.entry_price * EXTREME_SHORT_MULTIPLE,
    };
    if extreme {
        return Some(ExitAction::Full {
            reason: ExitReason::ExtremeTarget,
        });
    }

    if position.days_held(bar.date) >= config.days_threshold
        && position.unrealized_gain(close) <= config.price_threshold
    {
        return Some(ExitAction::Full {
            reason: ExitReason::StalePosition,
        });
    }

    let stopped = match position.side {
        PositionSide::Long => close < position.stop_loss_price,
        PositionSide::Short => close > position.stop_loss_price,
    };
    if stopped {
        return Some(ExitAction::Full {
            reason: ExitReason::StopLoss,
        });
    }

    None
}

/// Whether `close` has moved favorably past the target multiplier.
///
/// Longs compare against `entry * target`. Shorts use the symmetric inverse
/// multiplier `entry * (2 - target)`, so a target of 1.5 means a 50% move
/// in the favorable direction for either side.
fn past_target(position: &Position, close: f64, target: f64) -> bool {
    match position.side {
        PositionSide::Long => close >= position.entry_price * target,
        PositionSide::Short => close <= position.entry_price * (2.0 - target),
    }
}

/// Stop price locking in gains after a target fires.
pub fn tightened_stop(position: &Position) -> f64 {
    match position.side {
        PositionSide::Long => position.entry_price * (1.0 + PROTECTIVE_STOP_OFFSET),
        PositionSide::Short => position.entry_price * (1.0 - PROTECTIVE_STOP_OFFSET),
    }
}
