//! Bar-by-bar simulation loop — the heart of the engine.
//!
//! Per bar, in order: entry check, exit check for every open position,
//! equity snapshot. The whole run is a deterministic single-threaded fold
//! over the input sequence; re-running requires a fresh engine instance,
//! which `run(self, ..)` enforces by consuming the engine.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{
    Bar, EquityPoint, IdGen, Ledger, Position, PositionId, PositionSide, TradeKind, TradeRecord,
};
use crate::strategy::SignalSeries;

use super::config::{ConfigError, SimConfig};
use super::exit_rules::{self, ExitAction, TargetTier};

/// A run failed at a specific bar. The offending bar index is always
/// carried so failures are attributable; the engine never skips a bar and
/// continues, since that would desynchronize the one-point-per-bar
/// equity guarantee.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("signal series length {signals} does not match bar count {bars}")]
    SignalLengthMismatch { bars: usize, signals: usize },
    #[error("bar {bar}: close price {close} is not a positive finite number")]
    InvalidClose { bar: usize, close: f64 },
    #[error("bar {bar}: date {date} does not increase over the previous bar")]
    NonMonotonicDate { bar: usize, date: NaiveDate },
    #[error("bar {bar}: long and short signals are both set")]
    ConflictingSignals { bar: usize },
}

/// Artifacts of a completed run, handed to reporting collaborators.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// One point per input bar, in input order.
    pub equity_curve: Vec<EquityPoint>,
    /// Append-only audit trail of every cash-moving event.
    pub trades: Vec<TradeRecord>,
    /// Positions still open when the bars ran out.
    pub open_positions: Vec<Position>,
    pub initial_balance: f64,
    pub final_balance: f64,
    pub bar_count: usize,
}

/// The position-lifecycle simulation engine.
///
/// Owns one [`Ledger`] for its lifetime. Construction validates the config;
/// [`Engine::run`] consumes the engine, so a half-completed run's ledger is
/// simply discarded and can never be resumed.
pub struct Engine {
    config: SimConfig,
    ledger: Ledger,
    id_gen: IdGen,
}

impl Engine {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ledger = Ledger::new(config.initial_balance);
        Ok(Self {
            config,
            ledger,
            id_gen: IdGen::default(),
        })
    }

    /// Process the full bar sequence once, in timestamp order.
    ///
    /// An empty bar sequence produces an empty equity curve and trade
    /// history; deriving metrics from that is the caller's problem
    /// (`summarize` reports it explicitly).
    pub fn run(mut self, bars: &[Bar], signals: &SignalSeries) -> Result<RunResult, EngineError> {
        // Both vectors are checked individually: a series whose long and
        // short sides disagree in length must not slip through on the
        // shorter one.
        if signals.long.len() != bars.len() {
            return Err(EngineError::SignalLengthMismatch {
                bars: bars.len(),
                signals: signals.long.len(),
            });
        }
        if signals.short.len() != bars.len() {
            return Err(EngineError::SignalLengthMismatch {
                bars: bars.len(),
                signals: signals.short.len(),
            });
        }

        let mut prev_date: Option<NaiveDate> = None;
        for (index, bar) in bars.iter().enumerate() {
            self.validate_bar(index, bar, prev_date, signals)?;
            prev_date = Some(bar.date);

            self.check_entry(index, bar, signals);
            self.check_exits(bar);

            self.ledger.equity_curve.push(EquityPoint {
                date: bar.date,
                balance: self.ledger.cash_balance,
            });
        }

        let Ledger {
            cash_balance,
            open_positions,
            trade_history,
            equity_curve,
        } = self.ledger;

        Ok(RunResult {
            equity_curve,
            trades: trade_history,
            open_positions,
            initial_balance: self.config.initial_balance,
            final_balance: cash_balance,
            bar_count: bars.len(),
        })
    }

    fn validate_bar(
        &self,
        index: usize,
        bar: &Bar,
        prev_date: Option<NaiveDate>,
        signals: &SignalSeries,
    ) -> Result<(), EngineError> {
        if !bar.close.is_finite() || bar.close <= 0.0 {
            return Err(EngineError::InvalidClose {
                bar: index,
                close: bar.close,
            });
        }
        if let Some(prev) = prev_date {
            if bar.date <= prev {
                return Err(EngineError::NonMonotonicDate {
                    bar: index,
                    date: bar.date,
                });
            }
        }
        if signals.long[index] && signals.short[index] {
            return Err(EngineError::ConflictingSignals { bar: index });
        }
        Ok(())
    }

    fn check_entry(&mut self, index: usize, bar: &Bar, signals: &SignalSeries) {
        let side = if signals.long[index] {
            PositionSide::Long
        } else if signals.short[index] {
            PositionSide::Short
        } else {
            return;
        };

        if !self.config.allow_concurrent_positions && self.ledger.has_open_positions() {
            return;
        }

        self.enter(side, index, bar);
    }

    fn enter(&mut self, side: PositionSide, index: usize, bar: &Bar) {
        let size = self.ledger.cash_balance * self.config.position_size;
        let quantity = size / bar.close;
        // A depleted balance sizes to zero quantity; open positions must
        // keep quantity > 0, so the signal is dropped instead.
        if quantity <= 0.0 {
            return;
        }
        let stop_loss_price = match side {
            PositionSide::Long => bar.close * (1.0 - self.config.stop_loss),
            PositionSide::Short => bar.close * (1.0 + self.config.stop_loss),
        };

        self.ledger.open_positions.push(Position {
            id: self.id_gen.next_position_id(),
            side,
            entry_price: bar.close,
            quantity,
            stop_loss_price,
            opened_at: bar.date,
            entry_bar: index,
            target1_reached: false,
            target2_reached: false,
        });
        self.ledger.cash_balance -= size;
        self.record(TradeKind::Entry, side, bar.close, quantity, bar.date);
    }

    /// Evaluate exit rules for every open position on this bar.
    ///
    /// Iterates a stable snapshot of position ids; a position closed during
    /// the scan is removed from the live ledger only after its own rule
    /// evaluation completes, so removal can never invalidate the scan.
    fn check_exits(&mut self, bar: &Bar) {
        let snapshot: Vec<PositionId> =
            self.ledger.open_positions.iter().map(|p| p.id).collect();

        for id in snapshot {
            let Some(position) = self.ledger.position(id) else {
                continue;
            };
            let Some(action) = exit_rules::evaluate(position, bar, &self.config) else {
                continue;
            };

            match action {
                ExitAction::Partial { tier, fraction } => self.partial_exit(id, bar, tier, fraction),
                ExitAction::Full { .. } => self.full_exit(id, bar),
            }
        }
    }

    fn partial_exit(&mut self, id: PositionId, bar: &Bar, tier: TargetTier, fraction: f64) {
        let position = self
            .ledger
            .position_mut(id)
            .expect("position id came from the live ledger");

        let sold = position.quantity * fraction;
        position.quantity -= sold;
        position.stop_loss_price = exit_rules::tightened_stop(position);
        match tier {
            TargetTier::First => position.target1_reached = true,
            TargetTier::Second => position.target2_reached = true,
        }
        let side = position.side;
        let exhausted = position.quantity == 0.0;

        self.ledger.cash_balance += sold * bar.close;
        self.record(TradeKind::PartialExit, side, bar.close, sold, bar.date);

        // A partial that drains the position to exactly zero closes it.
        if exhausted {
            self.ledger.remove_position(id);
        }
    }

    fn full_exit(&mut self, id: PositionId, bar: &Bar) {
        let position = self
            .ledger
            .position(id)
            .expect("position id came from the live ledger");
        let quantity = position.quantity;
        let side = position.side;

        self.ledger.cash_balance += quantity * bar.close;
        self.record(TradeKind::FullExit, side, bar.close, quantity, bar.date);
        self.ledger.remove_position(id);
    }

    fn record(
        &mut self,
        kind: TradeKind,
        side: PositionSide,
        price: f64,
        quantity: f64,
        date: NaiveDate,
    ) {
        self.ledger.trade_history.push(TradeRecord {
            kind,
            side,
            price,
            quantity,
            date,
            balance_after: self.ledger.cash_balance,
        });
    }
}
