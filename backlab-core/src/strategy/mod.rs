//! Strategy trait and signal series.
//!
//! Strategies are ledger-agnostic: they see bar history, never positions or
//! cash. The engine depends only on the [`Strategy`] capability, never on a
//! concrete strategy type.

pub mod bollinger_keltner_chaikin;
pub mod ma_crossover;

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// Per-bar entry signals produced by a strategy.
///
/// Both vectors have one flag per bar. Setting long and short on the same
/// bar is rejected by the engine at the offending bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSeries {
    pub long: Vec<bool>,
    pub short: Vec<bool>,
}

impl SignalSeries {
    /// A series of `n` bars with no signals.
    pub fn none(n: usize) -> Self {
        Self {
            long: vec![false; n],
            short: vec![false; n],
        }
    }

    /// Number of bars covered. A well-formed series has `long` and `short`
    /// of equal length; the engine rejects one that does not.
    pub fn len(&self) -> usize {
        self.long.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trait for signal-producing strategies.
pub trait Strategy: Send + Sync {
    /// Human-readable name (e.g., "ma_crossover").
    fn name(&self) -> &str;

    /// Number of bars needed before this strategy can produce signals.
    fn warmup_bars(&self) -> usize;

    /// Label every bar with long/short entry intent.
    ///
    /// The flag at index t must only depend on `bars[0..=t]`.
    fn produce_signals(&self, bars: &[Bar]) -> SignalSeries;
}

/// Null strategy — never signals. Used as a stub in tests that don't need
/// real signal generation.
pub struct NullStrategy;

impl Strategy for NullStrategy {
    fn name(&self) -> &str {
        "null"
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn produce_signals(&self, bars: &[Bar]) -> SignalSeries {
        SignalSeries::none(bars.len())
    }
}

pub use bollinger_keltner_chaikin::BollingerKeltnerChaikin;
pub use ma_crossover::MaCrossover;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn none_series_has_no_signals() {
        let s = SignalSeries::none(5);
        assert_eq!(s.len(), 5);
        assert!(s.long.iter().all(|&f| !f));
        assert!(s.short.iter().all(|&f| !f));
    }

    #[test]
    fn null_strategy_matches_bar_count() {
        let bars = vec![
            Bar {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume: 1_000,
            };
            3
        ];
        // Clones share a date, which the strategy does not care about.
        let signals = NullStrategy.produce_signals(&bars);
        assert_eq!(signals.len(), 3);
        assert_eq!(NullStrategy.name(), "null");
        assert_eq!(NullStrategy.warmup_bars(), 0);
    }

    #[test]
    fn signal_series_roundtrip() {
        let mut s = SignalSeries::none(3);
        s.long[1] = true;
        let json = serde_json::to_string(&s).unwrap();
        let deser: SignalSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(s, deser);
    }
}
