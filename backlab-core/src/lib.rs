//! Backlab Core — signal-driven backtest simulation.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, positions, trade records, the ledger)
//! - The bar-by-bar simulation engine with partial profit-taking,
//!   stop tightening, time-decay exits, and stop-loss exits
//! - The strategy trait and concrete signal strategies
//! - Indicator helpers
//! - Performance metrics over the finished equity curve
//!
//! No file or network I/O lives here; loading bars and persisting results
//! belong to the runner crate.

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod metrics;
pub mod strategy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the types that cross the runner's rayon
    /// boundary are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();
        require_send::<domain::Ledger>();
        require_sync::<domain::Ledger>();

        require_send::<engine::SimConfig>();
        require_sync::<engine::SimConfig>();
        require_send::<engine::RunResult>();
        require_sync::<engine::RunResult>();
        require_send::<engine::EngineError>();
        require_sync::<engine::EngineError>();

        require_send::<strategy::SignalSeries>();
        require_sync::<strategy::SignalSeries>();
        require_send::<metrics::PerformanceSummary>();
        require_sync::<metrics::PerformanceSummary>();
    }

    /// Architecture contract: the Strategy trait does NOT see the ledger.
    ///
    /// `produce_signals` takes only `&[Bar]`. If someone adds a ledger or
    /// position parameter, the trait changes and this stops compiling.
    #[test]
    fn strategy_trait_has_no_ledger_parameter() {
        fn _check_trait_object_builds(
            strategy: &dyn strategy::Strategy,
            bars: &[domain::Bar],
        ) -> strategy::SignalSeries {
            strategy.produce_signals(bars)
        }
    }
}
