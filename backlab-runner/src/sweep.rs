//! Parallel multi-run execution.
//!
//! A sweep runs the same strategy/engine parameters over many independent
//! datasets. Each job owns its own engine and ledger, so jobs run in
//! parallel with Rayon without any shared state.

use rayon::prelude::*;

use backlab_core::domain::Bar;

use crate::config::RunConfig;
use crate::runner::{run_backtest, BacktestResult, RunError};

/// One unit of sweep work: a symbol and its bar history.
#[derive(Debug, Clone)]
pub struct SweepDataset {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

/// Runs the base config against every dataset in parallel.
///
/// Results come back in dataset order regardless of completion order.
/// The first failing job aborts the sweep.
pub fn run_sweep(
    base: &RunConfig,
    datasets: &[SweepDataset],
) -> Result<Vec<BacktestResult>, RunError> {
    datasets
        .par_iter()
        .map(|dataset| {
            let mut config = base.clone();
            config.backtest.symbol = dataset.symbol.clone();
            run_backtest(&config, &dataset.bars)
        })
        .collect()
}

/// Sorts results best-first by total return.
///
/// NaN never occurs here (`summarize` rejects the inputs that would
/// produce it), so the comparison treats values as totally ordered.
pub fn rank_by_total_return(results: &mut [BacktestResult]) {
    results.sort_by(|a, b| {
        b.summary
            .total_return
            .partial_cmp(&a.summary.total_return)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
