//! Moving average crossover strategy.
//!
//! Long when the fast SMA crosses above the slow SMA (golden cross), short
//! when it crosses below (death cross). A cross requires the opposite
//! ordering on the previous bar, so a persistent trend signals once.

use crate::domain::Bar;
use crate::indicators::{closes, sma};

use super::{SignalSeries, Strategy};

#[derive(Debug, Clone)]
pub struct MaCrossover {
    fast_period: usize,
    slow_period: usize,
    name: String,
}

impl MaCrossover {
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        assert!(fast_period >= 1, "fast period must be >= 1");
        assert!(
            fast_period < slow_period,
            "fast period must be shorter than slow period"
        );
        Self {
            fast_period,
            slow_period,
            name: format!("ma_crossover_{fast_period}_{slow_period}"),
        }
    }
}

impl Default for MaCrossover {
    /// The classic 50/200 golden-cross configuration.
    fn default() -> Self {
        Self::new(50, 200)
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_bars(&self) -> usize {
        self.slow_period
    }

    fn produce_signals(&self, bars: &[Bar]) -> SignalSeries {
        let closes = closes(bars);
        let fast = sma(&closes, self.fast_period);
        let slow = sma(&closes, self.slow_period);

        let mut signals = SignalSeries::none(bars.len());
        for i in 1..bars.len() {
            let (f_prev, s_prev, f, s) = (fast[i - 1], slow[i - 1], fast[i], slow[i]);
            if f_prev.is_nan() || s_prev.is_nan() || f.is_nan() || s.is_nan() {
                continue;
            }
            if f > s && f_prev <= s_prev {
                signals.long[i] = true;
            } else if f < s && f_prev >= s_prev {
                signals.short[i] = true;
            }
        }
        signals
    }
}
