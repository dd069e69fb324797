//! Bollinger-Keltner squeeze strategy with Chaikin confirmation.
//!
//! Fires when the Bollinger bands sit entirely inside the Keltner channel
//! (a volatility squeeze). Direction comes from the Chaikin oscillator and
//! a long SMA trend gate: long when money flow is positive and price is
//! above trend, short when both point down.

use crate::domain::Bar;
use crate::indicators::{atr, chaikin_oscillator, closes, ema, rolling_std, sma};

use super::{SignalSeries, Strategy};

#[derive(Debug, Clone)]
pub struct BollingerKeltnerChaikin {
    /// Shared lookback for the Bollinger bands and Keltner channel.
    channel_period: usize,
    /// Band/channel width in standard deviations / ATRs.
    channel_width: f64,
    /// Trend gate SMA period.
    trend_period: usize,
    name: String,
}

impl BollingerKeltnerChaikin {
    const CHAIKIN_FAST: usize = 3;
    const CHAIKIN_SLOW: usize = 10;

    pub fn new(channel_period: usize, channel_width: f64, trend_period: usize) -> Self {
        assert!(channel_period >= 2, "channel period must be >= 2");
        assert!(channel_width > 0.0, "channel width must be positive");
        assert!(trend_period >= 1, "trend period must be >= 1");
        Self {
            channel_period,
            channel_width,
            trend_period,
            name: format!("bollinger_keltner_chaikin_{channel_period}_{trend_period}"),
        }
    }
}

impl Default for BollingerKeltnerChaikin {
    fn default() -> Self {
        Self::new(20, 2.0, 100)
    }
}

impl Strategy for BollingerKeltnerChaikin {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_bars(&self) -> usize {
        self.channel_period.max(self.trend_period)
    }

    fn produce_signals(&self, bars: &[Bar]) -> SignalSeries {
        let closes = closes(bars);

        let mid = sma(&closes, self.channel_period);
        let std = rolling_std(&closes, self.channel_period);
        let kc_mid = ema(&closes, self.channel_period);
        let atr = atr(bars, self.channel_period);
        let trend = sma(&closes, self.trend_period);
        let chaikin = chaikin_oscillator(bars, Self::CHAIKIN_FAST, Self::CHAIKIN_SLOW);

        let mut signals = SignalSeries::none(bars.len());
        for i in 0..bars.len() {
            let values = [mid[i], std[i], kc_mid[i], atr[i], trend[i], chaikin[i]];
            if values.iter().any(|v| v.is_nan()) {
                continue;
            }

            let bb_upper = mid[i] + self.channel_width * std[i];
            let bb_lower = mid[i] - self.channel_width * std[i];
            let kc_upper = kc_mid[i] + self.channel_width * atr[i];
            let kc_lower = kc_mid[i] - self.channel_width * atr[i];

            let squeeze = bb_upper < kc_upper && bb_lower > kc_lower;
            if !squeeze {
                continue;
            }

            if chaikin[i] > 0.0 && closes[i] > trend[i] {
                signals.long[i] = true;
            } else if chaikin[i] < 0.0 && closes[i] < trend[i] {
                signals.short[i] = true;
            }
        }
        signals
    }
}
