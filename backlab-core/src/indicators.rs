//! Indicator helpers — pure series functions used by the strategies.
//!
//! Every function returns a series of the same length as its input with
//! `f64::NAN` filling the warmup prefix. No value at index t depends on
//! data past index t.

use crate::domain::Bar;

/// Simple moving average over a rolling window.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "SMA period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n < period {
        return result;
    }

    let mut sum: f64 = values.iter().take(period).sum();
    result[period - 1] = sum / period as f64;
    for i in period..n {
        sum += values[i] - values[i - period];
        result[i] = sum / period as f64;
    }
    result
}

/// Exponential moving average, seeded with the SMA of the first window.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "EMA period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n < period {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed: f64 = values.iter().take(period).sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }
    result
}

/// Rolling population standard deviation.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "rolling_std period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
        result[i] = var.sqrt();
    }
    result
}

/// True Range series.
///
/// TR[0] = high[0] - low[0]; afterwards the usual max of range and gaps
/// against the previous close.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];
    if n == 0 {
        return tr;
    }
    tr[0] = bars[0].high - bars[0].low;
    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }
    tr
}

/// Average True Range: EMA of the true range series.
pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    ema(&true_range(bars), period)
}

/// Accumulation/Distribution line: cumulative money-flow volume.
///
/// Bars with a zero high-low range contribute nothing to the line.
pub fn accumulation_distribution(bars: &[Bar]) -> Vec<f64> {
    let mut ad = Vec::with_capacity(bars.len());
    let mut cumulative = 0.0;
    for bar in bars {
        let range = bar.high - bar.low;
        if range > 0.0 {
            let multiplier = ((bar.close - bar.low) - (bar.high - bar.close)) / range;
            cumulative += multiplier * bar.volume as f64;
        }
        ad.push(cumulative);
    }
    ad
}

/// Chaikin oscillator: fast EMA minus slow EMA of the A/D line.
pub fn chaikin_oscillator(bars: &[Bar], fast: usize, slow: usize) -> Vec<f64> {
    let ad = accumulation_distribution(bars);
    let fast_ema = ema(&ad, fast);
    let slow_ema = ema(&ad, slow);
    fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect()
}

/// Close prices extracted from bars.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
