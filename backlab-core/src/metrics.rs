//! Performance metrics — a pure function of the finished equity curve.
//!
//! `summarize` never mutates engine state and calling it twice on the same
//! curve yields identical results. Degenerate inputs surface as explicit
//! errors or `None`, never as NaN or infinity smuggled through a field.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::EquityPoint;

/// Assumed risk-free rate for the Sharpe ratio.
pub const RISK_FREE_RATE: f64 = 0.02;
/// Trading periods per year used to annualize volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Calendar days per year used to annualize the total return.
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("cannot summarize an empty equity curve")]
    EmptyCurve,
    #[error("initial balance must be > 0, got {0}")]
    InvalidInitialBalance(f64),
}

/// Scalar performance summary of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_return: f64,
    /// Annualized from the equity point count as a proxy for elapsed days.
    /// Skewed when bars are not daily; documented limitation, not a bug.
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    /// Always <= 0; equals 0 only if balance never declined.
    pub max_drawdown: f64,
    /// `None` when volatility is zero (flat curve): the ratio is undefined,
    /// and callers must check rather than divide blindly.
    pub sharpe_ratio: Option<f64>,
}

/// Summarize a finished equity curve.
pub fn summarize(
    equity_curve: &[EquityPoint],
    initial_balance: f64,
) -> Result<PerformanceSummary, MetricsError> {
    if equity_curve.is_empty() {
        return Err(MetricsError::EmptyCurve);
    }
    if !initial_balance.is_finite() || initial_balance <= 0.0 {
        return Err(MetricsError::InvalidInitialBalance(initial_balance));
    }

    let balances: Vec<f64> = equity_curve.iter().map(|p| p.balance).collect();
    let final_balance = *balances.last().expect("curve is non-empty");

    let total_return = (final_balance - initial_balance) / initial_balance;
    let annualized_return =
        (1.0 + total_return).powf(CALENDAR_DAYS_PER_YEAR / balances.len() as f64) - 1.0;

    let returns = per_bar_returns(&balances);
    let annualized_volatility = sample_std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt();

    let sharpe_ratio = if annualized_volatility > 0.0 {
        Some((annualized_return - RISK_FREE_RATE) / annualized_volatility)
    } else {
        None
    };

    Ok(PerformanceSummary {
        total_return,
        annualized_return,
        annualized_volatility,
        max_drawdown: max_drawdown(&balances),
        sharpe_ratio,
    })
}

/// Successive percentage changes, with the first value defined as zero
/// (no prior bar).
///
/// A prior balance of exactly zero (an all-in entry spent every unit of
/// cash) makes the percentage change undefined; that bar's return is
/// recorded as zero rather than failing the whole summary, since the
/// balance itself is a legitimate ledger state.
fn per_bar_returns(balances: &[f64]) -> Vec<f64> {
    let mut returns = Vec::with_capacity(balances.len());
    returns.push(0.0);
    for w in balances.windows(2) {
        if w[0] > 0.0 {
            returns.push((w[1] - w[0]) / w[0]);
        } else {
            returns.push(0.0);
        }
    }
    returns
}

/// Maximum drawdown: the most negative fractional decline from the running
/// peak. Zero iff the balance is non-decreasing throughout.
fn max_drawdown(balances: &[f64]) -> f64 {
    let mut peak = balances[0];
    let mut worst = 0.0_f64;
    for &balance in balances {
        if balance > peak {
            peak = balance;
        }
        if peak > 0.0 {
            let dd = balance / peak - 1.0;
            if dd < worst {
                worst = dd;
            }
        }
    }
    worst
}

/// Sample standard deviation (ddof = 1), matching the original pandas
/// semantics. Returns 0.0 for fewer than two values.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn curve(balances: &[f64]) -> Vec<EquityPoint> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        balances
            .iter()
            .enumerate()
            .map(|(i, &balance)| EquityPoint {
                date: base + Duration::days(i as i64),
                balance,
            })
            .collect()
    }

    #[test]
    fn empty_curve_is_an_explicit_error() {
        assert_eq!(summarize(&[], 100_000.0), Err(MetricsError::EmptyCurve));
    }

    #[test]
    fn zero_balance_bar_yields_zero_return_not_nan() {
        // All-in entry drains cash to zero mid-curve.
        let summary = summarize(&curve(&[100.0, 0.0, 50.0]), 100_000.0).unwrap();
        assert!(summary.annualized_volatility.is_finite());
        assert!(summary.max_drawdown.is_finite());
    }

    #[test]
    fn invalid_initial_balance_is_an_error() {
        let c = curve(&[100.0]);
        assert_eq!(
            summarize(&c, 0.0),
            Err(MetricsError::InvalidInitialBalance(0.0))
        );
        assert!(summarize(&c, f64::NAN).is_err());
    }

    #[test]
    fn flat_curve_has_zero_volatility_and_undefined_sharpe() {
        let c = curve(&[100_000.0; 50]);
        let summary = summarize(&c, 100_000.0).unwrap();
        assert_eq!(summary.total_return, 0.0);
        assert_eq!(summary.annualized_volatility, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
        assert_eq!(summary.sharpe_ratio, None);
    }

    #[test]
    fn total_return_uses_caller_initial_balance() {
        let c = curve(&[100_000.0, 105_000.0, 110_000.0]);
        let summary = summarize(&c, 100_000.0).unwrap();
        assert!((summary.total_return - 0.1).abs() < 1e-12);
    }

    #[test]
    fn annualized_return_over_one_year_matches_total() {
        let balances: Vec<f64> = (0..365).map(|i| 100_000.0 + i as f64 * 10.0).collect();
        let c = curve(&balances);
        let summary = summarize(&c, 100_000.0).unwrap();
        // 365 points → exponent 1, annualized == total.
        assert!((summary.annualized_return - summary.total_return).abs() < 1e-12);
    }

    #[test]
    fn max_drawdown_known_value() {
        let c = curve(&[100_000.0, 110_000.0, 90_000.0, 95_000.0]);
        let summary = summarize(&c, 100_000.0).unwrap();
        let expected = 90_000.0 / 110_000.0 - 1.0;
        assert!((summary.max_drawdown - expected).abs() < 1e-12);
    }

    #[test]
    fn drawdown_zero_for_monotonic_curve() {
        let balances: Vec<f64> = (0..100).map(|i| 100_000.0 + i as f64 * 100.0).collect();
        let summary = summarize(&curve(&balances), 100_000.0).unwrap();
        assert_eq!(summary.max_drawdown, 0.0);
    }

    #[test]
    fn volatility_of_known_returns() {
        // Balances: 100 → 110 → 99. Returns: [0, 0.1, -0.1].
        let c = curve(&[100.0, 110.0, 99.0]);
        let summary = summarize(&c, 100.0).unwrap();
        let returns = [0.0, 0.1, -0.1];
        let mean: f64 = returns.iter().sum::<f64>() / 3.0;
        let var: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 2.0;
        let expected = var.sqrt() * 252.0_f64.sqrt();
        assert!((summary.annualized_volatility - expected).abs() < 1e-12);
    }

    #[test]
    fn sharpe_defined_for_moving_curve() {
        let c = curve(&[100_000.0, 101_000.0, 100_500.0, 102_000.0]);
        let summary = summarize(&c, 100_000.0).unwrap();
        let sharpe = summary.sharpe_ratio.expect("volatility is non-zero");
        let expected = (summary.annualized_return - RISK_FREE_RATE) / summary.annualized_volatility;
        assert!((sharpe - expected).abs() < 1e-12);
        assert!(sharpe.is_finite());
    }

    #[test]
    fn summarize_is_idempotent() {
        let c = curve(&[100_000.0, 101_000.0, 99_000.0, 103_000.0]);
        let first = summarize(&c, 100_000.0).unwrap();
        let second = summarize(&c, 100_000.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn single_point_curve_has_undefined_sharpe() {
        let c = curve(&[120_000.0]);
        let summary = summarize(&c, 100_000.0).unwrap();
        assert!((summary.total_return - 0.2).abs() < 1e-12);
        assert_eq!(summary.sharpe_ratio, None);
    }
}
