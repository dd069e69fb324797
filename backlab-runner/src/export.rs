//! Artifact export — JSON result, equity CSV, trade CSV.
//!
//! All persisted results carry a `schema_version` field. Loading rejects
//! versions newer than this build understands.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};

use backlab_core::domain::{EquityPoint, TradeRecord};

use crate::runner::{BacktestResult, SCHEMA_VERSION};

// ─── JSON ───────────────────────────────────────────────────────────

/// Writes a full result as pretty JSON.
pub fn write_result_json(path: &Path, result: &BacktestResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)
        .context("failed to serialize BacktestResult to JSON")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write result JSON {}", path.display()))
}

/// Reads a result back, rejecting unknown schema versions.
pub fn read_result_json(path: &Path) -> Result<BacktestResult> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read result JSON {}", path.display()))?;
    let result: BacktestResult =
        serde_json::from_str(&text).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Writes the equity curve as `date,balance` CSV.
pub fn write_equity_csv(path: &Path, curve: &[EquityPoint]) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create equity CSV {}", path.display()))?;
    writeln!(file, "date,balance")?;
    for point in curve {
        writeln!(file, "{},{:.4}", point.date, point.balance)?;
    }
    Ok(())
}

/// Writes the trade history as CSV.
///
/// Columns: kind, side, date, price, quantity, balance_after.
pub fn write_trades_csv(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create trades CSV {}", path.display()))?;

    wtr.write_record(["kind", "side", "date", "price", "quantity", "balance_after"])?;
    for trade in trades {
        wtr.write_record([
            &format!("{:?}", trade.kind),
            &format!("{:?}", trade.side),
            &trade.date.to_string(),
            &format!("{:.6}", trade.price),
            &format!("{:.6}", trade.quantity),
            &format!("{:.4}", trade.balance_after),
        ])?;
    }
    wtr.flush().context("failed to flush trades CSV")?;
    Ok(())
}
