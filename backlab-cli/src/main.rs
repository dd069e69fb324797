//! BackLab CLI — run and sweep commands.
//!
//! Commands:
//! - `run` — execute one backtest from a TOML config against a CSV file
//!   (or synthetic data), print the summary, and save artifacts
//! - `sweep` — run the same config against every CSV in a directory in
//!   parallel and print a leaderboard sorted by total return

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use backlab_runner::{
    load_bars_csv, rank_by_total_return, run_backtest, run_backtest_from_csv, run_sweep,
    synthetic_bars, write_equity_csv, write_result_json, write_trades_csv, BacktestResult,
    RunConfig, SweepDataset,
};

#[derive(Parser)]
#[command(name = "backlab", about = "BackLab CLI — signal backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Path to a CSV bar file (date,open,high,low,close,volume).
        #[arg(long)]
        data: Option<PathBuf>,

        /// Generate synthetic bars instead of reading a CSV.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Synthetic data start date (YYYY-MM-DD).
        #[arg(long, default_value = "2020-01-02")]
        start: String,

        /// Synthetic data end date (YYYY-MM-DD).
        #[arg(long, default_value = "2024-12-31")]
        end: String,

        /// Output directory for artifacts (result JSON, equity/trade CSV).
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Run the config against every CSV in a directory, in parallel.
    Sweep {
        /// Path to a TOML config file (symbol is overridden per file).
        #[arg(long)]
        config: PathBuf,

        /// Directory of CSV bar files; the file stem is used as the symbol.
        #[arg(long)]
        data_dir: PathBuf,

        /// Output directory for per-symbol result JSON.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            synthetic,
            start,
            end,
            output_dir,
        } => run_cmd(&config, data.as_deref(), synthetic, &start, &end, &output_dir),
        Commands::Sweep {
            config,
            data_dir,
            output_dir,
        } => sweep_cmd(&config, &data_dir, &output_dir),
    }
}

fn run_cmd(
    config_path: &Path,
    data: Option<&Path>,
    synthetic: bool,
    start: &str,
    end: &str,
    output_dir: &Path,
) -> Result<()> {
    if data.is_some() && synthetic {
        bail!("--data and --synthetic are mutually exclusive");
    }
    if data.is_none() && !synthetic {
        bail!("one of --data or --synthetic is required");
    }

    let config = RunConfig::from_toml_file(config_path)?;

    let result = if let Some(path) = data {
        run_backtest_from_csv(&config, path)?
    } else {
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
            .with_context(|| format!("invalid --start date '{start}'"))?;
        let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")
            .with_context(|| format!("invalid --end date '{end}'"))?;
        if end < start {
            bail!("--end must not precede --start");
        }
        let bars = synthetic_bars(&config.backtest.symbol, start, end);
        run_backtest(&config, &bars)?
    };
    print_summary(&result);
    if synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }

    let run_dir = save_artifacts(&result, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn sweep_cmd(config_path: &Path, data_dir: &Path, output_dir: &Path) -> Result<()> {
    let config = RunConfig::from_toml_file(config_path)?;

    let mut datasets = Vec::new();
    let entries = std::fs::read_dir(data_dir)
        .with_context(|| format!("failed to read data directory {}", data_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let symbol = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_uppercase)
            .unwrap_or_default();
        datasets.push(SweepDataset {
            symbol,
            bars: load_bars_csv(&path)?,
        });
    }
    if datasets.is_empty() {
        bail!("no CSV files found in {}", data_dir.display());
    }
    datasets.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    println!("Sweeping {} datasets...", datasets.len());
    let mut results = run_sweep(&config, &datasets)?;
    rank_by_total_return(&mut results);

    println!();
    println!("=== Leaderboard (by total return) ===");
    println!(
        "{:<4} {:<8} {:>12} {:>12} {:>10} {:>8}",
        "#", "Symbol", "Return", "Drawdown", "Sharpe", "Trades"
    );
    for (i, result) in results.iter().enumerate() {
        let sharpe = match result.summary.sharpe_ratio {
            Some(s) => format!("{s:.3}"),
            None => "n/a".to_string(),
        };
        println!(
            "{:<4} {:<8} {:>11.2}% {:>11.2}% {:>10} {:>8}",
            i + 1,
            result.symbol,
            result.summary.total_return * 100.0,
            result.summary.max_drawdown * 100.0,
            sharpe,
            result.trades.len(),
        );
    }

    for result in &results {
        save_artifacts(result, output_dir)?;
    }
    println!();
    println!("Artifacts saved to: {}", output_dir.display());

    Ok(())
}

/// Writes result JSON plus equity/trade CSVs under `<output_dir>/<symbol>_<run_id8>/`.
fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let short_id: String = result.run_id.chars().take(8).collect();
    let run_dir = output_dir.join(format!("{}_{}", result.symbol, short_id));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create {}", run_dir.display()))?;

    write_result_json(&run_dir.join("result.json"), result)?;
    write_equity_csv(&run_dir.join("equity.csv"), &result.equity_curve)?;
    write_trades_csv(&run_dir.join("trades.csv"), &result.trades)?;

    Ok(run_dir)
}

fn print_summary(result: &BacktestResult) {
    let period = match (result.equity_curve.first(), result.equity_curve.last()) {
        (Some(first), Some(last)) => format!("{} to {}", first.date, last.date),
        _ => "empty".to_string(),
    };

    println!();
    println!("=== Backtest Result ===");
    println!("Symbol:         {}", result.symbol);
    println!("Strategy:       {}", result.strategy_name);
    println!("Period:         {period}");
    println!("Bars:           {}", result.bar_count);
    println!("Trades:         {}", result.trades.len());
    println!("Open Positions: {}", result.open_position_count);
    println!();
    println!("--- Performance ---");
    println!("Initial:        {:.2}", result.initial_balance);
    println!("Final:          {:.2}", result.final_balance);
    println!("Total Return:   {:.2}%", result.summary.total_return * 100.0);
    println!(
        "Annualized:     {:.2}%",
        result.summary.annualized_return * 100.0
    );
    println!(
        "Volatility:     {:.2}%",
        result.summary.annualized_volatility * 100.0
    );
    println!("Max Drawdown:   {:.2}%", result.summary.max_drawdown * 100.0);
    match result.summary.sharpe_ratio {
        Some(sharpe) => println!("Sharpe:         {sharpe:.3}"),
        None => println!("Sharpe:         n/a (zero volatility)"),
    }
}
