//! QuantLab CLI — run a backtest from a TOML config and CSV bars.
//!
//! Commands:
//! - `run` — load per-symbol CSV bars, run the configured strategy through
//!   the simulator, print the report summary, optionally export artifacts
//!
//! Bar files are one CSV per symbol (`<symbol>.csv`) with columns
//! `date,open,high,low,close,volume`; the optional benchmark file has
//! `date,close`. Data acquisition itself lives outside this tool.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Deserialize;

use quantlab_core::domain::Bar;
use quantlab_runner::{
    export_report, run_backtest, BacktestConfig, BacktestReport, BenchmarkComparison,
};

#[derive(Parser)]
#[command(name = "quantlab", about = "QuantLab CLI — strategy backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file over a directory of CSV bars.
    Run {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory of per-symbol CSV bar files.
        #[arg(long)]
        data: PathBuf,

        /// Optional benchmark CSV (date,close).
        #[arg(long)]
        benchmark: Option<PathBuf>,

        /// Export trades.csv, equity.csv, and report.json here.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            data,
            benchmark,
            out,
        } => run_command(config, data, benchmark, out),
    }
}

fn run_command(
    config_path: Option<PathBuf>,
    data_dir: PathBuf,
    benchmark_path: Option<PathBuf>,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let config = match &config_path {
        Some(path) => BacktestConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BacktestConfig::default(),
    };

    let bars = load_bars(&data_dir)?;
    if bars.is_empty() {
        bail!("no CSV bar files found in {}", data_dir.display());
    }
    let benchmark = benchmark_path
        .as_deref()
        .map(load_benchmark)
        .transpose()?;

    println!(
        "run {} — strategy '{}', {} symbol(s)",
        config.run_id(),
        config.strategy.name(),
        bars.len()
    );

    let report = run_backtest(&config, &bars, benchmark.as_ref())?;
    print_report(&report);

    if let Some(dir) = out_dir {
        let paths = export_report(&dir, &report)?;
        println!("\nartifacts written to {}", dir.display());
        println!("  {}", paths.trades.display());
        println!("  {}", paths.equity.display());
        println!("  {}", paths.report.display());
    }
    Ok(())
}

/// Load every `<symbol>.csv` in the directory, sorted by date.
fn load_bars(dir: &Path) -> Result<BTreeMap<String, Vec<Bar>>> {
    #[derive(Debug, Deserialize)]
    struct BarRow {
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    }

    let mut all = BTreeMap::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("reading data directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }
        let Some(symbol) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        let mut bars = Vec::new();
        for row in reader.deserialize() {
            let row: BarRow = row.with_context(|| format!("parsing {}", path.display()))?;
            bars.push(Bar {
                symbol: symbol.to_string(),
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }
        bars.sort_by_key(|bar| bar.date);
        all.insert(symbol.to_string(), bars);
    }
    Ok(all)
}

/// Load a benchmark close series (`date,close`).
fn load_benchmark(path: &Path) -> Result<BTreeMap<NaiveDate, f64>> {
    #[derive(Debug, Deserialize)]
    struct CloseRow {
        date: NaiveDate,
        close: f64,
    }

    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    let mut series = BTreeMap::new();
    for row in reader.deserialize() {
        let row: CloseRow = row.with_context(|| format!("parsing {}", path.display()))?;
        series.insert(row.date, row.close);
    }
    Ok(series)
}

fn print_report(report: &BacktestReport) {
    let summary = &report.summary;
    println!("\nsummary");
    println!("  initial capital    {:>16.2}", summary.initial_capital);
    println!("  final value        {:>16.2}", summary.final_value);
    println!("  total return       {:>15.2}%", summary.total_return_pct);
    println!("  annual return      {:>15.2}%", summary.annual_return_pct);
    println!("  max drawdown       {:>15.2}%", summary.max_drawdown_pct);
    println!("  sharpe ratio       {:>16.2}", summary.sharpe_ratio);
    println!("  trading days       {:>16}", summary.trading_days);

    let trades = &report.trade_stats;
    println!("\ntrades");
    println!("  total              {:>16}", trades.total_trades);
    println!(
        "  buys / sells       {:>9} / {:>4}",
        trades.buy_trades, trades.sell_trades
    );
    println!("  round trips        {:>16}", trades.completed_round_trips);
    println!("  win rate           {:>15.1}%", trades.win_rate_pct);
    println!("  total costs        {:>16.2}", trades.total_costs);
    println!("  total profit       {:>16.2}", trades.total_profit);

    if let Some(risk) = &report.risk_metrics {
        println!("\nrisk");
        println!("  volatility         {:>15.2}%", risk.volatility_pct);
        println!("  VaR 95             {:>15.2}%", risk.var_95_pct);
        println!("  CVaR 95            {:>15.2}%", risk.cvar_95_pct);
        println!("  worst loss streak  {:>16}", risk.max_consecutive_losses);
    }

    match &report.benchmark {
        BenchmarkComparison::Available {
            benchmark_return_pct,
            portfolio_return_pct,
            excess_return_pct,
            beta,
            tracking_days,
        } => {
            println!("\nbenchmark ({tracking_days} shared days)");
            println!("  benchmark return   {:>15.2}%", benchmark_return_pct);
            println!("  portfolio return   {:>15.2}%", portfolio_return_pct);
            println!("  excess return      {:>15.2}%", excess_return_pct);
            println!("  beta               {:>16.3}", beta);
        }
        BenchmarkComparison::Unavailable { reason } => {
            println!("\nbenchmark comparison unavailable: {reason}");
        }
    }

    if !report.holdings.is_empty() {
        println!("\nopen holdings");
        for (symbol, quantity) in &report.holdings {
            println!("  {symbol:<12} {quantity:>12.0}");
        }
    }
}
