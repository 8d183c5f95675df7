//! Artifact export: trade ledger and equity curve as CSV, report as JSON.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::report::BacktestReport;

/// Paths of the files one export produced.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub trades: PathBuf,
    pub equity: PathBuf,
    pub report: PathBuf,
}

/// Write `trades.csv`, `equity.csv`, and `report.json` into `output_dir`,
/// creating the directory if needed.
pub fn export_report(output_dir: impl AsRef<Path>, report: &BacktestReport) -> Result<ArtifactPaths> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let trades_path = dir.join("trades.csv");
    let mut trades = csv::Writer::from_path(&trades_path)
        .with_context(|| format!("opening {}", trades_path.display()))?;
    for trade in &report.trades {
        trades.serialize(trade)?;
    }
    trades.flush()?;

    let equity_path = dir.join("equity.csv");
    let mut equity = csv::Writer::from_path(&equity_path)
        .with_context(|| format!("opening {}", equity_path.display()))?;
    for snapshot in &report.equity_curve {
        equity.serialize(snapshot)?;
    }
    equity.flush()?;

    let report_path = dir.join("report.json");
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&report_path, json)
        .with_context(|| format!("writing {}", report_path.display()))?;

    Ok(ArtifactPaths {
        trades: trades_path,
        equity: equity_path,
        report: report_path,
    })
}
