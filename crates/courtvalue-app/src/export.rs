// File exports: ranking CSV and full JSON report.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use courtvalue_core::efficiency::{EfficiencyRecord, PER_MILLION};

use crate::pipeline::AnalysisReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to serialize report {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn create(path: &Path) -> Result<File, ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    File::create(path).map_err(io_err)
}

/// Write the ranking as CSV: Rank, Player, Team, Minutes, the metric name,
/// Salary (M), Efficiency. Missing team or minutes are written empty.
pub fn export_ranking_csv(path: &Path, ranking: &[EfficiencyRecord]) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let metric = ranking.first().map_or("Metric", |r| r.metric.as_str());

    let mut writer = csv::Writer::from_writer(create(path)?);
    writer
        .write_record(["Rank", "Player", "Team", "Minutes", metric, "Salary (M)", "Efficiency"])
        .map_err(csv_err)?;
    for (i, entry) in ranking.iter().enumerate() {
        let record = &entry.record;
        writer
            .write_record([
                (i + 1).to_string(),
                record.player.clone(),
                record.team.as_ref().map(|t| t.to_string()).unwrap_or_default(),
                record
                    .minutes_per_game()
                    .map(|m| format!("{:.1}", m))
                    .unwrap_or_default(),
                format!("{:.3}", entry.metric_value),
                format!("{:.2}", record.salary / PER_MILLION),
                format!("{:.8}", entry.efficiency),
            ])
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote {} ranking rows to {}", ranking.len(), path.display());
    Ok(())
}

/// Write the whole report as pretty JSON.
pub fn export_report_json(path: &Path, report: &AnalysisReport) -> Result<(), ExportError> {
    let writer = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(writer, report).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote analysis report to {}", path.display());
    Ok(())
}
