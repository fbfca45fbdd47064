// Dataset loading at the boundary: JSON/CSV files into raw tables.
//
// Every dataset slot is always filled: a missing or unreadable file becomes
// an empty table with a warning. Only when nothing at all loads does the
// loader substitute the seeded sample dataset.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use courtvalue_core::table::{CellValue, RawTable};

use crate::config::DataConfig;
use crate::synthetic;

/// Columns kept as text even when their values look numeric.
pub const TEXT_COLUMNS: &[&str] = &["Team", "Tm", "player_name", "team", "source", "Player", "name"];

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("unsupported JSON layout in {path}: expected records, found {found}")]
    Shape { path: PathBuf, found: &'static str },
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    PerGame,
    Advanced,
    PlayerSalaries,
    TeamSalaries,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::PerGame,
        DatasetKind::Advanced,
        DatasetKind::PlayerSalaries,
        DatasetKind::TeamSalaries,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DatasetKind::PerGame => "per_game",
            DatasetKind::Advanced => "advanced",
            DatasetKind::PlayerSalaries => "player_salaries",
            DatasetKind::TeamSalaries => "team_salaries",
        }
    }

    pub fn default_file(&self) -> &'static str {
        match self {
            DatasetKind::PerGame => "nba_2025_per_game_stats.json",
            DatasetKind::Advanced => "nba_2025_advanced_stats.json",
            DatasetKind::PlayerSalaries => "nba_player_salaries_2025.json",
            DatasetKind::TeamSalaries => "nba_team_salaries_2025.json",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, DatasetKind::PerGame | DatasetKind::Advanced)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Files,
    Sample,
}

/// All input tables. Absent sources are empty tables, never missing.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub per_game: RawTable,
    pub advanced: RawTable,
    pub player_salaries: RawTable,
    pub team_salaries: RawTable,
    pub origin: DataOrigin,
}

impl Datasets {
    pub fn empty(origin: DataOrigin) -> Self {
        Self {
            per_game: RawTable::empty(),
            advanced: RawTable::empty(),
            player_salaries: RawTable::empty(),
            team_salaries: RawTable::empty(),
            origin,
        }
    }

    pub fn get(&self, kind: DatasetKind) -> &RawTable {
        match kind {
            DatasetKind::PerGame => &self.per_game,
            DatasetKind::Advanced => &self.advanced,
            DatasetKind::PlayerSalaries => &self.player_salaries,
            DatasetKind::TeamSalaries => &self.team_salaries,
        }
    }

    fn slot(&mut self, kind: DatasetKind) -> &mut RawTable {
        match kind {
            DatasetKind::PerGame => &mut self.per_game,
            DatasetKind::Advanced => &mut self.advanced,
            DatasetKind::PlayerSalaries => &mut self.player_salaries,
            DatasetKind::TeamSalaries => &mut self.team_salaries,
        }
    }
}

/// Path for one dataset: the configured override, else the default file
/// name inside the data directory.
pub fn dataset_path(config: &DataConfig, kind: DatasetKind) -> PathBuf {
    let override_path = match kind {
        DatasetKind::PerGame => &config.per_game,
        DatasetKind::Advanced => &config.advanced,
        DatasetKind::PlayerSalaries => &config.player_salaries,
        DatasetKind::TeamSalaries => &config.team_salaries,
    };
    match override_path {
        Some(p) => PathBuf::from(p),
        None => Path::new(&config.dir).join(kind.default_file()),
    }
}

/// Load every dataset. Files that are missing or fail to parse leave an
/// empty table. If no file loads, the seeded sample dataset is returned.
pub fn load_datasets(config: &DataConfig, sample_seed: u64) -> Datasets {
    let mut datasets = Datasets::empty(DataOrigin::Files);
    let mut loaded = 0usize;

    for kind in DatasetKind::ALL {
        let path = dataset_path(config, kind);
        if !path.exists() {
            warn!("{} not found at {}", kind.key(), path.display());
            continue;
        }
        match read_table(&path) {
            Ok(table) => {
                info!(
                    "loaded {}: {} records, {} columns",
                    kind.key(),
                    table.len(),
                    table.columns().len()
                );
                *datasets.slot(kind) = table;
                loaded += 1;
            }
            Err(e) => warn!("skipping {}: {}", kind.key(), e),
        }
    }

    if loaded == 0 {
        warn!(
            "no datasets loaded from {}; using sample data (seed {})",
            config.dir, sample_seed
        );
        return synthetic::sample_datasets(sample_seed);
    }
    datasets
}

// ---------------------------------------------------------------------------
// File readers
// ---------------------------------------------------------------------------

/// Read one table; `.csv` files as CSV, everything else as JSON.
pub fn read_table(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        table_from_csv(file).map_err(|e| LoadError::Csv {
            path: path.to_path_buf(),
            source: e,
        })
    } else {
        let value: Value = serde_json::from_reader(BufReader::new(file)).map_err(|e| LoadError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        table_from_json(value).map_err(|found| LoadError::Shape {
            path: path.to_path_buf(),
            found,
        })
    }
}

/// Accepts a list of records, an object with a `data` list, or one record.
/// On failure returns a description of what was found instead.
pub fn table_from_json(value: Value) -> Result<RawTable, &'static str> {
    let records = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                map.insert("data".into(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        other => return Err(json_kind(&other)),
    };

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let Value::Object(fields) = record else {
            return Err("a list containing non-object items");
        };
        rows.push(
            fields
                .into_iter()
                .map(|(column, value)| {
                    let cell = cell_from_json(&column, value);
                    (column, cell)
                })
                .collect::<Vec<_>>(),
        );
    }
    Ok(RawTable::from_records(rows))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn cell_from_json(column: &str, value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Number(n) => n.as_f64().map_or(CellValue::Null, CellValue::Number),
        Value::String(s) => cell_from_text(column, &s),
        Value::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

fn cell_from_text(column: &str, text: &str) -> CellValue {
    if TEXT_COLUMNS.contains(&column) {
        if text.trim().is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(text.to_string())
        }
    } else {
        CellValue::parse(text)
    }
}

fn table_from_csv<R: Read>(rdr: R) -> Result<RawTable, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut table = RawTable::new(headers.clone());
    for (line, result) in reader.records().enumerate() {
        match result {
            Ok(record) => table.push_row(
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(column, text)| cell_from_text(column, text))
                    .collect(),
            ),
            Err(e) => warn!("skipping malformed CSV row {}: {}", line + 1, e),
        }
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Validation report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStatus {
    pub kind: DatasetKind,
    pub required: bool,
    pub records: usize,
    pub columns: usize,
    pub null_values: usize,
}

impl DatasetStatus {
    pub fn available(&self) -> bool {
        self.records > 0 && self.columns > 0
    }

    pub fn label(&self) -> &'static str {
        match (self.available(), self.required) {
            (true, true) => "OK",
            (true, false) => "Available",
            (false, true) => "Missing or Empty",
            (false, false) => "Not Available",
        }
    }
}

/// Status of every dataset, required ones first.
pub fn validate_datasets(datasets: &Datasets) -> Vec<DatasetStatus> {
    DatasetKind::ALL
        .iter()
        .map(|&kind| {
            let table = datasets.get(kind);
            DatasetStatus {
                kind,
                required: kind.is_required(),
                records: table.len(),
                columns: table.columns().len(),
                null_values: table.null_count(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
