// Player/salary column identification for salary sources of unknown schema.
//
// Salary listings come from different sites with different headers. The
// heuristic resolver tries a fixed list of known header names first, then
// falls back to inspecting cell contents. Callers that know the schema can
// use `DeclaredColumns` and skip the guessing entirely.

use serde::Serialize;
use tracing::{debug, warn};

use crate::table::{CellValue, RawTable};

/// Known player-name headers, in priority order.
pub const PLAYER_COLUMN_CANDIDATES: &[&str] =
    &["player_name", "Player", "name", "player", "NAME", "full_name"];

/// Known salary headers, in priority order.
pub const SALARY_COLUMN_CANDIDATES: &[&str] =
    &["current_salary", "salary", "total_salary", "2024-25", "2025", "amount"];

// ---------------------------------------------------------------------------
// Heuristics
// ---------------------------------------------------------------------------

/// Find the column holding player names.
///
/// A known header is accepted only if its first non-null value is not
/// numeric. Without a usable known header, the first column (in table order)
/// whose first non-null value is not numeric wins. Columns with no values at
/// all are never chosen.
pub fn identify_player_column(table: &RawTable) -> Option<String> {
    for &candidate in PLAYER_COLUMN_CANDIDATES {
        let Some(idx) = table.column_index(candidate) else {
            continue;
        };
        if first_value_is_text(table, idx) {
            return Some(candidate.to_string());
        }
        debug!("player column candidate '{}' looks numeric, skipping", candidate);
    }

    table
        .columns()
        .iter()
        .enumerate()
        .find(|(idx, _)| first_value_is_text(table, *idx))
        .map(|(_, name)| name.clone())
}

/// Find the column holding salary figures.
///
/// A known header wins outright. Otherwise the numeric column with the
/// largest positive mean is chosen, since salaries dwarf ranks and years.
pub fn identify_salary_column(table: &RawTable) -> Option<String> {
    if let Some(&candidate) = SALARY_COLUMN_CANDIDATES
        .iter()
        .find(|c| table.has_column(c))
    {
        return Some(candidate.to_string());
    }

    let mut best: Option<(&String, f64)> = None;
    for (idx, name) in table.columns().iter().enumerate() {
        let Some(mean) = numeric_column_mean(table, idx) else {
            continue;
        };
        let best_mean = best.map_or(0.0, |(_, m)| m);
        if mean > best_mean {
            best = Some((name, mean));
        }
    }
    best.map(|(name, _)| name.clone())
}

fn first_value_is_text(table: &RawTable, idx: usize) -> bool {
    table
        .column(idx)
        .find(|c| !c.is_null())
        .is_some_and(|c| !c.looks_numeric())
}

/// Mean of a column whose non-null cells are all numbers; `None` for text,
/// mixed or all-null columns.
fn numeric_column_mean(table: &RawTable, idx: usize) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for cell in table.column(idx) {
        match cell {
            CellValue::Number(v) => {
                if v.is_nan() {
                    continue;
                }
                sum += v;
                count += 1;
            }
            CellValue::Null => {}
            CellValue::Text(_) => return None,
        }
    }
    (count > 0).then(|| sum / count as f64)
}

// ---------------------------------------------------------------------------
// Resolver seam
// ---------------------------------------------------------------------------

/// The player and salary columns of a salary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalaryColumns {
    pub player: String,
    pub salary: String,
}

/// Strategy for locating the player and salary columns of a salary table.
/// `None` means "not identified"; the caller decides the fallback.
pub trait ColumnResolver {
    fn resolve(&self, table: &RawTable) -> Option<SalaryColumns>;
}

/// Header-list and content heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicColumns;

impl ColumnResolver for HeuristicColumns {
    fn resolve(&self, table: &RawTable) -> Option<SalaryColumns> {
        let player = identify_player_column(table);
        let salary = identify_salary_column(table);
        match (player, salary) {
            (Some(player), Some(salary)) => Some(SalaryColumns { player, salary }),
            (player, salary) => {
                warn!(
                    "could not identify salary table columns (player={:?}, salary={:?})",
                    player, salary
                );
                None
            }
        }
    }
}

/// Columns declared up front by a schema-aware source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredColumns {
    pub player: String,
    pub salary: String,
}

impl ColumnResolver for DeclaredColumns {
    fn resolve(&self, table: &RawTable) -> Option<SalaryColumns> {
        for column in [&self.player, &self.salary] {
            if !table.has_column(column) {
                warn!("declared salary table column '{}' is missing", column);
                return None;
            }
        }
        Some(SalaryColumns {
            player: self.player.clone(),
            salary: self.salary.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
