// Typed records for the reconciliation pipeline.
//
// Raw tables are converted into these shapes at the loader boundary; every
// stage after that works on named, nullable fields instead of ad hoc column
// lookups.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::table::{CellValue, RawTable};

// ---------------------------------------------------------------------------
// Team codes
// ---------------------------------------------------------------------------

/// A team code as it appears in the source (e.g. "LAL", "TOT", "2TM").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TeamCode(String);

impl TeamCode {
    pub fn new(code: &str) -> Self {
        TeamCode(code.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for multi-team season aggregates: "TOT" or "<digits>TM".
    pub fn is_aggregate(&self) -> bool {
        let code = self.0.to_ascii_uppercase();
        if code == "TOT" {
            return true;
        }
        match code.strip_suffix("TM") {
            Some(prefix) => !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }
}

impl fmt::Display for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A missing team code is never an aggregate.
pub fn is_aggregate_team(team: Option<&TeamCode>) -> bool {
    team.is_some_and(TeamCode::is_aggregate)
}

// ---------------------------------------------------------------------------
// Statistics rows
// ---------------------------------------------------------------------------

/// Column holding minutes per game in per-game and advanced tables.
pub const MINUTES_STAT: &str = "MP";

/// One (player, team-stint) row of a statistics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStatRecord {
    /// Player name as it appeared in the source, trimmed.
    pub player: String,
    pub team: Option<TeamCode>,
    pub games_played: Option<u32>,
    /// Every other column, keyed by header. Unparseable cells are `None`.
    pub stats: BTreeMap<String, Option<f64>>,
}

impl PlayerStatRecord {
    pub fn new(player: &str, team: Option<&str>) -> Self {
        Self {
            player: player.trim().to_string(),
            team: team.map(TeamCode::new),
            games_played: None,
            stats: BTreeMap::new(),
        }
    }

    pub fn with_games(mut self, games: u32) -> Self {
        self.games_played = Some(games);
        self
    }

    pub fn with_stat(mut self, name: &str, value: f64) -> Self {
        self.stats.insert(name.to_string(), Some(value));
        self
    }

    /// Numeric value of a statistic, if the column exists and parsed.
    pub fn stat(&self, name: &str) -> Option<f64> {
        self.stats.get(name).copied().flatten()
    }

    pub fn minutes_per_game(&self) -> Option<f64> {
        self.stat(MINUTES_STAT)
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("statistics table has no `{column}` column")]
    MissingColumn { column: String },
}

/// Which columns of a statistics table carry identity fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatColumns {
    pub player: String,
    pub team: Option<String>,
    pub games: Option<String>,
}

impl StatColumns {
    /// Detect the usual box-score layout: `Player`, `Tm` or `Team`, `G`.
    pub fn detect(table: &RawTable) -> Self {
        let team = ["Tm", "Team"]
            .iter()
            .find(|c| table.has_column(c))
            .map(|c| c.to_string());
        let games = table.has_column("G").then(|| "G".to_string());
        Self {
            player: "Player".into(),
            team,
            games,
        }
    }
}

/// Convert a raw statistics table into typed rows.
///
/// Rows without a player name are dropped; mixed tables carry team-level
/// rows with a blank player. Declared team/games columns that are absent
/// from the table are treated as not present.
pub fn stat_records_from_table(
    table: &RawTable,
    columns: &StatColumns,
) -> Result<Vec<PlayerStatRecord>, SchemaError> {
    let player_idx = table
        .column_index(&columns.player)
        .ok_or_else(|| SchemaError::MissingColumn {
            column: columns.player.clone(),
        })?;
    let team_idx = columns.team.as_deref().and_then(|c| table.column_index(c));
    let games_idx = columns.games.as_deref().and_then(|c| table.column_index(c));

    let stat_cols: Vec<(usize, &String)> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != player_idx && Some(*i) != team_idx && Some(*i) != games_idx)
        .collect();

    let mut records = Vec::with_capacity(table.len());
    for row in table.rows() {
        let Some(player) = row[player_idx].as_name().filter(|n| !n.is_empty()) else {
            continue;
        };
        let team = team_idx
            .and_then(|i| row[i].as_name())
            .filter(|t| !t.is_empty())
            .map(|t| TeamCode::new(&t));
        let games_played = games_idx.and_then(|i| games_from_cell(&player, &row[i]));
        let stats = stat_cols
            .iter()
            .map(|(i, name)| ((*name).clone(), row[*i].coerce_number()))
            .collect();

        records.push(PlayerStatRecord {
            player,
            team,
            games_played,
            stats,
        });
    }
    Ok(records)
}

fn games_from_cell(player: &str, cell: &CellValue) -> Option<u32> {
    let value = cell.coerce_number()?;
    if !value.is_finite() || value < 0.0 {
        warn!("ignoring games-played value {} for '{}'", value, player);
        return None;
    }
    Some(value.round() as u32)
}

// ---------------------------------------------------------------------------
// Salary rows
// ---------------------------------------------------------------------------

/// One row of a salary source after its player and salary columns have been
/// identified. Duplicates and missing salaries are expected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryRecord {
    pub player: String,
    pub salary: Option<f64>,
    pub team: Option<TeamCode>,
    pub source: Option<String>,
    pub rank: Option<u32>,
}

impl SalaryRecord {
    pub fn new(player: &str, salary: f64) -> Self {
        Self {
            player: player.trim().to_string(),
            salary: Some(salary),
            team: None,
            source: None,
            rank: None,
        }
    }

    pub fn with_team(mut self, team: &str) -> Self {
        self.team = Some(TeamCode::new(team));
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}

/// Extract salary rows using identified player and salary columns.
///
/// Player names are stringified and trimmed; rows with a null name are
/// skipped. Salary cells that do not coerce to a number become `None`.
/// Optional `team`/`source`/`rank` metadata is picked up when present.
pub fn salary_records_from_table(
    table: &RawTable,
    player_col: &str,
    salary_col: &str,
) -> Vec<SalaryRecord> {
    let (Some(player_idx), Some(salary_idx)) =
        (table.column_index(player_col), table.column_index(salary_col))
    else {
        return Vec::new();
    };
    let team_idx = ["team", "Tm", "Team"]
        .iter()
        .find_map(|c| table.column_index(c));
    let source_idx = table.column_index("source");
    let rank_idx = table.column_index("rank");

    table
        .rows()
        .filter_map(|row| {
            let player = row[player_idx].as_name()?;
            Some(SalaryRecord {
                player,
                salary: row[salary_idx].coerce_number(),
                team: team_idx
                    .and_then(|i| row[i].as_name())
                    .filter(|t| !t.is_empty())
                    .map(|t| TeamCode::new(&t)),
                source: source_idx.and_then(|i| row[i].as_name()),
                rank: rank_idx
                    .and_then(|i| row[i].coerce_number())
                    .filter(|r| r.is_finite() && *r >= 0.0)
                    .map(|r| r as u32),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Joined rows
// ---------------------------------------------------------------------------

/// Which matching strategy paired a statistics row with a salary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchStrategyKind {
    Exact,
    Fuzzy,
    Partial,
}

impl MatchStrategyKind {
    pub fn label(&self) -> &'static str {
        match self {
            MatchStrategyKind::Exact => "exact",
            MatchStrategyKind::Fuzzy => "fuzzy",
            MatchStrategyKind::Partial => "partial",
        }
    }
}

/// How a salary got attached to a player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchProvenance {
    pub strategy: MatchStrategyKind,
    /// The salary-side name that was matched.
    pub salary_name: String,
    /// Similarity score, only for fuzzy matches.
    pub score: Option<f64>,
}

/// A statistics row joined to a salary. After traded-player collapsing there
/// is exactly one of these per distinct player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalPlayerRecord {
    pub player: String,
    pub team: Option<TeamCode>,
    pub games_played: Option<u32>,
    pub stats: BTreeMap<String, Option<f64>>,
    pub salary: f64,
    pub provenance: MatchProvenance,
}

impl CanonicalPlayerRecord {
    pub fn from_parts(stats: &PlayerStatRecord, salary: f64, provenance: MatchProvenance) -> Self {
        Self {
            player: stats.player.clone(),
            team: stats.team.clone(),
            games_played: stats.games_played,
            stats: stats.stats.clone(),
            salary,
            provenance,
        }
    }

    pub fn stat(&self, name: &str) -> Option<f64> {
        self.stats.get(name).copied().flatten()
    }

    pub fn minutes_per_game(&self) -> Option<f64> {
        self.stat(MINUTES_STAT)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
