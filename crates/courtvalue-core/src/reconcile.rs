// Traded-player reconciliation: collapse several rows for one player into
// a single row attributed to the player's current team.
//
// Statistics tables pick the non-aggregate stint with the most games played.
// Salary collections pick the non-aggregate row with the highest salary.
// The two rules differ on purpose and are kept separate.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::records::{CanonicalPlayerRecord, PlayerStatRecord, SalaryRecord, TeamCode};

/// Minutes per game at or above which a player counts as active.
pub const ACTIVE_MIN_MINUTES: f64 = 10.0;
/// Games played at or above which a player counts as active.
pub const ACTIVE_MIN_GAMES: u32 = 10;

// ---------------------------------------------------------------------------
// Row capabilities
// ---------------------------------------------------------------------------

/// A row attributed to one player on one team (or an aggregate code).
pub trait TeamStint {
    fn player_name(&self) -> &str;
    fn team_code(&self) -> Option<&TeamCode>;

    fn is_aggregate_row(&self) -> bool {
        self.team_code().is_some_and(TeamCode::is_aggregate)
    }
}

pub trait GamesPlayed: TeamStint {
    fn games(&self) -> Option<u32>;
}

pub trait SalaryAmount: TeamStint {
    fn salary_value(&self) -> Option<f64>;
}

impl TeamStint for PlayerStatRecord {
    fn player_name(&self) -> &str {
        &self.player
    }
    fn team_code(&self) -> Option<&TeamCode> {
        self.team.as_ref()
    }
}

impl GamesPlayed for PlayerStatRecord {
    fn games(&self) -> Option<u32> {
        self.games_played
    }
}

impl TeamStint for CanonicalPlayerRecord {
    fn player_name(&self) -> &str {
        &self.player
    }
    fn team_code(&self) -> Option<&TeamCode> {
        self.team.as_ref()
    }
}

impl GamesPlayed for CanonicalPlayerRecord {
    fn games(&self) -> Option<u32> {
        self.games_played
    }
}

impl SalaryAmount for CanonicalPlayerRecord {
    fn salary_value(&self) -> Option<f64> {
        Some(self.salary)
    }
}

impl TeamStint for SalaryRecord {
    fn player_name(&self) -> &str {
        &self.player
    }
    fn team_code(&self) -> Option<&TeamCode> {
        self.team.as_ref()
    }
}

impl SalaryAmount for SalaryRecord {
    fn salary_value(&self) -> Option<f64> {
        self.salary
    }
}

// ---------------------------------------------------------------------------
// Collapse report
// ---------------------------------------------------------------------------

/// A player that had more than one row before collapsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradedPlayer {
    pub player: String,
    pub stints: usize,
    pub selected_team: Option<TeamCode>,
}

/// Collapsed rows plus what collapsing did.
#[derive(Debug, Clone)]
pub struct CollapseReport<T> {
    /// One row per distinct player, in order of first appearance.
    pub records: Vec<T>,
    pub original_count: usize,
    pub traded: Vec<TradedPlayer>,
}

impl<T> CollapseReport<T> {
    pub fn final_count(&self) -> usize {
        self.records.len()
    }

    pub fn removed(&self) -> usize {
        self.original_count - self.records.len()
    }
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// Collapse statistics rows: among non-aggregate stints keep the one with
/// the most games (earliest on ties). If no stint reports games, keep the
/// last stint in source order. A player with only aggregate rows keeps the
/// first of them.
pub fn collapse_stat_rows<T: GamesPlayed + Clone>(rows: &[T]) -> CollapseReport<T> {
    collapse_with(rows, |group| {
        let stints: Vec<usize> = non_aggregate(group);
        if stints.is_empty() {
            return 0;
        }
        let mut best: Option<(usize, u32)> = None;
        for &i in &stints {
            if let Some(games) = group[i].games() {
                if best.map_or(true, |(_, g)| games > g) {
                    best = Some((i, games));
                }
            }
        }
        match best {
            Some((i, _)) => i,
            None => stints[stints.len() - 1],
        }
    })
}

/// Collapse salary rows: among non-aggregate rows keep the highest salary
/// (earliest on ties; rows without a salary rank below any salary). A player
/// with only aggregate rows keeps the first of them.
pub fn collapse_salary_rows<T: SalaryAmount + Clone>(rows: &[T]) -> CollapseReport<T> {
    collapse_with(rows, |group| {
        let stints = non_aggregate(group);
        let Some(&first) = stints.first() else {
            return 0;
        };
        let mut best: Option<(usize, f64)> = None;
        for &i in &stints {
            if let Some(salary) = group[i].salary_value().filter(|s| !s.is_nan()) {
                if best.map_or(true, |(_, s)| salary > s) {
                    best = Some((i, salary));
                }
            }
        }
        best.map_or(first, |(i, _)| i)
    })
}

fn non_aggregate<T: TeamStint>(group: &[&T]) -> Vec<usize> {
    group
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.is_aggregate_row())
        .map(|(i, _)| i)
        .collect()
}

/// Group rows by player name (first-appearance order) and keep the row
/// `choose` picks from each multi-row group.
fn collapse_with<T, F>(rows: &[T], choose: F) -> CollapseReport<T>
where
    T: TeamStint + Clone,
    F: Fn(&[&T]) -> usize,
{
    let mut order: Vec<Vec<&T>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        match index.get(row.player_name()) {
            Some(&g) => order[g].push(row),
            None => {
                index.insert(row.player_name(), order.len());
                order.push(vec![row]);
            }
        }
    }

    let mut records = Vec::with_capacity(order.len());
    let mut traded = Vec::new();
    for group in &order {
        let pick = if group.len() == 1 { 0 } else { choose(group.as_slice()) };
        let kept = group[pick];
        if group.len() > 1 {
            debug!(
                "collapsed {} rows for '{}' to team {:?}",
                group.len(),
                kept.player_name(),
                kept.team_code().map(TeamCode::as_str)
            );
            traded.push(TradedPlayer {
                player: kept.player_name().to_string(),
                stints: group.len(),
                selected_team: kept.team_code().cloned(),
            });
        }
        records.push(kept.clone());
    }

    if !traded.is_empty() {
        info!(
            "collapsed {} multi-row players: {} rows -> {}",
            traded.len(),
            rows.len(),
            records.len()
        );
    }

    CollapseReport {
        records,
        original_count: rows.len(),
        traded,
    }
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

/// Eligible for team rollups: at least 10 minutes per game or at least 10
/// games played.
pub fn is_active(record: &PlayerStatRecord) -> bool {
    record.minutes_per_game().is_some_and(|mp| mp >= ACTIVE_MIN_MINUTES)
        || record.games_played.is_some_and(|g| g >= ACTIVE_MIN_GAMES)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
