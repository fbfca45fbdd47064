// Team-level rollups of per-game player statistics.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::records::{PlayerStatRecord, TeamCode};
use crate::reconcile::{collapse_stat_rows, is_active, TeamStint};

/// Games in a full regular season. Team per-game values divide by this, not
/// by the games the sampled players actually played.
pub const FULL_SEASON_GAMES: f64 = 82.0;

/// Season totals and full-season per-game rates for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRollup {
    pub team: TeamCode,
    pub active_players: usize,
    pub season_totals: BTreeMap<String, f64>,
    pub per_game: BTreeMap<String, f64>,
}

/// Roll per-game statistics up to teams.
///
/// Traded players are collapsed to their current-team stint first, then only
/// active players contribute `stat * games_played` to their team's season
/// total. Missing values contribute nothing. Rows left on an aggregate or
/// missing team code are skipped. Output is ordered by team code.
pub fn team_rollup(records: &[PlayerStatRecord], stat_names: &[&str]) -> Vec<TeamRollup> {
    let collapsed = collapse_stat_rows(records);

    let mut teams: BTreeMap<TeamCode, TeamRollup> = BTreeMap::new();
    for record in collapsed.records.iter().filter(|r| is_active(r)) {
        let Some(team) = record.team_code().filter(|t| !t.is_aggregate()) else {
            debug!("rollup skips '{}': no single-team row", record.player);
            continue;
        };
        let entry = teams.entry(team.clone()).or_insert_with(|| TeamRollup {
            team: team.clone(),
            active_players: 0,
            season_totals: stat_names.iter().map(|s| (s.to_string(), 0.0)).collect(),
            per_game: BTreeMap::new(),
        });
        entry.active_players += 1;

        let Some(games) = record.games_played else {
            continue;
        };
        for &stat in stat_names {
            if let Some(value) = record.stat(stat).filter(|v| v.is_finite()) {
                if let Some(total) = entry.season_totals.get_mut(stat) {
                    *total += value * f64::from(games);
                }
            }
        }
    }

    teams
        .into_values()
        .map(|mut rollup| {
            rollup.per_game = rollup
                .season_totals
                .iter()
                .map(|(stat, total)| (stat.clone(), total / FULL_SEASON_GAMES))
                .collect();
            rollup
        })
        .collect()
}
