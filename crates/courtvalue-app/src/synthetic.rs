// Seeded synthetic data: fallback salaries and the sample dataset.
//
// The random source is injected so tests can substitute fixed sequences;
// production runs use ChaCha8 seeded from config (42 by default), so the same
// statistics always produce the same salaries.

use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use courtvalue_core::records::PlayerStatRecord;
use courtvalue_core::table::{CellValue, RawTable};

use crate::loader::{DataOrigin, Datasets};

const BASE_SALARY: f64 = 2_000_000.0;
const PER_BONUS: f64 = 500_000.0;
const MINUTES_BONUS: f64 = 200_000.0;
const DEFAULT_PER: f64 = 15.0;
const DEFAULT_MINUTES: f64 = 20.0;
const MIN_SALARY: f64 = 1_000_000.0;
const MAX_SALARY: f64 = 60_000_000.0;

const SUPERSTAR_NAMES: &[&str] = &["LeBron", "Stephen", "Giannis", "Luka"];
const ALL_STAR_NAMES: &[&str] = &["Kevin", "Joel", "Nikola", "Jayson"];

/// Column names of generated salary tables.
pub const PLAYER_COLUMN: &str = "Player";
pub const SALARY_COLUMN: &str = "current_salary";

// ---------------------------------------------------------------------------
// Salary generator
// ---------------------------------------------------------------------------

pub struct SalaryGenerator<R> {
    rng: R,
}

impl SalaryGenerator<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> SalaryGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Salary for one player from PER and minutes, a name-based star bonus
    /// and noise, clamped to [1M, 60M] and truncated to whole units.
    pub fn salary_for(&mut self, record: &PlayerStatRecord) -> f64 {
        let per = record.stat("PER").unwrap_or(DEFAULT_PER);
        let minutes = record.minutes_per_game().unwrap_or(DEFAULT_MINUTES);

        let star_bonus = if SUPERSTAR_NAMES.iter().any(|n| record.player.contains(n)) {
            self.rng.gen_range(20_000_000.0..30_000_000.0)
        } else if ALL_STAR_NAMES.iter().any(|n| record.player.contains(n)) {
            self.rng.gen_range(10_000_000.0..20_000_000.0)
        } else {
            0.0
        };
        let noise = self.rng.gen_range(-2_000_000.0..5_000_000.0);

        let salary = BASE_SALARY + per * PER_BONUS + minutes * MINUTES_BONUS + star_bonus + noise;
        salary.clamp(MIN_SALARY, MAX_SALARY).trunc()
    }

    /// One salary row per distinct player, using each player's first row.
    /// The table has `Player` and `current_salary` columns so it flows
    /// through the regular column identification and matching.
    pub fn generate(&mut self, stats: &[PlayerStatRecord]) -> RawTable {
        let mut table = RawTable::new(vec![PLAYER_COLUMN.into(), SALARY_COLUMN.into()]);
        let mut seen = HashSet::new();
        for record in stats {
            if !seen.insert(record.player.as_str()) {
                continue;
            }
            let salary = self.salary_for(record);
            table.push_row(vec![
                CellValue::Text(record.player.clone()),
                CellValue::Number(salary),
            ]);
        }
        info!("generated synthetic salaries for {} players", table.len());
        table
    }
}

// ---------------------------------------------------------------------------
// Sample dataset
// ---------------------------------------------------------------------------

pub const TEAM_CODES: [&str; 30] = [
    "ATL", "BOS", "BRK", "CHO", "CHI", "CLE", "DAL", "DEN", "DET", "GSW", "HOU", "IND", "LAC",
    "LAL", "MEM", "MIA", "MIL", "MIN", "NOP", "NYK", "OKC", "ORL", "PHI", "PHX", "POR", "SAC",
    "SAS", "TOR", "UTA", "WAS",
];

pub const SAMPLE_PLAYERS: [&str; 30] = [
    "LeBron James",
    "Stephen Curry",
    "Giannis Antetokounmpo",
    "Luka Doncic",
    "Jayson Tatum",
    "Kevin Durant",
    "Joel Embiid",
    "Nikola Jokic",
    "Damian Lillard",
    "Jimmy Butler",
    "Kawhi Leonard",
    "Paul George",
    "Anthony Davis",
    "Rudy Gobert",
    "Draymond Green",
    "Klay Thompson",
    "Russell Westbrook",
    "Chris Paul",
    "Kyrie Irving",
    "James Harden",
    "Zion Williamson",
    "Ja Morant",
    "Trae Young",
    "Devin Booker",
    "Donovan Mitchell",
    "Bradley Beal",
    "Karl-Anthony Towns",
    "Ben Simmons",
    "Pascal Siakam",
    "CJ McCollum",
];

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn cells(pairs: Vec<(&str, CellValue)>) -> Vec<(String, CellValue)> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Sample data used when no dataset file is available: a per-game team
/// table, an advanced table mixing 30 player rows with team rows, and a
/// salary listing for the same players.
pub fn sample_datasets(seed: u64) -> Datasets {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut per_game = Vec::with_capacity(TEAM_CODES.len());
    let mut team_advanced = Vec::with_capacity(TEAM_CODES.len());
    for team in TEAM_CODES {
        per_game.push(cells(vec![
            ("Team", team.into()),
            ("PTS", f64::from(110 + rng.gen_range(-10i32..15)).into()),
            ("FG%", round_to(0.450 + rng.gen_range(-0.05..0.05), 3).into()),
            ("3P%", round_to(0.350 + rng.gen_range(-0.05..0.05), 3).into()),
            ("REB", f64::from(45 + rng.gen_range(-5i32..8)).into()),
            ("AST", f64::from(25 + rng.gen_range(-5i32..8)).into()),
            ("STL", f64::from(8 + rng.gen_range(-2i32..3)).into()),
            ("BLK", f64::from(5 + rng.gen_range(-2i32..3)).into()),
            ("TOV", f64::from(14 + rng.gen_range(-3i32..4)).into()),
        ]));
        team_advanced.push(cells(vec![
            ("Team", team.into()),
            ("ORtg", f64::from(110 + rng.gen_range(-8i32..12)).into()),
            ("DRtg", f64::from(110 + rng.gen_range(-8i32..12)).into()),
            ("Pace", f64::from(100 + rng.gen_range(-8i32..8)).into()),
            ("eFG%", round_to(0.520 + rng.gen_range(-0.04..0.04), 3).into()),
        ]));
    }

    let mut advanced = Vec::with_capacity(SAMPLE_PLAYERS.len() + TEAM_CODES.len());
    for (i, player) in SAMPLE_PLAYERS.iter().enumerate() {
        advanced.push(cells(vec![
            ("Player", (*player).into()),
            ("Tm", TEAM_CODES[i % TEAM_CODES.len()].into()),
            ("MP", round_to(25.0 + rng.gen_range(0.0..15.0), 1).into()),
            ("PER", round_to(15.0 + rng.gen_range(0.0..15.0), 2).into()),
            ("TS%", round_to(0.500 + rng.gen_range(0.0..0.150), 3).into()),
            ("USG%", round_to(18.0 + rng.gen_range(0.0..15.0), 1).into()),
            ("VORP", round_to(rng.gen_range(-1.0..8.0), 2).into()),
            ("WS", round_to(rng.gen_range(0.0..15.0), 1).into()),
            ("BPM", round_to(rng.gen_range(-3.0..10.0), 2).into()),
        ]));
    }
    advanced.extend(team_advanced);

    let mut salaries = Vec::with_capacity(SAMPLE_PLAYERS.len());
    for player in SAMPLE_PLAYERS {
        let salary = if SAMPLE_PLAYERS[..4].contains(&player) {
            rng.gen_range(40_000_000.0..55_000_000.0)
        } else if ["Kevin Durant", "Joel Embiid", "Nikola Jokic", "Jayson Tatum"].contains(&player) {
            rng.gen_range(30_000_000.0..45_000_000.0)
        } else {
            rng.gen_range(5_000_000.0..30_000_000.0)
        };
        salaries.push(cells(vec![
            ("player_name", player.into()),
            ("current_salary", f64::trunc(salary).into()),
        ]));
    }

    Datasets {
        per_game: RawTable::from_records(per_game),
        advanced: RawTable::from_records(advanced),
        player_salaries: RawTable::from_records(salaries),
        team_salaries: RawTable::empty(),
        origin: DataOrigin::Sample,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
