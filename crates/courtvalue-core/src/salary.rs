// Salary collection consolidation: merge several salary listings into one
// ranked list with team payrolls and summary statistics.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::efficiency::PER_MILLION;
use crate::records::{SalaryRecord, TeamCode};
use crate::reconcile::{collapse_salary_rows, TradedPlayer};

/// Number of earners listed in `SalaryStats::top_earners`.
pub const TOP_EARNERS: usize = 10;

// ---------------------------------------------------------------------------
// Consolidation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSalary {
    #[serde(flatten)]
    pub record: SalaryRecord,
    /// 1-based position after sorting by salary, highest first.
    pub final_rank: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SalaryCollection {
    pub ranked: Vec<RankedSalary>,
    pub original_count: usize,
    pub traded: Vec<TradedPlayer>,
}

/// Concatenate salary listings, collapse duplicate players with the salary
/// policy, then rank by salary descending. Rows without a salary rank last;
/// equal salaries keep their collapsed order.
pub fn consolidate_salaries(sources: Vec<Vec<SalaryRecord>>) -> SalaryCollection {
    let combined: Vec<SalaryRecord> = sources.into_iter().flatten().collect();
    if combined.is_empty() {
        return SalaryCollection::default();
    }

    let collapsed = collapse_salary_rows(&combined);
    let mut records = collapsed.records;
    records.sort_by(|a, b| {
        let a = a.salary.unwrap_or(f64::NEG_INFINITY);
        let b = b.salary.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    let ranked: Vec<RankedSalary> = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| RankedSalary {
            record,
            final_rank: i as u32 + 1,
        })
        .collect();

    info!(
        "consolidated {} salary rows into {} players ({} traded)",
        collapsed.original_count,
        ranked.len(),
        collapsed.traded.len()
    );

    SalaryCollection {
        ranked,
        original_count: collapsed.original_count,
        traded: collapsed.traded,
    }
}

// ---------------------------------------------------------------------------
// Team payrolls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamPayroll {
    pub team: TeamCode,
    pub total_salary: f64,
    pub avg_salary: f64,
    /// Rows with a salary value.
    pub salary_count: usize,
    /// All rows for the team.
    pub player_count: usize,
    /// Total in millions, one decimal.
    pub salary_millions: f64,
}

/// Payroll per team code, ordered by team. Rows without a team are skipped;
/// rows without a salary count as players but not toward totals.
pub fn team_payrolls(records: &[SalaryRecord]) -> Vec<TeamPayroll> {
    let mut groups: BTreeMap<&TeamCode, (f64, usize, usize)> = BTreeMap::new();
    for record in records {
        let Some(team) = record.team.as_ref() else {
            continue;
        };
        let entry = groups.entry(team).or_insert((0.0, 0, 0));
        entry.2 += 1;
        if let Some(salary) = record.salary.filter(|s| !s.is_nan()) {
            entry.0 += salary;
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(team, (total, salary_count, player_count))| {
            let avg = if salary_count > 0 {
                total / salary_count as f64
            } else {
                0.0
            };
            TeamPayroll {
                team: team.clone(),
                total_salary: total.round(),
                avg_salary: avg.round(),
                salary_count,
                player_count,
                salary_millions: (total / PER_MILLION * 10.0).round() / 10.0,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryStats {
    pub total_players: usize,
    pub total_salary: u64,
    pub average_salary: u64,
    pub median_salary: u64,
    pub max_salary: u64,
    /// Smallest strictly positive salary, 0 when there is none.
    pub min_salary: u64,
    /// Distinct sources in order of first appearance.
    pub sources_used: Vec<String>,
    pub top_earners: Vec<RankedSalary>,
}

impl SalaryStats {
    /// Summarize a ranked collection. Aggregates ignore rows without a
    /// salary; figures are truncated to whole currency units.
    pub fn from_ranked(ranked: &[RankedSalary]) -> Self {
        let mut salaries: Vec<f64> = ranked
            .iter()
            .filter_map(|r| r.record.salary)
            .filter(|s| !s.is_nan())
            .collect();
        salaries.sort_by(f64::total_cmp);

        let total: f64 = salaries.iter().sum();
        let average = if salaries.is_empty() {
            0.0
        } else {
            total / salaries.len() as f64
        };

        let mut sources_used: Vec<String> = Vec::new();
        for source in ranked.iter().filter_map(|r| r.record.source.as_ref()) {
            if !sources_used.contains(source) {
                sources_used.push(source.clone());
            }
        }

        Self {
            total_players: ranked.len(),
            total_salary: total as u64,
            average_salary: average as u64,
            median_salary: median(&salaries) as u64,
            max_salary: salaries.last().copied().unwrap_or(0.0) as u64,
            min_salary: salaries.iter().copied().find(|s| *s > 0.0).unwrap_or(0.0) as u64,
            sources_used,
            top_earners: ranked.iter().take(TOP_EARNERS).cloned().collect(),
        }
    }
}

/// Median of an ascending slice; 0 when empty.
fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
