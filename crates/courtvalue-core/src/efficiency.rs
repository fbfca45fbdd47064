// Efficiency-per-salary metric: statistic units per million of salary.

use serde::Serialize;
use tracing::{debug, info};

use crate::records::{CanonicalPlayerRecord, MINUTES_STAT};

/// Scale factor: efficiency is expressed per million currency units.
pub const PER_MILLION: f64 = 1_000_000.0;

/// Metrics offered for ranking, in display order.
pub const CANDIDATE_METRICS: &[&str] = &["PER", "VORP", "WS", "BPM", "TS%", "USG%"];

/// Minutes-per-game floor applied before ranking unless configured otherwise.
pub const DEFAULT_MIN_MINUTES: f64 = 15.0;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A canonical record with the efficiency of one statistic attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyRecord {
    pub record: CanonicalPlayerRecord,
    pub metric: String,
    /// Statistic value after coercion (missing counts as 0).
    pub metric_value: f64,
    pub efficiency: f64,
}

/// Output of `compute_efficiency` with per-stage drop counts.
#[derive(Debug, Clone, Default)]
pub struct EfficiencyRun {
    pub records: Vec<EfficiencyRecord>,
    pub dropped_null: usize,
    pub dropped_infinite: usize,
    pub dropped_non_positive: usize,
}

impl EfficiencyRun {
    pub fn dropped(&self) -> usize {
        self.dropped_null + self.dropped_infinite + self.dropped_non_positive
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// `efficiency = statistic / salary * 1_000_000` for every record.
///
/// A missing or unparseable statistic counts as 0 rather than excluding the
/// row. Results are then filtered in three stages, in this order: undefined
/// (NaN) values, infinite values, values not strictly positive. Inputs are
/// not modified.
pub fn compute_efficiency(records: &[CanonicalPlayerRecord], metric: &str) -> EfficiencyRun {
    let computed: Vec<EfficiencyRecord> = records
        .iter()
        .map(|record| {
            let metric_value = record.stat(metric).unwrap_or(0.0);
            EfficiencyRecord {
                record: record.clone(),
                metric: metric.to_string(),
                metric_value,
                efficiency: metric_value / record.salary * PER_MILLION,
            }
        })
        .collect();

    let mut run = EfficiencyRun::default();

    let (defined, nulls): (Vec<_>, Vec<_>) =
        computed.into_iter().partition(|r| !r.efficiency.is_nan());
    run.dropped_null = nulls.len();

    let (finite, infinite): (Vec<_>, Vec<_>) =
        defined.into_iter().partition(|r| !r.efficiency.is_infinite());
    run.dropped_infinite = infinite.len();

    let (positive, rest): (Vec<_>, Vec<_>) = finite.into_iter().partition(|r| r.efficiency > 0.0);
    run.dropped_non_positive = rest.len();
    for r in &rest {
        debug!("'{}' has non-positive {} efficiency", r.record.player, metric);
    }

    run.records = positive;
    info!(
        "{} efficiency: {} of {} records kept ({} undefined, {} infinite, {} non-positive)",
        metric,
        run.records.len(),
        records.len(),
        run.dropped_null,
        run.dropped_infinite,
        run.dropped_non_positive
    );
    run
}

/// The `n` most efficient records, highest first. The order among equal
/// efficiencies is unspecified.
pub fn top_n(records: &[EfficiencyRecord], n: usize) -> Vec<EfficiencyRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| b.efficiency.total_cmp(&a.efficiency));
    ranked.truncate(n);
    ranked
}

/// Candidate metrics present in the records with at least one value and a
/// non-zero total.
pub fn available_metrics(records: &[CanonicalPlayerRecord]) -> Vec<&'static str> {
    CANDIDATE_METRICS
        .iter()
        .copied()
        .filter(|metric| {
            let values: Vec<f64> = records.iter().filter_map(|r| r.stat(metric)).collect();
            !values.is_empty() && values.iter().sum::<f64>() != 0.0
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Pre-ranking filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordFilter {
    /// Minimum minutes per game. A record without an MP value counts as 0;
    /// if no record carries MP at all the floor is not applied.
    pub min_minutes: f64,
    /// Inclusive salary range in millions.
    pub salary_range_millions: Option<(f64, f64)>,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self {
            min_minutes: DEFAULT_MIN_MINUTES,
            salary_range_millions: None,
        }
    }
}

impl RecordFilter {
    pub fn apply(&self, records: &[CanonicalPlayerRecord]) -> Vec<CanonicalPlayerRecord> {
        let has_minutes = records.iter().any(|r| r.stats.contains_key(MINUTES_STAT));
        let kept: Vec<CanonicalPlayerRecord> = records
            .iter()
            .filter(|r| !has_minutes || r.minutes_per_game().unwrap_or(0.0) >= self.min_minutes)
            .filter(|r| match self.salary_range_millions {
                Some((lo, hi)) => r.salary >= lo * PER_MILLION && r.salary <= hi * PER_MILLION,
                None => true,
            })
            .cloned()
            .collect();
        debug!("filters kept {} of {} records", kept.len(), records.len());
        kept
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencySummary {
    pub count: usize,
    pub mean_salary: f64,
    pub mean_efficiency: f64,
    /// Highest efficiency; the earliest record wins ties.
    pub best_player: Option<String>,
}

impl EfficiencySummary {
    pub fn from_records(records: &[EfficiencyRecord]) -> Self {
        let count = records.len();
        if count == 0 {
            return Self {
                count,
                mean_salary: 0.0,
                mean_efficiency: 0.0,
                best_player: None,
            };
        }
        let n = count as f64;
        let mut best: Option<&EfficiencyRecord> = None;
        for r in records {
            if best.map_or(true, |b| r.efficiency > b.efficiency) {
                best = Some(r);
            }
        }
        Self {
            count,
            mean_salary: records.iter().map(|r| r.record.salary).sum::<f64>() / n,
            mean_efficiency: records.iter().map(|r| r.efficiency).sum::<f64>() / n,
            best_player: best.map(|r| r.record.player.clone()),
        }
    }
}

/// Render an amount in millions, e.g. `$45.2M`.
pub fn format_currency(amount: f64) -> String {
    format!("${:.1}M", amount / PER_MILLION)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
