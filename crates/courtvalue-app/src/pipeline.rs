// End-to-end analysis: datasets in, ranked efficiency report out.
//
// Never fails on data quality. Unidentified columns, an empty salary table or
// an empty match all degrade to synthetic salaries; missing statistics yield
// an empty report with diagnostics explaining why.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use courtvalue_core::columns::{ColumnResolver, HeuristicColumns, SalaryColumns};
use courtvalue_core::efficiency::{
    available_metrics, compute_efficiency, top_n, EfficiencyRecord, EfficiencySummary,
};
use courtvalue_core::matching::{reconcile, MatchOutcome};
use courtvalue_core::reconcile::{collapse_stat_rows, TradedPlayer};
use courtvalue_core::records::{
    salary_records_from_table, stat_records_from_table, CanonicalPlayerRecord,
    MatchStrategyKind, PlayerStatRecord, StatColumns,
};
use courtvalue_core::rollup::{team_rollup, TeamRollup};
use courtvalue_core::salary::{consolidate_salaries, team_payrolls, SalaryStats, TeamPayroll};
use courtvalue_core::table::RawTable;

use crate::config::Config;
use crate::loader::{DataOrigin, DatasetKind, Datasets};
use crate::synthetic::SalaryGenerator;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Where the salaries in a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "strategy", rename_all = "snake_case")]
pub enum SalarySource {
    /// Real salaries, joined by the given strategy.
    Matched(MatchStrategyKind),
    /// Seeded synthetic salaries derived from the statistics.
    Synthetic,
}

impl SalarySource {
    pub fn label(&self) -> String {
        match self {
            SalarySource::Matched(kind) => format!("matched ({})", kind.label()),
            SalarySource::Synthetic => "synthetic".to_string(),
        }
    }
}

/// Counts per stage, for display next to the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub data_origin: DataOrigin,
    pub stats_dataset: Option<DatasetKind>,
    pub stat_rows: usize,
    pub salary_rows: usize,
    pub salary_columns: Option<SalaryColumns>,
    pub strategies_attempted: Vec<MatchStrategyKind>,
    pub raw_pairings: usize,
    pub dropped_salary: usize,
    pub matched_rows: usize,
    pub collapsed_rows: usize,
    pub traded_players: Vec<TradedPlayer>,
    pub filtered_rows: usize,
    pub dropped_null: usize,
    pub dropped_infinite: usize,
    pub dropped_non_positive: usize,
    pub available_metrics: Vec<String>,
}

/// League salary picture from the real salary listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryOverview {
    pub stats: SalaryStats,
    pub payrolls: Vec<TeamPayroll>,
    pub traded_players: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub salary_source: SalarySource,
    /// Metric actually ranked; may differ from the configured one.
    pub metric: String,
    pub ranking: Vec<EfficiencyRecord>,
    pub summary: EfficiencySummary,
    pub team_rollups: Vec<TeamRollup>,
    pub salary_overview: Option<SalaryOverview>,
    pub diagnostics: Diagnostics,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full analysis over loaded datasets.
///
/// Stages: statistics rows, salary column identification, matching (with the
/// synthetic fallback), traded-player collapse, filters, efficiency, top N.
/// Team rollups come from the per-game table independently of salaries.
pub fn analyze(config: &Config, datasets: &Datasets) -> AnalysisReport {
    let mut diagnostics = Diagnostics {
        data_origin: datasets.origin,
        stats_dataset: None,
        stat_rows: 0,
        salary_rows: datasets.player_salaries.len(),
        salary_columns: None,
        strategies_attempted: Vec::new(),
        raw_pairings: 0,
        dropped_salary: 0,
        matched_rows: 0,
        collapsed_rows: 0,
        traded_players: Vec::new(),
        filtered_rows: 0,
        dropped_null: 0,
        dropped_infinite: 0,
        dropped_non_positive: 0,
        available_metrics: Vec::new(),
    };

    let team_rollups = rollups(config, &datasets.per_game);

    let (stats_dataset, stats) = player_stats(datasets);
    diagnostics.stats_dataset = stats_dataset;
    diagnostics.stat_rows = stats.len();

    let salary_columns = resolve_salary_columns(config, &datasets.player_salaries);
    diagnostics.salary_columns = salary_columns.clone();
    let salary_overview = salary_columns
        .as_ref()
        .map(|c| salary_overview(&datasets.player_salaries, c));

    let settings = config.matching.settings();
    let mut outcome = reconcile(
        &stats,
        &datasets.player_salaries,
        salary_columns.as_ref(),
        &settings,
    );
    let salary_source = match (outcome.is_empty(), outcome.strategy) {
        (false, Some(kind)) => SalarySource::Matched(kind),
        _ => {
            warn!("no usable salary match; falling back to synthetic salaries");
            outcome = synthetic_outcome(config, &stats);
            SalarySource::Synthetic
        }
    };
    diagnostics.strategies_attempted = outcome.attempted.clone();
    diagnostics.raw_pairings = outcome.raw_pairings;
    diagnostics.dropped_salary = outcome.dropped_salary;
    diagnostics.matched_rows = outcome.records.len();

    let collapsed = collapse_stat_rows(&outcome.records);
    diagnostics.collapsed_rows = collapsed.final_count();
    diagnostics.traded_players = collapsed.traded;

    let filtered = config.efficiency.filter().apply(&collapsed.records);
    diagnostics.filtered_rows = filtered.len();
    diagnostics.available_metrics = available_metrics(&filtered)
        .into_iter()
        .map(String::from)
        .collect();

    let metric = choose_metric(&config.efficiency.metric, &filtered, &diagnostics.available_metrics);
    let run = compute_efficiency(&filtered, &metric);
    diagnostics.dropped_null = run.dropped_null;
    diagnostics.dropped_infinite = run.dropped_infinite;
    diagnostics.dropped_non_positive = run.dropped_non_positive;

    let summary = EfficiencySummary::from_records(&run.records);
    let ranking = top_n(&run.records, config.efficiency.top_n);
    info!(
        "ranked {} of {} players by {} ({})",
        ranking.len(),
        run.records.len(),
        metric,
        salary_source.label()
    );

    AnalysisReport {
        generated_at: Utc::now(),
        salary_source,
        metric,
        ranking,
        summary,
        team_rollups,
        salary_overview,
        diagnostics,
    }
}

/// Player rows from the advanced table, or the per-game table when the
/// advanced one has no player rows.
fn player_stats(datasets: &Datasets) -> (Option<DatasetKind>, Vec<PlayerStatRecord>) {
    for kind in [DatasetKind::Advanced, DatasetKind::PerGame] {
        let table = datasets.get(kind);
        if table.is_empty() {
            continue;
        }
        match stat_records_from_table(table, &StatColumns::detect(table)) {
            Ok(records) if !records.is_empty() => {
                info!("using {} rows from {}", records.len(), kind.key());
                return (Some(kind), records);
            }
            Ok(_) => warn!("{} has no player rows", kind.key()),
            Err(e) => warn!("{} unusable for player statistics: {}", kind.key(), e),
        }
    }
    warn!("no player statistics available");
    (None, Vec::new())
}

fn resolve_salary_columns(config: &Config, table: &RawTable) -> Option<SalaryColumns> {
    if table.is_empty() {
        return None;
    }
    let columns = match config.matching.declared_columns() {
        Some(declared) => declared.resolve(table),
        None => HeuristicColumns.resolve(table),
    };
    if let Some(c) = &columns {
        info!("salary columns: player='{}', salary='{}'", c.player, c.salary);
    }
    columns
}

fn salary_overview(table: &RawTable, columns: &SalaryColumns) -> SalaryOverview {
    let records = salary_records_from_table(table, &columns.player, &columns.salary);
    let collection = consolidate_salaries(vec![records]);
    let consolidated: Vec<_> = collection.ranked.iter().map(|r| r.record.clone()).collect();
    SalaryOverview {
        stats: SalaryStats::from_ranked(&collection.ranked),
        payrolls: team_payrolls(&consolidated),
        traded_players: collection.traded.len(),
    }
}

/// Generate seeded salaries for the statistics and run them back through
/// column identification and the matcher.
fn synthetic_outcome(config: &Config, stats: &[PlayerStatRecord]) -> MatchOutcome {
    let table = SalaryGenerator::seeded(config.synthetic.seed).generate(stats);
    let columns = HeuristicColumns.resolve(&table);
    reconcile(stats, &table, columns.as_ref(), &config.matching.settings())
}

/// The configured metric when any record carries a value for it, otherwise
/// the first available candidate metric.
fn choose_metric(configured: &str, records: &[CanonicalPlayerRecord], available: &[String]) -> String {
    if records.iter().any(|r| r.stat(configured).is_some()) {
        return configured.to_string();
    }
    match available.first() {
        Some(fallback) => {
            warn!("metric '{}' not available; using '{}'", configured, fallback);
            fallback.clone()
        }
        None => configured.to_string(),
    }
}

fn rollups(config: &Config, per_game: &RawTable) -> Vec<TeamRollup> {
    if per_game.is_empty() {
        return Vec::new();
    }
    let records = match stat_records_from_table(per_game, &StatColumns::detect(per_game)) {
        Ok(records) => records,
        Err(e) => {
            warn!("skipping team rollup: {}", e);
            return Vec::new();
        }
    };
    let stat_names: Vec<&str> = config.rollup.stats.iter().map(String::as_str).collect();
    let rollups = team_rollup(&records, &stat_names);
    info!("rolled up {} teams from {} player rows", rollups.len(), records.len());
    rollups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
