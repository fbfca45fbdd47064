// Integration tests for the reconciliation core.
//
// These run raw statistics and salary tables through column identification,
// matching, traded-player collapsing, filtering and efficiency ranking using
// only the crate's public API.

use courtvalue_core::columns::{ColumnResolver, DeclaredColumns, HeuristicColumns};
use courtvalue_core::efficiency::{compute_efficiency, top_n, EfficiencySummary, RecordFilter};
use courtvalue_core::matching::{reconcile, MatchSettings};
use courtvalue_core::reconcile::collapse_stat_rows;
use courtvalue_core::records::{stat_records_from_table, MatchStrategyKind, StatColumns, TeamCode};
use courtvalue_core::rollup::team_rollup;
use courtvalue_core::table::{CellValue, RawTable};

// ===========================================================================
// Test helpers
// ===========================================================================

fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> RawTable {
    let mut t = RawTable::new(columns.iter().map(|c| c.to_string()).collect());
    for row in rows {
        t.push_row(row);
    }
    t
}

/// Advanced-stats style table with a traded player (Mover) listed per stint
/// and as a TOT aggregate.
fn advanced_table() -> RawTable {
    table(
        &["Player", "Tm", "G", "MP", "PER", "BPM"],
        vec![
            vec!["Ace Guard".into(), "BOS".into(), 70.0.into(), 34.0.into(), 24.0.into(), 6.0.into()],
            vec!["Mover".into(), "TOT".into(), 70.0.into(), 28.0.into(), 16.0.into(), 1.0.into()],
            vec!["Mover".into(), "LAL".into(), 20.0.into(), 26.0.into(), 14.0.into(), 0.5.into()],
            vec!["Mover".into(), "MIA".into(), 50.0.into(), 29.0.into(), 17.0.into(), 1.2.into()],
            vec!["Bench Big".into(), "NYK".into(), 40.0.into(), 9.0.into(), 11.0.into(), (-2.0).into()],
            vec!["Rotation Wing".into(), "NYK".into(), 66.0.into(), 22.0.into(), 13.0.into(), (-1.5).into()],
        ],
    )
}

/// Salary listing with unknown headers: rank, name, pay.
fn salary_table() -> RawTable {
    table(
        &["rk", "who", "pay"],
        vec![
            vec![1.0.into(), "Ace Guard".into(), 40_000_000.0.into()],
            vec![2.0.into(), "Mover".into(), 12_000_000.0.into()],
            vec![3.0.into(), "Rotation Wing".into(), 2_600_000.0.into()],
            vec![4.0.into(), "Bench Big".into(), 0.0.into()],
        ],
    )
}

// ===========================================================================
// End to end
// ===========================================================================

#[test]
fn raw_tables_to_ranked_efficiency() {
    let stats = stat_records_from_table(&advanced_table(), &StatColumns::detect(&advanced_table()))
        .expect("Player column present");
    let salaries = salary_table();

    let columns = HeuristicColumns.resolve(&salaries).expect("columns identified");
    assert_eq!(columns.player, "who");
    assert_eq!(columns.salary, "pay");

    let outcome = reconcile(&stats, &salaries, Some(&columns), &MatchSettings::default());
    assert_eq!(outcome.strategy, Some(MatchStrategyKind::Exact));
    // Mover's three stints each join; Bench Big's zero salary is dropped
    assert_eq!(outcome.raw_pairings, 6);
    assert_eq!(outcome.dropped_salary, 1);
    assert!(outcome.records.iter().all(|r| r.salary.is_finite() && r.salary > 0.0));

    let collapsed = collapse_stat_rows(&outcome.records);
    assert_eq!(collapsed.records.len(), 3);
    let mover = collapsed
        .records
        .iter()
        .find(|r| r.player == "Mover")
        .expect("Mover kept");
    assert_eq!(mover.team, Some(TeamCode::new("MIA")));

    let filtered = RecordFilter::default().apply(&collapsed.records);
    assert_eq!(filtered.len(), 3);

    let run = compute_efficiency(&filtered, "PER");
    let ranking = top_n(&run.records, 2);
    let names: Vec<&str> = ranking.iter().map(|r| r.record.player.as_str()).collect();
    // 13/2.6M = 5.0, 17/12M ~ 1.42, 24/40M = 0.6
    assert_eq!(names, vec!["Rotation Wing", "Mover"]);
    assert!((ranking[0].efficiency - 5.0).abs() < 1e-9);

    let bpm = compute_efficiency(&filtered, "BPM");
    assert_eq!(bpm.dropped_non_positive, 1);

    let summary = EfficiencySummary::from_records(&run.records);
    assert_eq!(summary.count, 3);
    assert_eq!(summary.best_player.as_deref(), Some("Rotation Wing"));
}

#[test]
fn reconcile_leaves_inputs_untouched() {
    let raw = advanced_table();
    let stats = stat_records_from_table(&raw, &StatColumns::detect(&raw)).expect("stats");
    let salaries = salary_table();
    let stats_before = stats.clone();
    let salaries_before = salaries.clone();

    let columns = HeuristicColumns.resolve(&salaries);
    let _ = reconcile(&stats, &salaries, columns.as_ref(), &MatchSettings::default());

    assert_eq!(stats, stats_before);
    assert_eq!(salaries, salaries_before);
}

#[test]
fn unidentified_columns_yield_empty_outcome() {
    let raw = advanced_table();
    let stats = stat_records_from_table(&raw, &StatColumns::detect(&raw)).expect("stats");
    let numbers_only = table(&["a", "b"], vec![vec![1.0.into(), 2.0.into()]]);

    let columns = HeuristicColumns.resolve(&numbers_only);
    assert!(columns.is_none());
    let outcome = reconcile(&stats, &numbers_only, columns.as_ref(), &MatchSettings::default());
    assert!(outcome.is_empty());
    assert!(outcome.strategy.is_none());
}

#[test]
fn declared_columns_bypass_heuristics() {
    let raw = advanced_table();
    let stats = stat_records_from_table(&raw, &StatColumns::detect(&raw)).expect("stats");
    let declared = DeclaredColumns {
        player: "who".into(),
        salary: "pay".into(),
    };
    let columns = declared.resolve(&salary_table());
    let outcome = reconcile(&stats, &salary_table(), columns.as_ref(), &MatchSettings::default());
    assert_eq!(outcome.records.len(), 5);
}

#[test]
fn fuzzy_fallback_reports_scores() {
    let raw = table(
        &["Player", "Tm", "G", "MP", "PER"],
        vec![vec!["P.J. Tucker".into(), "LAC".into(), 30.0.into(), 18.0.into(), 8.0.into()]],
    );
    let stats = stat_records_from_table(&raw, &StatColumns::detect(&raw)).expect("stats");
    let salaries = table(
        &["player_name", "current_salary"],
        vec![vec!["PJ Tucker".into(), 11_539_000.0.into()]],
    );
    let columns = HeuristicColumns.resolve(&salaries);
    let outcome = reconcile(&stats, &salaries, columns.as_ref(), &MatchSettings::default());

    assert_eq!(outcome.strategy, Some(MatchStrategyKind::Fuzzy));
    let provenance = &outcome.records[0].provenance;
    assert_eq!(provenance.salary_name, "PJ Tucker");
    assert_eq!(provenance.score, Some(1.0));
}

// ===========================================================================
// Team rollup
// ===========================================================================

#[test]
fn rollup_from_raw_per_game_table() {
    let raw = table(
        &["Player", "Team", "G", "MP", "PTS"],
        vec![
            vec!["Scorer".into(), "DEN".into(), 82.0.into(), 36.0.into(), 25.0.into()],
            vec!["Mover".into(), "2TM".into(), 70.0.into(), 28.0.into(), 15.0.into()],
            vec!["Mover".into(), "DEN".into(), 30.0.into(), 28.0.into(), 12.0.into()],
            vec!["Mover".into(), "UTA".into(), 40.0.into(), 28.0.into(), 17.25.into()],
            vec![CellValue::Null, "DEN".into(), 82.0.into(), 240.0.into(), 115.0.into()],
        ],
    );
    let stats = stat_records_from_table(&raw, &StatColumns::detect(&raw)).expect("stats");
    assert_eq!(stats.len(), 4);

    let rollups = team_rollup(&stats, &["PTS"]);
    let teams: Vec<&str> = rollups.iter().map(|r| r.team.as_str()).collect();
    assert_eq!(teams, vec!["DEN", "UTA"]);
    assert!((rollups[0].season_totals["PTS"] - 2050.0).abs() < 1e-9);
    assert!((rollups[0].per_game["PTS"] - 25.0).abs() < 1e-9);
    assert!((rollups[1].per_game["PTS"] - 40.0 * 17.25 / 82.0).abs() < 1e-9);
}
