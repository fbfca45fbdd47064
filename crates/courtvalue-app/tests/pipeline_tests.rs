// Integration tests for the application layer.
//
// These load fixture files through the config and loader, run the analysis
// pipeline and write exports, using only the crate's public API.

use std::fs;
use std::path::{Path, PathBuf};

use courtvalue_app::config::{load_config_from, Config};
use courtvalue_app::export::{export_ranking_csv, export_report_json};
use courtvalue_app::loader::{load_datasets, validate_datasets, DataOrigin};
use courtvalue_app::pipeline::{analyze, AnalysisReport, SalarySource};
use courtvalue_core::records::{MatchStrategyKind, TeamCode};

// ===========================================================================
// Test helpers
// ===========================================================================

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("courtvalue_it_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("config")).unwrap();
    dir
}

/// Config for the fixture data directory with the given salary file.
fn fixture_config(salary_file: &str) -> Config {
    let mut config = Config::default();
    config.data.dir = fixtures().join("nba_data").display().to_string();
    config.data.player_salaries = Some(fixtures().join(salary_file).display().to_string());
    config
}

fn run(config: &Config) -> AnalysisReport {
    let datasets = load_datasets(&config.data, config.synthetic.seed);
    assert_eq!(datasets.origin, DataOrigin::Files);
    analyze(config, &datasets)
}

fn ranked_players(report: &AnalysisReport) -> Vec<&str> {
    report.ranking.iter().map(|e| e.record.player.as_str()).collect()
}

// ===========================================================================
// Loading
// ===========================================================================

#[test]
fn fixture_datasets_load_with_status() {
    let config = fixture_config("salaries.csv");
    let datasets = load_datasets(&config.data, 42);

    assert_eq!(datasets.advanced.len(), 7);
    assert_eq!(datasets.per_game.len(), 6);
    assert_eq!(datasets.player_salaries.len(), 7);
    assert!(datasets.team_salaries.is_empty());

    let statuses = validate_datasets(&datasets);
    let labels: Vec<&str> = statuses.iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec!["OK", "OK", "Available", "Not Available"]);
}

#[test]
fn config_file_drives_the_run() {
    let dir = scratch("config");
    let data_dir = fixtures().join("nba_data");
    let salaries = fixtures().join("salaries.csv");
    let text = format!(
        "[data]\ndir = {:?}\nplayer_salaries = {:?}\n\n[efficiency]\nmetric = \"WS\"\ntop_n = 2\n",
        data_dir.display().to_string(),
        salaries.display().to_string()
    );
    fs::write(dir.join("config").join("analysis.toml"), text).unwrap();

    let config = load_config_from(&dir).unwrap();
    let report = run(&config);
    assert_eq!(report.metric, "WS");
    assert_eq!(report.ranking.len(), 2);

    let _ = fs::remove_dir_all(&dir);
}

// ===========================================================================
// Analysis
// ===========================================================================

#[test]
fn exact_match_end_to_end() {
    let report = run(&fixture_config("salaries.csv"));

    assert_eq!(report.salary_source, SalarySource::Matched(MatchStrategyKind::Exact));
    let d = &report.diagnostics;
    assert_eq!(d.stat_rows, 6);
    // Schroder's salary rows collapse to one before matching, so each of
    // his three stints pairs once.
    assert_eq!(d.raw_pairings, 6);
    assert_eq!(d.dropped_salary, 0);
    assert_eq!(d.collapsed_rows, 4);
    assert_eq!(d.traded_players.len(), 1);
    assert_eq!(d.traded_players[0].selected_team, Some(TeamCode::new("GSW")));
    // Garbage Timer is under the minutes floor.
    assert_eq!(d.filtered_rows, 3);

    assert_eq!(
        ranked_players(&report),
        vec!["Jalen Williams", "Dennis Schroder", "Shai Gilgeous-Alexander"]
    );
    let top = &report.ranking[0];
    assert!(approx_eq(top.efficiency, 19.8 / 4_775_760.0 * 1_000_000.0));
    assert_eq!(report.summary.best_player.as_deref(), Some("Jalen Williams"));

    // Highest non-aggregate salary row, as in the salary overview.
    let schroder = &report.ranking[1].record;
    assert_eq!(schroder.team, Some(TeamCode::new("GSW")));
    assert_eq!(schroder.salary, 13_025_250.0);
}

#[test]
fn salary_overview_consolidates_the_listing() {
    let report = run(&fixture_config("salaries.csv"));
    let overview = report.salary_overview.expect("salary columns were identified");

    assert_eq!(overview.traded_players, 1);
    assert_eq!(overview.stats.total_players, 5);
    assert_eq!(overview.stats.max_salary, 35_859_950);
    assert_eq!(overview.stats.min_salary, 1_157_153);
    assert_eq!(overview.stats.median_salary, 8_900_505);
    assert_eq!(overview.stats.sources_used, vec!["espn".to_string()]);
    assert_eq!(
        overview.stats.top_earners[0].record.player,
        "Shai Gilgeous-Alexander"
    );

    let teams: Vec<&str> = overview.payrolls.iter().map(|p| p.team.as_str()).collect();
    assert_eq!(teams, vec!["BRK", "OKC"]);
    let okc = &overview.payrolls[1];
    assert_eq!(okc.player_count, 4);
    assert_eq!(okc.salary_count, 3);
}

#[test]
fn name_variants_fall_through_to_fuzzy() {
    let report = run(&fixture_config("salaries_variants.csv"));

    assert_eq!(report.salary_source, SalarySource::Matched(MatchStrategyKind::Fuzzy));
    assert_eq!(
        report.diagnostics.strategies_attempted,
        vec![MatchStrategyKind::Exact, MatchStrategyKind::Fuzzy]
    );
    assert_eq!(report.ranking.len(), 3);
    for entry in &report.ranking {
        let provenance = &entry.record.provenance;
        assert_eq!(provenance.strategy, MatchStrategyKind::Fuzzy);
        assert!(provenance.score.unwrap() >= 0.8);
    }
    let schroder = report
        .ranking
        .iter()
        .find(|e| e.record.player == "Dennis Schroder")
        .unwrap();
    assert_eq!(schroder.record.provenance.salary_name, "Dennis Schröder");
}

#[test]
fn team_rollups_use_full_season_games() {
    let report = run(&fixture_config("salaries.csv"));
    let teams: Vec<&str> = report.team_rollups.iter().map(|r| r.team.as_str()).collect();
    assert_eq!(teams, vec!["GSW", "OKC"]);

    let okc = &report.team_rollups[1];
    // Garbage Timer is neither at 10 minutes nor 10 games.
    assert_eq!(okc.active_players, 2);
    assert!(approx_eq(okc.per_game["PTS"], (32.7 * 76.0 + 21.6 * 69.0) / 82.0));

    let gsw = &report.team_rollups[0];
    assert!(approx_eq(gsw.season_totals["AST"], 4.9 * 54.0));
}

#[test]
fn missing_salary_file_uses_synthetic_salaries() {
    let config = fixture_config("does_not_exist.csv");
    let report = run(&config);

    assert_eq!(report.salary_source, SalarySource::Synthetic);
    assert!(report.salary_overview.is_none());
    assert_eq!(report.diagnostics.salary_columns, None);
    assert_eq!(report.ranking.len(), 3);

    let again = run(&config);
    let salaries = |r: &AnalysisReport| r.ranking.iter().map(|e| e.record.salary).collect::<Vec<_>>();
    assert_eq!(salaries(&report), salaries(&again));
}

#[test]
fn missing_data_directory_runs_on_sample_data() {
    let mut config = Config::default();
    config.data.dir = std::env::temp_dir()
        .join("courtvalue_it_no_such_dir")
        .display()
        .to_string();
    let datasets = load_datasets(&config.data, config.synthetic.seed);
    assert_eq!(datasets.origin, DataOrigin::Sample);

    let report = analyze(&config, &datasets);
    assert_eq!(report.salary_source, SalarySource::Matched(MatchStrategyKind::Exact));
    assert_eq!(report.ranking.len(), config.efficiency.top_n);
}

// ===========================================================================
// Export
// ===========================================================================

#[test]
fn exports_write_csv_and_json() {
    let dir = scratch("export");
    let report = run(&fixture_config("salaries.csv"));

    let csv_path = dir.join("exports").join("ranking.csv");
    export_ranking_csv(&csv_path, &report.ranking).unwrap();
    let csv_text = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv_text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Rank,Player,Team,Minutes,PER,Salary (M),Efficiency");
    assert!(lines[1].starts_with("1,Jalen Williams,OKC,32.4,19.800,4.78,"));

    let json_path = dir.join("exports").join("report.json");
    export_report_json(&json_path, &report).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["salary_source"]["kind"], "matched");
    assert_eq!(value["salary_source"]["strategy"], "Exact");
    assert_eq!(value["metric"], "PER");
    assert_eq!(value["ranking"].as_array().unwrap().len(), 3);

    let _ = fs::remove_dir_all(&dir);
}
