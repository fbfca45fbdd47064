// Plain-text rendering of an analysis report for the terminal.

use std::fmt::{self, Write};

use courtvalue_core::efficiency::format_currency;

use crate::loader::DatasetStatus;
use crate::pipeline::AnalysisReport;

const RULE_WIDTH: usize = 78;

fn rule(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

/// Dataset availability, one line per dataset.
pub fn render_datasets(statuses: &[DatasetStatus]) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    write_datasets(&mut out, statuses).ok();
    out
}

/// Ranking, summary, team rollups, salary overview and diagnostics.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    write_report(&mut out, report).ok();
    out
}

fn write_datasets(out: &mut String, statuses: &[DatasetStatus]) -> fmt::Result {
    rule(out, "DATASETS")?;
    for s in statuses {
        writeln!(
            out,
            "{:<18} {:<17} {:>5} records {:>3} columns",
            s.kind.key(),
            s.label(),
            s.records,
            s.columns
        )?;
    }
    Ok(())
}

fn write_report(out: &mut String, report: &AnalysisReport) -> fmt::Result {
    let d = &report.diagnostics;

    rule(
        out,
        &format!(
            "SALARY EFFICIENCY: {} per $1M ({} salaries)",
            report.metric,
            report.salary_source.label()
        ),
    )?;
    if report.ranking.is_empty() {
        writeln!(out, "No players to rank.")?;
    } else {
        writeln!(
            out,
            "{:>4}  {:<26} {:<4} {:>6} {:>9} {:>10} {:>10}",
            "Rank", "Player", "Team", "MP", report.metric, "Salary", "Per $1M"
        )?;
        for (i, entry) in report.ranking.iter().enumerate() {
            let r = &entry.record;
            let team = r.team.as_ref().map_or("-", |t| t.as_str());
            let minutes = r
                .minutes_per_game()
                .map_or_else(|| "-".to_string(), |m| format!("{m:.1}"));
            writeln!(
                out,
                "{:>4}  {:<26} {:<4} {:>6} {:>9.2} {:>10} {:>10.4}",
                i + 1,
                r.player,
                team,
                minutes,
                entry.metric_value,
                format_currency(r.salary),
                entry.efficiency
            )?;
        }
    }
    let s = &report.summary;
    writeln!(
        out,
        "\n{} players ranked; mean salary {}, mean efficiency {:.4}, best: {}",
        s.count,
        format_currency(s.mean_salary),
        s.mean_efficiency,
        s.best_player.as_deref().unwrap_or("-")
    )?;

    if !report.team_rollups.is_empty() {
        writeln!(out)?;
        rule(out, "TEAM PER-GAME (full-season equivalent)")?;
        let stat_names: Vec<&String> = report.team_rollups[0].per_game.keys().collect();
        write!(out, "{:<5} {:>6}", "Team", "Active")?;
        for name in &stat_names {
            write!(out, " {:>7}", name)?;
        }
        writeln!(out)?;
        for rollup in &report.team_rollups {
            write!(out, "{:<5} {:>6}", rollup.team.as_str(), rollup.active_players)?;
            for name in &stat_names {
                let value = rollup.per_game.get(*name).copied().unwrap_or(0.0);
                write!(out, " {:>7.1}", value)?;
            }
            writeln!(out)?;
        }
    }

    if let Some(overview) = &report.salary_overview {
        writeln!(out)?;
        rule(out, "SALARY OVERVIEW")?;
        let st = &overview.stats;
        writeln!(
            out,
            "{} players, total {}, average {}, median {}, max {}, min {}",
            st.total_players,
            format_currency(st.total_salary as f64),
            format_currency(st.average_salary as f64),
            format_currency(st.median_salary as f64),
            format_currency(st.max_salary as f64),
            format_currency(st.min_salary as f64)
        )?;
        for p in &overview.payrolls {
            writeln!(
                out,
                "{:<5} {:>8}M  {:>3} players  avg {}",
                p.team.as_str(),
                format!("{:.1}", p.salary_millions),
                p.player_count,
                format_currency(p.avg_salary)
            )?;
        }
    }

    writeln!(out)?;
    rule(out, "DIAGNOSTICS")?;
    let columns = d
        .salary_columns
        .as_ref()
        .map_or_else(|| "not identified".to_string(), |c| format!("{} / {}", c.player, c.salary));
    let attempted: Vec<&str> = d.strategies_attempted.iter().map(|k| k.label()).collect();
    writeln!(out, "stat rows:        {}", d.stat_rows)?;
    writeln!(out, "salary rows:      {} (columns: {})", d.salary_rows, columns)?;
    writeln!(
        out,
        "matching:         tried [{}], {} paired, {} dropped for salary",
        attempted.join(", "),
        d.raw_pairings,
        d.dropped_salary
    )?;
    writeln!(
        out,
        "collapse:         {} -> {} rows, {} traded players",
        d.matched_rows,
        d.collapsed_rows,
        d.traded_players.len()
    )?;
    writeln!(out, "after filters:    {}", d.filtered_rows)?;
    writeln!(
        out,
        "efficiency drops: {} null, {} infinite, {} non-positive",
        d.dropped_null, d.dropped_infinite, d.dropped_non_positive
    )?;
    writeln!(out, "metrics:          {}", d.available_metrics.join(", "))?;
    Ok(())
}
