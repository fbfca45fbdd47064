// Salary efficiency analysis entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout carries only the report)
// 2. Load config
// 3. Load datasets, falling back to sample data
// 4. Run the analysis pipeline
// 5. Print the report and write configured exports

use std::path::Path;

use courtvalue_app::config;
use courtvalue_app::export;
use courtvalue_app::loader;
use courtvalue_app::pipeline;
use courtvalue_app::report;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("courtvalue starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: data dir={}, metric={}, top {}",
        config.data.dir, config.efficiency.metric, config.efficiency.top_n
    );

    // 3. Load datasets
    let datasets = loader::load_datasets(&config.data, config.synthetic.seed);
    let statuses = loader::validate_datasets(&datasets);
    print!("{}", report::render_datasets(&statuses));
    println!();

    // 4. Analyze
    let analysis = pipeline::analyze(&config, &datasets);

    // 5. Output
    print!("{}", report::render_report(&analysis));

    if let Some(path) = &config.export.ranking_csv {
        export::export_ranking_csv(Path::new(path), &analysis.ranking)
            .with_context(|| format!("failed to export ranking to {path}"))?;
        println!("\nRanking written to {path}");
    }
    if let Some(path) = &config.export.report_json {
        export::export_report_json(Path::new(path), &analysis)
            .with_context(|| format!("failed to export report to {path}"))?;
        println!("Report written to {path}");
    }

    info!("courtvalue finished");
    Ok(())
}

/// Initialize tracing to stderr without ANSI colors.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtvalue_app=info,courtvalue_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
