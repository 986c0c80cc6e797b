// Benchwarmer entry point.
//
// Usage: benchwarmer [SNAPSHOT_PATH]
//
// The only argument is an optional snapshot path, read positionally; it
// overrides `report.snapshot_path` from config/report.toml. There is no flag
// parsing, so anything else (including `--help`) is taken as a path.
//
// Startup sequence:
// 1. Load config (copies defaults/ into config/ on first run)
// 2. Initialize tracing (log to file, not terminal)
// 3. Load the season snapshot
// 4. Resolve slot requirements and the week range
// 5. Fan out per-week analysis onto the blocking pool
// 6. Aggregate the season report in week order
// 7. Write the optional CSV, print the JSON report to stdout

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use benchwarmer_core::config;
use benchwarmer_core::espn::SeasonSnapshot;
use benchwarmer_core::export;
use benchwarmer_core::lineup::{self, SlotRequirement};
use benchwarmer_core::season::{self, ReportBuilder, ReportEnvelope, WeekInput, WeekResult};
use tokio::task::JoinSet;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing (log to file, not terminal)
    init_tracing(&config.output.log_filter)?;
    info!("Benchwarmer starting up, team_id={}", config.report.team_id);

    // 3. Load the season snapshot (first CLI argument overrides the config path)
    let snapshot_path = resolve_snapshot_path(std::env::args(), &config.report.snapshot_path);
    let snapshot = SeasonSnapshot::load(&snapshot_path)
        .with_context(|| format!("failed to load snapshot {}", snapshot_path.display()))?;
    info!(
        "Snapshot loaded: league={}, season={}, {} teams",
        snapshot.league.name,
        snapshot.league.season_id,
        snapshot.teams.len()
    );

    // 4. Resolve slot requirements and week range
    let requirements = config.slot_requirements(&snapshot.league);
    let request = config.report_request(&snapshot.league);
    info!(
        "Analyzing weeks 1..={} (playoffs from week {}), {} starting slots",
        request.total_weeks,
        request.playoff_start_week,
        lineup::total_slot_count(&requirements)
    );

    let mut builder = ReportBuilder::new(&snapshot, request.team_id)?;
    let inputs = season::week_inputs(&snapshot, &request, &config.corrections)?;

    // 5. Fan out per-week analysis
    let results = analyze_weeks(inputs, requirements).await?;

    // 6. Aggregate in week order
    for result in results {
        builder.push_week(result);
    }
    let report = builder.finish();
    info!(
        "Report complete: {} weeks, {:.1} points left on bench, {} blown wins",
        report.weeks_analyzed(),
        report.total_points_left_on_bench,
        report.blown_wins
    );

    // 7. Outputs
    if let Some(csv_path) = &config.output.csv_path {
        export::export_weeks_csv(&report, Path::new(csv_path))
            .with_context(|| format!("failed to export CSV to {csv_path}"))?;
        info!("Weekly CSV written to {csv_path}");
    }

    let envelope = ReportEnvelope::new(report, chrono::Utc::now());
    let json = serde_json::to_string_pretty(&envelope).context("failed to serialize report")?;
    println!("{json}");

    Ok(())
}

/// The first positional argument after the program name, else the configured
/// path.
fn resolve_snapshot_path(mut args: impl Iterator<Item = String>, configured: &str) -> PathBuf {
    args.nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(configured))
}

/// Analyze every week on the blocking pool. The solver is CPU-bound, so each
/// week gets its own `spawn_blocking` task. Results come back sorted by week.
async fn analyze_weeks(
    inputs: Vec<WeekInput>,
    requirements: Vec<SlotRequirement>,
) -> anyhow::Result<Vec<WeekResult>> {
    let requirements = Arc::new(requirements);
    let mut tasks = JoinSet::new();

    for input in inputs {
        let requirements = Arc::clone(&requirements);
        tasks.spawn_blocking(move || {
            season::analyze_week(&input, &requirements)
                .with_context(|| format!("week {} analysis failed", input.week))
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let result = joined.context("week analysis task panicked")??;
        results.push(result);
    }
    results.sort_by_key(|r| r.week);
    Ok(results)
}

/// Set up tracing to write to a log file (not the terminal, which carries
/// the JSON report). `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("benchwarmer.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
