//! Scout Engine — Binary Entrypoint
//! One batch run: load queries, search, score, rank, write the snapshot.
//! Scheduling is external (cron or equivalent).

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mission_scout::metrics::Metrics;
use mission_scout::{
    execute, load_queries, BraveSearchProvider, FileSnapshotSink, RunOutcome, ScoutSettings,
};

#[derive(Debug, Parser)]
#[command(name = "mission-scout", version, about = "Scan the web for opportunities and write a ranked snapshot")]
struct Cli {
    /// Load and log the query configuration; no searches, no snapshot write.
    #[arg(long)]
    dry_run: bool,
}

/// Compact logs by default; `SCOUT_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scout=info,warn"));

    let json = std::env::var("SCOUT_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env when present; no-op otherwise.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = ScoutSettings::from_env();
    info!(target: "scout", ?settings, dry_run = cli.dry_run, "settings resolved");

    let api_key = settings.api_key.clone().unwrap_or_default();
    if !cli.dry_run && api_key.is_empty() {
        bail!("BRAVE_API_KEY is not set (use --dry-run to validate configuration only)");
    }

    let metrics = match &settings.metrics_path {
        Some(_) => Some(Metrics::init()?),
        None => None,
    };

    let queries = load_queries(&settings.config_path);
    let provider = BraveSearchProvider::new(api_key, &settings)?;
    let sink = FileSnapshotSink::new(&settings.output_path);

    let outcome = execute(&provider, &queries, &settings, &sink, cli.dry_run).await?;

    if let (Some(m), Some(path)) = (&metrics, &settings.metrics_path) {
        if let Err(e) = m.write_textfile(path) {
            warn!(target: "scout", error = %e, "metrics export failed");
        }
    }

    match outcome {
        RunOutcome::DryRun { queries } => {
            info!(target: "scout", queries, "dry run complete");
        }
        RunOutcome::Completed(snapshot) => {
            info!(target: "scout", results = snapshot.total_results, "scout run complete");
        }
    }

    Ok(())
}
