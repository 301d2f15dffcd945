use anyhow::Result;
use clap::{ArgAction, Parser};
use downtime_rules::{FileOutcome, Pipeline};
use std::path::PathBuf;
use tracing::info;

mod config;
mod report;

#[derive(Parser, Debug)]
#[command(
    name = "downtime-report",
    version,
    about = "Monthly downtime report from filler-line detention exports"
)]
struct Cli {
    /// Directory holding the exports (not searched recursively)
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// TOML config (defaults to <dir>/downtime.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the aggregated snapshot as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log more on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load_config(&cli.dir, cli.config.as_deref())?;
    let mut pipeline = Pipeline::new(cfg.extractor()?, cfg.pipeline_options());
    let outcomes = pipeline.run_dir(&cli.dir)?;

    let recorded = outcomes
        .iter()
        .filter(|(_, o)| *o != FileOutcome::Skipped)
        .count();
    info!(files = outcomes.len(), recorded, "scan finished");

    let snapshot = pipeline.snapshot();
    if snapshot.is_empty() {
        info!("no downtime exports processed; nothing to report");
        return Ok(());
    }

    let out = if cli.json {
        report::render_json(&snapshot)?
    } else {
        report::render_text(&snapshot, cfg.report.sample_size)?
    };
    print!("{out}");
    Ok(())
}

/// Diagnostics go to stderr so the report on stdout stays clean.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .init();
}
