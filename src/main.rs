use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lead_dashboard::pipeline;
use lead_dashboard::report::{RenderOptions, ReportFormat, TerminalPresenter};
use lead_dashboard::rules::{default_tiers, load_tiers, TierSet};

/// Command-line arguments for lead_dashboard
#[derive(Parser, Debug)]
#[command(name = "lead_dashboard")]
#[command(about = "Merge two lead exports and triage them into priority tiers")]
#[command(version)]
struct Args {
    /// The two lead CSV exports
    files: Vec<PathBuf>,

    /// Tier definitions (YAML); the built-in tiers are used when omitted
    #[arg(short, long, env = "LEAD_DASHBOARD_TIERS")]
    tiers: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Markdown)]
    format: ReportFormat,

    /// Skip tiers with no leads
    #[arg(long)]
    hide_empty: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout carries only the dashboard
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_dashboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let tiers = match &args.tiers {
        Some(path) => {
            info!("Loading tiers from {}", path.display());
            load_tiers(path)?.tiers
        }
        None => default_tiers(),
    };
    let tiers = TierSet::new(tiers).context("Invalid tier configuration")?;

    let options = RenderOptions {
        format: args.format,
        hide_empty: args.hide_empty,
    };
    let mut presenter = TerminalPresenter::new(io::stdout(), options);

    // The presenter has already reported any failure
    match pipeline::invoke(&args.files, &tiers, &mut presenter).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
