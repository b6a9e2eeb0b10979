//! Handover ceremony CLI
//!
//! Command-line interface for running a handover ceremony: joining, confirming
//! steps, watching progress and resetting the run.

use anyhow::{Context, Result};
use clap::Parser;
use handover_ceremony::CeremonyService;
use handover_cli::{commands, exit, CliConfig, Command};
use handover_effects::{build_storage, RealTimeHandler};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "handover")]
#[command(about = "Handover - four-step leadership handover ceremony", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".handover/config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit::for_error(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = CliConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    config.apply_env(|key| std::env::var(key).ok())?;

    let catalog = Arc::new(config.build_catalog()?);
    let storage = build_storage(&config.storage);
    tracing::debug!(backend = storage.backend_type(), "Storage ready");

    let service = CeremonyService::new(
        catalog,
        storage,
        Arc::new(RealTimeHandler::new()),
        config.policy,
    );

    let mut stdout = std::io::stdout().lock();
    commands::run(
        cli.command,
        &service,
        config.watch.poll_interval_ms,
        &mut stdout,
    )
    .await
}
