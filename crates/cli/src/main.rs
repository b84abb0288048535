//! # Trip Telemetry CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Single-trip analysis and window classification
//! - Concurrent batch analysis with a metrics summary
//! - Configuration validation and inspection

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::{init_with_config, LogTarget, ObservabilityConfig};
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_analyze, run_batch, run_classify, run_info, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Trip Telemetry CLI starting"
    );

    let result = match &cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Classify(args) => run_classify(args),
        Commands::Batch(args) => run_batch(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    init_with_config(logging_config(cli))
}

/// Logs on stderr, reports on stdout. `--quiet` overrides `RUST_LOG`.
fn logging_config(cli: &Cli) -> ObservabilityConfig {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    ObservabilityConfig {
        log_format: cli.log_format.clone().into(),
        metrics_port: None,
        default_log_level: default_log_level.to_string(),
        respect_rust_log: !cli.quiet,
        log_target: LogTarget::Stderr,
    }
}
