//! `batch` command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::analyze::load_config;
use crate::cli::BatchArgs;
use crate::pipeline::{BatchConfig, BatchRunner};

/// Execute the `batch` command
pub async fn run_batch(args: &BatchArgs) -> Result<()> {
    info!(
        input = %args.input.display(),
        concurrency = args.concurrency,
        "Starting batch"
    );

    let config = load_config(args.config.as_deref())?;

    if args.metrics_port > 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    let runner = BatchRunner::new(
        BatchConfig {
            input_dir: args.input.clone(),
            output_dir: args.output.clone(),
            concurrency: args.concurrency,
        },
        &config,
    );

    let stats = tokio::select! {
        result = runner.run() => result?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            warn!("Received Ctrl+C, abandoning batch");
            anyhow::bail!("Batch interrupted");
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&stats.summary())
            .context("Failed to serialize batch summary")?;
        println!("{}", json);
    } else {
        stats.print_summary();
    }

    if stats.failed > 0 {
        warn!(failed = stats.failed, "Some trip documents could not be analyzed");
    }

    Ok(())
}
