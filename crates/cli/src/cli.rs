//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Trip Telemetry - GPS trip reconstruction and movement classification
#[derive(Parser, Debug)]
#[command(
    name = "trip-telemetry",
    author,
    version,
    about = "Vehicle trip telemetry analysis",
    long_about = "Reconstructs vehicle trips from noisy GPS samples and classifies device \n\
                  movement from accelerometer windows.\n\n\
                  Filters GPS anomalies, computes traveled distance, detects stop points \n\
                  and smooths stationary / walking / vehicle classifications over time."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TRIP_TELEMETRY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TRIP_TELEMETRY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one trip document: filter, distance, stops, completion
    Analyze(AnalyzeArgs),

    /// Classify one acceleration window, smoothed against its history
    Classify(ClassifyArgs),

    /// Analyze every trip document in a directory concurrently
    Batch(BatchArgs),

    /// Validate an analysis configuration file
    Validate(ValidateArgs),

    /// Display the effective analysis configuration
    Info(InfoArgs),
}

/// Arguments for the `analyze` command
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Trip document (JSON)
    #[arg(short, long)]
    pub trace: PathBuf,

    /// Analysis configuration (TOML or JSON); defaults when omitted
    #[arg(short, long, env = "TRIP_TELEMETRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Treat the trip as explicitly ended
    #[arg(long)]
    pub ended: bool,

    /// Include the filtered route in human-readable output
    #[arg(long)]
    pub route: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `classify` command
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Sample-window document (JSON)
    #[arg(short, long)]
    pub samples: PathBuf,

    /// Analysis configuration (TOML or JSON); defaults when omitted
    #[arg(short, long, env = "TRIP_TELEMETRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `batch` command
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// Directory containing trip documents (*.json)
    #[arg(short, long, env = "TRIP_TELEMETRY_INPUT")]
    pub input: PathBuf,

    /// Directory to write one `<name>.report.json` per trip
    #[arg(short, long, env = "TRIP_TELEMETRY_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Analysis configuration (TOML or JSON); defaults when omitted
    #[arg(short, long, env = "TRIP_TELEMETRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Trips analyzed in parallel
    #[arg(long, default_value = "4", env = "TRIP_TELEMETRY_CONCURRENCY")]
    pub concurrency: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TRIP_TELEMETRY_METRICS_PORT")]
    pub metrics_port: u16,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "analysis.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; defaults when omitted
    #[arg(short, long, env = "TRIP_TELEMETRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the reference signal bands used by the classifier
    #[arg(long)]
    pub patterns: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
