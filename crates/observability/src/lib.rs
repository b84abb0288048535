//! # Observability
//!
//! Tracing initialization and Prometheus metrics for trip analysis.
//!
//! ## Features
//!
//! - Tracing setup (JSON / pretty / compact)
//! - Prometheus exporter
//! - Trip and classification metrics with in-memory aggregation
//!
//! ## Example
//!
//! ```ignore
//! use observability::{init_with_config, metrics, ObservabilityConfig};
//!
//! init_with_config(ObservabilityConfig::default())?;
//!
//! let report = analyzer.analyze(vehicle_id, &points, None, false);
//! metrics::record_trip_metrics(&report);
//! ```

pub mod metrics;

use std::str::FromStr;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub use crate::metrics::{
    record_analysis_duration_ms, record_classification, record_input_failure,
    record_smoother_override, record_trip_metrics, MetricsSummary, RunningStats, StatsSummary,
    TripMetricsAggregator,
};

/// Initialize tracing and the Prometheus exporter with defaults
///
/// - Tracing: JSON lines, honours `RUST_LOG`
/// - Prometheus: listens on 0.0.0.0:9000
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
    /// Filter used when `RUST_LOG` is unset
    pub default_log_level: String,
    /// When false, `default_log_level` wins over `RUST_LOG`
    pub respect_rust_log: bool,
    pub log_target: LogTarget,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            metrics_port: Some(9000),
            default_log_level: "info".to_string(),
            respect_rust_log: true,
            log_target: LogTarget::Stdout,
        }
    }
}

/// Stream the log layer writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogTarget {
    #[default]
    Stdout,
    /// Keeps stdout free for command output
    Stderr,
}

impl LogTarget {
    fn make_writer(self) -> BoxMakeWriter {
        match self {
            Self::Stdout => BoxMakeWriter::new(std::io::stdout),
            Self::Stderr => BoxMakeWriter::new(std::io::stderr),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON lines
    #[default]
    Json,
    /// Multi-line human readable
    Pretty,
    /// Single-line human readable
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{other}' (json|pretty|compact)")),
        }
    }
}

/// Initialize with a custom configuration
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = if config.respect_rust_log {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level))
    } else {
        EnvFilter::new(&config.default_log_level)
    };

    let writer = config.log_target.make_writer();
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(writer))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(writer))
            .try_init(),
    }
    .context("Failed to initialize tracing subscriber")?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::info!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}

/// Install only the Prometheus exporter
///
/// For callers whose tracing is already initialized (e.g. `batch
/// --metrics-port`).
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port, "Prometheus metrics endpoint initialized");
    Ok(())
}
