//! Batch runner - analyzes a directory of trip documents concurrently.
//!
//! Trip analysis is CPU-bound, so each document runs on the blocking pool;
//! a semaphore bounds how many are in flight.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::AnalysisConfig;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{BatchStats, TripOutcome, TripPipeline};
use crate::error::CliError;

const REPORT_SUFFIX: &str = ".report.json";

/// Batch configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory scanned for `*.json` trip documents
    pub input_dir: PathBuf,

    /// Where `<name>.report.json` files go (None = reports not written)
    pub output_dir: Option<PathBuf>,

    /// Documents analyzed in parallel (at least 1)
    pub concurrency: usize,
}

/// Runs the trip pipeline over every document of a directory
pub struct BatchRunner {
    config: BatchConfig,
    pipeline: Arc<TripPipeline>,
}

impl BatchRunner {
    pub fn new(config: BatchConfig, analysis: &AnalysisConfig) -> Self {
        Self {
            config,
            pipeline: Arc::new(TripPipeline::new(analysis)),
        }
    }

    /// Trip documents in the input directory, sorted by path.
    ///
    /// Previously written reports are skipped so the output directory may
    /// equal the input directory.
    pub fn discover(&self) -> Result<Vec<PathBuf>, CliError> {
        let dir = &self.config.input_dir;
        if !dir.is_dir() {
            return Err(CliError::input_not_found(dir.display().to_string()));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if is_trip_document(&path) {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(CliError::no_inputs(dir.display().to_string()));
        }
        Ok(files)
    }

    /// Analyze every discovered document to completion
    pub async fn run(self) -> Result<BatchStats> {
        let start_time = Instant::now();
        let files = self.discover()?;

        if let Some(output_dir) = &self.config.output_dir {
            std::fs::create_dir_all(output_dir).with_context(|| {
                format!("Failed to create output directory {}", output_dir.display())
            })?;
        }

        let concurrency = self.config.concurrency.max(1);
        info!(
            files = files.len(),
            concurrency,
            input = %self.config.input_dir.display(),
            "Starting batch analysis"
        );

        let mut stats = BatchStats {
            files_total: files.len(),
            ..Default::default()
        };

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks = JoinSet::new();

        for path in files {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| CliError::worker(e.to_string()))?;
            let pipeline = Arc::clone(&self.pipeline);
            let output_dir = self.config.output_dir.clone();

            tasks.spawn_blocking(move || {
                let _permit = permit;
                let result = process_file(&pipeline, &path, output_dir.as_deref());
                (path, result)
            });

            // Fold finished tasks while later ones are still being admitted
            while let Some(joined) = tasks.try_join_next() {
                let (path, result) = joined.map_err(|e| CliError::worker(e.to_string()))?;
                fold_result(&mut stats, &path, result);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            let (path, result) = joined.map_err(|e| CliError::worker(e.to_string()))?;
            fold_result(&mut stats, &path, result);
        }

        stats.duration = start_time.elapsed();
        info!(
            succeeded = stats.succeeded,
            failed = stats.failed,
            duration_secs = stats.duration.as_secs_f64(),
            "Batch analysis completed"
        );

        Ok(stats)
    }
}

fn is_trip_document(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.is_file() && name.ends_with(".json") && !name.ends_with(REPORT_SUFFIX)
}

/// Output path for a document's report
fn report_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("trip");
    output_dir.join(format!("{stem}{REPORT_SUFFIX}"))
}

fn process_file(
    pipeline: &TripPipeline,
    path: &Path,
    output_dir: Option<&Path>,
) -> Result<TripOutcome> {
    let input = config_loader::load_trip(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let outcome = pipeline.process(input);

    if let Some(output_dir) = output_dir {
        let target = report_path(output_dir, path);
        let json = serde_json::to_string_pretty(&outcome)?;
        std::fs::write(&target, json)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        debug!(report = %target.display(), "Report written");
    }

    Ok(outcome)
}

fn fold_result(stats: &mut BatchStats, path: &Path, result: Result<TripOutcome>) {
    let file = path.display().to_string();
    match result {
        Ok(outcome) => {
            stats.succeeded += 1;
            stats.metrics.update(&outcome.report);
            if let Some(classification) = &outcome.classification {
                stats.metrics.record_classification(&classification.smoothed);
            }
        }
        Err(e) => {
            warn!(file = %file, error = %format!("{e:#}"), "Trip document skipped");
            observability::record_input_failure("trip");
            stats.record_failure(file, format!("{e:#}"));
        }
    }
}
