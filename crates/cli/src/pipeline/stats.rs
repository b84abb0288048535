//! Batch run statistics.

use std::time::Duration;

use observability::{MetricsSummary, TripMetricsAggregator};
use serde::Serialize;

/// One input that could not be analyzed
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub file: String,
    pub error: String,
}

/// Statistics from a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    /// Trip documents discovered
    pub files_total: usize,

    /// Documents analyzed (and written, when an output directory is set)
    pub succeeded: usize,

    /// Documents that failed to load, analyze or write
    pub failed: usize,

    /// Total duration of the run
    pub duration: Duration,

    pub failures: Vec<BatchFailure>,

    /// Trip metrics aggregator
    pub metrics: TripMetricsAggregator,
}

/// Serializable view of `BatchStats`
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub files_total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_secs: f64,
    pub trips_per_second: f64,
    pub failures: Vec<BatchFailure>,
    pub metrics: MetricsSummary,
}

impl BatchStats {
    /// Trips analyzed per second
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.succeeded as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn record_failure(&mut self, file: impl Into<String>, error: impl Into<String>) {
        self.failed += 1;
        self.metrics.record_failure();
        self.failures.push(BatchFailure {
            file: file.into(),
            error: error.into(),
        });
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            files_total: self.files_total,
            succeeded: self.succeeded,
            failed: self.failed,
            duration_secs: self.duration.as_secs_f64(),
            trips_per_second: self.throughput(),
            failures: self.failures.clone(),
            metrics: self.metrics.summary(),
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                      Batch Statistics                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Documents: {}", self.files_total);
        println!("   ├─ Succeeded: {}", self.succeeded);
        println!("   ├─ Failed: {}", self.failed);
        println!("   └─ Trips/s: {:.2}", self.throughput());

        let summary = self.metrics.summary();

        println!("\n📈 Trip Metrics");
        println!(
            "   ├─ Points: {} received, {} retained ({:.2}% rejected)",
            summary.total_points, summary.retained_points, summary.rejection_rate
        );
        println!("   ├─ Total distance: {:.3} km", summary.total_distance_km);
        println!("   ├─ Distance per trip (km): {}", summary.distance_km);
        println!("   ├─ Average speed (km/h): {}", summary.average_speed_kmh);
        println!(
            "   └─ Stops: {} ({})",
            summary.total_stops, summary.stop_minutes
        );

        if !summary.rejections.is_empty() {
            println!("\n🚫 Rejected Samples");
            for (reason, count) in &summary.rejections {
                println!("   ├─ {}: {}", reason, count);
            }
        }

        if !summary.completion_counts.is_empty() {
            println!("\n🏁 Completion");
            for (status, count) in &summary.completion_counts {
                println!("   ├─ {}: {}", status, count);
            }
        }

        if !summary.classification_counts.is_empty() {
            println!("\n🧭 Classifications");
            for (movement, count) in &summary.classification_counts {
                println!("   ├─ {}: {}", movement, count);
            }
        }

        if !self.failures.is_empty() {
            println!("\n⚠️  Failures");
            for failure in &self.failures {
                println!("   ├─ {}: {}", failure.file, failure.error);
            }
        }

        println!();
    }
}
