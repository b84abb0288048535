//! Trip analysis metrics.
//!
//! `record_*` functions emit through the `metrics` facade (exported by the
//! Prometheus recorder when installed, no-ops otherwise).
//! `TripMetricsAggregator` keeps an in-memory copy for end-of-run summaries.

use std::collections::BTreeMap;

use contracts::{ClassificationResult, CompletionStatus, MovementType, TripReport};
use metrics::{counter, gauge, histogram};
use serde::Serialize;

fn status_label(status: CompletionStatus) -> &'static str {
    match status {
        CompletionStatus::InProgress => "in_progress",
        CompletionStatus::Completed => "completed",
        CompletionStatus::AutoCompleted => "auto_completed",
    }
}

/// Record metrics for one analyzed trip
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_trip_metrics;
///
/// let report = analyzer.analyze(vehicle_id, &points, None, false);
/// record_trip_metrics(&report);
/// ```
pub fn record_trip_metrics(report: &TripReport) {
    counter!(
        "trip_telemetry_trips_total",
        "status" => status_label(report.completion_status)
    )
    .increment(1);

    counter!("trip_telemetry_points_received_total").increment(report.raw_point_count as u64);
    counter!("trip_telemetry_points_retained_total")
        .increment(report.retained_point_count() as u64);
    for (reason, count) in &report.rejections {
        counter!(
            "trip_telemetry_points_rejected_total",
            "reason" => reason.as_str()
        )
        .increment(*count as u64);
    }

    if report.skipped_segments > 0 {
        counter!("trip_telemetry_segments_skipped_total").increment(report.skipped_segments as u64);
    }

    histogram!("trip_telemetry_trip_distance_km").record(report.distance_km);
    histogram!("trip_telemetry_trip_duration_s").record(report.duration_ms as f64 / 1000.0);
    histogram!("trip_telemetry_average_speed_kmh").record(report.average_speed_kmh);
    gauge!("trip_telemetry_last_max_speed_kmh").set(report.max_speed_kmh);

    counter!("trip_telemetry_stops_detected_total").increment(report.stops.len() as u64);
    for stop in &report.stops {
        histogram!("trip_telemetry_stop_duration_min").record(stop.duration_minutes());
        histogram!("trip_telemetry_stop_confidence").record(stop.confidence);
    }
}

/// Record one (possibly smoothed) classification
pub fn record_classification(result: &ClassificationResult) {
    let label = result.movement_type.as_str();
    counter!("trip_telemetry_classifications_total", "type" => label).increment(1);
    histogram!("trip_telemetry_classification_confidence", "type" => label)
        .record(result.confidence);
}

/// Record the smoother replacing one movement type with another
pub fn record_smoother_override(from: MovementType, to: MovementType) {
    counter!(
        "trip_telemetry_smoother_overrides_total",
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
}

/// Record wall-clock time spent analyzing one input document
pub fn record_analysis_duration_ms(kind: &'static str, elapsed_ms: f64) {
    histogram!("trip_telemetry_analysis_duration_ms", "kind" => kind).record(elapsed_ms);
}

/// Record an input document that could not be loaded
pub fn record_input_failure(kind: &'static str) {
    counter!("trip_telemetry_input_failures_total", "kind" => kind).increment(1);
}

/// In-memory aggregation of trip and classification results
#[derive(Debug, Clone, Default)]
pub struct TripMetricsAggregator {
    pub total_trips: u64,
    pub failed_inputs: u64,
    pub total_points: u64,
    pub retained_points: u64,
    pub total_stops: u64,
    pub total_distance_km: f64,

    /// Rejected samples by reason label
    pub rejections: BTreeMap<String, u64>,

    /// Trips by completion status label
    pub completion_counts: BTreeMap<String, u64>,

    /// Classifications by movement type label
    pub classification_counts: BTreeMap<String, u64>,

    pub distance_stats: RunningStats,
    pub speed_stats: RunningStats,
    pub stop_minutes_stats: RunningStats,
}

impl TripMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one trip report into the totals
    pub fn update(&mut self, report: &TripReport) {
        self.total_trips += 1;
        self.total_points += report.raw_point_count as u64;
        self.retained_points += report.retained_point_count() as u64;
        self.total_stops += report.stops.len() as u64;
        self.total_distance_km += report.distance_km;

        for (reason, count) in &report.rejections {
            *self.rejections.entry(reason.as_str().to_string()).or_insert(0) += *count as u64;
        }
        *self
            .completion_counts
            .entry(status_label(report.completion_status).to_string())
            .or_insert(0) += 1;

        self.distance_stats.push(report.distance_km);
        if report.moving_duration_ms > 0 {
            self.speed_stats.push(report.average_speed_kmh);
        }
        for stop in &report.stops {
            self.stop_minutes_stats.push(stop.duration_minutes());
        }
    }

    pub fn record_classification(&mut self, result: &ClassificationResult) {
        *self
            .classification_counts
            .entry(result.movement_type.as_str().to_string())
            .or_insert(0) += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed_inputs += 1;
    }

    /// Combine with an aggregator filled elsewhere (e.g. another task)
    pub fn merge(&mut self, other: &TripMetricsAggregator) {
        self.total_trips += other.total_trips;
        self.failed_inputs += other.failed_inputs;
        self.total_points += other.total_points;
        self.retained_points += other.retained_points;
        self.total_stops += other.total_stops;
        self.total_distance_km += other.total_distance_km;

        for (ours, theirs) in [
            (&mut self.rejections, &other.rejections),
            (&mut self.completion_counts, &other.completion_counts),
            (&mut self.classification_counts, &other.classification_counts),
        ] {
            for (key, count) in theirs {
                *ours.entry(key.clone()).or_insert(0) += count;
            }
        }

        self.distance_stats.merge(&other.distance_stats);
        self.speed_stats.merge(&other.speed_stats);
        self.stop_minutes_stats.merge(&other.stop_minutes_stats);
    }

    pub fn summary(&self) -> MetricsSummary {
        let rejected: u64 = self.rejections.values().sum();
        MetricsSummary {
            total_trips: self.total_trips,
            failed_inputs: self.failed_inputs,
            total_points: self.total_points,
            retained_points: self.retained_points,
            rejection_rate: if self.total_points > 0 {
                rejected as f64 / self.total_points as f64 * 100.0
            } else {
                0.0
            },
            rejections: self.rejections.clone(),
            total_stops: self.total_stops,
            total_distance_km: self.total_distance_km,
            distance_km: StatsSummary::from(&self.distance_stats),
            average_speed_kmh: StatsSummary::from(&self.speed_stats),
            stop_minutes: StatsSummary::from(&self.stop_minutes_stats),
            completion_counts: self.completion_counts.clone(),
            classification_counts: self.classification_counts.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// End-of-run summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSummary {
    pub total_trips: u64,
    pub failed_inputs: u64,
    pub total_points: u64,
    pub retained_points: u64,
    /// Rejected share of received points (%)
    pub rejection_rate: f64,
    pub rejections: BTreeMap<String, u64>,
    pub total_stops: u64,
    pub total_distance_km: f64,
    pub distance_km: StatsSummary,
    pub average_speed_kmh: StatsSummary,
    pub stop_minutes: StatsSummary,
    pub completion_counts: BTreeMap<String, u64>,
    pub classification_counts: BTreeMap<String, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Trip Metrics Summary ===")?;
        writeln!(f, "Trips analyzed: {}", self.total_trips)?;
        if self.failed_inputs > 0 {
            writeln!(f, "Failed inputs: {}", self.failed_inputs)?;
        }
        writeln!(
            f,
            "Points: {} received, {} retained ({:.2}% rejected)",
            self.total_points, self.retained_points, self.rejection_rate
        )?;
        for (reason, count) in &self.rejections {
            writeln!(f, "  rejected/{reason}: {count}")?;
        }
        writeln!(f, "Total distance: {:.3} km", self.total_distance_km)?;
        writeln!(f, "Distance per trip (km): {}", self.distance_km)?;
        writeln!(f, "Average speed (km/h): {}", self.average_speed_kmh)?;
        writeln!(f, "Stops: {} ({})", self.total_stops, self.stop_minutes)?;

        if !self.completion_counts.is_empty() {
            writeln!(f, "Completion:")?;
            for (status, count) in &self.completion_counts {
                writeln!(f, "  {status}: {count}")?;
            }
        }
        if !self.classification_counts.is_empty() {
            writeln!(f, "Classifications:")?;
            for (movement, count) in &self.classification_counts {
                writeln!(f, "  {movement}: {count}")?;
            }
        }

        Ok(())
    }
}

/// Summary of a `RunningStats`
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford), mergeable across partitions
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    /// Combine two partitions (Chan et al. parallel update)
    pub fn merge(&mut self, other: &RunningStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = n_a + n_b;
        let delta = other.mean - self.mean;

        self.mean += delta * n_b / n;
        self.m2 += other.m2 + delta * delta * n_a * n_b / n;
        self.count += other.count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
