//! Trip analysis: filter, distance, stops and completion in one pass.

use std::collections::BTreeMap;

use contracts::{AnalysisConfig, ClassificationResult, GeoPoint, TripReport, VehicleId};
use tracing::{info, instrument};

use crate::completion::AutoCompletePolicy;
use crate::distance::DistanceAccumulator;
use crate::filter::LocationFilter;
use crate::geodesy::point_distance_km;
use crate::stops::StopDetector;

/// Composes the trip-geometry stages into a `TripReport`
#[derive(Debug, Clone, Default)]
pub struct TripAnalyzer {
    filter: LocationFilter,
    distance: DistanceAccumulator,
    stops: StopDetector,
    completion: AutoCompletePolicy,
}

impl TripAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            filter: LocationFilter::new(config.filter.clone()),
            distance: DistanceAccumulator::new(config.distance.clone()),
            stops: StopDetector::new(config.stops.clone()),
            completion: AutoCompletePolicy::new(config.completion.clone()),
        }
    }

    /// Analyze one trace.
    ///
    /// `latest` is the most recent (smoothed) classification for the device,
    /// used only for auto-completion. `ended` marks a trip the caller already
    /// closed.
    #[instrument(skip_all, fields(vehicle = %vehicle_id, points = points.len()))]
    pub fn analyze(
        &self,
        vehicle_id: VehicleId,
        points: &[GeoPoint],
        latest: Option<&ClassificationResult>,
        ended: bool,
    ) -> TripReport {
        let outcome = self.filter.filter(points);
        let trace = outcome.trace;

        let mut rejections = BTreeMap::new();
        for rejection in &outcome.rejections {
            *rejections.entry(rejection.reason).or_insert(0) += 1;
        }

        let summary = self.distance.accumulate(&trace);
        let stops = self.stops.detect(&trace);

        let duration_ms = match (trace.first(), trace.last()) {
            (Some(first), Some(last)) => last.millis_since(first).max(0),
            _ => 0,
        };
        let stopped_ms: i64 = stops.iter().map(|s| s.duration_ms).sum();
        let moving_duration_ms = (duration_ms - stopped_ms).max(0);

        let average_speed_kmh = if moving_duration_ms > 0 {
            summary.distance_km / (moving_duration_ms as f64 / 3_600_000.0)
        } else {
            0.0
        };
        let max_speed_kmh = max_segment_speed_kmh(&trace);

        let completion_status =
            self.completion
                .evaluate(&trace, summary.distance_km, latest, ended);

        info!(
            retained = trace.len(),
            rejected = outcome.rejections.len(),
            distance_km = summary.distance_km,
            stops = stops.len(),
            status = ?completion_status,
            "trip analyzed"
        );

        TripReport {
            vehicle_id,
            raw_point_count: points.len(),
            rejections,
            route_points: trace,
            distance_km: summary.distance_km,
            skipped_segments: summary.skipped_segments,
            duration_ms,
            moving_duration_ms,
            average_speed_kmh,
            max_speed_kmh,
            stops,
            completion_status,
        }
    }
}

fn max_segment_speed_kmh(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .filter_map(|pair| {
            let dt_ms = pair[1].millis_since(&pair[0]);
            (dt_ms > 0).then(|| point_distance_km(&pair[0], &pair[1]) / (dt_ms as f64 / 3_600_000.0))
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{drive, north};
    use contracts::{CompletionStatus, MovementType, RejectReason};

    #[test]
    fn test_empty_trace_report() {
        let report = TripAnalyzer::default().analyze(VehicleId::from("v-0"), &[], None, false);
        assert_eq!(report.raw_point_count, 0);
        assert_eq!(report.distance_km, 0.0);
        assert_eq!(report.duration_ms, 0);
        assert_eq!(report.average_speed_kmh, 0.0);
        assert!(report.stops.is_empty());
        assert_eq!(report.completion_status, CompletionStatus::InProgress);
    }

    #[test]
    fn test_drive_report() {
        // 10 m/s for 200 s
        let mut points = drive(21, 10.0, 10);
        points[8].latitude += 1.0;

        let report = TripAnalyzer::default().analyze(VehicleId::from("v-1"), &points, None, false);
        assert_eq!(report.vehicle_id, "v-1");
        assert_eq!(report.raw_point_count, 21);
        assert_eq!(report.retained_point_count(), 20);
        assert_eq!(report.rejections.get(&RejectReason::Speed), Some(&1));
        assert!((report.distance_km - 2.0).abs() < 0.01);
        assert_eq!(report.duration_ms, 200_000);
        assert_eq!(report.moving_duration_ms, 200_000);
        assert!((report.average_speed_kmh - 36.0).abs() < 0.5);
        assert!((report.max_speed_kmh - 36.0).abs() < 0.5);
    }

    #[test]
    fn test_stop_time_excluded_from_moving_duration() {
        let mut points: Vec<GeoPoint> = (0..=5).map(|i| north(i as f64 * 100.0, i * 10)).collect();
        for k in 1..=8 {
            points.push(north(500.0, 50 + k * 30));
        }
        for i in 1..=5 {
            points.push(north(500.0 + i as f64 * 100.0, 290 + i * 10));
        }

        let report = TripAnalyzer::default().analyze(VehicleId::default(), &points, None, false);
        assert_eq!(report.stops.len(), 1);
        assert_eq!(report.duration_ms, 340_000);
        assert_eq!(report.moving_duration_ms, 340_000 - report.stops[0].duration_ms);
        assert!(report.average_speed_kmh > 30.0);
    }

    #[test]
    fn test_round_trip_auto_completes() {
        let mut points: Vec<GeoPoint> = (0..=6).map(|i| north(i as f64 * 100.0, i * 10)).collect();
        points.extend((1..=6).map(|i| north(600.0 - i as f64 * 100.0, 60 + i * 10)));
        let stationary = ClassificationResult {
            movement_type: MovementType::Stationary,
            confidence: 0.9,
            ..Default::default()
        };

        let analyzer = TripAnalyzer::default();
        let report = analyzer.analyze(VehicleId::default(), &points, Some(&stationary), false);
        assert_eq!(report.completion_status, CompletionStatus::AutoCompleted);

        let report = analyzer.analyze(VehicleId::default(), &points, None, true);
        assert_eq!(report.completion_status, CompletionStatus::Completed);
    }
}
