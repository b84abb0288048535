//! Stop-point detection.
//!
//! Points are grouped into temporal clusters around a running centroid. A
//! cluster closes at the first point outside `max_radius_meters` (or at end of
//! input) and is reported when it lasted long enough and scores high enough.
//! Clusters are never merged across a moving gap.

use contracts::{GeoPoint, StopDetectionConfig, StopPoint};
use tracing::{debug, instrument};

use crate::geodesy::haversine_m;

const RADIUS_WEIGHT: f64 = 0.4;
const DURATION_WEIGHT: f64 = 0.35;
const DENSITY_WEIGHT: f64 = 0.25;

/// Sampling density (points per minute) that earns the full density score
const FULL_DENSITY_PPM: f64 = 2.0;

/// Confidence that a cluster is a real stop, in `[0, 1]`.
///
/// Grows as `spread_m` shrinks relative to the radius, as the cluster lasts
/// longer (saturating at twice the minimum duration), and with denser
/// sampling (saturating at two points per minute).
pub fn stop_confidence(
    duration_ms: i64,
    spread_m: f64,
    point_count: usize,
    config: &StopDetectionConfig,
) -> f64 {
    let tightness = if config.max_radius_meters > 0.0 {
        (1.0 - spread_m / config.max_radius_meters).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let duration_score = if config.min_duration_ms > 0 {
        (duration_ms as f64 / (2.0 * config.min_duration_ms as f64)).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let minutes = duration_ms as f64 / 60_000.0;
    let density_score = if minutes > 0.0 {
        (point_count as f64 / minutes / FULL_DENSITY_PPM).min(1.0)
    } else {
        0.0
    };

    RADIUS_WEIGHT * tightness + DURATION_WEIGHT * duration_score + DENSITY_WEIGHT * density_score
}

/// Candidate cluster under construction
struct Cluster<'a> {
    members: Vec<&'a GeoPoint>,
    lat_sum: f64,
    lon_sum: f64,
}

impl<'a> Cluster<'a> {
    fn start(point: &'a GeoPoint) -> Self {
        Self {
            members: vec![point],
            lat_sum: point.latitude,
            lon_sum: point.longitude,
        }
    }

    fn centroid(&self) -> (f64, f64) {
        let n = self.members.len() as f64;
        (self.lat_sum / n, self.lon_sum / n)
    }

    fn push(&mut self, point: &'a GeoPoint) {
        self.lat_sum += point.latitude;
        self.lon_sum += point.longitude;
        self.members.push(point);
    }

    /// Largest member distance from the final centroid (m)
    fn spread_m(&self) -> f64 {
        let centroid = self.centroid();
        self.members
            .iter()
            .map(|p| haversine_m(centroid, p.coordinates()))
            .fold(0.0, f64::max)
    }
}

/// Finds dwell clusters in a trace
#[derive(Debug, Clone, Default)]
pub struct StopDetector {
    config: StopDetectionConfig,
}

impl StopDetector {
    pub fn new(config: StopDetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StopDetectionConfig {
        &self.config
    }

    /// Detect stops in a timestamp-ordered trace (filtered or raw)
    #[instrument(skip_all, fields(points = points.len()))]
    pub fn detect(&self, points: &[GeoPoint]) -> Vec<StopPoint> {
        let mut stops = Vec::new();
        if points.len() < 2 {
            return stops;
        }

        let mut cluster = Cluster::start(&points[0]);
        for point in &points[1..] {
            if haversine_m(cluster.centroid(), point.coordinates()) <= self.config.max_radius_meters
            {
                cluster.push(point);
            } else {
                stops.extend(self.close(&cluster));
                cluster = Cluster::start(point);
            }
        }
        stops.extend(self.close(&cluster));

        debug!(stops = stops.len(), "stop detection finished");
        stops
    }

    fn close(&self, cluster: &Cluster<'_>) -> Option<StopPoint> {
        let (first, last) = match (cluster.members.first(), cluster.members.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return None,
        };

        let duration_ms = last.millis_since(first);
        if duration_ms < self.config.min_duration_ms {
            return None;
        }

        let spread_m = cluster.spread_m();
        let confidence = stop_confidence(duration_ms, spread_m, cluster.members.len(), &self.config);
        if confidence < self.config.min_confidence {
            debug!(duration_ms, spread_m, confidence, "cluster below confidence floor");
            return None;
        }

        let (latitude, longitude) = cluster.centroid();
        Some(StopPoint {
            latitude,
            longitude,
            start_time: first.timestamp,
            end_time: last.timestamp,
            duration_ms,
            confidence,
            point_count: cluster.members.len(),
        })
    }
}
