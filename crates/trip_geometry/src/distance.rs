//! Traveled distance over a trace.

use contracts::{DistanceConfig, GeoPoint};
use tracing::warn;

use crate::geodesy::point_distance_km;

/// Sum of consecutive haversine segments (km).
///
/// Zero for fewer than two points.
pub fn accumulate_distance(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| point_distance_km(&pair[0], &pair[1]))
        .sum()
}

/// Distance result with guard-rail bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistanceSummary {
    /// Total counted distance (km)
    pub distance_km: f64,
    /// Segments longer than the configured cap, left out of the total
    pub skipped_segments: usize,
    /// Longest counted segment (km)
    pub max_segment_km: f64,
}

/// Distance accumulator with an optional per-segment cap
#[derive(Debug, Clone, Default)]
pub struct DistanceAccumulator {
    config: DistanceConfig,
}

impl DistanceAccumulator {
    pub fn new(config: DistanceConfig) -> Self {
        Self { config }
    }

    pub fn accumulate(&self, points: &[GeoPoint]) -> DistanceSummary {
        let mut summary = DistanceSummary::default();

        for pair in points.windows(2) {
            let segment = point_distance_km(&pair[0], &pair[1]);
            if let Some(cap) = self.config.max_segment_km {
                if segment > cap {
                    warn!(
                        segment_km = segment,
                        cap_km = cap,
                        "segment exceeds cap, not counted"
                    );
                    summary.skipped_segments += 1;
                    continue;
                }
            }
            summary.distance_km += segment;
            summary.max_segment_km = summary.max_segment_km.max(segment);
        }

        summary
    }
}
