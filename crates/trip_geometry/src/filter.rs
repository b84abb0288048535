//! GPS anomaly filter.
//!
//! Each sample is checked against the last *retained* sample, never the last
//! raw one, so a burst of bad fixes cannot vouch for each other.

use contracts::{FilteredTrace, GeoPoint, LocationFilterConfig, RejectReason, Rejection};
use tracing::{debug, instrument, trace};

use crate::geodesy::point_distance_km;

/// Two fixes at the same instant count as the same position within this (m)
const SAME_POSITION_TOLERANCE_M: f64 = 0.5;

const KMH_PER_MS: f64 = 3.6;

/// Filter output: the retained trace plus what was dropped and why
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub trace: FilteredTrace,
    pub rejections: Vec<Rejection>,
}

/// Removes samples that imply impossible motion or carry poor accuracy
#[derive(Debug, Clone, Default)]
pub struct LocationFilter {
    config: LocationFilterConfig,
}

impl LocationFilter {
    pub fn new(config: LocationFilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocationFilterConfig {
        &self.config
    }

    /// Filter a raw, timestamp-ordered trace.
    ///
    /// The first sample is always retained. Order is preserved.
    #[instrument(skip_all, fields(points = points.len()))]
    pub fn filter(&self, points: &[GeoPoint]) -> FilterOutcome {
        let mut retained: Vec<GeoPoint> = Vec::with_capacity(points.len());
        let mut rejections = Vec::new();
        // Implied speed (m/s) of the segment ending at the last retained point.
        // Unknown until two points are retained.
        let mut last_speed_ms: Option<f64> = None;

        for (index, point) in points.iter().enumerate() {
            let Some(last) = retained.last() else {
                retained.push(point.clone());
                continue;
            };

            match self.check(last, point, last_speed_ms) {
                Ok(speed_ms) => {
                    if speed_ms.is_some() {
                        last_speed_ms = speed_ms;
                    }
                    retained.push(point.clone());
                }
                Err(reason) => {
                    debug!(
                        index,
                        reason = reason.as_str(),
                        latitude = point.latitude,
                        longitude = point.longitude,
                        "location sample rejected"
                    );
                    rejections.push(Rejection { index, reason });
                }
            }
        }

        debug!(
            retained = retained.len(),
            rejected = rejections.len(),
            "location filter finished"
        );

        FilterOutcome {
            trace: FilteredTrace::from_filtered(retained),
            rejections,
        }
    }

    /// Convenience wrapper returning only the retained trace
    pub fn filter_trace(&self, points: &[GeoPoint]) -> FilteredTrace {
        self.filter(points).trace
    }

    /// Accept `point` after `last`, returning the implied speed (m/s) of the
    /// new segment, or `None` when the sample is a same-instant duplicate.
    fn check(
        &self,
        last: &GeoPoint,
        point: &GeoPoint,
        last_speed_ms: Option<f64>,
    ) -> Result<Option<f64>, RejectReason> {
        if let Some(accuracy) = point.accuracy() {
            if accuracy > self.config.min_accuracy_meters {
                return Err(RejectReason::Accuracy);
            }
        }

        let distance_km = point_distance_km(last, point);
        let dt_ms = point.millis_since(last);

        if dt_ms <= 0 {
            // Infinite implied speed unless the position did not move either
            return if distance_km * 1000.0 <= SAME_POSITION_TOLERANCE_M {
                Ok(None)
            } else {
                Err(RejectReason::ZeroDuration)
            };
        }

        let dt_s = dt_ms as f64 / 1000.0;
        let speed_kmh = distance_km / (dt_s / 3600.0);
        if speed_kmh > self.config.max_speed_kmh {
            return Err(RejectReason::Speed);
        }

        let speed_ms = speed_kmh / KMH_PER_MS;
        if let Some(previous) = last_speed_ms {
            let acceleration = (speed_ms - previous).abs() / dt_s;
            trace!(speed_kmh, acceleration, "segment kinematics");
            if acceleration > self.config.max_acceleration_ms2 {
                return Err(RejectReason::Acceleration);
            }
        }

        Ok(Some(speed_ms))
    }
}
