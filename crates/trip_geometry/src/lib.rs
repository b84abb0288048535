//! # Trip Geometry
//!
//! Reconstructs a vehicle's path from noisy location samples.
//!
//! Stages:
//! - Geodesy: haversine great-circle distance
//! - `LocationFilter`: drops samples implying impossible speed, acceleration
//!   or poor accuracy
//! - `DistanceAccumulator`: traveled distance over a (filtered) trace
//! - `StopDetector`: temporal clusters of near-stationary dwelling
//! - `AutoCompletePolicy`: decides whether an open trip can be closed
//! - `TripAnalyzer`: composes the above into a `TripReport`
//!
//! Every operation is a pure function of its borrowed input; analyzers can be
//! shared across threads freely.
//!
//! ## Example
//!
//! ```ignore
//! use trip_geometry::TripAnalyzer;
//!
//! let analyzer = TripAnalyzer::new(&config);
//! let report = analyzer.analyze(vehicle_id, &points, None, false);
//! println!("{:.2} km, {} stops", report.distance_km, report.stops.len());
//! ```

mod analyzer;
mod completion;
mod distance;
mod filter;
pub mod geodesy;
mod stops;

pub use analyzer::TripAnalyzer;
pub use completion::AutoCompletePolicy;
pub use distance::{accumulate_distance, DistanceAccumulator, DistanceSummary};
pub use filter::{FilterOutcome, LocationFilter};
pub use geodesy::{haversine_km, haversine_m};
pub use stops::{stop_confidence, StopDetector};

// Re-export contracts types
pub use contracts::{
    AutoCompleteConfig, CompletionStatus, DistanceConfig, FilteredTrace, GeoPoint,
    LocationFilterConfig, RejectReason, Rejection, StopDetectionConfig, StopPoint, TripReport,
};

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use contracts::GeoPoint;

    /// Meters per degree of latitude (and of longitude at the equator)
    pub const M_PER_DEG: f64 = 111_194.93;

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    pub fn at(secs: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(secs)
    }

    /// Point `north_m` meters north of the origin at `(0, lon0)`
    pub fn north(north_m: f64, secs: i64) -> GeoPoint {
        GeoPoint::new(north_m / M_PER_DEG, 0.0, at(secs))
    }

    /// Straight northbound drive at `speed_ms`, one sample every `step_s`
    pub fn drive(samples: usize, speed_ms: f64, step_s: i64) -> Vec<GeoPoint> {
        (0..samples)
            .map(|i| {
                let secs = i as i64 * step_s;
                north(speed_ms * secs as f64, secs)
            })
            .collect()
    }
}
