//! GeoPoint / FilteredTrace / StopPoint - trip geometry contracts
//!
//! Location samples flow in as `GeoPoint`s, the location filter narrows them
//! into a `FilteredTrace`, and the stop detector reports `StopPoint`s.

use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open-ended metadata bag attached to a location sample.
///
/// Passed through opaquely; only the documented optional keys
/// (`accuracy`, `speed`, `heading`) are ever read.
pub type Metadata = Map<String, Value>;

/// Metadata key: horizontal accuracy in meters
pub const META_ACCURACY: &str = "accuracy";
/// Metadata key: device-reported speed in km/h
pub const META_SPEED: &str = "speed";
/// Metadata key: heading in degrees
pub const META_HEADING: &str = "heading";

/// One timestamped location sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude (degrees)
    pub latitude: f64,

    /// Longitude (degrees)
    pub longitude: f64,

    /// Sample instant
    pub timestamp: DateTime<Utc>,

    /// Free-form metadata
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Metadata,
}

impl GeoPoint {
    /// Create a point without metadata
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
            metadata: Metadata::new(),
        }
    }

    /// Attach a metadata entry (builder style)
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Stated horizontal accuracy in meters, if present and numeric
    pub fn accuracy(&self) -> Option<f64> {
        self.meta_f64(META_ACCURACY)
    }

    /// Device-reported speed in km/h, if present and numeric
    pub fn speed(&self) -> Option<f64> {
        self.meta_f64(META_SPEED)
    }

    /// Heading in degrees, if present and numeric
    pub fn heading(&self) -> Option<f64> {
        self.meta_f64(META_HEADING)
    }

    /// `(latitude, longitude)` pair
    #[inline]
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Signed milliseconds from `earlier` to `self`
    #[inline]
    pub fn millis_since(&self, earlier: &GeoPoint) -> i64 {
        (self.timestamp - earlier.timestamp).num_milliseconds()
    }

    fn meta_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(Value::as_f64)
    }
}

/// Ordered subsequence of `GeoPoint`s with implausible samples removed.
///
/// Every consecutive pair respects the speed and acceleration bounds of the
/// filter that produced it; every point after the first meets its accuracy
/// bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilteredTrace(Vec<GeoPoint>);

impl FilteredTrace {
    /// Wrap points already checked by a location filter.
    pub fn from_filtered(points: Vec<GeoPoint>) -> Self {
        Self(points)
    }

    /// Borrow the retained points
    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    /// Take ownership of the retained points
    pub fn into_points(self) -> Vec<GeoPoint> {
        self.0
    }
}

impl Deref for FilteredTrace {
    type Target = [GeoPoint];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Why the location filter dropped a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Stated accuracy worse than the configured bound
    Accuracy,
    /// Implied speed above the configured maximum
    Speed,
    /// Implied acceleration above the configured maximum
    Acceleration,
    /// Same timestamp as the last retained point but a different position
    ZeroDuration,
}

impl RejectReason {
    /// Stable lowercase label (metrics / logs)
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Accuracy => "accuracy",
            RejectReason::Speed => "speed",
            RejectReason::Acceleration => "acceleration",
            RejectReason::ZeroDuration => "zero_duration",
        }
    }
}

/// A sample dropped by the location filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    /// Index into the raw input sequence
    pub index: usize,
    /// Rejection cause
    pub reason: RejectReason,
}

/// A detected dwell: the trace stayed within a small radius for a while
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopPoint {
    /// Representative latitude (cluster centroid)
    pub latitude: f64,

    /// Representative longitude (cluster centroid)
    pub longitude: f64,

    /// First sample in the cluster
    pub start_time: DateTime<Utc>,

    /// Last sample in the cluster
    pub end_time: DateTime<Utc>,

    /// `end_time - start_time` in milliseconds
    pub duration_ms: i64,

    /// Detection confidence in `[0, 1]`
    pub confidence: f64,

    /// Number of samples in the cluster
    pub point_count: usize,
}

impl StopPoint {
    /// Duration in minutes, for display
    pub fn duration_minutes(&self) -> f64 {
        self.duration_ms as f64 / 60_000.0
    }
}
