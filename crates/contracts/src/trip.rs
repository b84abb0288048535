//! TripReport - trip analysis output, and the input documents it is built from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    AccelerationSample, ClassificationResult, FilteredTrace, GeoPoint, RejectReason, StopPoint,
    VehicleId,
};

/// Trip lifecycle as seen by the analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// Trip still open
    #[default]
    InProgress,
    /// Closed explicitly by the caller
    Completed,
    /// Closed because the vehicle returned to its start and the device
    /// stopped moving like a vehicle
    AutoCompleted,
}

/// Everything computed for one trip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripReport {
    pub vehicle_id: VehicleId,

    /// Samples received
    pub raw_point_count: usize,

    /// Samples dropped by the location filter, by reason
    pub rejections: BTreeMap<RejectReason, usize>,

    /// Filtered trace to persist as the route
    pub route_points: FilteredTrace,

    /// Traveled distance (km)
    pub distance_km: f64,

    /// Segments skipped by the distance guard rail
    pub skipped_segments: usize,

    /// First to last retained sample (ms)
    pub duration_ms: i64,

    /// Duration minus time spent in detected stops (ms)
    pub moving_duration_ms: i64,

    /// Distance over moving duration (km/h)
    pub average_speed_kmh: f64,

    /// Fastest retained segment (km/h)
    pub max_speed_kmh: f64,

    pub stops: Vec<StopPoint>,

    pub completion_status: CompletionStatus,
}

impl TripReport {
    /// Samples kept by the filter
    pub fn retained_point_count(&self) -> usize {
        self.route_points.len()
    }

    /// Samples dropped by the filter
    pub fn rejected_point_count(&self) -> usize {
        self.rejections.values().sum()
    }
}

/// Trip document: one vehicle's trace plus optional motion context
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripInput {
    #[serde(default)]
    pub vehicle_id: VehicleId,

    /// Raw location samples, ordered by timestamp
    pub points: Vec<GeoPoint>,

    /// Latest acceleration window from the device, if any
    #[serde(default)]
    pub acceleration: Vec<AccelerationSample>,

    /// Prior classifications, oldest first
    #[serde(default)]
    pub history: Vec<ClassificationResult>,

    /// Caller already closed the trip
    #[serde(default)]
    pub ended: bool,
}

/// Classification document: one acceleration window plus prior results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleWindowInput {
    pub samples: Vec<AccelerationSample>,

    #[serde(default)]
    pub history: Vec<ClassificationResult>,
}
