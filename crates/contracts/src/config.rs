//! AnalysisConfig - Config Loader output
//!
//! One document tunes every stage: location filter, distance guard rail,
//! stop detection, movement classification, temporal smoothing and trip
//! auto-completion. Every section falls back to the defaults trip handlers
//! use in production, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Configuration version
    pub version: ConfigVersion,

    #[validate(nested)]
    pub filter: LocationFilterConfig,

    #[validate(nested)]
    pub distance: DistanceConfig,

    #[validate(nested)]
    pub stops: StopDetectionConfig,

    #[validate(nested)]
    pub classifier: ClassifierConfig,

    #[validate(nested)]
    pub smoothing: SmoothingConfig,

    #[validate(nested)]
    pub completion: AutoCompleteConfig,
}

/// GPS anomaly filter bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LocationFilterConfig {
    /// Maximum plausible speed between retained points (km/h)
    #[validate(range(exclusive_min = 0.0))]
    pub max_speed_kmh: f64,

    /// Maximum plausible change of implied speed (m/s²)
    #[validate(range(exclusive_min = 0.0))]
    pub max_acceleration_ms2: f64,

    /// Points with a stated accuracy above this are dropped (m)
    #[validate(range(exclusive_min = 0.0))]
    pub min_accuracy_meters: f64,
}

impl Default for LocationFilterConfig {
    fn default() -> Self {
        Self {
            max_speed_kmh: 180.0,
            max_acceleration_ms2: 5.0,
            min_accuracy_meters: 100.0,
        }
    }
}

/// Distance accumulation guard rail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DistanceConfig {
    /// Skip any single segment longer than this (km); `None` = no cap.
    /// Useful when summing traces that did not go through the filter.
    #[validate(range(exclusive_min = 0.0))]
    pub max_segment_km: Option<f64>,
}

/// Stop-point detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StopDetectionConfig {
    /// Minimum dwell duration (ms)
    #[validate(range(min = 1))]
    pub min_duration_ms: i64,

    /// Maximum distance from the cluster centroid (m)
    #[validate(range(exclusive_min = 0.0))]
    pub max_radius_meters: f64,

    /// Stops scoring below this are not reported
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_confidence: f64,
}

impl Default for StopDetectionConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: 3 * 60 * 1000,
            max_radius_meters: 50.0,
            min_confidence: 0.5,
        }
    }
}

/// Movement classifier decision policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Mean magnitude at which stationary confidence reaches 0 (m/s²)
    #[validate(range(exclusive_min = 0.0))]
    pub stationary_magnitude_threshold: f64,

    /// Stationary confidence must exceed this to win
    #[validate(range(min = 0.0, max = 1.0))]
    pub stationary_confidence_cutoff: f64,

    /// Vehicle / walking match must exceed this to win
    #[validate(range(min = 0.0, max = 1.0))]
    pub pattern_match_threshold: f64,

    /// Confidence reported with `UNKNOWN`
    #[validate(range(min = 0.0, max = 1.0))]
    pub unknown_confidence: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            stationary_magnitude_threshold: 0.3,
            stationary_confidence_cutoff: 0.8,
            pattern_match_threshold: 0.6,
            unknown_confidence: 0.3,
        }
    }
}

/// Temporal consistency smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SmoothingConfig {
    /// History entries required before smoothing kicks in
    #[validate(range(min = 1))]
    pub min_history: usize,

    /// Share of the total vote the dominant type needs to override
    #[validate(range(min = 0.0, max = 1.0))]
    pub override_share: f64,

    /// Ceiling for a blended confidence
    #[validate(range(min = 0.0, max = 1.0))]
    pub max_confidence: f64,

    /// Factor applied to non-dominant sub-confidences on override
    #[validate(range(min = 0.0, max = 1.0))]
    pub dampening_factor: f64,

    /// Entries a rolling history keeps
    #[validate(range(min = 1))]
    pub history_capacity: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            min_history: 3,
            override_share: 0.6,
            max_confidence: 0.95,
            dampening_factor: 0.7,
            history_capacity: 10,
        }
    }
}

/// Trip auto-completion policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AutoCompleteConfig {
    /// Last point must be this close to the first (m)
    #[validate(range(exclusive_min = 0.0))]
    pub return_radius_meters: f64,

    /// Trips shorter than this never auto-complete (km)
    #[validate(range(min = 0.0))]
    pub min_trip_distance_km: f64,

    /// Latest classification must be at least this confident
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_classification_confidence: f64,
}

impl Default for AutoCompleteConfig {
    fn default() -> Self {
        Self {
            return_radius_meters: 100.0,
            min_trip_distance_km: 0.5,
            min_classification_confidence: 0.7,
        }
    }
}
