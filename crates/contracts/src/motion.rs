//! Acceleration samples and movement classification contracts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reading of a 3-axis accelerometer (linear acceleration, m/s²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelerationSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// Euclidean norm of (x, y, z), supplied by the producer
    pub magnitude: f64,

    /// Sample instant
    pub timestamp: DateTime<Utc>,
}

impl AccelerationSample {
    /// Create a sample, deriving `magnitude` from the three axes
    pub fn new(x: f64, y: f64, z: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            x,
            y,
            z,
            magnitude: (x * x + y * y + z * z).sqrt(),
            timestamp,
        }
    }
}

/// Cheap spectral summary of one sample window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyData {
    /// Whole-window zero-crossing frequency (Hz); `None` when the window is
    /// too short to estimate
    pub peak_frequency: Option<f64>,

    /// Mean absolute vertical acceleration (m/s²)
    pub spectral_energy: f64,

    /// Up to three per-segment frequencies, descending (Hz)
    pub dominant_frequencies: Vec<f64>,

    /// Mean of the per-segment frequencies (Hz)
    pub spectral_centroid: f64,
}

impl FrequencyData {
    /// Degenerate result for windows below the minimum sample count
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no frequency could be estimated
    pub fn is_empty(&self) -> bool {
        self.peak_frequency.is_none()
    }
}

/// Detected device movement mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Stationary,
    Walking,
    Vehicle,
    #[default]
    Unknown,
}

impl MovementType {
    /// All variants, in tie-break order
    pub const ALL: [MovementType; 4] = [
        MovementType::Stationary,
        MovementType::Walking,
        MovementType::Vehicle,
        MovementType::Unknown,
    ];

    /// Stable uppercase label (metrics / logs)
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Stationary => "STATIONARY",
            MovementType::Walking => "WALKING",
            MovementType::Vehicle => "VEHICLE",
            MovementType::Unknown => "UNKNOWN",
        }
    }

    /// Position in `ALL`
    pub fn index(&self) -> usize {
        match self {
            MovementType::Stationary => 0,
            MovementType::Walking => 1,
            MovementType::Vehicle => 2,
            MovementType::Unknown => 3,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference-signature match scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternMatches {
    pub vehicle_pattern_match: f64,
    pub walking_pattern_match: f64,
}

/// Raw sub-scores behind a classification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationDetails {
    pub vehicle_confidence: f64,
    pub walking_confidence: f64,
    pub stationary_confidence: f64,
    pub frequency_signature: FrequencyData,
    pub pattern_matches: PatternMatches,
}

impl ClassificationDetails {
    /// Mutable sub-confidence for a movement type (`None` for `Unknown`)
    pub fn confidence_mut(&mut self, movement: MovementType) -> Option<&mut f64> {
        match movement {
            MovementType::Stationary => Some(&mut self.stationary_confidence),
            MovementType::Walking => Some(&mut self.walking_confidence),
            MovementType::Vehicle => Some(&mut self.vehicle_confidence),
            MovementType::Unknown => None,
        }
    }
}

/// Classifier output for one sample window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub movement_type: MovementType,

    /// Confidence in `[0, 1]`
    pub confidence: f64,

    pub details: ClassificationDetails,
}
