//! Movement classification from one acceleration window.

use contracts::{
    AccelerationSample, ClassificationDetails, ClassificationResult, ClassifierConfig,
    MovementType, PatternMatches,
};
use tracing::{debug, instrument};

use crate::patterns::{match_patterns, VEHICLE_PATTERNS, WALKING_PATTERNS};
use crate::spectrum::analyze_frequency;

/// Stationary / walking / vehicle classifier
#[derive(Debug, Clone, Default)]
pub struct MovementClassifier {
    config: ClassifierConfig,
}

impl MovementClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Stationary confidence from mean magnitude: 1 at rest, falling linearly
    /// to 0 at the configured threshold
    pub fn stationary_confidence(&self, samples: &[AccelerationSample]) -> f64 {
        if samples.is_empty() || self.config.stationary_magnitude_threshold <= 0.0 {
            return 0.0;
        }
        let mean = samples.iter().map(|s| s.magnitude).sum::<f64>() / samples.len() as f64;
        (1.0 - mean / self.config.stationary_magnitude_threshold).clamp(0.0, 1.0)
    }

    #[instrument(skip_all, fields(samples = samples.len()))]
    pub fn classify(&self, samples: &[AccelerationSample]) -> ClassificationResult {
        let frequency_signature = analyze_frequency(samples);
        let vehicle = match_patterns(&frequency_signature, &VEHICLE_PATTERNS);
        let walking = match_patterns(&frequency_signature, &WALKING_PATTERNS);
        let stationary = self.stationary_confidence(samples);

        let threshold = self.config.pattern_match_threshold;
        let (movement_type, confidence) = if stationary > self.config.stationary_confidence_cutoff
        {
            (MovementType::Stationary, stationary)
        } else if vehicle > walking && vehicle > threshold {
            (MovementType::Vehicle, vehicle)
        } else if walking > threshold {
            (MovementType::Walking, walking)
        } else {
            (MovementType::Unknown, self.config.unknown_confidence)
        };

        debug!(
            %movement_type,
            confidence,
            vehicle,
            walking,
            stationary,
            peak = frequency_signature.peak_frequency,
            "window classified"
        );

        ClassificationResult {
            movement_type,
            confidence,
            details: ClassificationDetails {
                vehicle_confidence: vehicle,
                walking_confidence: walking,
                stationary_confidence: stationary,
                frequency_signature,
                pattern_matches: PatternMatches {
                    vehicle_pattern_match: vehicle,
                    walking_pattern_match: walking,
                },
            },
        }
    }
}
