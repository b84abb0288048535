//! # Motion Classifier
//!
//! Classifies device movement (stationary / walking / vehicle) from short
//! windows of acceleration samples.
//!
//! Stages:
//! - `analyze_frequency`: zero-crossing spectral estimate of the vertical axis
//! - `match_patterns`: scores a spectrum against reference signal bands
//! - `MovementClassifier`: combines both with a magnitude-based stationary score
//! - `analyze_movement_sequence`: damps one-off flips using recent history
//! - `MovementHistory`: bounded rolling history owned by the caller
//!
//! ## Example
//!
//! ```ignore
//! use motion_classifier::{MovementClassifier, MovementHistory};
//!
//! let classifier = MovementClassifier::new(config.classifier.clone());
//! let mut history = MovementHistory::new(config.smoothing.clone());
//!
//! let raw = classifier.classify(&window);
//! let smoothed = history.smooth(raw);
//! ```

mod classifier;
mod history;
mod patterns;
mod smoother;
mod spectrum;

pub use classifier::MovementClassifier;
pub use history::MovementHistory;
pub use patterns::{match_patterns, PatternBand, VEHICLE_PATTERNS, WALKING_PATTERNS};
pub use smoother::analyze_movement_sequence;
pub use spectrum::{analyze_frequency, estimate_sampling_rate, MIN_SAMPLES, SEGMENT_SIZE};

// Re-export contracts types
pub use contracts::{
    AccelerationSample, ClassificationDetails, ClassificationResult, ClassifierConfig,
    FrequencyData, MovementType, PatternMatches, SmoothingConfig,
};

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use contracts::{AccelerationSample, ClassificationResult, MovementType};

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    /// Vertical sine of `freq_hz` and amplitude `amp`, sampled at `rate_hz`
    pub fn sine_window(freq_hz: f64, amp: f64, rate_hz: f64, samples: usize) -> Vec<AccelerationSample> {
        let step_us = (1_000_000.0 / rate_hz) as i64;
        (0..samples)
            .map(|i| {
                let t = i as f64 / rate_hz;
                // Phase offset keeps samples off exact zeros
                let y = amp * (2.0 * std::f64::consts::PI * freq_hz * t + 0.3).sin();
                AccelerationSample::new(0.0, y, 0.0, t0() + Duration::microseconds(i as i64 * step_us))
            })
            .collect()
    }

    pub fn result(movement_type: MovementType, confidence: f64) -> ClassificationResult {
        let mut r = ClassificationResult {
            movement_type,
            confidence,
            ..Default::default()
        };
        if let Some(c) = r.details.confidence_mut(movement_type) {
            *c = confidence;
        }
        r
    }
}
