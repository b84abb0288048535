//! Per-document processing: classification, trip analysis, metrics.

use std::time::Instant;

use contracts::{
    AccelerationSample, AnalysisConfig, ClassificationResult, SmoothingConfig, TripInput,
    TripReport,
};
use motion_classifier::{MovementClassifier, MovementHistory};
use serde::Serialize;
use trip_geometry::TripAnalyzer;

/// Raw and smoothed classification of one window
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationOutcome {
    pub raw: ClassificationResult,
    pub smoothed: ClassificationResult,
    /// Smoother replaced the raw movement type
    pub overridden: bool,
}

/// Everything computed for one trip document
#[derive(Debug, Clone, Serialize)]
pub struct TripOutcome {
    pub report: TripReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationOutcome>,
}

/// Composes the trip-geometry and motion-classification halves
#[derive(Debug, Clone)]
pub struct TripPipeline {
    analyzer: TripAnalyzer,
    classifier: MovementClassifier,
    smoothing: SmoothingConfig,
}

impl TripPipeline {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            analyzer: TripAnalyzer::new(config),
            classifier: MovementClassifier::new(config.classifier.clone()),
            smoothing: config.smoothing.clone(),
        }
    }

    /// Classify a window and smooth it against prior results (oldest first)
    pub fn classify(
        &self,
        samples: &[AccelerationSample],
        history: Vec<ClassificationResult>,
    ) -> ClassificationOutcome {
        let started = Instant::now();

        let raw = self.classifier.classify(samples);
        let mut rolling = MovementHistory::from_results(self.smoothing.clone(), history);
        let smoothed = rolling.smooth(raw.clone());
        let overridden = smoothed.movement_type != raw.movement_type;

        observability::record_classification(&smoothed);
        if overridden {
            observability::record_smoother_override(raw.movement_type, smoothed.movement_type);
        }
        observability::record_analysis_duration_ms(
            "classification",
            started.elapsed().as_secs_f64() * 1000.0,
        );

        ClassificationOutcome {
            raw,
            smoothed,
            overridden,
        }
    }

    /// Analyze a trip document.
    ///
    /// When the document carries an acceleration window, its smoothed
    /// classification drives auto-completion; otherwise the last recorded
    /// classification does.
    pub fn process(&self, input: TripInput) -> TripOutcome {
        let started = Instant::now();

        let prior_latest = input.history.last().cloned();
        let classification = if input.acceleration.is_empty() {
            None
        } else {
            Some(self.classify(&input.acceleration, input.history))
        };
        let latest = classification
            .as_ref()
            .map(|c| &c.smoothed)
            .or(prior_latest.as_ref());

        let report = self
            .analyzer
            .analyze(input.vehicle_id, &input.points, latest, input.ended);

        observability::record_trip_metrics(&report);
        observability::record_analysis_duration_ms(
            "trip",
            started.elapsed().as_secs_f64() * 1000.0,
        );

        TripOutcome {
            report,
            classification,
        }
    }
}
