//! Trip auto-completion policy.

use contracts::{AutoCompleteConfig, ClassificationResult, CompletionStatus, GeoPoint, MovementType};
use tracing::debug;

use crate::geodesy::point_distance_m;

/// Decides whether an open trip may be closed automatically.
///
/// A trip auto-completes when the vehicle is back near its start after a
/// meaningful distance and the device no longer moves like a vehicle.
#[derive(Debug, Clone, Default)]
pub struct AutoCompletePolicy {
    config: AutoCompleteConfig,
}

impl AutoCompletePolicy {
    pub fn new(config: AutoCompleteConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(
        &self,
        trace: &[GeoPoint],
        distance_km: f64,
        latest: Option<&ClassificationResult>,
        ended: bool,
    ) -> CompletionStatus {
        if ended {
            return CompletionStatus::Completed;
        }

        let (Some(first), Some(last)) = (trace.first(), trace.last()) else {
            return CompletionStatus::InProgress;
        };
        if trace.len() < 2 || distance_km < self.config.min_trip_distance_km {
            return CompletionStatus::InProgress;
        }

        let from_start_m = point_distance_m(first, last);
        if from_start_m > self.config.return_radius_meters {
            return CompletionStatus::InProgress;
        }

        let settled = latest.is_some_and(|c| {
            matches!(c.movement_type, MovementType::Stationary | MovementType::Walking)
                && c.confidence >= self.config.min_classification_confidence
        });
        if !settled {
            return CompletionStatus::InProgress;
        }

        debug!(distance_km, from_start_m, "trip returned to start, auto-completing");
        CompletionStatus::AutoCompleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::north;

    fn classified(movement_type: MovementType, confidence: f64) -> ClassificationResult {
        ClassificationResult {
            movement_type,
            confidence,
            ..Default::default()
        }
    }

    /// Out 1 km and back
    fn round_trip() -> Vec<GeoPoint> {
        let mut points: Vec<GeoPoint> = (0..=10).map(|i| north(i as f64 * 100.0, i * 10)).collect();
        points.extend((1..=10).map(|i| north(1_000.0 - i as f64 * 100.0, 100 + i * 10)));
        points
    }

    #[test]
    fn test_ended_trip_is_completed() {
        let policy = AutoCompletePolicy::default();
        assert_eq!(policy.evaluate(&[], 0.0, None, true), CompletionStatus::Completed);
    }

    #[test]
    fn test_round_trip_with_walking_auto_completes() {
        let policy = AutoCompletePolicy::default();
        let walking = classified(MovementType::Walking, 0.8);
        assert_eq!(
            policy.evaluate(&round_trip(), 2.0, Some(&walking), false),
            CompletionStatus::AutoCompleted
        );
    }

    #[test]
    fn test_still_driving_stays_open() {
        let policy = AutoCompletePolicy::default();
        let vehicle = classified(MovementType::Vehicle, 0.9);
        assert_eq!(
            policy.evaluate(&round_trip(), 2.0, Some(&vehicle), false),
            CompletionStatus::InProgress
        );
        assert_eq!(
            policy.evaluate(&round_trip(), 2.0, None, false),
            CompletionStatus::InProgress
        );
    }

    #[test]
    fn test_low_confidence_stays_open() {
        let policy = AutoCompletePolicy::default();
        let unsure = classified(MovementType::Stationary, 0.5);
        assert_eq!(
            policy.evaluate(&round_trip(), 2.0, Some(&unsure), false),
            CompletionStatus::InProgress
        );
    }

    #[test]
    fn test_far_from_start_stays_open() {
        let policy = AutoCompletePolicy::default();
        let points: Vec<GeoPoint> = (0..=10).map(|i| north(i as f64 * 100.0, i * 10)).collect();
        let stationary = classified(MovementType::Stationary, 0.95);
        assert_eq!(
            policy.evaluate(&points, 1.0, Some(&stationary), false),
            CompletionStatus::InProgress
        );
    }

    #[test]
    fn test_too_short_stays_open() {
        let policy = AutoCompletePolicy::default();
        let points = vec![north(0.0, 0), north(40.0, 30), north(0.0, 60)];
        let stationary = classified(MovementType::Stationary, 0.95);
        assert_eq!(
            policy.evaluate(&points, 0.08, Some(&stationary), false),
            CompletionStatus::InProgress
        );
    }
}
