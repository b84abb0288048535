//! Rolling classification history.

use std::collections::VecDeque;

use contracts::{ClassificationResult, MovementType, SmoothingConfig};

use crate::smoother::analyze_movement_sequence;

/// Bounded, oldest-first history of classifications for one device.
///
/// Owned by the caller; the smoother itself keeps no state.
#[derive(Debug, Clone)]
pub struct MovementHistory {
    entries: VecDeque<ClassificationResult>,
    config: SmoothingConfig,
}

impl MovementHistory {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.history_capacity),
            config,
        }
    }

    /// Seed from previously persisted results (oldest first), keeping only
    /// the most recent `history_capacity`
    pub fn from_results(
        config: SmoothingConfig,
        results: impl IntoIterator<Item = ClassificationResult>,
    ) -> Self {
        let mut history = Self::new(config);
        for result in results {
            history.push(result);
        }
        history
    }

    /// Record a result, evicting the oldest when full
    pub fn push(&mut self, result: ClassificationResult) {
        if self.config.history_capacity == 0 {
            return;
        }
        while self.entries.len() >= self.config.history_capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(result);
    }

    /// Smooth `current` against the recorded history, then record the raw
    /// `current`. The history only ever holds raw classifications, so an
    /// override never feeds back into later votes.
    pub fn smooth(&mut self, current: ClassificationResult) -> ClassificationResult {
        let smoothed =
            analyze_movement_sequence(self.entries.make_contiguous(), &current, &self.config);
        self.push(current);
        smoothed
    }

    pub fn latest(&self) -> Option<&ClassificationResult> {
        self.entries.back()
    }

    /// Most frequent type in the history, ties to the most recent
    pub fn dominant_type(&self) -> Option<MovementType> {
        let mut counts = [0usize; MovementType::ALL.len()];
        for entry in &self.entries {
            counts[entry.movement_type.index()] += 1;
        }
        let best = counts.iter().copied().max().filter(|&n| n > 0)?;
        self.entries
            .iter()
            .rev()
            .map(|e| e.movement_type)
            .find(|m| counts[m.index()] == best)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for MovementHistory {
    fn default() -> Self {
        Self::new(SmoothingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::result;

    #[test]
    fn test_capacity_bound() {
        let mut history = MovementHistory::new(SmoothingConfig {
            history_capacity: 3,
            ..SmoothingConfig::default()
        });
        for i in 0..5 {
            history.push(result(MovementType::Vehicle, 0.5 + i as f64 * 0.1));
        }
        assert_eq!(history.len(), 3);
        let confidences: Vec<f64> = history.iter().map(|r| r.confidence).collect();
        assert!((confidences[0] - 0.7).abs() < 1e-9);
        assert!((history.latest().unwrap().confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_smooth_records_raw_result() {
        let mut history = MovementHistory::from_results(
            SmoothingConfig::default(),
            vec![result(MovementType::Vehicle, 0.9); 5],
        );
        let raw = result(MovementType::Walking, 0.5);
        let smoothed = history.smooth(raw.clone());
        assert_eq!(smoothed.movement_type, MovementType::Vehicle);
        assert_eq!(history.len(), 6);
        assert_eq!(history.latest(), Some(&raw));
    }

    #[test]
    fn test_sustained_walking_takes_over_from_vehicle() {
        let mut history = MovementHistory::from_results(
            SmoothingConfig::default(),
            vec![result(MovementType::Vehicle, 0.9); 3],
        );

        // V V V | W: vehicle holds 2 of 3 votes
        let first = history.smooth(result(MovementType::Walking, 0.95));
        assert_eq!(first.movement_type, MovementType::Vehicle);

        // V V V W | W: recency weights give walking 2.0 against 1.5
        let second = history.smooth(result(MovementType::Walking, 0.95));
        assert_eq!(second.movement_type, MovementType::Walking);

        for _ in 0..10 {
            let next = history.smooth(result(MovementType::Walking, 0.95));
            assert_eq!(next.movement_type, MovementType::Walking);
        }
        assert!(history.iter().all(|r| r.movement_type == MovementType::Walking));
    }

    #[test]
    fn test_warm_up_passes_through() {
        let mut history = MovementHistory::default();
        let first = history.smooth(result(MovementType::Walking, 0.7));
        assert_eq!(first.movement_type, MovementType::Walking);
        let second = history.smooth(result(MovementType::Vehicle, 0.8));
        assert_eq!(second.movement_type, MovementType::Vehicle);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_dominant_type() {
        let mut history = MovementHistory::default();
        assert_eq!(history.dominant_type(), None);
        history.push(result(MovementType::Walking, 0.7));
        history.push(result(MovementType::Vehicle, 0.8));
        assert_eq!(history.dominant_type(), Some(MovementType::Vehicle));
        history.push(result(MovementType::Walking, 0.7));
        assert_eq!(history.dominant_type(), Some(MovementType::Walking));
        history.clear();
        assert!(history.is_empty());
    }
}
