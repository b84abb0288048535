//! Temporal consistency smoothing of classifications.
//!
//! Each history entry votes for its type with a weight that grows linearly
//! toward the most recent entry; the current result votes with weight 1. A
//! different dominant type overrides the current one only when it carries a
//! clear majority of the total vote mass.

use contracts::{ClassificationResult, MovementType, SmoothingConfig};
use tracing::debug;

const TYPE_COUNT: usize = MovementType::ALL.len();

/// Blend weights of the current confidence and the dominant share
const CURRENT_WEIGHT: f64 = 0.3;
const SHARE_WEIGHT: f64 = 0.7;

/// Smooth `current` against prior results (oldest first).
///
/// Returns `current` unchanged when the history is shorter than
/// `config.min_history` or no other type dominates.
pub fn analyze_movement_sequence(
    history: &[ClassificationResult],
    current: &ClassificationResult,
    config: &SmoothingConfig,
) -> ClassificationResult {
    if history.is_empty() || history.len() < config.min_history {
        return current.clone();
    }

    let len = history.len() as f64;
    let mut votes = [0.0_f64; TYPE_COUNT];
    for (i, entry) in history.iter().enumerate() {
        votes[entry.movement_type.index()] += (i + 1) as f64 / len;
    }
    votes[current.movement_type.index()] += 1.0;
    let total: f64 = votes.iter().sum();

    let dominant = dominant_type(&votes, current.movement_type);
    if dominant == current.movement_type || total <= 0.0 {
        return current.clone();
    }

    let share = votes[dominant.index()] / total;
    if share <= config.override_share {
        return current.clone();
    }

    let confidence =
        (current.confidence * CURRENT_WEIGHT + share * SHARE_WEIGHT).min(config.max_confidence);
    let mut smoothed = current.clone();
    smoothed.movement_type = dominant;
    smoothed.confidence = confidence;

    for movement in MovementType::ALL {
        let Some(sub) = smoothed.details.confidence_mut(movement) else {
            continue;
        };
        if movement == dominant {
            *sub = sub.max(confidence);
        } else {
            *sub *= config.dampening_factor;
        }
    }

    debug!(
        from = %current.movement_type,
        to = %dominant,
        share,
        confidence,
        "classification overridden by history"
    );
    smoothed
}

/// Highest vote; ties go to `current`, then to `MovementType::ALL` order
fn dominant_type(votes: &[f64; TYPE_COUNT], current: MovementType) -> MovementType {
    let best = votes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if votes[current.index()] >= best {
        return current;
    }
    MovementType::ALL
        .into_iter()
        .find(|m| votes[m.index()] >= best)
        .unwrap_or(current)
}
