//! Zero-crossing spectral estimate.
//!
//! A cheap stand-in for an FFT: the vertical axis of a window is summarized by
//! how often it changes sign, both over the whole window and per fixed-size
//! segment.

use contracts::{AccelerationSample, FrequencyData};
use tracing::trace;

/// Windows shorter than this yield `FrequencyData::empty()`
pub const MIN_SAMPLES: usize = 10;

/// Samples per sub-segment
pub const SEGMENT_SIZE: usize = 10;

/// Partial trailing segments shorter than this are ignored
const MIN_SEGMENT_SAMPLES: usize = 5;

const MAX_DOMINANT: usize = 3;

/// Seconds from first to last sample
fn span_seconds(samples: &[AccelerationSample]) -> f64 {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => {
            (last.timestamp - first.timestamp).num_microseconds().unwrap_or(i64::MAX) as f64 / 1e6
        }
        _ => 0.0,
    }
}

/// Strict sign changes along the vertical axis
fn zero_crossings(samples: &[AccelerationSample]) -> usize {
    samples.windows(2).filter(|w| w[0].y * w[1].y < 0.0).count()
}

/// Zero-crossing frequency (Hz), `None` for a non-positive span
fn crossing_frequency(samples: &[AccelerationSample]) -> Option<f64> {
    let span = span_seconds(samples);
    (span > 0.0).then(|| zero_crossings(samples) as f64 / (2.0 * span))
}

/// Average sampling rate (Hz) from the mean inter-sample delta.
///
/// `None` with fewer than two samples or a non-positive span.
pub fn estimate_sampling_rate(samples: &[AccelerationSample]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let span = span_seconds(samples);
    (span > 0.0).then(|| (samples.len() - 1) as f64 / span)
}

/// Summarize the vertical (`y`) axis of a window.
pub fn analyze_frequency(samples: &[AccelerationSample]) -> FrequencyData {
    if samples.len() < MIN_SAMPLES {
        return FrequencyData::empty();
    }

    let spectral_energy = samples.iter().map(|s| s.y.abs()).sum::<f64>() / samples.len() as f64;

    let Some(peak_frequency) = crossing_frequency(samples) else {
        // All samples share one instant
        return FrequencyData {
            spectral_energy,
            ..FrequencyData::empty()
        };
    };

    let segment_frequencies: Vec<f64> = samples
        .chunks(SEGMENT_SIZE)
        .filter(|segment| segment.len() >= MIN_SEGMENT_SAMPLES)
        .filter_map(crossing_frequency)
        .collect();

    let spectral_centroid = if segment_frequencies.is_empty() {
        0.0
    } else {
        segment_frequencies.iter().sum::<f64>() / segment_frequencies.len() as f64
    };

    let mut dominant_frequencies = segment_frequencies;
    dominant_frequencies.sort_by(|a, b| b.total_cmp(a));
    dominant_frequencies.truncate(MAX_DOMINANT);

    trace!(
        peak_frequency,
        spectral_energy,
        spectral_centroid,
        sampling_rate = estimate_sampling_rate(samples),
        "frequency analysis"
    );

    FrequencyData {
        peak_frequency: Some(peak_frequency),
        spectral_energy,
        dominant_frequencies,
        spectral_centroid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{sine_window, t0};

    #[test]
    fn test_short_window_is_empty() {
        let samples = sine_window(2.0, 1.0, 50.0, 5);
        let data = analyze_frequency(&samples);
        assert_eq!(data.peak_frequency, None);
        assert_eq!(data.spectral_energy, 0.0);
        assert!(data.dominant_frequencies.is_empty());
        assert_eq!(data.spectral_centroid, 0.0);
        assert!(data.is_empty());
    }

    #[test]
    fn test_sine_peak_frequency() {
        // 2 Hz at 50 Hz for 4 s
        let samples = sine_window(2.0, 3.0, 50.0, 200);
        let data = analyze_frequency(&samples);
        let peak = data.peak_frequency.unwrap();
        assert!((peak - 2.0).abs() < 0.15, "got {peak}");
    }

    #[test]
    fn test_energy_is_mean_abs_vertical() {
        let samples = sine_window(5.0, 2.0, 100.0, 400);
        let data = analyze_frequency(&samples);
        let expected = 2.0 * 2.0 / std::f64::consts::PI;
        assert!((data.spectral_energy - expected).abs() < 0.05, "got {}", data.spectral_energy);
    }

    #[test]
    fn test_dominant_frequencies_descending_and_capped() {
        let samples = sine_window(12.0, 1.0, 100.0, 95);
        let data = analyze_frequency(&samples);
        assert!(data.dominant_frequencies.len() <= 3);
        assert!(!data.dominant_frequencies.is_empty());
        for pair in data.dominant_frequencies.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert!(data.spectral_centroid <= data.dominant_frequencies[0]);
    }

    #[test]
    fn test_short_trailing_segment_ignored() {
        // 12 samples: one full segment + a 2-sample tail
        let samples = sine_window(10.0, 1.0, 100.0, 12);
        let data = analyze_frequency(&samples);
        assert_eq!(data.dominant_frequencies.len(), 1);
        assert_eq!(data.spectral_centroid, data.dominant_frequencies[0]);
    }

    #[test]
    fn test_zero_span_window() {
        let samples: Vec<_> = (0..12)
            .map(|i| AccelerationSample::new(0.0, if i % 2 == 0 { 1.0 } else { -1.0 }, 0.0, t0()))
            .collect();
        let data = analyze_frequency(&samples);
        assert_eq!(data.peak_frequency, None);
        assert_eq!(data.spectral_energy, 1.0);
        assert!(data.dominant_frequencies.is_empty());
    }

    #[test]
    fn test_sampling_rate() {
        let samples = sine_window(1.0, 1.0, 50.0, 51);
        let rate = estimate_sampling_rate(&samples).unwrap();
        assert!((rate - 50.0).abs() < 1e-9);
        assert_eq!(estimate_sampling_rate(&samples[..1]), None);
    }
}
