//! Reference signal bands and spectrum matching.

use contracts::FrequencyData;

const FREQUENCY_WEIGHT: f64 = 0.7;
const ENERGY_WEIGHT: f64 = 0.3;

/// A known signal band: frequency range (Hz), energy range (m/s²) and weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternBand {
    pub name: &'static str,
    pub min_freq: f64,
    pub max_freq: f64,
    pub min_energy: f64,
    pub max_energy: f64,
    pub weight: f64,
}

impl PatternBand {
    /// Score in `[0, 1]` for a peak frequency and energy. A peak outside the
    /// frequency range leaves only the energy term.
    pub fn score(&self, peak_frequency: f64, energy: f64) -> f64 {
        let freq_match = range_match(peak_frequency, self.min_freq, self.max_freq);
        let energy_match = range_match(energy, self.min_energy, self.max_energy);
        FREQUENCY_WEIGHT * freq_match + ENERGY_WEIGHT * energy_match
    }
}

/// 1 at the range midpoint, falling linearly with distance over the full
/// width (0.5 at either edge), 0 outside
fn range_match(value: f64, min: f64, max: f64) -> f64 {
    if !(min..=max).contains(&value) {
        return 0.0;
    }
    let width = max - min;
    if width <= 0.0 {
        return 1.0;
    }
    let mid = (min + max) / 2.0;
    (1.0 - (value - mid).abs() / width).clamp(0.0, 1.0)
}

/// Vehicle vibration bands
pub const VEHICLE_PATTERNS: [PatternBand; 3] = [
    PatternBand {
        name: "engine_idle",
        min_freq: 12.0,
        max_freq: 30.0,
        min_energy: 0.05,
        max_energy: 0.4,
        weight: 0.2,
    },
    PatternBand {
        name: "urban_driving",
        min_freq: 4.0,
        max_freq: 16.0,
        min_energy: 0.1,
        max_energy: 0.8,
        weight: 0.45,
    },
    PatternBand {
        name: "highway_cruising",
        min_freq: 6.0,
        max_freq: 22.0,
        min_energy: 0.2,
        max_energy: 1.0,
        weight: 0.35,
    },
];

/// Gait cadence bands
pub const WALKING_PATTERNS: [PatternBand; 3] = [
    PatternBand {
        name: "slow_walk",
        min_freq: 0.8,
        max_freq: 2.2,
        min_energy: 0.6,
        max_energy: 2.5,
        weight: 0.3,
    },
    PatternBand {
        name: "walking",
        min_freq: 1.2,
        max_freq: 2.8,
        min_energy: 1.0,
        max_energy: 4.0,
        weight: 0.5,
    },
    PatternBand {
        name: "jogging",
        min_freq: 1.8,
        max_freq: 3.6,
        min_energy: 2.5,
        max_energy: 8.0,
        weight: 0.2,
    },
];

/// Weighted match of a spectrum against a band table, in `[0, 1]`.
///
/// Every band contributes its weight. No peak, or zero total weight,
/// scores 0.
pub fn match_patterns(data: &FrequencyData, bands: &[PatternBand]) -> f64 {
    let Some(peak) = data.peak_frequency else {
        return 0.0;
    };

    let (weighted, total_weight) = bands
        .iter()
        .map(|band| (band.score(peak, data.spectral_energy) * band.weight, band.weight))
        .fold((0.0, 0.0), |(s, w), (bs, bw)| (s + bs, w + bw));

    if total_weight > 0.0 {
        (weighted / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(peak: Option<f64>, energy: f64) -> FrequencyData {
        FrequencyData {
            peak_frequency: peak,
            spectral_energy: energy,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_peak_scores_zero() {
        assert_eq!(match_patterns(&spectrum(None, 1.0), &WALKING_PATTERNS), 0.0);
    }

    #[test]
    fn test_band_center_scores_one() {
        let only_walking = [WALKING_PATTERNS[1]];
        let score = match_patterns(&spectrum(Some(2.0), 2.5), &only_walking);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_range_edges_score_half() {
        let band = WALKING_PATTERNS[1];
        assert!((band.score(band.min_freq, 2.5) - (0.35 + ENERGY_WEIGHT)).abs() < 1e-12);
        assert!((band.score(band.max_freq, 2.5) - (0.35 + ENERGY_WEIGHT)).abs() < 1e-12);
        assert_eq!(band.score(band.max_freq + 0.01, 0.0), 0.0);
    }

    #[test]
    fn test_bands_missing_the_peak_still_weigh_in() {
        let bands = [
            PatternBand {
                name: "low",
                min_freq: 0.0,
                max_freq: 10.0,
                min_energy: 0.0,
                max_energy: 2.0,
                weight: 0.5,
            },
            PatternBand {
                name: "high",
                min_freq: 20.0,
                max_freq: 30.0,
                min_energy: 0.0,
                max_energy: 2.0,
                weight: 0.5,
            },
        ];
        // Perfect inside "low", energy term only from "high"
        let score = match_patterns(&spectrum(Some(5.0), 1.0), &bands);
        assert!((score - (0.5 * 1.0 + 0.5 * ENERGY_WEIGHT)).abs() < 1e-12, "{score}");
    }

    #[test]
    fn test_out_of_band_peak_keeps_energy_term() {
        // 40 Hz is above every vehicle band, 0.5 m/s² sits in urban and highway
        let vehicle = match_patterns(&spectrum(Some(40.0), 0.5), &VEHICLE_PATTERNS);
        let expected = ENERGY_WEIGHT * (0.45 * (1.0 - 0.05 / 0.7) + 0.35 * (1.0 - 0.1 / 0.8));
        assert!((vehicle - expected).abs() < 1e-12, "{vehicle}");
        assert!(vehicle < 0.3);

        // Energy below every gait band as well
        assert_eq!(match_patterns(&spectrum(Some(12.0), 0.5), &WALKING_PATTERNS), 0.0);
    }

    #[test]
    fn test_typical_signatures() {
        let walking = match_patterns(&spectrum(Some(2.0), 2.0), &WALKING_PATTERNS);
        assert!(walking > 0.6, "walking {walking}");

        let driving = match_patterns(&spectrum(Some(11.0), 0.5), &VEHICLE_PATTERNS);
        assert!(driving > 0.6, "driving {driving}");

        // Each signature scores nothing against the other table
        assert_eq!(match_patterns(&spectrum(Some(2.0), 2.0), &VEHICLE_PATTERNS), 0.0);
        assert_eq!(match_patterns(&spectrum(Some(11.0), 0.5), &WALKING_PATTERNS), 0.0);
    }

    #[test]
    fn test_energy_outside_band_caps_score() {
        let band = WALKING_PATTERNS[1];
        let score = band.score(2.0, 50.0);
        assert!((score - FREQUENCY_WEIGHT).abs() < 1e-12);
    }

    #[test]
    fn test_zero_weight_table() {
        let band = PatternBand {
            weight: 0.0,
            ..WALKING_PATTERNS[1]
        };
        assert_eq!(match_patterns(&spectrum(Some(2.0), 2.5), &[band]), 0.0);
    }

    #[test]
    fn test_scores_stay_in_unit_range() {
        for f in [0.5, 1.2, 1.9, 2.6, 6.0, 9.0, 14.0, 18.0, 24.0] {
            for e in [0.0, 0.1, 0.5, 2.0, 9.0] {
                for table in [&VEHICLE_PATTERNS[..], &WALKING_PATTERNS[..]] {
                    let s = match_patterns(&spectrum(Some(f), e), table);
                    assert!((0.0..=1.0).contains(&s));
                }
            }
        }
    }
}
