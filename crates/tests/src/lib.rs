//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Contract wire-format snapshots
//! - Trip documents through loading, filtering, distance, stops and completion
//! - Classification windows through the classifier and rolling history
//! - Configuration round trips

#[cfg(test)]
mod support {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use contracts::{AccelerationSample, GeoPoint, TripInput};

    pub const M_PER_DEG: f64 = 111_194.93;

    pub fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + Duration::seconds(secs)
    }

    /// Point `north_m` meters north of (0, 0)
    pub fn north(north_m: f64, secs: i64) -> GeoPoint {
        GeoPoint::new(north_m / M_PER_DEG, 0.0, at(secs))
    }

    /// Serialize and decode through the input loader, as a file would be
    pub fn load(input: &TripInput, stem: &str) -> TripInput {
        let json = serde_json::to_string(input).unwrap();
        config_loader::trip_from_str("memory", &json, Some(stem)).unwrap()
    }

    /// Vertical sine window starting `offset_s` after the base instant
    pub fn sine_window(
        freq_hz: f64,
        amp: f64,
        rate_hz: f64,
        samples: usize,
        offset_s: i64,
    ) -> Vec<AccelerationSample> {
        let step_us = (1_000_000.0 / rate_hz) as i64;
        (0..samples)
            .map(|i| {
                let t = i as f64 / rate_hz;
                let y = amp * (2.0 * std::f64::consts::PI * freq_hz * t + 0.3).sin();
                let ts = at(offset_s) + Duration::microseconds(i as i64 * step_us);
                AccelerationSample::new(0.0, y, 0.0, ts)
            })
            .collect()
    }
}

#[cfg(test)]
mod contract_tests {
    use contracts::{CompletionStatus, ConfigVersion, MovementType, RejectReason};

    #[test]
    fn test_wire_labels() {
        let _ = ConfigVersion::V1;
        assert_eq!(serde_json::to_string(&MovementType::Stationary).unwrap(), "\"STATIONARY\"");
        assert_eq!(serde_json::to_string(&RejectReason::ZeroDuration).unwrap(), "\"zero_duration\"");
        assert_eq!(serde_json::to_string(&CompletionStatus::InProgress).unwrap(), "\"in_progress\"");
    }
}

#[cfg(test)]
mod e2e_tests {
    use contracts::{AnalysisConfig, CompletionStatus, GeoPoint, RejectReason, TripInput};
    use observability::TripMetricsAggregator;
    use trip_geometry::TripAnalyzer;

    use crate::support::{at, load, north, M_PER_DEG};

    /// 2 km northbound drive with a 4-minute dwell at the 1 km mark and a
    /// fix 50 km off course at index 10
    fn drive_with_stop_and_outlier() -> Vec<GeoPoint> {
        let mut points = Vec::with_capacity(20);
        // 0..=4: 250 m every 25 s
        for i in 0..5 {
            points.push(north(250.0 * i as f64, 25 * i));
        }
        // 5..=8: parked until t = 340 s
        for secs in [160, 220, 280, 340] {
            points.push(north(1000.0, secs));
        }
        // 9: moving again
        points.push(north(1100.0, 350));
        // 10: outlier, 50 km east
        points.push(GeoPoint::new(1100.0 / M_PER_DEG, 50_000.0 / M_PER_DEG, at(355)));
        // 11..=19: 100 m every 10 s up to 2 km
        for i in 0..9 {
            points.push(north(1200.0 + 100.0 * i as f64, 360 + 10 * i));
        }
        points
    }

    #[test]
    fn test_drive_with_stop_and_outlier() {
        let points = drive_with_stop_and_outlier();
        assert_eq!(points.len(), 20);

        let input = load(
            &TripInput {
                points,
                ..Default::default()
            },
            "van-12",
        );
        let report = TripAnalyzer::new(&AnalysisConfig::default()).analyze(
            input.vehicle_id,
            &input.points,
            None,
            false,
        );

        assert_eq!(report.vehicle_id, "van-12");
        assert_eq!(report.raw_point_count, 20);
        assert_eq!(report.retained_point_count(), 19);
        assert_eq!(report.rejections.get(&RejectReason::Speed), Some(&1));
        assert!(report
            .route_points
            .points()
            .iter()
            .all(|p| p.longitude.abs() < 1e-9));

        assert!((report.distance_km - 2.0).abs() < 0.2, "{}", report.distance_km);

        assert_eq!(report.stops.len(), 1);
        let stop = &report.stops[0];
        assert!((stop.duration_minutes() - 4.0).abs() < 0.1);
        assert!((stop.latitude * M_PER_DEG - 1000.0).abs() < 5.0);
        assert!(stop.confidence >= 0.5);

        // 440 s total, 240 s of it parked
        assert_eq!(report.duration_ms, 440_000);
        assert_eq!(report.moving_duration_ms, 200_000);
        assert!((report.average_speed_kmh - 36.0).abs() < 0.5);
        assert!((report.max_speed_kmh - 36.0).abs() < 0.5);
        assert_eq!(report.completion_status, CompletionStatus::InProgress);
    }

    #[test]
    fn test_aggregated_metrics_across_trips() {
        let analyzer = TripAnalyzer::new(&AnalysisConfig::default());
        let mut aggregator = TripMetricsAggregator::new();

        let points = drive_with_stop_and_outlier();
        for vehicle in ["a", "b"] {
            let report = analyzer.analyze(vehicle.into(), &points, None, true);
            aggregator.update(&report);
        }

        let summary = aggregator.summary();
        assert_eq!(summary.total_trips, 2);
        assert_eq!(summary.total_points, 40);
        assert_eq!(summary.retained_points, 38);
        assert_eq!(summary.rejections.get("speed"), Some(&2));
        assert_eq!(summary.total_stops, 2);
        assert_eq!(summary.completion_counts.get("completed"), Some(&2));
        assert!((summary.rejection_rate - 5.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod classification_tests {
    use contracts::{
        AnalysisConfig, ClassificationResult, CompletionStatus, MovementType, SmoothingConfig,
        TripInput,
    };
    use motion_classifier::{analyze_movement_sequence, MovementClassifier, MovementHistory};
    use trip_geometry::TripAnalyzer;

    use crate::support::{load, north, sine_window};

    fn vehicle(confidence: f64) -> ClassificationResult {
        ClassificationResult {
            movement_type: MovementType::Vehicle,
            confidence,
            ..Default::default()
        }
    }

    #[test]
    fn test_smoother_overrides_isolated_walking() {
        let history = vec![vehicle(0.9); 5];
        let current = ClassificationResult {
            movement_type: MovementType::Walking,
            confidence: 0.5,
            ..Default::default()
        };

        let smoothed = analyze_movement_sequence(&history, &current, &SmoothingConfig::default());
        assert_eq!(smoothed.movement_type, MovementType::Vehicle);
        assert!(smoothed.confidence > 0.5 && smoothed.confidence < 0.95);
    }

    #[test]
    fn test_pause_while_walking_stays_walking() {
        let classifier = MovementClassifier::default();
        let mut history = MovementHistory::default();

        for window in 0..3 {
            let raw = classifier.classify(&sine_window(2.0, 3.0, 50.0, 200, window * 5));
            assert_eq!(raw.movement_type, MovementType::Walking);
            history.smooth(raw);
        }

        let pause = classifier.classify(&sine_window(2.0, 0.02, 50.0, 200, 15));
        assert_eq!(pause.movement_type, MovementType::Stationary);

        let smoothed = history.smooth(pause.clone());
        assert_eq!(smoothed.movement_type, MovementType::Walking);
        assert!(smoothed.confidence <= 0.95);
        assert_eq!(history.len(), 4);
        assert_eq!(history.latest(), Some(&pause));
    }

    #[test]
    fn test_walking_after_parking_takes_over() {
        let classifier = MovementClassifier::default();
        let mut history = MovementHistory::default();

        for window in 0..3 {
            let raw = classifier.classify(&sine_window(11.0, 0.785, 100.0, 400, window * 5));
            assert_eq!(raw.movement_type, MovementType::Vehicle);
            history.smooth(raw);
        }

        let smoothed: Vec<MovementType> = (0..4)
            .map(|window| {
                let raw = classifier.classify(&sine_window(2.0, 3.0, 50.0, 200, 15 + window * 5));
                assert_eq!(raw.movement_type, MovementType::Walking);
                history.smooth(raw).movement_type
            })
            .collect();

        assert_eq!(smoothed[0], MovementType::Vehicle);
        assert!(smoothed[1..].iter().all(|m| *m == MovementType::Walking));
    }

    #[test]
    fn test_round_trip_auto_completes_once_parked() {
        // 400 m out and back at 10 m/s
        let points = [0.0, 200.0, 400.0, 200.0, 0.0]
            .iter()
            .enumerate()
            .map(|(i, m)| north(*m, 20 * i as i64))
            .collect();
        let input = load(
            &TripInput {
                points,
                ..Default::default()
            },
            "van-3",
        );
        let analyzer = TripAnalyzer::new(&AnalysisConfig::default());

        let classifier = MovementClassifier::default();
        let driving = classifier.classify(&sine_window(11.0, 0.785, 100.0, 400, 80));
        assert_eq!(driving.movement_type, MovementType::Vehicle);
        let report =
            analyzer.analyze(input.vehicle_id.clone(), &input.points, Some(&driving), false);
        assert!((report.distance_km - 0.8).abs() < 0.01);
        assert_eq!(report.completion_status, CompletionStatus::InProgress);

        let parked = classifier.classify(&sine_window(2.0, 0.02, 50.0, 50, 90));
        assert_eq!(parked.movement_type, MovementType::Stationary);
        let report = analyzer.analyze(input.vehicle_id, &input.points, Some(&parked), false);
        assert_eq!(report.completion_status, CompletionStatus::AutoCompleted);
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::AnalysisConfig;

    #[test]
    fn test_serialized_config_reloads() {
        let mut config = AnalysisConfig::default();
        config.distance.max_segment_km = Some(2.5);
        config.smoothing.history_capacity = 20;

        let toml = ConfigLoader::to_toml(&config).unwrap();
        assert_eq!(ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap(), config);

        let json = ConfigLoader::to_json(&config).unwrap();
        assert_eq!(ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap(), config);
    }

    #[test]
    fn test_cross_field_rule() {
        let toml = "[smoothing]\nmin_history = 8\nhistory_capacity = 4\n";
        let err = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("smoothing"));
    }
}
