//! Input document loading.
//!
//! Trip and sample-window documents are JSON. The analysis core does not
//! re-check coordinates, so this is where out-of-range or non-finite values
//! are refused. Samples are stably sorted by timestamp after decoding.

use std::path::Path;

use contracts::{ContractError, GeoPoint, SampleWindowInput, TripInput, VehicleId};
use serde::de::DeserializeOwned;

fn decode<T: DeserializeOwned>(source_name: &str, content: &str) -> Result<T, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::input_parse(source_name, e.to_string()))
}

fn check_points(source_name: &str, points: &[GeoPoint]) -> Result<(), ContractError> {
    for (idx, p) in points.iter().enumerate() {
        if !p.latitude.is_finite() || !(-90.0..=90.0).contains(&p.latitude) {
            return Err(ContractError::input_parse(
                source_name,
                format!("points[{idx}].latitude out of range: {}", p.latitude),
            ));
        }
        if !p.longitude.is_finite() || !(-180.0..=180.0).contains(&p.longitude) {
            return Err(ContractError::input_parse(
                source_name,
                format!("points[{idx}].longitude out of range: {}", p.longitude),
            ));
        }
    }
    Ok(())
}

/// Decode a trip document.
///
/// A document without `vehicle_id` takes `fallback_id` (usually the file stem).
pub fn trip_from_str(
    source_name: &str,
    content: &str,
    fallback_id: Option<&str>,
) -> Result<TripInput, ContractError> {
    let mut input: TripInput = decode(source_name, content)?;
    check_points(source_name, &input.points)?;
    input.points.sort_by_key(|p| p.timestamp);
    input.acceleration.sort_by_key(|s| s.timestamp);

    if let Some(fallback) = fallback_id {
        if input.vehicle_id == VehicleId::UNASSIGNED {
            input.vehicle_id = VehicleId::from(fallback);
        }
    }
    Ok(input)
}

/// Decode a sample-window document
pub fn samples_from_str(source_name: &str, content: &str) -> Result<SampleWindowInput, ContractError> {
    let mut input: SampleWindowInput = decode(source_name, content)?;
    input.samples.sort_by_key(|s| s.timestamp);
    Ok(input)
}

/// Load a trip document from disk
pub fn load_trip(path: &Path) -> Result<TripInput, ContractError> {
    let content = std::fs::read_to_string(path)?;
    let stem = path.file_stem().and_then(|s| s.to_str());
    trip_from_str(&path.display().to_string(), &content, stem)
}

/// Load a sample-window document from disk
pub fn load_samples(path: &Path) -> Result<SampleWindowInput, ContractError> {
    let content = std::fs::read_to_string(path)?;
    samples_from_str(&path.display().to_string(), &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRIP: &str = r#"{
        "vehicle_id": "van-7",
        "points": [
            {"latitude": 48.1001, "longitude": 11.5, "timestamp": "2024-05-01T08:00:10Z"},
            {"latitude": 48.1000, "longitude": 11.5, "timestamp": "2024-05-01T08:00:00Z",
             "metadata": {"accuracy": 6.0}}
        ]
    }"#;

    #[test]
    fn test_trip_points_sorted() {
        let input = trip_from_str("inline", TRIP, None).unwrap();
        assert_eq!(input.vehicle_id, "van-7");
        assert!(input.points[0].timestamp < input.points[1].timestamp);
        assert_eq!(input.points[0].accuracy(), Some(6.0));
    }

    #[test]
    fn test_fallback_vehicle_id() {
        let json = r#"{"points": []}"#;
        let input = trip_from_str("inline", json, Some("truck-3")).unwrap();
        assert_eq!(input.vehicle_id, "truck-3");

        let input = trip_from_str("inline", TRIP, Some("truck-3")).unwrap();
        assert_eq!(input.vehicle_id, "van-7");
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let json = r#"{"points": [
            {"latitude": 91.0, "longitude": 0.0, "timestamp": "2024-05-01T08:00:00Z"}
        ]}"#;
        let err = trip_from_str("bad.json", json, None).unwrap_err();
        match err {
            ContractError::InputParse { source_name, message } => {
                assert_eq!(source_name, "bad.json");
                assert!(message.contains("points[0].latitude"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_document() {
        let err = samples_from_str("w.json", r#"{"samples": 3}"#).unwrap_err();
        assert!(matches!(err, ContractError::InputParse { .. }));
    }

    #[test]
    fn test_load_trip_from_file_uses_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bus-12.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"points": [{{"latitude": 1.0, "longitude": 2.0, "timestamp": "2024-05-01T08:00:00Z"}}]}}"#
        )
        .unwrap();

        let input = load_trip(&path).unwrap();
        assert_eq!(input.vehicle_id, "bus-12");
        assert_eq!(input.points.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_samples(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ContractError::Io(_)));
    }
}
