//! Great-circle distance between coordinates.
//!
//! Inputs are degrees and are not range-checked: latitude outside
//! `[-90, 90]` or longitude outside `[-180, 180]` is a caller validation error.
//! NaN propagates.

use contracts::GeoPoint;

/// Mean Earth radius (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two `(lat, lon)` pairs
pub fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = a;
    let (lat2, lon2) = b;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points
    let h = h.min(1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Haversine distance in meters
#[inline]
pub fn haversine_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    haversine_km(a, b) * 1000.0
}

/// Distance between two samples (km)
#[inline]
pub fn point_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_km(a.coordinates(), b.coordinates())
}

/// Distance between two samples (m)
#[inline]
pub fn point_distance_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    point_distance_km(a, b) * 1000.0
}
