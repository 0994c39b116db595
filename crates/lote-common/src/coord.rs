//! Geographic coordinates and the dual-shape coordinate validator.
//!
//! Upstream records name their coordinate members two different ways:
//! `{lat, lng}` (map library convention) and `{latitude, longitude}`
//! (database convention). Both are accepted at the parsing boundary and
//! normalized into [`LatLng`] so nothing downstream branches on shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{CoordinateError, CoordinateResult};

/// Mean Earth radius in meters used for great-circle distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Create a coordinate without validation.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create a coordinate, rejecting NaN and infinite values.
    pub fn try_new(lat: f64, lng: f64) -> CoordinateResult<Self> {
        if !lat.is_finite() {
            return Err(CoordinateError::NonFinite("lat".to_string()));
        }
        if !lng.is_finite() {
            return Err(CoordinateError::NonFinite("lng".to_string()));
        }
        Ok(Self { lat, lng })
    }

    /// Read a coordinate from a JSON object in either supported shape.
    ///
    /// The `{lat, lng}` pair is tried first, then `{latitude, longitude}`.
    /// Mixed pairs such as `{lat, longitude}` are rejected.
    pub fn from_value(value: &Value) -> CoordinateResult<Self> {
        let obj = value.as_object().ok_or(CoordinateError::UnsupportedShape)?;

        let has_short = obj.contains_key("lat") || obj.contains_key("lng");
        let has_long = obj.contains_key("latitude") || obj.contains_key("longitude");

        match (has_short, has_long) {
            (false, false) => Err(CoordinateError::UnsupportedShape),
            (true, false) => read_pair(value, "lat", "lng"),
            (false, true) => read_pair(value, "latitude", "longitude"),
            (true, true) => read_pair(value, "lat", "lng")
                .or_else(|_| read_pair(value, "latitude", "longitude")),
        }
    }

    /// Coordinates as `[longitude, latitude]`, the GeoJSON axis order.
    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Great-circle distance to another coordinate in meters.
    pub fn haversine_distance(&self, other: &LatLng) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// A coordinate as it arrives over the wire, in either naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    /// `{ "lat": .., "lng": .. }`
    Short { lat: f64, lng: f64 },
    /// `{ "latitude": .., "longitude": .. }`
    Long { latitude: f64, longitude: f64 },
}

impl RawCoordinate {
    /// Normalize into the canonical shape, dropping non-finite values.
    pub fn normalize(self) -> Option<LatLng> {
        let (lat, lng) = match self {
            RawCoordinate::Short { lat, lng } => (lat, lng),
            RawCoordinate::Long {
                latitude,
                longitude,
            } => (latitude, longitude),
        };
        LatLng::try_new(lat, lng).ok()
    }
}

impl From<LatLng> for RawCoordinate {
    fn from(coord: LatLng) -> Self {
        RawCoordinate::Long {
            latitude: coord.lat,
            longitude: coord.lng,
        }
    }
}

/// Coordinate validity predicate.
///
/// True iff `value` is an object carrying both members of one supported
/// pair (`lat`/`lng` or `latitude`/`longitude`) as finite JSON numbers.
/// `null`, non-objects and any other shape are invalid.
pub fn is_valid(value: &Value) -> bool {
    LatLng::from_value(value).is_ok()
}

fn read_pair(value: &Value, lat_field: &str, lng_field: &str) -> CoordinateResult<LatLng> {
    let lat = numeric_member(value, lat_field)?;
    let lng = numeric_member(value, lng_field)?;
    LatLng::try_new(lat, lng)
}

fn numeric_member(value: &Value, field: &str) -> CoordinateResult<f64> {
    match value.get(field) {
        None | Some(Value::Null) => Err(CoordinateError::MissingField(field.to_string())),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| CoordinateError::NonFinite(field.to_string())),
        Some(other) => Err(CoordinateError::NotNumeric {
            field: field.to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_and_long_shapes_are_valid() {
        assert!(is_valid(&json!({"lat": -25.7, "lng": -56.24})));
        assert!(is_valid(&json!({"latitude": -25.7, "longitude": -56.24})));
    }

    #[test]
    fn test_rejects_null_and_scalars() {
        assert!(!is_valid(&Value::Null));
        assert!(!is_valid(&json!(42)));
        assert!(!is_valid(&json!("-25.7,-56.2")));
        assert!(!is_valid(&json!([-25.7, -56.2])));
    }

    #[test]
    fn test_rejects_incomplete_and_mixed_pairs() {
        assert!(!is_valid(&json!({"lat": -25.7})));
        assert!(!is_valid(&json!({"longitude": -56.2})));
        assert!(!is_valid(&json!({"lat": -25.7, "longitude": -56.2})));
        assert!(!is_valid(&json!({})));
    }

    #[test]
    fn test_rejects_non_numeric_members() {
        assert!(!is_valid(&json!({"lat": "-25.7", "lng": -56.2})));
        assert!(!is_valid(&json!({"latitude": null, "longitude": -56.2})));
    }

    #[test]
    fn test_try_new_rejects_nan() {
        assert!(LatLng::try_new(f64::NAN, 1.0).is_err());
        assert!(LatLng::try_new(1.0, f64::INFINITY).is_err());
        assert!(LatLng::try_new(1.0, 2.0).is_ok());
    }

    #[test]
    fn test_raw_coordinate_deserializes_both_shapes() {
        let short: RawCoordinate = serde_json::from_value(json!({"lat": 1.0, "lng": 2.0})).unwrap();
        let long: RawCoordinate =
            serde_json::from_value(json!({"latitude": 1.0, "longitude": 2.0})).unwrap();
        assert_eq!(short.normalize(), Some(LatLng::new(1.0, 2.0)));
        assert_eq!(long.normalize(), Some(LatLng::new(1.0, 2.0)));
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(1.0, 0.0);
        let d = a.haversine_distance(&b);
        assert!((d - 111_195.0).abs() < 100.0);
    }

    #[test]
    fn test_display_six_decimals() {
        assert_eq!(LatLng::new(-25.7, -56.24).to_string(), "-25.700000, -56.240000");
    }
}
