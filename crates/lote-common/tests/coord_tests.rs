//! Tests for coordinate validation and bounding boxes.

use lote_common::{is_valid, BoundingBox, CoordinateError, LatLng, RawCoordinate};
use serde_json::json;
use test_utils::assert_approx_eq;

// ============================================================================
// Validator: accepted shapes
// ============================================================================

#[test]
fn test_valid_short_pair() {
    assert!(is_valid(&json!({"lat": 0.0, "lng": 0.0})));
    assert!(is_valid(&json!({"lat": -90, "lng": 180})));
}

#[test]
fn test_valid_long_pair() {
    assert!(is_valid(&json!({"latitude": -25.705, "longitude": -56.22})));
}

#[test]
fn test_extra_members_are_ignored() {
    assert!(is_valid(
        &json!({"lat": 1.0, "lng": 2.0, "order": 3, "label": "x"})
    ));
}

#[test]
fn test_both_pairs_present() {
    assert!(is_valid(
        &json!({"lat": 1.0, "lng": 2.0, "latitude": 1.0, "longitude": 2.0})
    ));
    // an unusable short pair falls back to the long pair
    assert!(is_valid(
        &json!({"lat": null, "lng": null, "latitude": 1.0, "longitude": 2.0})
    ));
}

// ============================================================================
// Validator: rejected shapes
// ============================================================================

#[test]
fn test_mixed_pairs_rejected() {
    assert!(!is_valid(&json!({"lat": 1.0, "longitude": 2.0})));
    assert!(!is_valid(&json!({"latitude": 1.0, "lng": 2.0})));
}

#[test]
fn test_string_numbers_rejected() {
    assert!(!is_valid(&json!({"lat": "1.0", "lng": "2.0"})));
}

#[test]
fn test_booleans_rejected() {
    assert!(!is_valid(&json!({"lat": true, "lng": false})));
}

// ============================================================================
// Typed conversions
// ============================================================================

#[test]
fn test_from_value_reports_missing_field() {
    let err = LatLng::from_value(&json!({"latitude": 1.0})).unwrap_err();
    assert_eq!(err, CoordinateError::MissingField("longitude".to_string()));
}

#[test]
fn test_raw_coordinate_rejects_mixed_shape() {
    let result: Result<RawCoordinate, _> = serde_json::from_value(json!({"lat": 1.0, "longitude": 2.0}));
    assert!(result.is_err());
}

#[test]
fn test_raw_coordinate_from_latlng() {
    let raw = RawCoordinate::from(LatLng::new(1.0, 2.0));
    let json = serde_json::to_value(raw).unwrap();
    assert_eq!(json, json!({"latitude": 1.0, "longitude": 2.0}));
}

#[test]
fn test_lon_lat_order() {
    assert_eq!(LatLng::new(-25.7, -56.2).to_lon_lat(), [-56.2, -25.7]);
}

// ============================================================================
// Bounding boxes
// ============================================================================

#[test]
fn test_bbox_center() {
    let bbox = BoundingBox::new(-56.24, -25.71, -56.20, -25.70);
    let center = bbox.center();
    assert_approx_eq!(center.lat, -25.705, 1e-9);
    assert_approx_eq!(center.lng, -56.22, 1e-9);
}

#[test]
fn test_bbox_contains() {
    let bbox = BoundingBox::new(-56.24, -25.71, -56.20, -25.70);
    assert!(bbox.contains(&LatLng::new(-25.705, -56.22)));
    assert!(!bbox.contains(&LatLng::new(-25.0, -56.22)));
}

#[test]
fn test_bbox_intersects() {
    let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
    let c = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));
}

#[test]
fn test_bbox_degenerate_line() {
    let bbox = BoundingBox::from_coords(&[LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0)]).unwrap();
    assert!(bbox.is_degenerate());
    assert_eq!(bbox.height(), 1.0);
    assert_eq!(bbox.width(), 0.0);
}
