//! Synthetic data generators for interest points.
//!
//! These generators create predictable, verifiable point sets that can be
//! used across the test suite.

use serde_json::{json, Value};

/// Creates `count` valid interest points arranged on a ring around `center`.
///
/// Point `i` gets id `i + 1`, name `"Punto {i + 1}"` and `i % 3` route
/// points whose `order` values run in reverse, so sorting is observable.
///
/// # Example
///
/// ```
/// use test_utils::create_interest_points;
///
/// let points = create_interest_points((-25.7, -56.24), 4);
/// assert_eq!(points.as_array().unwrap().len(), 4);
/// ```
pub fn create_interest_points(center: (f64, f64), count: usize) -> Value {
    let points: Vec<Value> = (0..count)
        .map(|i| {
            let angle = (i as f64 / count.max(1) as f64) * std::f64::consts::TAU;
            let lat = center.0 + 0.01 * angle.sin();
            let lng = center.1 + 0.01 * angle.cos();
            let route_points: Vec<Value> = (0..i % 3)
                .map(|j| {
                    let frac = (j + 1) as f64 / 3.0;
                    json!({
                        "lat": center.0 + (lat - center.0) * frac,
                        "lng": center.1 + (lng - center.1) * frac,
                        "order": (i % 3 - j) as f64,
                    })
                })
                .collect();
            json!({
                "id": i + 1,
                "name": format!("Punto {}", i + 1),
                "latitude": lat,
                "longitude": lng,
                "routePoints": route_points,
            })
        })
        .collect();
    Value::Array(points)
}

/// Creates a list of waypoints with the given `order` values, each tagged
/// with an `id` so the resulting sequence can be inspected.
///
/// Waypoint `i` sits at `(i, -i)` degrees; a `None` order omits the member.
pub fn create_waypoints(orders: &[Option<f64>]) -> Value {
    let waypoints: Vec<Value> = orders
        .iter()
        .enumerate()
        .map(|(i, order)| {
            let mut wp = json!({
                "id": format!("wp{}", i),
                "latitude": i as f64,
                "longitude": -(i as f64),
            });
            if let (Some(order), Some(obj)) = (order, wp.as_object_mut()) {
                obj.insert("order".to_string(), json!(order));
            }
            wp
        })
        .collect();
    Value::Array(waypoints)
}
