//! Interest point and waypoint types.
//!
//! Both are built from loosely-shaped JSON at the parsing boundary
//! ([`InterestPoint::from_value`], [`Waypoint::from_value`]) and are fully
//! typed afterwards.

use lote_common::{CoordinateError, LatLng};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::payload::PayloadError;

/// Opaque identifier of an interest point, unique within one subdivision.
///
/// The backend delivers ids as numbers or strings; both are kept in their
/// canonical string form so `1` and `"1"` identify the same point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(String);

impl PointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Read an id from a JSON value. Empty strings and non-scalar values
    /// are not ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PointId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<u64> for PointId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// An intermediate coordinate on the way from the origin to a point.
///
/// `position` is `None` when the source element carried no usable
/// coordinate; such waypoints are kept so the drawer can report them, but
/// they never become part of a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Option<LatLng>,
    /// Sequencing key, ascending. Missing values read as 0.
    pub order: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lng: f64, order: f64) -> Self {
        Self {
            position: Some(LatLng::new(lat, lng)),
            order,
        }
    }

    /// Parse one element of a `routePoints` array.
    pub fn from_value(value: &Value) -> Self {
        let position = match LatLng::from_value(value) {
            Ok(pos) => Some(pos),
            Err(e) => {
                tracing::debug!(error = %e, "Route point has no usable coordinate");
                None
            }
        };

        Self {
            position,
            order: read_order(value.get("order")),
        }
    }

    /// Validated position of this waypoint.
    pub fn valid_position(&self) -> Result<LatLng, CoordinateError> {
        match self.position {
            Some(pos) => LatLng::try_new(pos.lat, pos.lng),
            None => Err(CoordinateError::UnsupportedShape),
        }
    }
}

fn read_order(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// A point of local interest attached to a subdivision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestPoint {
    pub id: PointId,
    pub name: String,
    pub position: LatLng,
    /// Route points in source order; sorted by the drawer before use.
    pub route_points: Vec<Waypoint>,
}

impl InterestPoint {
    pub fn new(id: impl Into<PointId>, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: LatLng::new(lat, lng),
            route_points: Vec::new(),
        }
    }

    pub fn with_route_points(mut self, route_points: Vec<Waypoint>) -> Self {
        self.route_points = route_points;
        self
    }

    /// Build a point from one candidate element of the `interest_points`
    /// array. `index` is only used in diagnostics.
    ///
    /// Requires an id, a non-empty name and numeric `latitude`/`longitude`.
    /// A missing `routePoints` member defaults to empty; a non-array one is
    /// coerced to empty with a warning.
    pub fn from_value(value: &Value, index: usize) -> Result<Self, PayloadError> {
        let invalid = |reason: &str| PayloadError::InvalidPoint {
            index,
            reason: reason.to_string(),
        };

        if !value.is_object() {
            return Err(invalid("not an object"));
        }

        let id = value
            .get("id")
            .and_then(PointId::from_value)
            .ok_or_else(|| invalid("missing id"))?;

        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| invalid("missing name"))?
            .to_string();

        let lat = value.get("latitude").and_then(Value::as_f64);
        let lng = value.get("longitude").and_then(Value::as_f64);
        let position = match (lat, lng) {
            (Some(lat), Some(lng)) => {
                LatLng::try_new(lat, lng).map_err(|e| invalid(&e.to_string()))?
            }
            _ => return Err(invalid("latitude/longitude must be numeric")),
        };

        let route_points = match value.get("routePoints") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().map(Waypoint::from_value).collect(),
            Some(other) => {
                tracing::warn!(
                    point_id = %id,
                    found = json_kind(other),
                    "routePoints is not an array, treating as empty"
                );
                Vec::new()
            }
        };

        Ok(Self {
            id,
            name,
            position,
            route_points,
        })
    }

    /// Destination coordinate for routes to this point.
    pub fn destination(&self) -> LatLng {
        self.position
    }
}

/// Short JSON type name for diagnostics.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
