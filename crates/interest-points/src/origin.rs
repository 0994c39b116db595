//! Resolution of a subdivision's own representative coordinate.
//!
//! Subdivision rows carry their coordinate under one of several column
//! names depending on when and how they were imported. Each axis is looked
//! up independently in the priority order below; the first non-null value
//! wins.

use lote_common::{CoordinateError, CoordinateResult, LatLng};
use serde_json::Value;

/// Latitude column names, highest priority first.
pub const LATITUDE_FIELDS: [&str; 4] = ["lat", "latitud", "latitude", "centroide_lat"];

/// Longitude column names, highest priority first.
pub const LONGITUDE_FIELDS: [&str; 4] = ["long", "longitud", "longitude", "centroide_lng"];

/// Resolve the origin coordinate of a subdivision record.
///
/// Numeric strings are accepted since some columns are stored as text.
/// If the first non-null value of an axis is not numeric, resolution fails
/// rather than falling through to a lower-priority column.
pub fn resolve_origin(record: &Value) -> CoordinateResult<LatLng> {
    let lat = first_non_null(record, &LATITUDE_FIELDS)?;
    let lng = first_non_null(record, &LONGITUDE_FIELDS)?;
    LatLng::try_new(lat, lng)
}

fn first_non_null(record: &Value, fields: &[&str]) -> CoordinateResult<f64> {
    let found = fields
        .iter()
        .find_map(|field| match record.get(*field) {
            None | Some(Value::Null) => None,
            Some(value) => Some((*field, value)),
        });

    let (field, value) =
        found.ok_or_else(|| CoordinateError::MissingField(fields.join("|")))?;

    let not_numeric = || CoordinateError::NotNumeric {
        field: field.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Number(n) => n.as_f64().ok_or_else(not_numeric),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| not_numeric()),
        _ => Err(not_numeric()),
    }
}
