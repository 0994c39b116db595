//! Extraction of interest points from a subdivision document.
//!
//! The `interest_points` member has been stored several ways over time:
//! missing entirely, as a JSON array, as a JSON-encoded string, or wrapped
//! in an object that carries its own `interest_points` array. All of them
//! are classified into [`PointsEncoding`] and reduced to a list of
//! candidate elements; nothing past this module looks at the raw shape.

use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

use crate::types::{json_kind, InterestPoint};

/// Name of the document member carrying the points.
pub const INTEREST_POINTS_FIELD: &str = "interest_points";

/// Diagnostics for input that was dropped while extracting points.
///
/// None of these reach the end user; they are logged and the affected
/// input is treated as absent.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("interest_points string is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("interest_points is a {0}, expected an array")]
    NotAnArray(&'static str),

    #[error("interest point #{index} dropped: {reason}")]
    InvalidPoint { index: usize, reason: String },

    #[error("interest point #{index} dropped: duplicate id '{id}'")]
    DuplicateId { index: usize, id: String },
}

/// The encodings the `interest_points` member is known to arrive in.
#[derive(Debug, Clone, PartialEq)]
pub enum PointsEncoding {
    /// Member missing or `null`.
    Absent,
    /// A JSON document stored as a string.
    Encoded(String),
    /// An object wrapping an inner `interest_points` member.
    Nested(Value),
    /// The expected array.
    List(Vec<Value>),
    /// Anything else.
    Unsupported(Value),
}

impl PointsEncoding {
    /// Classify the `interest_points` member of a subdivision document.
    pub fn classify(document: &Value) -> Self {
        match document.get(INTEREST_POINTS_FIELD) {
            None | Some(Value::Null) => PointsEncoding::Absent,
            Some(value) => Self::classify_value(value.clone()),
        }
    }

    fn classify_value(value: Value) -> Self {
        match value {
            Value::Null => PointsEncoding::Absent,
            Value::String(s) => PointsEncoding::Encoded(s),
            Value::Array(items) => PointsEncoding::List(items),
            Value::Object(map) if map.contains_key(INTEREST_POINTS_FIELD) => {
                PointsEncoding::Nested(Value::Object(map))
            }
            other => PointsEncoding::Unsupported(other),
        }
    }

    /// Reduce to the candidate array.
    ///
    /// A string is decoded first; after that exactly one level of
    /// `{ "interest_points": [...] }` wrapping is removed. The result must
    /// be an array.
    pub fn into_candidates(self) -> Result<Vec<Value>, PayloadError> {
        let decoded = match self {
            PointsEncoding::Absent => return Ok(Vec::new()),
            PointsEncoding::List(items) => return Ok(items),
            PointsEncoding::Unsupported(other) => {
                return Err(PayloadError::NotAnArray(json_kind(&other)))
            }
            PointsEncoding::Encoded(s) => serde_json::from_str::<Value>(&s)?,
            PointsEncoding::Nested(wrapper) => wrapper,
        };

        let unwrapped = match decoded {
            Value::Object(mut map) => match map.remove(INTEREST_POINTS_FIELD) {
                Some(inner) => inner,
                None => Value::Object(map),
            },
            other => other,
        };

        match unwrapped {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(PayloadError::NotAnArray(json_kind(&other))),
        }
    }
}

/// Points extracted from one subdivision document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedPoints {
    pub points: Vec<InterestPoint>,
    /// Number of candidate elements that were dropped.
    pub dropped: usize,
}

/// Extract and validate every interest point in a subdivision document.
///
/// Never fails: malformed payloads yield an empty set and invalid
/// elements are dropped, each with a logged diagnostic. When two elements
/// share an id the first one wins.
pub fn extract_points(document: &Value) -> ExtractedPoints {
    let candidates = match PointsEncoding::classify(document).into_candidates() {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring interest_points payload");
            return ExtractedPoints::default();
        }
    };

    let mut seen = HashSet::new();
    let mut extracted = ExtractedPoints::default();

    for (index, candidate) in candidates.iter().enumerate() {
        let result = InterestPoint::from_value(candidate, index).and_then(|point| {
            if seen.insert(point.id.clone()) {
                Ok(point)
            } else {
                Err(PayloadError::DuplicateId {
                    index,
                    id: point.id.to_string(),
                })
            }
        });

        match result {
            Ok(point) => extracted.points.push(point),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping invalid interest point");
                extracted.dropped += 1;
            }
        }
    }

    tracing::debug!(
        valid = extracted.points.len(),
        dropped = extracted.dropped,
        "Extracted interest points"
    );

    extracted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_absent_and_null() {
        assert_eq!(PointsEncoding::classify(&json!({})), PointsEncoding::Absent);
        assert_eq!(
            PointsEncoding::classify(&json!({"interest_points": null})),
            PointsEncoding::Absent
        );
    }

    #[test]
    fn test_classify_variants() {
        assert!(matches!(
            PointsEncoding::classify(&json!({"interest_points": "[]"})),
            PointsEncoding::Encoded(_)
        ));
        assert!(matches!(
            PointsEncoding::classify(&json!({"interest_points": []})),
            PointsEncoding::List(_)
        ));
        assert!(matches!(
            PointsEncoding::classify(&json!({"interest_points": {"interest_points": []}})),
            PointsEncoding::Nested(_)
        ));
        assert!(matches!(
            PointsEncoding::classify(&json!({"interest_points": 5})),
            PointsEncoding::Unsupported(_)
        ));
    }

    #[test]
    fn test_bad_json_string_is_error() {
        let encoding = PointsEncoding::Encoded("[{not json".to_string());
        assert!(matches!(
            encoding.into_candidates(),
            Err(PayloadError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_encoded_nested_unwraps_once() {
        let encoded = json!({"interest_points": [{"id": 1}]}).to_string();
        let candidates = PointsEncoding::Encoded(encoded).into_candidates().unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_double_nesting_is_not_unwrapped() {
        let doc = json!({"interest_points": {"interest_points": {"interest_points": []}}});
        let result = PointsEncoding::classify(&doc).into_candidates();
        assert!(matches!(result, Err(PayloadError::NotAnArray("object"))));
    }

    #[test]
    fn test_object_without_inner_array_is_rejected() {
        let doc = json!({"interest_points": {"points": []}});
        assert!(PointsEncoding::classify(&doc).into_candidates().is_err());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let doc = json!({"interest_points": [
            {"id": 1, "name": "Primero", "latitude": 1.0, "longitude": 1.0},
            {"id": "1", "name": "Segundo", "latitude": 2.0, "longitude": 2.0}
        ]});
        let extracted = extract_points(&doc);
        assert_eq!(extracted.points.len(), 1);
        assert_eq!(extracted.points[0].name, "Primero");
        assert_eq!(extracted.dropped, 1);
    }
}
