//! Error types for coordinate handling.

use thiserror::Error;

/// Result type alias using CoordinateError.
pub type CoordinateResult<T> = Result<T, CoordinateError>;

/// Reasons a coordinate-like value could not be turned into a [`crate::LatLng`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Missing coordinate field: {0}")]
    MissingField(String),

    #[error("Coordinate field '{field}' is not numeric: {value}")]
    NotNumeric { field: String, value: String },

    #[error("Coordinate field '{0}' is not a finite number")]
    NonFinite(String),

    #[error("Unsupported coordinate shape: expected {{lat,lng}} or {{latitude,longitude}}")]
    UnsupportedShape,
}

impl CoordinateError {
    /// Field name the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            CoordinateError::MissingField(field)
            | CoordinateError::NotNumeric { field, .. }
            | CoordinateError::NonFinite(field) => Some(field),
            CoordinateError::UnsupportedShape => None,
        }
    }
}
