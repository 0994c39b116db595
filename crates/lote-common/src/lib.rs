//! Common geographic types shared by the subdivision map crates.

pub mod bbox;
pub mod coord;
pub mod error;

pub use bbox::BoundingBox;
pub use coord::{is_valid, LatLng, RawCoordinate};
pub use error::{CoordinateError, CoordinateResult};
