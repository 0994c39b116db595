//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::coord::LatLng;

/// A geographic bounding box in degrees.
///
/// `min_x`/`max_x` are longitudes, `min_y`/`max_y` are latitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box enclosing every coordinate, or `None` for an empty slice.
    pub fn from_coords(coords: &[LatLng]) -> Option<Self> {
        let first = coords.first()?;
        let mut bbox = Self::new(first.lng, first.lat, first.lng, first.lat);
        for coord in &coords[1..] {
            bbox.extend(coord);
        }
        Some(bbox)
    }

    /// Grow the box to include a coordinate.
    pub fn extend(&mut self, coord: &LatLng) {
        self.min_x = self.min_x.min(coord.lng);
        self.min_y = self.min_y.min(coord.lat);
        self.max_x = self.max_x.max(coord.lng);
        self.max_y = self.max_y.max(coord.lat);
    }

    /// Width of the bounding box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the box.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min_y + self.max_y) / 2.0,
            (self.min_x + self.max_x) / 2.0,
        )
    }

    /// True when the box has no area (a single point or a straight
    /// north-south / east-west segment) or carries non-finite values.
    pub fn is_degenerate(&self) -> bool {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        !finite || self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Check if a coordinate is contained within this bbox.
    pub fn contains(&self, coord: &LatLng) -> bool {
        coord.lng >= self.min_x
            && coord.lng <= self.max_x
            && coord.lat >= self.min_y
            && coord.lat <= self.max_y
    }

    /// Corners as `[[south, west], [north, east]]`, the order map
    /// libraries expect for fit-to-bounds calls.
    pub fn to_corner_pairs(&self) -> [[f64; 2]; 2] {
        [[self.min_y, self.min_x], [self.max_y, self.max_x]]
    }
}
