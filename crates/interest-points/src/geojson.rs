//! GeoJSON export of the overlay scene.
//!
//! The site's map layers are fed GeoJSON, so the overlay can describe what
//! it shows the same way: one `Point` feature per interest point and a
//! `LineString` for the active route. Coordinates are `[lon, lat]`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::overlay::InterestPointsOverlay;
use crate::route::{Route, RouteStyle};
use crate::types::InterestPoint;

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneFeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    pub features: Vec<SceneFeature>,
}

impl SceneFeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Add a feature to the collection.
    pub fn with_feature(mut self, feature: SceneFeature) -> Self {
        self.features.push(feature);
        self
    }

    /// Add multiple features to the collection.
    pub fn with_features(mut self, features: Vec<SceneFeature>) -> Self {
        self.features.extend(features);
        self
    }
}

impl Default for SceneFeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Optional feature identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub geometry: SceneGeometry,

    pub properties: Map<String, Value>,
}

impl SceneFeature {
    /// Create a new feature with a point geometry.
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry: SceneGeometry::Point {
                coordinates: [lon, lat],
            },
            properties: Map::new(),
        }
    }

    /// Create a new feature with a LineString geometry.
    pub fn line_string(coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry: SceneGeometry::LineString { coordinates },
            properties: Map::new(),
        }
    }

    /// Set the feature ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set one property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Geometry types used by the scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SceneGeometry {
    Point {
        /// `[longitude, latitude]`.
        coordinates: [f64; 2],
    },
    LineString {
        /// `[longitude, latitude]` pairs.
        coordinates: Vec<[f64; 2]>,
    },
}

/// Feature for one interest point.
pub fn point_feature(point: &InterestPoint, selected: bool) -> SceneFeature {
    SceneFeature::point(point.position.lng, point.position.lat)
        .with_id(point.id.as_str())
        .with_property("kind", "interest_point")
        .with_property("name", point.name.as_str())
        .with_property("selected", selected)
        .with_property("route_points", point.route_points.len() as u64)
}

/// Feature for a drawn route, carrying its stroke style.
pub fn route_feature(route: &Route, style: &RouteStyle) -> SceneFeature {
    let coordinates = route.vertices().iter().map(|v| v.to_lon_lat()).collect();
    let mut feature = SceneFeature::line_string(coordinates)
        .with_property("kind", "route")
        .with_property("length_m", route.length_meters().round())
        .with_property("stroke", style.color.as_str())
        .with_property("stroke-width", style.weight)
        .with_property("stroke-opacity", style.opacity);
    if let Some(dash) = &style.dash_array {
        feature = feature.with_property("dash-array", dash.as_str());
    }
    feature
}

/// Everything the overlay currently shows. A hidden overlay exports an
/// empty collection.
pub fn scene_collection(overlay: &InterestPointsOverlay) -> SceneFeatureCollection {
    if !overlay.is_visible() {
        return SceneFeatureCollection::new();
    }

    let selected = overlay.selected_point_id();
    let mut features: Vec<SceneFeature> = overlay
        .points()
        .iter()
        .map(|p| point_feature(p, selected == Some(&p.id)))
        .collect();

    if let Some(route) = overlay.active_route() {
        features.push(route_feature(route, overlay.route_style()));
    }

    SceneFeatureCollection::new().with_features(features)
}
