//! Interest points on a subdivision map.
//!
//! A subdivision (loteamiento) may list nearby points of interest such as
//! schools, clubs or shops, each optionally with a predefined path from
//! the subdivision to it. This crate turns the subdivision document into
//! markers, and draws the path when a point is selected.
//!
//! # Example
//!
//! ```rust
//! use interest_points::{HeadlessMap, InterestPointsOverlay, PointId};
//! use serde_json::json;
//!
//! let subdivision = json!({
//!     "lat": -25.70,
//!     "long": -56.24,
//!     "interest_points": [{
//!         "id": 1,
//!         "name": "Club",
//!         "latitude": -25.71,
//!         "longitude": -56.20,
//!         "routePoints": [{"latitude": -25.705, "longitude": -56.22, "order": 1}]
//!     }]
//! });
//!
//! let mut map = HeadlessMap::default();
//! let mut overlay = InterestPointsOverlay::default();
//! overlay.init(&mut map, &subdivision).unwrap();
//!
//! let outcome = overlay.handle_selection(&mut map, &PointId::from(1));
//! assert!(outcome.is_drawn());
//! assert_eq!(overlay.active_route().unwrap().vertices().len(), 3);
//! ```

pub mod geojson;
pub mod map;
pub mod marker;
pub mod origin;
pub mod overlay;
pub mod payload;
pub mod route;
pub mod toggle;
pub mod types;

// Re-export commonly used types
pub use geojson::{scene_collection, SceneFeature, SceneFeatureCollection, SceneGeometry};
pub use map::{HeadlessMap, LayerHandle, MapError, MapSurface, PathHandle, Viewport};
pub use marker::{
    ClickEvent, ClickSource, DeviceClass, MarkerFactory, MarkerSpec, MobileCardPayload,
    MobileCardPresenter, Popup,
};
pub use origin::resolve_origin;
pub use overlay::{
    InitOutcome, InterestPointsOverlay, ListEntry, OverlayError, OverlayOptions, OverlayState,
};
pub use payload::{extract_points, ExtractedPoints, PayloadError, PointsEncoding};
pub use route::{DrawOutcome, FitOptions, Route, RouteDrawer, RouteStyle, SkipReason};
pub use toggle::{ToggleSource, VisibilityToggle};
pub use types::{InterestPoint, PointId, Waypoint};

pub use lote_common::{is_valid, BoundingBox, LatLng};
