//! Route drawing from a subdivision's origin to an interest point.
//!
//! A route is only ever drawn through explicit waypoints; there is no
//! straight-line fallback between origin and destination. At most one
//! route exists on the map at a time and [`RouteDrawer`] is its only owner.

use lote_common::{BoundingBox, CoordinateError, LatLng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

use crate::map::{MapSurface, PathHandle};
use crate::types::{PointId, Waypoint};

/// Presentation of the route polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteStyle {
    /// Stroke color (CSS).
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Stroke opacity, 0-1.
    pub opacity: f64,
    /// SVG dash pattern; `None` draws a solid line.
    pub dash_array: Option<String>,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            color: "#e74c3c".to_string(),
            weight: 4.0,
            opacity: 0.8,
            dash_array: Some("10, 10".to_string()),
        }
    }
}

/// How the viewport is fitted around a freshly drawn route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Padding on every side, in pixels.
    pub padding_px: u32,
    /// Highest zoom level a fit may reach.
    pub max_zoom: u8,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding_px: 50,
            max_zoom: 16,
        }
    }
}

/// Why nothing was drawn.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SkipReason {
    #[error("invalid route origin: {0}")]
    InvalidOrigin(CoordinateError),

    #[error("invalid route destination: {0}")]
    InvalidDestination(CoordinateError),

    #[error("no route points to draw through")]
    NoWaypoints,

    #[error("none of the {0} route points has a valid coordinate")]
    NoValidWaypoints(usize),

    #[error("unknown interest point '{0}'")]
    UnknownPoint(PointId),

    #[error("subdivision origin could not be resolved: {0}")]
    OriginUnresolved(CoordinateError),

    #[error("overlay is not showing interest points")]
    Inactive,
}

/// Result of a draw request. Skips are not errors; they only explain why
/// the map shows no route.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    Drawn {
        vertices: usize,
        skipped_waypoints: usize,
    },
    Skipped(SkipReason),
}

impl DrawOutcome {
    pub fn is_drawn(&self) -> bool {
        matches!(self, DrawOutcome::Drawn { .. })
    }
}

/// The route currently installed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    handle: PathHandle,
    vertices: Vec<LatLng>,
}

impl Route {
    pub fn handle(&self) -> PathHandle {
        self.handle
    }

    /// `[origin, waypoints.., destination]`.
    pub fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    /// Length along the path in meters.
    pub fn length_meters(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|pair| pair[0].haversine_distance(&pair[1]))
            .sum()
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_coords(&self.vertices)
    }
}

/// Build the vertex list for a route.
///
/// Waypoints are stable-sorted ascending by `order`, invalid ones are
/// skipped. Returns the vertices and the number of skipped waypoints.
pub fn build_path(
    origin: LatLng,
    destination: LatLng,
    route_points: &[Waypoint],
) -> Result<(Vec<LatLng>, usize), SkipReason> {
    let origin = LatLng::try_new(origin.lat, origin.lng).map_err(SkipReason::InvalidOrigin)?;
    let destination = LatLng::try_new(destination.lat, destination.lng)
        .map_err(SkipReason::InvalidDestination)?;

    if route_points.is_empty() {
        return Err(SkipReason::NoWaypoints);
    }

    let mut sorted: Vec<&Waypoint> = route_points.iter().collect();
    // Equal orders keep source order, and -0.0 equals 0.0.
    sorted.sort_by(|a, b| a.order.partial_cmp(&b.order).unwrap_or(Ordering::Equal));

    let mut vertices = Vec::with_capacity(sorted.len() + 2);
    vertices.push(origin);

    let mut skipped = 0;
    for (i, waypoint) in sorted.iter().enumerate() {
        match waypoint.valid_position() {
            Ok(pos) => vertices.push(pos),
            Err(e) => {
                tracing::warn!(
                    position = i,
                    order = waypoint.order,
                    error = %e,
                    "Skipping invalid route point"
                );
                skipped += 1;
            }
        }
    }

    if skipped == sorted.len() {
        return Err(SkipReason::NoValidWaypoints(skipped));
    }

    vertices.push(destination);
    Ok((vertices, skipped))
}

/// Owner of the single route overlay on a map.
#[derive(Debug, Default)]
pub struct RouteDrawer {
    current: Option<Route>,
    style: RouteStyle,
    fit: FitOptions,
}

impl RouteDrawer {
    pub fn new(style: RouteStyle, fit: FitOptions) -> Self {
        Self {
            current: None,
            style,
            fit,
        }
    }

    /// Replace the current route with one from `origin` through
    /// `route_points` to `destination`.
    ///
    /// Any existing route is removed first, whatever the outcome. Failures
    /// are logged and reported as [`DrawOutcome::Skipped`]; a viewport fit
    /// failure is logged but keeps the drawn path.
    pub fn draw_route<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        origin: LatLng,
        destination: LatLng,
        route_points: &[Waypoint],
    ) -> DrawOutcome {
        self.clear_route(map);

        let (vertices, skipped) = match build_path(origin, destination, route_points) {
            Ok(built) => built,
            Err(reason) => {
                tracing::warn!(reason = %reason, "Route not drawn");
                return DrawOutcome::Skipped(reason);
            }
        };

        let handle = map.add_path(&vertices, &self.style);
        let route = Route { handle, vertices };

        if let Some(bounds) = route.bounds() {
            if let Err(e) = map.fit_bounds(&bounds, &self.fit) {
                tracing::warn!(error = %e, "Could not fit viewport to route");
            }
        }

        let vertex_count = route.vertices.len();
        tracing::debug!(
            vertices = vertex_count,
            skipped_waypoints = skipped,
            length_m = route.length_meters(),
            "Route drawn"
        );

        self.current = Some(route);
        DrawOutcome::Drawn {
            vertices: vertex_count,
            skipped_waypoints: skipped,
        }
    }

    /// Remove the current route, if any.
    pub fn clear_route<M: MapSurface + ?Sized>(&mut self, map: &mut M) {
        if let Some(route) = self.current.take() {
            map.remove_path(route.handle);
        }
    }

    pub fn has_active_route(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    pub fn style(&self) -> &RouteStyle {
        &self.style
    }

    pub fn fit_options(&self) -> FitOptions {
        self.fit
    }
}
