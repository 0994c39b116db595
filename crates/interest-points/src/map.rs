//! The map surface the overlay draws on.
//!
//! [`MapSurface`] is the seam to whatever actually renders the map. The
//! overlay never owns the surface; callers pass it into each operation.
//! [`HeadlessMap`] is an in-memory implementation that records what was
//! installed, used by the CLI renderer and by tests.

use lote_common::{BoundingBox, LatLng};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::marker::MarkerSpec;
use crate::route::{FitOptions, RouteStyle};
use crate::types::PointId;

/// Web map tile edge in pixels.
const TILE_SIZE: f64 = 256.0;

/// Handle to a marker layer group created on a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LayerHandle(pub u64);

/// Handle to a path overlay installed on a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PathHandle(pub u64);

/// Errors a map surface can report.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MapError {
    #[error("Cannot fit viewport to degenerate bounds: {0:?}")]
    DegenerateBounds(BoundingBox),

    #[error("Unknown layer: {0:?}")]
    UnknownLayer(LayerHandle),

    #[error("Map rejected operation: {0}")]
    Rejected(String),
}

/// Operations the overlay needs from a map.
pub trait MapSurface {
    /// Whether the surface is mounted and can accept layers.
    fn is_ready(&self) -> bool {
        true
    }

    /// Create a (detached) layer group holding the given markers.
    fn create_marker_layer(&mut self, markers: &[MarkerSpec]) -> LayerHandle;

    /// Add a layer group to the map. Attaching an attached layer is a no-op.
    fn attach_layer(&mut self, layer: LayerHandle) -> Result<(), MapError>;

    /// Remove a layer group from the map without destroying it.
    fn detach_layer(&mut self, layer: LayerHandle);

    fn is_layer_attached(&self, layer: LayerHandle) -> bool;

    /// Destroy a layer group, detaching it first if needed.
    fn drop_layer(&mut self, layer: LayerHandle);

    /// Install a styled polyline.
    fn add_path(&mut self, vertices: &[LatLng], style: &RouteStyle) -> PathHandle;

    /// Remove a polyline. Unknown handles are ignored.
    fn remove_path(&mut self, path: PathHandle);

    /// Move the viewport so `bounds` is visible with the given padding,
    /// never zooming in past `options.max_zoom`.
    fn fit_bounds(&mut self, bounds: &BoundingBox, options: &FitOptions) -> Result<(), MapError>;

    /// Briefly tag a marker's element with a CSS class.
    fn flash_marker(&mut self, _point: &PointId, _class: &str, _duration: Duration) {}
}

/// Viewport position after a fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

#[derive(Debug, Clone)]
struct HeadlessLayer {
    markers: Vec<MarkerSpec>,
    attached: bool,
}

#[derive(Debug, Clone)]
struct HeadlessPath {
    vertices: Vec<LatLng>,
    style: RouteStyle,
}

/// In-memory map surface.
///
/// Tracks layers, paths, the last viewport and marker flashes so a scene
/// can be inspected or exported without a browser.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    width_px: u32,
    height_px: u32,
    ready: bool,
    next_id: u64,
    layers: BTreeMap<LayerHandle, HeadlessLayer>,
    paths: BTreeMap<PathHandle, HeadlessPath>,
    viewport: Option<Viewport>,
    flashes: Vec<(PointId, String)>,
}

impl HeadlessMap {
    /// Create a ready surface with the given size in pixels.
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
            ready: true,
            next_id: 1,
            layers: BTreeMap::new(),
            paths: BTreeMap::new(),
            viewport: None,
            flashes: Vec::new(),
        }
    }

    /// A surface that reports itself as not mounted.
    pub fn unmounted() -> Self {
        Self {
            ready: false,
            ..Self::default()
        }
    }

    fn next_handle(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of layers currently attached.
    pub fn attached_layer_count(&self) -> usize {
        self.layers.values().filter(|l| l.attached).count()
    }

    /// Number of layers that exist, attached or not.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Markers of every attached layer.
    pub fn visible_markers(&self) -> Vec<&MarkerSpec> {
        self.layers
            .values()
            .filter(|l| l.attached)
            .flat_map(|l| l.markers.iter())
            .collect()
    }

    /// Number of installed paths.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Vertices of every installed path, oldest first.
    pub fn paths(&self) -> Vec<&[LatLng]> {
        self.paths.values().map(|p| p.vertices.as_slice()).collect()
    }

    /// Style of the given path.
    pub fn path_style(&self, path: PathHandle) -> Option<&RouteStyle> {
        self.paths.get(&path).map(|p| &p.style)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Marker flashes requested so far, in order.
    pub fn flashes(&self) -> &[(PointId, String)] {
        &self.flashes
    }

    /// Zoom level that fits `bounds` into the usable area, Web Mercator.
    fn zoom_for(&self, bounds: &BoundingBox, options: &FitOptions) -> u8 {
        let pad = 2.0 * f64::from(options.padding_px);
        let usable_w = (f64::from(self.width_px) - pad).max(1.0);
        let usable_h = (f64::from(self.height_px) - pad).max(1.0);

        let zoom_x = if bounds.width() > 0.0 {
            (usable_w * 360.0 / (bounds.width() * TILE_SIZE)).log2()
        } else {
            f64::INFINITY
        };

        let merc = |lat: f64| (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        let merc_span = merc(bounds.max_y) - merc(bounds.min_y);
        let zoom_y = if merc_span > 0.0 {
            (usable_h * std::f64::consts::TAU / (merc_span * TILE_SIZE)).log2()
        } else {
            f64::INFINITY
        };

        let zoom = zoom_x.min(zoom_y).floor();
        if zoom.is_finite() {
            zoom.clamp(0.0, f64::from(options.max_zoom)) as u8
        } else {
            options.max_zoom
        }
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

impl MapSurface for HeadlessMap {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn create_marker_layer(&mut self, markers: &[MarkerSpec]) -> LayerHandle {
        let handle = LayerHandle(self.next_handle());
        self.layers.insert(
            handle,
            HeadlessLayer {
                markers: markers.to_vec(),
                attached: false,
            },
        );
        handle
    }

    fn attach_layer(&mut self, layer: LayerHandle) -> Result<(), MapError> {
        let entry = self
            .layers
            .get_mut(&layer)
            .ok_or(MapError::UnknownLayer(layer))?;
        entry.attached = true;
        Ok(())
    }

    fn detach_layer(&mut self, layer: LayerHandle) {
        if let Some(entry) = self.layers.get_mut(&layer) {
            entry.attached = false;
        }
    }

    fn is_layer_attached(&self, layer: LayerHandle) -> bool {
        self.layers.get(&layer).map(|l| l.attached).unwrap_or(false)
    }

    fn drop_layer(&mut self, layer: LayerHandle) {
        self.layers.remove(&layer);
    }

    fn add_path(&mut self, vertices: &[LatLng], style: &RouteStyle) -> PathHandle {
        let handle = PathHandle(self.next_handle());
        self.paths.insert(
            handle,
            HeadlessPath {
                vertices: vertices.to_vec(),
                style: style.clone(),
            },
        );
        handle
    }

    fn remove_path(&mut self, path: PathHandle) {
        self.paths.remove(&path);
    }

    fn fit_bounds(&mut self, bounds: &BoundingBox, options: &FitOptions) -> Result<(), MapError> {
        let finite = [bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(MapError::DegenerateBounds(*bounds));
        }

        self.viewport = Some(Viewport {
            center: bounds.center(),
            zoom: self.zoom_for(bounds, options),
        });
        Ok(())
    }

    fn flash_marker(&mut self, point: &PointId, class: &str, _duration: Duration) {
        self.flashes.push((point.clone(), class.to_string()));
    }
}
