//! Interest-points overlay for one subdivision.
//!
//! Owns the extracted points, their marker layer, the selection and the
//! route drawer. The map surface is borrowed per call; whoever owns the
//! map view owns the overlay and drives its lifecycle:
//!
//! ```text
//! Uninitialized --init--> Initialized{visible} <--show/hide--> Initialized{!visible}
//!        ^                        |
//!        +------ init ------ Destroyed <--destroy--+
//! ```

use lote_common::LatLng;
use serde_json::Value;
use thiserror::Error;

use crate::map::{LayerHandle, MapError, MapSurface};
use crate::marker::{
    ClickEvent, ClickSource, DeviceClass, MarkerFactory, MarkerSpec, MobileCardPresenter,
    CLICK_FEEDBACK_CLASS, CLICK_FEEDBACK_DURATION,
};
use crate::origin::resolve_origin;
use crate::payload::extract_points;
use crate::route::{DrawOutcome, FitOptions, Route, RouteDrawer, RouteStyle, SkipReason};
use crate::types::{InterestPoint, PointId};

/// Errors that abort overlay initialization.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Map surface is not available")]
    MapUnavailable,

    #[error("Could not attach marker layer: {0}")]
    Map(#[from] MapError),
}

/// Lifecycle state of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Uninitialized,
    Initialized { visible: bool },
    Destroyed,
}

/// Result of an `init` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Loaded { points: usize, dropped: usize },
    /// The overlay was already initialized; nothing changed.
    AlreadyInitialized,
}

/// Construction-time settings.
#[derive(Debug, Clone, Default)]
pub struct OverlayOptions {
    pub device: DeviceClass,
    pub route_style: RouteStyle,
    pub fit: FitOptions,
}

/// One row of the interest-point list next to the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListEntry<'a> {
    pub id: &'a PointId,
    pub name: &'a str,
    pub selected: bool,
}

/// The overlay itself.
pub struct InterestPointsOverlay {
    state: OverlayState,
    factory: MarkerFactory,
    drawer: RouteDrawer,
    card_presenter: Option<Box<dyn MobileCardPresenter>>,
    subdivision: Option<Value>,
    points: Vec<InterestPoint>,
    markers: Vec<MarkerSpec>,
    layer: Option<LayerHandle>,
    selected: Option<PointId>,
}

impl InterestPointsOverlay {
    pub fn new(options: OverlayOptions) -> Self {
        Self {
            state: OverlayState::Uninitialized,
            factory: MarkerFactory::new(options.device),
            drawer: RouteDrawer::new(options.route_style, options.fit),
            card_presenter: None,
            subdivision: None,
            points: Vec::new(),
            markers: Vec::new(),
            layer: None,
            selected: None,
        }
    }

    /// Attach the page's mobile card. Only consulted on mobile devices.
    pub fn with_card_presenter(mut self, presenter: Box<dyn MobileCardPresenter>) -> Self {
        self.card_presenter = Some(presenter);
        self
    }

    /// Load a subdivision's interest points and show their markers.
    ///
    /// Malformed point data never fails: it just yields fewer (or no)
    /// points. Calling `init` on an initialized overlay is a logged no-op.
    /// After `destroy`, `init` rebuilds from scratch.
    pub fn init<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        subdivision: &Value,
    ) -> Result<InitOutcome, OverlayError> {
        if let OverlayState::Initialized { .. } = self.state {
            tracing::warn!("Interest points overlay already initialized, ignoring init");
            return Ok(InitOutcome::AlreadyInitialized);
        }

        if !map.is_ready() {
            tracing::error!("Map surface not available, interest points overlay not created");
            return Err(OverlayError::MapUnavailable);
        }

        let extracted = extract_points(subdivision);
        let markers: Vec<MarkerSpec> = extracted
            .points
            .iter()
            .map(|p| self.factory.create_marker(p))
            .collect();

        let layer = map.create_marker_layer(&markers);
        if let Err(e) = map.attach_layer(layer) {
            map.drop_layer(layer);
            tracing::error!(error = %e, "Could not attach interest point layer");
            return Err(e.into());
        }

        let loaded = InitOutcome::Loaded {
            points: extracted.points.len(),
            dropped: extracted.dropped,
        };

        self.points = extracted.points;
        self.markers = markers;
        self.layer = Some(layer);
        self.subdivision = Some(subdivision.clone());
        self.selected = None;
        self.state = OverlayState::Initialized { visible: true };

        tracing::info!(
            points = self.points.len(),
            dropped = extracted.dropped,
            device = ?self.factory.device(),
            "Interest points overlay initialized"
        );

        Ok(loaded)
    }

    /// Show markers, re-attaching the layer if it was detached.
    pub fn show<M: MapSurface + ?Sized>(&mut self, map: &mut M) {
        let OverlayState::Initialized { .. } = self.state else {
            tracing::debug!(state = ?self.state, "show() ignored");
            return;
        };

        if let Some(layer) = self.layer {
            if !map.is_layer_attached(layer) {
                if let Err(e) = map.attach_layer(layer) {
                    tracing::warn!(error = %e, "Could not re-attach interest point layer");
                }
            }
        }
        self.state = OverlayState::Initialized { visible: true };
    }

    /// Hide markers, drop the active route and forget the selection.
    pub fn hide<M: MapSurface + ?Sized>(&mut self, map: &mut M) {
        self.drawer.clear_route(map);
        self.selected = None;

        let OverlayState::Initialized { .. } = self.state else {
            return;
        };

        if let Some(layer) = self.layer {
            map.detach_layer(layer);
        }
        self.state = OverlayState::Initialized { visible: false };
    }

    /// Flip visibility. Returns the new visibility.
    pub fn toggle<M: MapSurface + ?Sized>(&mut self, map: &mut M) -> bool {
        let visible = !self.is_visible();
        self.set_visible(map, visible);
        self.is_visible()
    }

    pub fn set_visible<M: MapSurface + ?Sized>(&mut self, map: &mut M, visible: bool) {
        if visible {
            self.show(map);
        } else {
            self.hide(map);
        }
    }

    /// Select a point and draw the route to it from the subdivision origin.
    ///
    /// The selection is recorded even when no route can be drawn, so the
    /// UI can still highlight the point.
    pub fn handle_selection<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        point_id: &PointId,
    ) -> DrawOutcome {
        if !self.is_visible() {
            tracing::debug!(point_id = %point_id, "Selection ignored while hidden");
            return DrawOutcome::Skipped(SkipReason::Inactive);
        }

        let Some(point) = self.points.iter().find(|p| &p.id == point_id) else {
            tracing::warn!(point_id = %point_id, "Selected interest point not found");
            return DrawOutcome::Skipped(SkipReason::UnknownPoint(point_id.clone()));
        };

        self.selected = Some(point.id.clone());

        let origin = match self.subdivision.as_ref().map(resolve_origin) {
            Some(Ok(origin)) => origin,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Subdivision origin unavailable, no route drawn");
                self.drawer.clear_route(map);
                return DrawOutcome::Skipped(SkipReason::OriginUnresolved(e));
            }
            None => return DrawOutcome::Skipped(SkipReason::Inactive),
        };

        self.drawer
            .draw_route(map, origin, point.destination(), &point.route_points)
    }

    /// Entry point for a marker or list click.
    ///
    /// Marker clicks flash feedback on the marker; on mobile the point's
    /// card is handed to the presenter. Then the point is selected. Clicks
    /// on a hidden overlay do nothing.
    pub fn handle_marker_click<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        point_id: &PointId,
        event: ClickEvent,
    ) -> DrawOutcome {
        if !self.is_visible() {
            tracing::debug!(point_id = %point_id, "Click ignored while hidden");
            return DrawOutcome::Skipped(SkipReason::Inactive);
        }

        if event.source == ClickSource::Marker {
            map.flash_marker(point_id, CLICK_FEEDBACK_CLASS, CLICK_FEEDBACK_DURATION);
        }

        if self.factory.device().is_mobile() {
            let card = self
                .markers
                .iter()
                .find(|m| &m.point_id == point_id)
                .and_then(|m| m.mobile_card.as_ref());
            if let (Some(card), Some(presenter)) = (card, self.card_presenter.as_mut()) {
                presenter.present(card);
            }
        }

        self.handle_selection(map, point_id)
    }

    /// Remove everything from the map and reset all state.
    pub fn destroy<M: MapSurface + ?Sized>(&mut self, map: &mut M) {
        if let Some(layer) = self.layer.take() {
            map.detach_layer(layer);
            map.drop_layer(layer);
        }
        self.drawer.clear_route(map);
        self.markers.clear();
        self.points.clear();
        self.subdivision = None;
        self.selected = None;
        self.state = OverlayState::Destroyed;

        tracing::info!("Interest points overlay destroyed");
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, OverlayState::Initialized { visible: true })
    }

    pub fn points(&self) -> &[InterestPoint] {
        &self.points
    }

    pub fn point(&self, id: &PointId) -> Option<&InterestPoint> {
        self.points.iter().find(|p| &p.id == id)
    }

    pub fn markers(&self) -> &[MarkerSpec] {
        &self.markers
    }

    pub fn marker(&self, id: &PointId) -> Option<&MarkerSpec> {
        self.markers.iter().find(|m| &m.point_id == id)
    }

    pub fn selected_point_id(&self) -> Option<&PointId> {
        self.selected.as_ref()
    }

    pub fn selected_point(&self) -> Option<&InterestPoint> {
        self.selected.as_ref().and_then(|id| self.point(id))
    }

    pub fn active_route(&self) -> Option<&Route> {
        self.drawer.current_route()
    }

    pub fn has_active_route(&self) -> bool {
        self.drawer.has_active_route()
    }

    pub fn route_style(&self) -> &RouteStyle {
        self.drawer.style()
    }

    pub fn device(&self) -> DeviceClass {
        self.factory.device()
    }

    /// Origin of the loaded subdivision, if it resolves.
    pub fn origin(&self) -> Option<LatLng> {
        self.subdivision
            .as_ref()
            .and_then(|s| resolve_origin(s).ok())
    }

    /// Rows for the interest-point list, in load order.
    pub fn list_entries(&self) -> Vec<ListEntry<'_>> {
        self.points
            .iter()
            .map(|p| ListEntry {
                id: &p.id,
                name: &p.name,
                selected: self.selected.as_ref() == Some(&p.id),
            })
            .collect()
    }
}

impl Default for InterestPointsOverlay {
    fn default() -> Self {
        Self::new(OverlayOptions::default())
    }
}

impl std::fmt::Debug for InterestPointsOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterestPointsOverlay")
            .field("state", &self.state)
            .field("device", &self.factory.device())
            .field("points", &self.points.len())
            .field("selected", &self.selected)
            .field("has_route", &self.drawer.has_active_route())
            .finish()
    }
}
