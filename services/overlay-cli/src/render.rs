//! Build an overlay scene from a subdivision document.

use anyhow::{Context, Result};
use interest_points::{
    scene_collection, DrawOutcome, HeadlessMap, InitOutcome, InterestPointsOverlay, OverlayOptions,
    PointId, SceneFeatureCollection, Viewport,
};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use crate::source::SubdivisionSource;

/// What to render.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    /// Point to select after loading, as if its marker were clicked.
    pub select: Option<PointId>,
    /// Map viewport size in pixels.
    pub viewport_px: Option<(u32, u32)>,
}

/// Outcome of one render.
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub points: usize,
    pub dropped: usize,
    /// Present when a point was selected.
    pub selection: Option<DrawOutcome>,
    pub route_length_m: Option<f64>,
    pub viewport: Option<Viewport>,
    pub scene: SceneFeatureCollection,
}

/// Load a document into a fresh overlay on a headless map and export the scene.
pub fn render_document(
    subdivision: &Value,
    options: OverlayOptions,
    request: &RenderRequest,
) -> Result<RenderReport> {
    let mut map = match request.viewport_px {
        Some((width, height)) => HeadlessMap::new(width, height),
        None => HeadlessMap::default(),
    };
    let mut overlay = InterestPointsOverlay::new(options);

    let (points, dropped) = match overlay
        .init(&mut map, subdivision)
        .context("Failed to initialize interest points overlay")?
    {
        InitOutcome::Loaded { points, dropped } => (points, dropped),
        InitOutcome::AlreadyInitialized => (overlay.points().len(), 0),
    };

    let selection = request.select.as_ref().map(|id| {
        let outcome = overlay.handle_selection(&mut map, id);
        if let DrawOutcome::Skipped(reason) = &outcome {
            warn!(point = %id, reason = %reason, "No route drawn for selected point");
        }
        outcome
    });

    let route_length_m = overlay.active_route().map(|route| route.length_meters());
    if let Some(length) = route_length_m {
        info!(length_m = length.round(), "Route drawn");
    }

    Ok(RenderReport {
        points,
        dropped,
        selection,
        route_length_m,
        viewport: map.viewport(),
        scene: scene_collection(&overlay),
    })
}

/// Fetch a subdivision and render it.
pub async fn render_subdivision<S>(
    source: &S,
    subdivision_id: &str,
    options: OverlayOptions,
    request: &RenderRequest,
) -> Result<RenderReport>
where
    S: SubdivisionSource + ?Sized,
{
    let document = source
        .fetch(subdivision_id)
        .await
        .with_context(|| format!("Failed to fetch subdivision {}", subdivision_id))?;

    render_document(&document, options, request)
}

/// Serialize a scene as pretty-printed GeoJSON.
pub fn scene_to_string(scene: &SceneFeatureCollection) -> Result<String> {
    serde_json::to_string_pretty(scene).context("Failed to serialize scene")
}

/// Write a scene to disk as GeoJSON.
pub async fn write_scene(path: impl AsRef<Path>, scene: &SceneFeatureCollection) -> Result<()> {
    let path = path.as_ref();
    let body = scene_to_string(scene)?;
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("Failed to write scene: {:?}", path))?;
    info!(path = %path.display(), features = scene.features.len(), "Scene written");
    Ok(())
}
