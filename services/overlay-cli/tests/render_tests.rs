//! End-to-end rendering tests against on-disk subdivision documents.

use std::sync::atomic::Ordering;

use interest_points::{DeviceClass, DrawOutcome, PointId, SceneGeometry, SkipReason};
use overlay_cli::render::{self, RenderRequest};
use overlay_cli::{FileSource, OverlayConfig, SourceError, SubdivisionSource};
use serde_json::Value;
use tempfile::TempDir;
use test_utils::subdivision;

fn write_doc(dir: &TempDir, id: &str, doc: &Value) {
    std::fs::write(dir.path().join(format!("{}.json", id)), doc.to_string()).unwrap();
}

fn select(id: PointId) -> RenderRequest {
    RenderRequest {
        select: Some(id),
        viewport_px: None,
    }
}

// ============================================================================
// File source
// ============================================================================

#[tokio::test]
async fn test_file_source_reads_document() {
    let dir = TempDir::new().unwrap();
    write_doc(&dir, "lote-1", &subdivision::end_to_end());

    let doc = FileSource::new(dir.path()).fetch("lote-1").await.unwrap();

    assert_eq!(doc, subdivision::end_to_end());
}

#[tokio::test]
async fn test_file_source_missing_document() {
    let dir = TempDir::new().unwrap();

    let err = FileSource::new(dir.path()).fetch("nope").await.unwrap_err();

    assert!(matches!(err, SourceError::NotFound(id) if id == "nope"));
}

#[tokio::test]
async fn test_file_source_invalid_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.json"), "{\"lat\":").unwrap();

    let err = FileSource::new(dir.path()).fetch("bad").await.unwrap_err();

    assert!(matches!(err, SourceError::Json(_)));
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_render_selected_route() {
    let dir = TempDir::new().unwrap();
    write_doc(&dir, "lote-1", &subdivision::end_to_end());
    let source = FileSource::new(dir.path());

    let report = render::render_subdivision(
        &source,
        "lote-1",
        OverlayConfig::default().overlay_options(),
        &select(PointId::from(1)),
    )
    .await
    .unwrap();

    assert_eq!(report.points, 1);
    assert_eq!(
        report.selection,
        Some(DrawOutcome::Drawn {
            vertices: 3,
            skipped_waypoints: 0
        })
    );
    assert!(report.route_length_m.unwrap() > 0.0);
    assert!(report.viewport.is_some());

    let route = report.scene.features.last().unwrap();
    match &route.geometry {
        SceneGeometry::LineString { coordinates } => assert_eq!(coordinates.len(), 3),
        _ => panic!("Expected LineString geometry"),
    }
}

#[test]
fn test_render_without_selection_has_no_route() {
    let report = render::render_document(
        &subdivision::two_points(),
        OverlayConfig::default().overlay_options(),
        &RenderRequest::default(),
    )
    .unwrap();

    assert_eq!(report.points, 2);
    assert!(report.selection.is_none());
    assert!(report.route_length_m.is_none());
    assert_eq!(report.scene.features.len(), 2);
}

#[test]
fn test_render_selection_without_route_points() {
    let report = render::render_document(
        &subdivision::two_points(),
        OverlayConfig::default().overlay_options(),
        &select(PointId::from("escuela-2")),
    )
    .unwrap();

    assert_eq!(
        report.selection,
        Some(DrawOutcome::Skipped(SkipReason::NoWaypoints))
    );
    assert!(report.route_length_m.is_none());
}

#[test]
fn test_render_reports_dropped_points() {
    let report = render::render_document(
        &subdivision::mixed_validity(),
        OverlayConfig::default().overlay_options(),
        &RenderRequest::default(),
    )
    .unwrap();

    assert_eq!(report.points, 3);
    assert_eq!(report.dropped, 7);
}

#[test]
fn test_render_uses_configured_device() {
    let config = OverlayConfig::from_yaml("device: mobile").unwrap();
    assert_eq!(config.overlay_options().device, DeviceClass::Mobile);

    let report = render::render_document(
        &subdivision::end_to_end(),
        config.overlay_options(),
        &RenderRequest::default(),
    )
    .unwrap();

    assert_eq!(report.points, 1);
}

// ============================================================================
// Cache and output
// ============================================================================

#[tokio::test]
async fn test_cached_source_serves_stale_file_within_ttl() {
    let dir = TempDir::new().unwrap();
    write_doc(&dir, "lote-1", &subdivision::end_to_end());
    let cache = OverlayConfig::default().cached(FileSource::new(dir.path()));

    let first = cache.fetch("lote-1").await.unwrap();
    write_doc(&dir, "lote-1", &subdivision::two_points());
    let second = cache.fetch("lote-1").await.unwrap();

    assert_eq!(first, second);

    cache.invalidate("lote-1").await;
    let third = cache.fetch("lote-1").await.unwrap();
    assert_eq!(third, subdivision::two_points());
}

#[tokio::test]
async fn test_zero_ttl_config_disables_caching() {
    let dir = TempDir::new().unwrap();
    write_doc(&dir, "lote-1", &subdivision::end_to_end());
    let config = OverlayConfig::from_yaml("cache_ttl_secs: 0").unwrap();
    let cache = config.cached(FileSource::new(dir.path()));

    cache.fetch("lote-1").await.unwrap();
    write_doc(&dir, "lote-1", &subdivision::two_points());
    let second = cache.fetch("lote-1").await.unwrap();

    assert_eq!(second, subdivision::two_points());
    assert_eq!(cache.stats().hits.load(Ordering::Relaxed), 0);
    assert_eq!(cache.stats().expired.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_write_scene_produces_geojson() {
    let dir = TempDir::new().unwrap();
    let report = render::render_document(
        &subdivision::two_points(),
        OverlayConfig::default().overlay_options(),
        &select(PointId::from(1)),
    )
    .unwrap();
    let path = dir.path().join("scene.geojson");

    render::write_scene(&path, &report.scene).await.unwrap();

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["type"], "FeatureCollection");
    assert_eq!(written["features"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("overlay.yaml");
    std::fs::write(
        &path,
        "cache_ttl_secs: 60\nfit:\n  padding_px: 10\n  max_zoom: 18\n",
    )
    .unwrap();

    let config = OverlayConfig::load(&path).unwrap();

    assert_eq!(config.cache_ttl_secs, 60);
    assert_eq!(config.fit.padding_px, 10);
    assert_eq!(config.fit.max_zoom, 18);
}
