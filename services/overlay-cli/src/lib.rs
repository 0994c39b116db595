//! Headless renderer for subdivision interest-point overlays.
//!
//! Fetches a subdivision document from disk or a REST backend, builds the
//! interest-points overlay on an in-memory map and exports the resulting
//! scene as GeoJSON.

pub mod cache;
pub mod config;
pub mod render;
pub mod source;

pub use cache::{CacheStats, CachedSource};
pub use config::{BackendConfig, OverlayConfig};
pub use render::{render_document, render_subdivision, RenderReport, RenderRequest};
pub use source::{FileSource, RestSource, SourceError, SubdivisionSource};
