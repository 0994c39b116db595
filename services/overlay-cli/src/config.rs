//! Overlay configuration loading and types.

use anyhow::{Context, Result};
use interest_points::{DeviceClass, FitOptions, OverlayOptions, RouteStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::cache::CachedSource;
use crate::source::SubdivisionSource;

/// Default lifetime of a cached subdivision document.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default backend table holding subdivision rows.
pub const DEFAULT_TABLE: &str = "loteamientos";

/// Overlay configuration loaded from a YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Route polyline style.
    pub route_style: RouteStyle,

    /// Viewport fitting around a drawn route.
    pub fit: FitOptions,

    /// Device class markers are built for.
    pub device: DeviceClass,

    /// Seconds a fetched subdivision stays cached by [`OverlayConfig::cached`].
    pub cache_ttl_secs: u64,

    /// Remote backend; when absent, documents are read from disk.
    pub backend: Option<BackendConfig>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            route_style: RouteStyle::default(),
            fit: FitOptions::default(),
            device: DeviceClass::default(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            backend: None,
        }
    }
}

/// REST backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL, e.g. `https://example.supabase.co`.
    pub base_url: String,

    /// Key sent in the `apikey` header.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

impl OverlayConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                "Overlay config file {} does not exist, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;

        Self::from_yaml(&content).with_context(|| format!("Failed to parse: {:?}", path))
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document parses as null rather than an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Wrap `source` in a cache using the configured TTL.
    pub fn cached<S: SubdivisionSource>(&self, source: S) -> CachedSource<S> {
        CachedSource::new(source, Duration::from_secs(self.cache_ttl_secs))
    }

    /// Options for constructing the overlay.
    pub fn overlay_options(&self) -> OverlayOptions {
        OverlayOptions {
            device: self.device,
            route_style: self.route_style.clone(),
            fit: self.fit,
        }
    }
}
