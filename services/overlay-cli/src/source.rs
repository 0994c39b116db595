//! Where subdivision documents come from.
//!
//! A subdivision document is the JSON row describing one loteamiento,
//! including its origin coordinate and `interest_points` payload.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::BackendConfig;

/// Errors fetching a subdivision document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Subdivision not found: {0}")]
    NotFound(String),

    #[error("Invalid subdivision id: {0:?}")]
    InvalidId(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Subdivision document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned HTTP {0}")]
    Status(StatusCode),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// A place subdivision documents can be fetched from.
#[async_trait]
pub trait SubdivisionSource: Send + Sync {
    /// Fetch the document for one subdivision.
    async fn fetch(&self, id: &str) -> SourceResult<Value>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Reads `{dir}/{id}.json` from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> SourceResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SourceError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

#[async_trait]
impl SubdivisionSource for FileSource {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn fetch(&self, id: &str) -> SourceResult<Value> {
        let path = self.path_for(id)?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(id.to_string()));
            }
            Err(source) => return Err(SourceError::Io { path, source }),
        };

        debug!(path = %path.display(), bytes = content.len(), "Read subdivision document");
        Ok(serde_json::from_str(&content)?)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Fetches rows from a PostgREST-style backend:
/// `GET {base}/rest/v1/{table}?id=eq.{id}&select=*`.
#[derive(Debug, Clone)]
pub struct RestSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    table: String,
}

impl RestSource {
    pub fn new(config: &BackendConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            table: config.table.clone(),
        })
    }

    /// Endpoint for one subdivision row.
    pub fn url_for(&self, id: &str) -> String {
        format!(
            "{}/rest/v1/{}?id=eq.{}&select=*",
            self.base_url, self.table, id
        )
    }
}

#[async_trait]
impl SubdivisionSource for RestSource {
    #[instrument(skip(self), fields(table = %self.table))]
    async fn fetch(&self, id: &str) -> SourceResult<Value> {
        if id.is_empty() || id.contains(['&', '?', '#', '/']) {
            return Err(SourceError::InvalidId(id.to_string()));
        }

        let mut request = self
            .client
            .get(self.url_for(id))
            .header(header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key)
                .header(header::AUTHORIZATION, format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }

        let rows: Vec<Value> = response.json().await?;
        debug!(rows = rows.len(), "Backend returned subdivision rows");

        rows.into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_url() {
        let source = RestSource::new(&BackendConfig {
            base_url: "https://db.example.com/".to_string(),
            api_key: None,
            table: "loteamientos".to_string(),
        })
        .unwrap();

        assert_eq!(
            source.url_for("42"),
            "https://db.example.com/rest/v1/loteamientos?id=eq.42&select=*"
        );
    }

    #[test]
    fn test_rest_source_rejects_query_injection() {
        let source = RestSource::new(&BackendConfig {
            base_url: "https://db.example.com".to_string(),
            api_key: Some("key".to_string()),
            table: "loteamientos".to_string(),
        })
        .unwrap();

        let err = tokio_test::block_on(source.fetch("1&select=password")).unwrap_err();
        assert!(matches!(err, SourceError::InvalidId(_)));
    }

    #[test]
    fn test_file_source_rejects_path_ids() {
        let source = FileSource::new("/tmp");
        assert!(matches!(
            source.path_for("../etc/passwd"),
            Err(SourceError::InvalidId(_))
        ));
        assert!(matches!(source.path_for(""), Err(SourceError::InvalidId(_))));
        assert_eq!(
            source.path_for("lote-7").unwrap(),
            PathBuf::from("/tmp/lote-7.json")
        );
    }
}
