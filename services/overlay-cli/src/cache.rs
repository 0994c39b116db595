//! In-memory TTL cache in front of a subdivision source.
//!
//! Meant for long-lived embedders that render the same subdivisions
//! repeatedly; the `lotes-overlay` binary fetches once per run and reads
//! its source directly. Build one with [`OverlayConfig::cached`].
//!
//! Entries are keyed by subdivision id and expire lazily on read. Failed
//! fetches are not cached.
//!
//! [`OverlayConfig::cached`]: crate::config::OverlayConfig::cached

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::source::{SourceResult, SubdivisionSource};

struct CachedDocument {
    document: Value,
    inserted_at: Instant,
}

impl CachedDocument {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Statistics for the subdivision cache.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Total cache hits.
    pub hits: AtomicU64,
    /// Total cache misses.
    pub misses: AtomicU64,
    /// Total entries expired via TTL.
    pub expired: AtomicU64,
}

impl CacheStats {
    /// Cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

/// Wraps a source with a per-id TTL cache.
pub struct CachedSource<S> {
    inner: S,
    entries: RwLock<HashMap<String, CachedDocument>>,
    ttl: Duration,
    stats: CacheStats,
}

impl<S: SubdivisionSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        tracing::info!(
            source = inner.name(),
            ttl_secs = ttl.as_secs(),
            "Subdivision cache initialized"
        );

        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
            ttl,
            stats: CacheStats::default(),
        }
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of entries currently held, including expired ones not yet read.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop one entry.
    pub async fn invalidate(&self, id: &str) {
        self.entries.write().await.remove(id);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    async fn lookup(&self, id: &str) -> Option<Value> {
        let mut entries = self.entries.write().await;

        let entry = entries.get(id)?;
        if !entry.is_expired(self.ttl) {
            return Some(entry.document.clone());
        }

        entries.remove(id);
        self.stats.expired.fetch_add(1, Ordering::Relaxed);
        None
    }
}

#[async_trait]
impl<S: SubdivisionSource> SubdivisionSource for CachedSource<S> {
    async fn fetch(&self, id: &str) -> SourceResult<Value> {
        if let Some(document) = self.lookup(id).await {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(id, "Subdivision cache hit");
            return Ok(document);
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, source = self.inner.name(), "Subdivision cache miss");

        let document = self.inner.fetch(id).await?;
        self.entries.write().await.insert(
            id.to_string(),
            CachedDocument {
                document: document.clone(),
                inserted_at: Instant::now(),
            },
        );

        Ok(document)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use serde_json::json;

    /// Source that counts fetches and fails for unknown ids.
    #[derive(Default)]
    struct CountingSource {
        fetches: AtomicU64,
    }

    #[async_trait]
    impl SubdivisionSource for CountingSource {
        async fn fetch(&self, id: &str) -> SourceResult<Value> {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            if id == "missing" {
                return Err(SourceError::NotFound(id.to_string()));
            }
            Ok(json!({"id": id}))
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn fetches(cache: &CachedSource<CountingSource>) -> u64 {
        cache.inner().fetches.load(Ordering::Relaxed)
    }

    #[tokio::test]
    async fn test_second_fetch_hits_cache() {
        let cache = CachedSource::new(CountingSource::default(), Duration::from_secs(300));

        let first = cache.fetch("7").await.unwrap();
        let second = cache.fetch("7").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetches(&cache), 1);
        assert_eq!(cache.stats().hits.load(Ordering::Relaxed), 1);
        assert_eq!(cache.stats().misses.load(Ordering::Relaxed), 1);
        assert_eq!(cache.stats().hit_rate(), 50.0);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let cache = CachedSource::new(CountingSource::default(), Duration::ZERO);

        cache.fetch("7").await.unwrap();
        cache.fetch("7").await.unwrap();

        assert_eq!(fetches(&cache), 2);
        assert_eq!(cache.stats().expired.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = CachedSource::new(CountingSource::default(), Duration::from_secs(300));

        assert!(cache.fetch("missing").await.is_err());
        assert!(cache.fetch("missing").await.is_err());

        assert_eq!(fetches(&cache), 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = CachedSource::new(CountingSource::default(), Duration::from_secs(300));

        cache.fetch("7").await.unwrap();
        cache.fetch("8").await.unwrap();
        cache.invalidate("7").await;
        assert_eq!(cache.len().await, 1);

        cache.fetch("7").await.unwrap();
        assert_eq!(fetches(&cache), 3);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[test]
    fn test_hit_rate_empty() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
