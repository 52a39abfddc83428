use std::sync::Arc;

use async_trait::async_trait;
use moka::sync::Cache;
use tracing::trace;

use super::error::EmbeddingResult;
use super::mode::EmbeddingMode;
use super::provider::{EmbeddingProvider, SharedEmbedder};

/// Memoizes successful embeddings keyed by `(mode, text)`.
///
/// Failures are never cached, so a transient provider error is retried on the
/// next lookup.
pub struct CachingEmbedder {
    inner: SharedEmbedder,
    entries: Cache<(EmbeddingMode, String), Arc<Vec<f32>>>,
}

impl CachingEmbedder {
    pub fn new(inner: SharedEmbedder, capacity: u64) -> Self {
        Self {
            inner,
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Wraps `inner` unless `capacity` is zero.
    pub fn wrap(inner: SharedEmbedder, capacity: u64) -> SharedEmbedder {
        if capacity == 0 {
            inner
        } else {
            Arc::new(Self::new(inner, capacity))
        }
    }

    /// Returns the number of cached vectors.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for CachingEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingEmbedder")
            .field("entries", &self.entries.entry_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EmbeddingProvider for CachingEmbedder {
    async fn embed(&self, text: &str, mode: EmbeddingMode) -> EmbeddingResult<Vec<f32>> {
        let key = (mode, text.to_string());
        if let Some(hit) = self.entries.get(&key) {
            trace!(%mode, "Embedding cache hit");
            return Ok(hit.as_ref().clone());
        }

        let vector = self.inner.embed(text, mode).await?;
        self.entries.insert(key, Arc::new(vector.clone()));
        Ok(vector)
    }

    fn embedding_dim(&self) -> usize {
        self.inner.embedding_dim()
    }

    fn is_stub(&self) -> bool {
        self.inner.is_stub()
    }
}
