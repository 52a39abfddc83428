use std::sync::Arc;

use async_trait::async_trait;

use super::error::EmbeddingResult;
use super::mode::EmbeddingMode;

/// Text → fixed-dimension vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds `text` for the given task. `mode` is never optional.
    async fn embed(&self, text: &str, mode: EmbeddingMode) -> EmbeddingResult<Vec<f32>>;

    /// Output dimension of every vector this provider returns.
    fn embedding_dim(&self) -> usize;

    /// `true` when vectors are synthetic (no provider credentials).
    fn is_stub(&self) -> bool {
        false
    }
}

/// Shared handle used by the matcher, backfill and gateway.
pub type SharedEmbedder = Arc<dyn EmbeddingProvider>;
