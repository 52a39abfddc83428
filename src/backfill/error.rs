use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Debug, Error)]
pub enum BackfillError {
    /// The rows to process could not be listed; nothing was attempted.
    #[error("failed to list products without embeddings: {0}")]
    ListMissing(#[source] CatalogError),

    /// Stub vectors are never persisted; a real provider key is required.
    #[error("backfill requires a real embedding provider, but the stub embedder is configured")]
    StubEmbedder,
}
