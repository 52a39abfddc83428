use thiserror::Error;

use crate::gemini::GeminiError;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider failed: {0}")]
    Provider(#[from] GeminiError),

    #[error("embedding request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("embedding has wrong dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("provider returned an empty embedding")]
    Empty,

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;
