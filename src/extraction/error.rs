use thiserror::Error;

use crate::gemini::GeminiError;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("image payload is empty")]
    EmptyImage,

    #[error("unsupported image MIME type: {mime_type}")]
    UnsupportedMimeType { mime_type: String },

    #[error("vision request failed: {0}")]
    Provider(#[from] GeminiError),

    #[error("vision request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("model returned no text")]
    EmptyResponse,

    #[error("model output is not a valid mention list: {reason}")]
    MalformedOutput { reason: String },
}

/// Result type for extraction operations.
pub type ExtractionResult<T> = Result<T, ExtractionError>;
