//! Cross-cutting, shared constants.
//!
//! # Dimension Invariants
//!
//! The catalog column, the embedding provider and the vector search all have to
//! agree on one vector length. [`DEFAULT_EMBEDDING_DIM`] matches
//! `text-embedding-004`; use [`DimConfig`] to carry a different value through
//! initialization and [`validate_embedding_dim`] at module boundaries.

pub const DEFAULT_EMBEDDING_DIM: usize = 768;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

pub const DEFAULT_VISION_MODEL: &str = "gemini-2.0-flash-exp";

/// Runtime dimension configuration shared by the embedder and the catalog store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimConfig {
    /// The embedding vector dimension (number of floats).
    pub embedding_dim: usize,
}

impl Default for DimConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl DimConfig {
    /// Creates a new dimension configuration with the specified embedding dimension.
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Returns an error if `embedding_dim` is zero.
    pub fn validate(&self) -> Result<(), DimValidationError> {
        if self.embedding_dim == 0 {
            return Err(DimValidationError::ZeroDimension);
        }
        Ok(())
    }

    /// Checks a produced vector against this configuration.
    pub fn check(&self, vector: &[f32]) -> Result<(), DimValidationError> {
        validate_embedding_dim(vector.len(), self.embedding_dim)
    }
}

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use sheetmatch::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(1536, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
