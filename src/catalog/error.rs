use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to connect to catalog database: {0}")]
    Connection(String),

    #[error("catalog {operation} failed: {message}")]
    Query {
        operation: &'static str,
        message: String,
    },

    #[error("catalog {operation} timed out after {timeout_ms} ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("embedding has wrong dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("invalid products table name: {value:?}")]
    InvalidTableName { value: String },

    #[error("product {id} not found")]
    NotFound { id: i64 },
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub(crate) fn query(operation: &'static str, err: impl std::fmt::Display) -> Self {
        CatalogError::Query {
            operation,
            message: err.to_string(),
        }
    }
}
