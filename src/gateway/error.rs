use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::status::SHEETMATCH_STATUS_HEADER;
use crate::backfill::BackfillError;
use crate::catalog::CatalogError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no image provided")]
    MissingImage,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("a backfill run is already in progress")]
    BackfillInProgress,

    #[error("backfill failed: {0}")]
    Backfill(#[from] BackfillError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    fn status_parts(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::MissingImage => (StatusCode::BAD_REQUEST, "missing_image"),
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")
            }
            GatewayError::BackfillInProgress => (StatusCode::CONFLICT, "backfill_in_progress"),
            GatewayError::Backfill(BackfillError::StubEmbedder) => {
                (StatusCode::SERVICE_UNAVAILABLE, "stub_embedder")
            }
            GatewayError::Backfill(_) => (StatusCode::INTERNAL_SERVER_ERROR, "backfill_error"),
            GatewayError::Catalog(_) => (StatusCode::INTERNAL_SERVER_ERROR, "catalog_error"),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, sheetmatch_status) = self.status_parts();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            SHEETMATCH_STATUS_HEADER,
            HeaderValue::from_static(sheetmatch_status),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
