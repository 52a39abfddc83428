//! HTTP gateway (Axum) for order-sheet matching and catalog maintenance.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;
pub mod status;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    IMAGE_FIELD, backfill_handler, create_product_handler, last_backfill_handler,
    order_sheet_handler,
};
pub use payload::OrderSheetResponse;
pub use state::HandlerState;
pub use status::*;

use handler::make_response;

/// Multipart framing allowance on top of the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router_with_state(state: HandlerState) -> Router {
    let body_limit = state.max_image_bytes.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/order-sheets", post(order_sheet_handler))
        .route(
            "/v1/backfill",
            post(backfill_handler).get(last_backfill_handler),
        )
        .route("/v1/products", post(create_product_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub catalog: &'static str,
    pub ocr: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    make_response(
        StatusCode::OK,
        SHEETMATCH_STATUS_HEALTHY,
        Json(HealthResponse { status: "ok" }),
    )
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let catalog_status = match state.catalog.ping().await {
        Ok(()) => SHEETMATCH_STATUS_READY,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog not reachable");
            SHEETMATCH_STATUS_ERROR
        }
    };

    let components = ComponentStatus {
        http: SHEETMATCH_STATUS_READY,
        catalog: catalog_status,
        ocr: if state.ocr_enabled {
            "enabled"
        } else {
            "disabled"
        },
        embedder_mode: if state.embedder.is_stub() {
            "stub"
        } else {
            "real"
        },
    };

    let is_ready = components.catalog == SHEETMATCH_STATUS_READY;
    let (status_code, status) = if is_ready {
        (StatusCode::OK, SHEETMATCH_STATUS_READY)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, SHEETMATCH_STATUS_NOT_READY)
    };

    make_response(
        status_code,
        status,
        Json(ReadyResponse {
            status: if is_ready { "ok" } else { "pending" },
            components,
        }),
    )
}
