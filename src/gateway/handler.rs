use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::error::GatewayError;
use super::payload::{ImageUpload, OrderSheetResponse};
use super::state::HandlerState;
use super::status::{
    SHEETMATCH_STATUS_COMPLETED, SHEETMATCH_STATUS_CREATED, SHEETMATCH_STATUS_HEADER,
    SHEETMATCH_STATUS_MATCHED, SHEETMATCH_STATUS_NO_MATCH,
};
use crate::backfill::index_new_product;
use crate::catalog::NewProduct;

/// Multipart field carrying the order-sheet image.
pub const IMAGE_FIELD: &str = "image";

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[instrument(skip(state, multipart), fields(request_id = tracing::field::Empty))]
pub async fn order_sheet_handler(
    State(state): State<HandlerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, GatewayError> {
    let request_id = Uuid::new_v4();
    tracing::Span::current().record("request_id", tracing::field::display(&request_id));

    let mut multipart = multipart.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let upload = read_image(&mut multipart, state.max_image_bytes).await?;
    debug!(
        image_bytes = upload.bytes.len(),
        mime_type = %upload.mime_type,
        "Order sheet received"
    );

    let results = state
        .pipeline
        .process(&upload.bytes, &upload.mime_type)
        .await;

    let status = if results.iter().any(|r| !r.is_unmatched()) {
        SHEETMATCH_STATUS_MATCHED
    } else {
        SHEETMATCH_STATUS_NO_MATCH
    };

    Ok(make_response(
        StatusCode::OK,
        status,
        Json(OrderSheetResponse {
            request_id,
            results,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn backfill_handler(State(state): State<HandlerState>) -> Result<Response, GatewayError> {
    let _running = state
        .backfill_gate()
        .try_lock()
        .map_err(|_| GatewayError::BackfillInProgress)?;

    let report = state.backfill.run().await?;
    info!(
        processed = report.processed,
        warnings = report.warnings,
        "Backfill triggered over HTTP finished"
    );
    state.record_backfill(report.clone());

    Ok(make_response(
        StatusCode::OK,
        SHEETMATCH_STATUS_COMPLETED,
        Json(report),
    ))
}

pub async fn last_backfill_handler(State(state): State<HandlerState>) -> Response {
    Json(state.last_backfill()).into_response()
}

#[instrument(skip(state, body))]
pub async fn create_product_handler(
    State(state): State<HandlerState>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(mut product) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    validate_new_product(&mut product)?;

    let created = index_new_product(&state.catalog, &state.embedder, &product).await?;

    Ok(make_response(
        StatusCode::CREATED,
        SHEETMATCH_STATUS_CREATED,
        Json(created),
    ))
}

pub(crate) async fn read_image(
    multipart: &mut Multipart,
    limit: usize,
) -> Result<ImageUpload, GatewayError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let mime_type = field
            .content_type()
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string();
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

        return Ok(ImageUpload {
            bytes: bytes.to_vec(),
            mime_type,
        });
    }

    Err(GatewayError::MissingImage)
}

fn multipart_error(err: MultipartError, limit: usize) -> GatewayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge { limit }
    } else {
        GatewayError::InvalidRequest(err.body_text())
    }
}

pub(crate) fn validate_new_product(product: &mut NewProduct) -> Result<(), GatewayError> {
    product.name = product.name.trim().to_string();
    if product.name.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "product name must not be empty".to_string(),
        ));
    }
    if !product.price.is_finite() || product.price < 0.0 {
        return Err(GatewayError::InvalidRequest(format!(
            "invalid price: {}",
            product.price
        )));
    }
    Ok(())
}

pub(crate) fn make_response(
    status: StatusCode,
    sheetmatch_status: &'static str,
    body: impl IntoResponse,
) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SHEETMATCH_STATUS_HEADER,
        HeaderValue::from_static(sheetmatch_status),
    );
    (status, headers, body).into_response()
}
