use std::sync::Arc;

use axum::{Router, body::Body, http::Request, http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::*;
use crate::backfill::BackfillRunner;
use crate::catalog::{CatalogError, CatalogProduct, MockCatalogStore};
use crate::embedding::{MockEmbedder, StubEmbedder};
use crate::extraction::{ItemMention, MockExtractor};
use crate::matching::{Matcher, MatcherConfig};
use crate::pipeline::OrderSheetPipeline;

const DIM: usize = 4;
const BOUNDARY: &str = "sheetmatch-test-boundary";

fn product(id: i64, name: &str) -> CatalogProduct {
    CatalogProduct {
        id,
        product_code: Some(format!("P-{id:03}")),
        name: name.to_string(),
        price: 1500.0,
        description: None,
        image_url: None,
    }
}

fn state_with(
    store: Arc<MockCatalogStore>,
    embedder: Arc<MockEmbedder>,
    extractor: MockExtractor,
    max_image_bytes: usize,
) -> HandlerState {
    let matcher = Matcher::new(store.clone(), embedder.clone(), MatcherConfig::default());
    let pipeline = OrderSheetPipeline::new(Arc::new(extractor), matcher, 4);
    let backfill = BackfillRunner::new(store.clone(), embedder.clone())
        .with_delay(std::time::Duration::ZERO);
    HandlerState::new(pipeline, backfill, store, embedder, true, max_image_bytes)
}

fn default_state(extractor: MockExtractor) -> (HandlerState, Arc<MockCatalogStore>) {
    let store = Arc::new(
        MockCatalogStore::new()
            .with_product(product(7, "デンタルミラー"), None)
            .with_product(product(8, "ボンディング材"), None),
    );
    let state = state_with(
        store.clone(),
        Arc::new(MockEmbedder::new(DIM)),
        extractor,
        1024 * 1024,
    );
    (state, store)
}

fn stub_state(store: Arc<MockCatalogStore>) -> HandlerState {
    let embedder: crate::embedding::SharedEmbedder = Arc::new(StubEmbedder::new(DIM));
    let matcher = Matcher::new(store.clone(), embedder.clone(), MatcherConfig::default());
    let pipeline =
        OrderSheetPipeline::new(Arc::new(crate::extraction::DisabledExtractor), matcher, 1);
    let backfill = BackfillRunner::new(store.clone(), embedder.clone())
        .with_delay(std::time::Duration::ZERO);
    HandlerState::new(pipeline, backfill, store, embedder, false, 1024)
}

fn multipart_request(field: &str, mime: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"sheet.png\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/v1/order-sheets")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let header = response
        .headers()
        .get(SHEETMATCH_STATUS_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, header, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

mod probe_tests {
    use super::*;

    #[tokio::test]
    async fn test_healthz() {
        let (state, _) = default_state(MockExtractor::default());
        let (status, header, body) = send(create_router_with_state(state), get("/healthz")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header, SHEETMATCH_STATUS_HEALTHY);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_reports_components() {
        let (state, _) = default_state(MockExtractor::default());
        let (status, header, body) = send(create_router_with_state(state), get("/ready")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header, SHEETMATCH_STATUS_READY);
        assert_eq!(body["components"]["catalog"], "ready");
        assert_eq!(body["components"]["ocr"], "enabled");
        assert_eq!(body["components"]["embedder_mode"], "real");
    }

    #[tokio::test]
    async fn test_ready_fails_when_catalog_is_down() {
        let (state, store) = default_state(MockExtractor::default());
        store.set_fail_ping(true);
        let (status, header, body) = send(create_router_with_state(state), get("/ready")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(header, SHEETMATCH_STATUS_NOT_READY);
        assert_eq!(body["status"], "pending");
    }

    #[tokio::test]
    async fn test_ready_reports_stub_embedder() {
        let state = stub_state(Arc::new(MockCatalogStore::new()));

        let (_, _, body) = send(create_router_with_state(state), get("/ready")).await;

        assert_eq!(body["components"]["embedder_mode"], "stub");
        assert_eq!(body["components"]["ocr"], "disabled");
    }
}

mod order_sheet_tests {
    use super::*;

    #[tokio::test]
    async fn test_results_follow_mention_order() {
        let (state, _) = default_state(MockExtractor::new(vec![
            ItemMention::new("デンタルミラー"),
            ItemMention::with_code("未登録品", "X-9"),
        ]));

        let (status, header, body) = send(
            create_router_with_state(state),
            multipart_request("image", "image/png", b"\x89PNG fake"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header, SHEETMATCH_STATUS_MATCHED);
        assert!(body["requestId"].as_str().is_some());

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["original"]["name"], "デンタルミラー");
        assert_eq!(results[0]["candidates"][0]["id"], 7);
        assert_eq!(results[0]["candidates"][0]["similarity"], 1.0);
        assert_eq!(results[0]["candidates"][0]["bucket"], "direct");
        assert_eq!(results[1]["original"]["code"], "X-9");
        assert_eq!(results[1]["candidates"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_image_is_forwarded_with_mime_type() {
        let store = Arc::new(MockCatalogStore::new());
        let extractor = Arc::new(MockExtractor::new(vec![]));
        let embedder: crate::embedding::SharedEmbedder = Arc::new(MockEmbedder::new(DIM));
        let matcher = Matcher::new(store.clone(), embedder.clone(), MatcherConfig::default());
        let pipeline = OrderSheetPipeline::new(extractor.clone(), matcher, 1);
        let backfill = BackfillRunner::new(store.clone(), embedder.clone());
        let state = HandlerState::new(pipeline, backfill, store, embedder, true, 1024);

        let (status, header, _) = send(
            create_router_with_state(state),
            multipart_request("image", "image/jpeg", b"jpegdata"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header, SHEETMATCH_STATUS_NO_MATCH);
        assert_eq!(extractor.calls(), vec![(8, "image/jpeg".to_string())]);
    }

    #[tokio::test]
    async fn test_failed_extraction_is_an_empty_success() {
        let (state, _) = default_state(MockExtractor::failing());

        let (status, header, body) = send(
            create_router_with_state(state),
            multipart_request("image", "image/png", b"garbage"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header, SHEETMATCH_STATUS_NO_MATCH);
        assert_eq!(body["results"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_missing_image_field_is_rejected() {
        let (state, _) = default_state(MockExtractor::default());

        let (status, header, body) = send(
            create_router_with_state(state),
            multipart_request("file", "image/png", b"data"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(header, "missing_image");
        assert_eq!(body["code"], 400);
        assert_eq!(body["error"], "no image provided");
    }

    #[tokio::test]
    async fn test_empty_image_reaches_extraction() {
        let store = Arc::new(MockCatalogStore::new());
        let extractor = Arc::new(MockExtractor::default());
        let embedder: crate::embedding::SharedEmbedder = Arc::new(MockEmbedder::new(DIM));
        let matcher = Matcher::new(store.clone(), embedder.clone(), MatcherConfig::default());
        let pipeline = OrderSheetPipeline::new(extractor.clone(), matcher, 1);
        let backfill = BackfillRunner::new(store.clone(), embedder.clone());
        let state = HandlerState::new(pipeline, backfill, store, embedder, true, 1024);

        let (status, header, body) = send(
            create_router_with_state(state),
            multipart_request("image", "image/png", b""),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header, SHEETMATCH_STATUS_NO_MATCH);
        assert_eq!(body["results"], serde_json::json!([]));
        assert_eq!(extractor.calls(), vec![(0, "image/png".to_string())]);
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_invalid() {
        let (state, _) = default_state(MockExtractor::default());

        let (status, header, _) = send(
            create_router_with_state(state),
            post_json("/v1/order-sheets", serde_json::json!({ "image": "x" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(header, "invalid_request");
    }

    #[tokio::test]
    async fn test_oversized_image_is_rejected() {
        let store = Arc::new(MockCatalogStore::new());
        let state = state_with(
            store,
            Arc::new(MockEmbedder::new(DIM)),
            MockExtractor::default(),
            16,
        );
        let big = vec![0u8; 200 * 1024];

        let (status, header, _) = send(
            create_router_with_state(state),
            multipart_request("image", "image/png", &big),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(header, "payload_too_large");
    }
}

mod backfill_tests {
    use super::*;

    fn post_backfill() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/backfill")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_backfill_runs_and_is_remembered() {
        let (state, store) = default_state(MockExtractor::default());
        let app = create_router_with_state(state);

        let (status, header, body) = send(app.clone(), post_backfill()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(header, SHEETMATCH_STATUS_COMPLETED);
        assert_eq!(body["scanned"], 2);
        assert_eq!(body["processed"], 2);
        assert_eq!(body["warnings"], 0);
        assert!(store.embedding_of(7).is_some());

        let (status, _, last) = send(app, get("/v1/backfill")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(last["processed"], 2);
    }

    #[tokio::test]
    async fn test_last_backfill_is_null_before_first_run() {
        let (state, _) = default_state(MockExtractor::default());
        let (status, _, body) = send(create_router_with_state(state), get("/v1/backfill")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn test_concurrent_backfill_is_refused() {
        let (state, _) = default_state(MockExtractor::default());
        let gate = state.backfill_gate().clone();
        let _held = gate.lock().await;

        let (status, header, _) = send(create_router_with_state(state), post_backfill()).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(header, "backfill_in_progress");
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_server_error() {
        let (state, store) = default_state(MockExtractor::default());
        store.set_fail_list(true);

        let (status, header, _) = send(create_router_with_state(state), post_backfill()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(header, "backfill_error");
    }

    #[tokio::test]
    async fn test_stub_embedder_backfill_is_refused() {
        let store = Arc::new(MockCatalogStore::new().with_product(product(7, "デンタルミラー"), None));
        let state = stub_state(store.clone());
        let app = create_router_with_state(state);

        let (status, header, body) = send(app.clone(), post_backfill()).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(header, "stub_embedder");
        assert_eq!(body["code"], 503);
        assert!(store.embedding_of(7).is_none());

        let (_, _, last) = send(app, get("/v1/backfill")).await;
        assert!(last.is_null());
    }
}

mod product_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_product_embeds_it() {
        let (state, store) = default_state(MockExtractor::default());

        let (status, header, body) = send(
            create_router_with_state(state),
            post_json(
                "/v1/products",
                serde_json::json!({
                    "name": "  エキスプローラー ",
                    "price": 800.0,
                    "productCode": "EX-1",
                    "description": "double ended"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(header, SHEETMATCH_STATUS_CREATED);
        assert_eq!(body["id"], 9);
        assert_eq!(body["name"], "エキスプローラー");
        assert!(store.embedding_of(9).is_some());
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let (state, store) = default_state(MockExtractor::default());

        let (status, header, _) = send(
            create_router_with_state(state),
            post_json("/v1/products", serde_json::json!({ "name": " ", "price": 1.0 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(header, "invalid_request");
        assert_eq!(store.product_count(), 2);
    }

    #[tokio::test]
    async fn test_negative_price_is_rejected() {
        let (state, _) = default_state(MockExtractor::default());

        let (status, _, _) = send(
            create_router_with_state(state),
            post_json("/v1/products", serde_json::json!({ "name": "a", "price": -1.0 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (state, _) = default_state(MockExtractor::default());

        let (status, header, _) = send(
            create_router_with_state(state),
            post_json("/v1/products", serde_json::json!({ "price": 1.0 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(header, "invalid_request");
    }
}

mod error_tests {
    use super::*;
    use crate::backfill::BackfillError;

    fn status_of(err: GatewayError) -> (StatusCode, String) {
        let response = err.into_response();
        let header = response
            .headers()
            .get(SHEETMATCH_STATUS_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        (response.status(), header)
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                GatewayError::MissingImage,
                StatusCode::BAD_REQUEST,
                "missing_image",
            ),
            (
                GatewayError::InvalidRequest("x".into()),
                StatusCode::BAD_REQUEST,
                "invalid_request",
            ),
            (
                GatewayError::PayloadTooLarge { limit: 1 },
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
            ),
            (
                GatewayError::BackfillInProgress,
                StatusCode::CONFLICT,
                "backfill_in_progress",
            ),
            (
                GatewayError::Backfill(BackfillError::ListMissing(CatalogError::Connection(
                    "down".into(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
                "backfill_error",
            ),
            (
                GatewayError::Catalog(CatalogError::NotFound { id: 1 }),
                StatusCode::INTERNAL_SERVER_ERROR,
                "catalog_error",
            ),
            (
                GatewayError::Backfill(BackfillError::StubEmbedder),
                StatusCode::SERVICE_UNAVAILABLE,
                "stub_embedder",
            ),
        ];

        for (err, expected_status, expected_header) in cases {
            let (status, header) = status_of(err);
            assert_eq!(status, expected_status);
            assert_eq!(header, expected_header);
        }
    }
}
