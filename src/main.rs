//! Sheetmatch HTTP server entrypoint.
//!
//! `--backfill` runs a single embedding backfill pass and exits.
//! `--health-check` probes a running server's `/healthz` and exits.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use sheetmatch::backfill::BackfillRunner;
use sheetmatch::catalog::{PgCatalogStore, SharedCatalog};
use sheetmatch::config::Config;
use sheetmatch::constants::DimConfig;
use sheetmatch::embedding::{CachingEmbedder, GeminiEmbedder, SharedEmbedder, StubEmbedder};
use sheetmatch::extraction::{DisabledExtractor, GeminiVisionExtractor, SharedExtractor};
use sheetmatch::gateway::{HandlerState, create_router_with_state};
use sheetmatch::gemini::GeminiClient;
use sheetmatch::matching::{Matcher, MatcherConfig};
use sheetmatch::pipeline::OrderSheetPipeline;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    tracing::debug!(?config, "Configuration loaded");

    let dims = DimConfig::default();
    let pg = PgCatalogStore::connect(
        &config.database_url,
        config.products_table.clone(),
        dims,
        config.request_timeout,
    )
    .await?;
    if let Err(e) = pg.ensure_schema().await {
        tracing::warn!(error = %e, "Could not ensure catalog schema; assuming it exists");
    }
    let catalog: SharedCatalog = Arc::new(pg);

    let (embedder, extractor, ocr_enabled) = build_providers(&config, dims)?;

    let backfill = BackfillRunner::new(catalog.clone(), embedder.clone())
        .with_delay(config.backfill_delay);

    if std::env::args().any(|arg| arg == "--backfill") {
        let report = backfill.run().await?;
        tracing::info!(
            scanned = report.scanned,
            processed = report.processed,
            warnings = report.warnings,
            skipped = report.skipped,
            "Backfill pass complete"
        );
        return Ok(());
    }

    let query_embedder = CachingEmbedder::wrap(embedder.clone(), config.query_cache_capacity);
    let matcher = Matcher::new(
        catalog.clone(),
        query_embedder,
        MatcherConfig::with_stage_timeout(config.request_timeout),
    );
    let pipeline = OrderSheetPipeline::new(extractor, matcher, config.match_concurrency);

    let state = HandlerState::new(
        pipeline,
        backfill,
        catalog,
        embedder,
        ocr_enabled,
        config.max_image_bytes,
    );
    let app = create_router_with_state(state);

    let addr: SocketAddr = config.socket_addr().parse()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        ocr_enabled,
        "Sheetmatch starting"
    );

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Sheetmatch shutdown complete");
    Ok(())
}

fn build_providers(
    config: &Config,
    dims: DimConfig,
) -> anyhow::Result<(SharedEmbedder, SharedExtractor, bool)> {
    let Some(api_key) = &config.gemini_api_key else {
        tracing::warn!(
            "No GEMINI_API_KEY configured, running embedder in stub mode with OCR disabled"
        );
        return Ok((
            Arc::new(StubEmbedder::new(dims.embedding_dim)),
            Arc::new(DisabledExtractor),
            false,
        ));
    };

    let client = GeminiClient::new(
        api_key.clone(),
        config.gemini_base_url.clone(),
        config.request_timeout,
    )?;
    let embedder = GeminiEmbedder::new(
        client.clone(),
        config.embedding_model.clone(),
        dims,
        config.request_timeout,
    )?;
    let extractor = GeminiVisionExtractor::new(
        client,
        config.vision_model.clone(),
        config.request_timeout,
    );

    tracing::info!(
        embedding_model = %config.embedding_model,
        vision_model = %config.vision_model,
        "Gemini providers configured"
    );
    Ok((Arc::new(embedder), Arc::new(extractor), true))
}

fn run_health_check() -> i32 {
    let port = std::env::var("SHEETMATCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
