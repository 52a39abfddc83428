use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::document::document_text;
use super::error::BackfillError;
use super::pacer::FixedDelayPacer;
use super::report::BackfillReport;
use crate::catalog::{MissingEmbedding, SharedCatalog};
use crate::embedding::{EmbeddingMode, SharedEmbedder};

/// Default gap between embedding requests.
pub const DEFAULT_BACKFILL_DELAY: Duration = Duration::from_millis(500);

/// A progress line is logged after this many written rows.
pub const PROGRESS_EVERY: usize = 5;

enum RowOutcome {
    Written,
    AlreadyEmbedded,
    Failed,
}

/// Serially embeds every catalog row that has no embedding.
///
/// Re-running is safe: rows that failed stay null and are picked up next time.
#[derive(Clone)]
pub struct BackfillRunner {
    catalog: SharedCatalog,
    embedder: SharedEmbedder,
    delay: Duration,
}

impl std::fmt::Debug for BackfillRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackfillRunner")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl BackfillRunner {
    pub fn new(catalog: SharedCatalog, embedder: SharedEmbedder) -> Self {
        Self {
            catalog,
            embedder,
            delay: DEFAULT_BACKFILL_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs one pass. Listing failures and a stub embedder are errors; per-row
    /// failures are counted in [`BackfillReport::warnings`].
    #[instrument(skip(self), fields(delay_ms = self.delay.as_millis() as u64))]
    pub async fn run(&self) -> Result<BackfillReport, BackfillError> {
        if self.embedder.is_stub() {
            warn!("Refusing to backfill with the stub embedder");
            return Err(BackfillError::StubEmbedder);
        }

        let mut report = BackfillReport::start();

        let rows = self
            .catalog
            .list_missing_embeddings()
            .await
            .map_err(BackfillError::ListMissing)?;
        report.scanned = rows.len();

        if rows.is_empty() {
            info!("No products without embeddings");
            return Ok(report.finish());
        }
        info!(rows = rows.len(), "Starting embedding backfill");

        let mut pacer = FixedDelayPacer::new(self.delay);
        for row in &rows {
            pacer.wait().await;
            let outcome = self.process_row(row).await;
            pacer.mark_done();
            match outcome {
                RowOutcome::Written => {
                    report.processed += 1;
                    if report.processed % PROGRESS_EVERY == 0 {
                        info!(
                            processed = report.processed,
                            total = report.scanned,
                            "Backfill progress"
                        );
                    }
                }
                RowOutcome::AlreadyEmbedded => report.skipped += 1,
                RowOutcome::Failed => report.warnings += 1,
            }
        }

        let report = report.finish();
        info!(
            scanned = report.scanned,
            processed = report.processed,
            warnings = report.warnings,
            skipped = report.skipped,
            duration_ms = report.duration_ms(),
            "Embedding backfill finished"
        );
        Ok(report)
    }

    async fn process_row(&self, row: &MissingEmbedding) -> RowOutcome {
        let text = document_text(&row.name, row.description.as_deref());

        let vector = match self.embedder.embed(&text, EmbeddingMode::Document).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(product_id = row.id, error = %e, "Embedding failed; row left for next run");
                return RowOutcome::Failed;
            }
        };

        let expected = self.embedder.embedding_dim();
        if vector.len() != expected {
            warn!(
                product_id = row.id,
                expected,
                actual = vector.len(),
                "Embedding has wrong dimension; not stored"
            );
            return RowOutcome::Failed;
        }

        match self.catalog.set_embedding(row.id, &vector).await {
            Ok(true) => {
                debug!(product_id = row.id, "Embedding stored");
                RowOutcome::Written
            }
            Ok(false) => {
                debug!(product_id = row.id, "Row already embedded; skipped");
                RowOutcome::AlreadyEmbedded
            }
            Err(e) => {
                warn!(product_id = row.id, error = %e, "Failed to store embedding");
                RowOutcome::Failed
            }
        }
    }
}
