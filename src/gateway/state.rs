use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::backfill::{BackfillReport, BackfillRunner};
use crate::catalog::SharedCatalog;
use crate::embedding::SharedEmbedder;
use crate::pipeline::OrderSheetPipeline;

#[derive(Clone)]
pub struct HandlerState {
    pub pipeline: OrderSheetPipeline,

    pub backfill: BackfillRunner,

    pub catalog: SharedCatalog,

    pub embedder: SharedEmbedder,

    /// `false` when no vision credentials are configured.
    pub ocr_enabled: bool,

    pub max_image_bytes: usize,

    backfill_gate: Arc<Mutex<()>>,

    last_backfill: Arc<RwLock<Option<BackfillReport>>>,
}

impl HandlerState {
    pub fn new(
        pipeline: OrderSheetPipeline,
        backfill: BackfillRunner,
        catalog: SharedCatalog,
        embedder: SharedEmbedder,
        ocr_enabled: bool,
        max_image_bytes: usize,
    ) -> Self {
        Self {
            pipeline,
            backfill,
            catalog,
            embedder,
            ocr_enabled,
            max_image_bytes,
            backfill_gate: Arc::new(Mutex::new(())),
            last_backfill: Arc::new(RwLock::new(None)),
        }
    }

    pub(crate) fn backfill_gate(&self) -> &Arc<Mutex<()>> {
        &self.backfill_gate
    }

    pub fn last_backfill(&self) -> Option<BackfillReport> {
        self.last_backfill.read().clone()
    }

    pub(crate) fn record_backfill(&self, report: BackfillReport) {
        *self.last_backfill.write() = Some(report);
    }
}

impl std::fmt::Debug for HandlerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerState")
            .field("pipeline", &self.pipeline)
            .field("ocr_enabled", &self.ocr_enabled)
            .field("max_image_bytes", &self.max_image_bytes)
            .finish_non_exhaustive()
    }
}
