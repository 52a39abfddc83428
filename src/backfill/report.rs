use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one backfill pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillReport {
    /// Rows returned by the missing-embeddings query.
    pub scanned: usize,
    /// Rows whose embedding was written by this pass.
    pub processed: usize,
    /// Rows left without an embedding because of an error.
    pub warnings: usize,
    /// Rows embedded by someone else between listing and writing.
    pub skipped: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BackfillReport {
    pub(crate) fn start() -> Self {
        let now = Utc::now();
        Self {
            scanned: 0,
            processed: 0,
            warnings: 0,
            skipped: 0,
            started_at: now,
            finished_at: now,
        }
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// `true` when every scanned row got an embedding (or already had one).
    pub fn is_complete(&self) -> bool {
        self.warnings == 0
    }
}
