//! Embedding backfill for catalog rows created without a vector.
//!
//! Each row is embedded in document mode from [`document_text`] and written
//! back only if its embedding is still null. Requests are strictly serial and
//! spaced by a fixed delay to stay under the provider quota.

pub mod document;
mod error;
pub mod index;
pub mod pacer;
pub mod report;
pub mod runner;


pub use document::document_text;
pub use error::BackfillError;
pub use index::index_new_product;
pub use pacer::FixedDelayPacer;
pub use report::BackfillReport;
pub use runner::{BackfillRunner, DEFAULT_BACKFILL_DELAY, PROGRESS_EVERY};
