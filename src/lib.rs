//! Sheetmatch library crate (used by the server binary and integration tests).
//!
//! Reads an order-sheet image, extracts the line items with a vision model and
//! proposes catalog products for each one by combining a case-insensitive
//! substring match with a nearest-neighbour search over text embeddings.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`ItemMention`], [`MatchResult`], [`CandidateProduct`], [`Bucket`] - Matching model
//! - [`Matcher`], [`OrderSheetPipeline`] - Per-mention matching and the per-sheet flow
//! - [`BackfillRunner`], [`BackfillReport`] - Embedding backfill
//!
//! ## External Seams
//! - [`EmbeddingProvider`] with [`GeminiEmbedder`], [`StubEmbedder`], [`CachingEmbedder`]
//! - [`OcrExtractor`] with [`GeminiVisionExtractor`]
//! - [`CatalogStore`] with [`PgCatalogStore`]
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod backfill;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod extraction;
pub mod gateway;
pub mod gemini;
pub mod matching;
pub mod pipeline;

pub use backfill::{
    BackfillError, BackfillReport, BackfillRunner, FixedDelayPacer, document_text,
    index_new_product,
};
#[cfg(any(test, feature = "mock"))]
pub use catalog::MockCatalogStore;
pub use catalog::{
    CatalogError, CatalogProduct, CatalogStore, MissingEmbedding, NewProduct, PgCatalogStore,
    ScoredProduct, SharedCatalog,
};
pub use config::{Config, ConfigError};
pub use constants::{DimConfig, DimValidationError, validate_embedding_dim};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    CachingEmbedder, EmbeddingError, EmbeddingMode, EmbeddingProvider, GeminiEmbedder,
    SharedEmbedder, StubEmbedder,
};
#[cfg(any(test, feature = "mock"))]
pub use extraction::MockExtractor;
pub use extraction::{
    DisabledExtractor, ExtractionError, GeminiVisionExtractor, ItemMention, OcrExtractor,
    SharedExtractor,
};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use gemini::{GeminiClient, GeminiError};
pub use matching::{
    Bucket, CandidateProduct, CandidateSource, DIRECT_THRESHOLD, LITERAL_LIMIT, MatchResult,
    Matcher, MatcherConfig, SEMANTIC_LIMIT, merge_candidates,
};
pub use pipeline::OrderSheetPipeline;
