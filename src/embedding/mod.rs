//! Text embeddings for catalog indexing and mention search.
//!
//! - [`GeminiEmbedder`] calls the provider.
//! - [`StubEmbedder`] produces deterministic vectors when no key is configured.
//! - [`CachingEmbedder`] memoizes repeated lookups.

pub mod cache;
mod error;
pub mod gemini;
pub mod mode;
pub mod provider;
pub mod stub;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use cache::CachingEmbedder;
pub use error::{EmbeddingError, EmbeddingResult};
pub use gemini::{DOCUMENT_TITLE, GeminiEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use mode::EmbeddingMode;
pub use provider::{EmbeddingProvider, SharedEmbedder};
pub use stub::StubEmbedder;
