use std::sync::Arc;

use async_trait::async_trait;

use super::error::CatalogResult;
use super::model::{CatalogProduct, MissingEmbedding, NewProduct, ScoredProduct};

/// Product catalog with literal and vector lookups.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Case-insensitive substring match on product name, in store order.
    async fn literal_search(
        &self,
        needle: &str,
        limit: usize,
    ) -> CatalogResult<Vec<CatalogProduct>>;

    /// Nearest neighbours by cosine distance, ascending. Rows without an
    /// embedding never appear.
    async fn vector_search(
        &self,
        query: &[f32],
        limit: usize,
    ) -> CatalogResult<Vec<ScoredProduct>>;

    /// Every row whose embedding is null.
    async fn list_missing_embeddings(&self) -> CatalogResult<Vec<MissingEmbedding>>;

    /// Stores `vector` for `id` if the row still has no embedding.
    ///
    /// Returns `false` when the row is gone or was already embedded.
    async fn set_embedding(&self, id: i64, vector: &[f32]) -> CatalogResult<bool>;

    /// Creates a product, with its embedding when one is available.
    async fn insert_product(
        &self,
        product: &NewProduct,
        embedding: Option<&[f32]>,
    ) -> CatalogResult<CatalogProduct>;

    /// Cheap connectivity probe.
    async fn ping(&self) -> CatalogResult<()>;
}

/// Shared handle used by the matcher, backfill and gateway.
pub type SharedCatalog = Arc<dyn CatalogStore>;
