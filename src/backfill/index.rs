use tracing::{debug, info, instrument, warn};

use super::document::document_text;
use crate::catalog::{CatalogProduct, CatalogResult, NewProduct, SharedCatalog};
use crate::embedding::{EmbeddingMode, SharedEmbedder};

/// Inserts `product`, embedding it in document mode first.
///
/// An embedding failure does not block the insert; the row is stored with a
/// null embedding and the next backfill fills it in. With the stub embedder
/// the row is always stored without one.
#[instrument(skip(catalog, embedder, product), fields(name = %product.name))]
pub async fn index_new_product(
    catalog: &SharedCatalog,
    embedder: &SharedEmbedder,
    product: &NewProduct,
) -> CatalogResult<CatalogProduct> {
    let embedding = if embedder.is_stub() {
        debug!("Stub embedder configured; inserting without embedding");
        None
    } else {
        embed_document(embedder, product).await
    };

    let created = catalog.insert_product(product, embedding.as_deref()).await?;
    info!(
        product_id = created.id,
        embedded = embedding.is_some(),
        "Product created"
    );
    Ok(created)
}

async fn embed_document(embedder: &SharedEmbedder, product: &NewProduct) -> Option<Vec<f32>> {
    let text = document_text(&product.name, product.description.as_deref());

    match embedder.embed(&text, EmbeddingMode::Document).await {
        Ok(vector) if vector.len() == embedder.embedding_dim() => Some(vector),
        Ok(vector) => {
            warn!(
                expected = embedder.embedding_dim(),
                actual = vector.len(),
                "Embedding has wrong dimension; inserting without it"
            );
            None
        }
        Err(e) => {
            warn!(error = %e, "Embedding failed; inserting without it");
            None
        }
    }
}
