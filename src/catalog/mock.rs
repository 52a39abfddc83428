use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::error::{CatalogError, CatalogResult};
use super::model::{CatalogProduct, MissingEmbedding, NewProduct, ScoredProduct};
use super::store::CatalogStore;

#[derive(Debug, Clone)]
struct MockRow {
    product: CatalogProduct,
    embedding: Option<Vec<f32>>,
}

/// In-memory catalog with per-operation failure switches.
#[derive(Debug, Default)]
pub struct MockCatalogStore {
    rows: RwLock<BTreeMap<i64, MockRow>>,
    fail_literal: AtomicBool,
    fail_vector: AtomicBool,
    fail_list: AtomicBool,
    fail_ping: AtomicBool,
    set_embedding_calls: AtomicUsize,
}

impl MockCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row with the given embedding (or none).
    pub fn with_product(self, product: CatalogProduct, embedding: Option<Vec<f32>>) -> Self {
        if let Ok(mut rows) = self.rows.write() {
            rows.insert(product.id, MockRow { product, embedding });
        }
        self
    }

    pub fn set_fail_literal(&self, fail: bool) {
        self.fail_literal.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_vector(&self, fail: bool) {
        self.fail_vector.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_ping(&self, fail: bool) {
        self.fail_ping.store(fail, Ordering::SeqCst);
    }

    /// Stored embedding for `id`, if any.
    pub fn embedding_of(&self, id: i64) -> Option<Vec<f32>> {
        self.rows.read().ok()?.get(&id)?.embedding.clone()
    }

    pub fn product_count(&self) -> usize {
        self.rows.read().map(|r| r.len()).unwrap_or_default()
    }

    /// Number of `set_embedding` calls, successful or not.
    pub fn set_embedding_calls(&self) -> usize {
        self.set_embedding_calls.load(Ordering::SeqCst)
    }

    fn fail_if(flag: &AtomicBool, operation: &'static str) -> CatalogResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(CatalogError::query(operation, "mock store failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogStore for MockCatalogStore {
    async fn literal_search(
        &self,
        needle: &str,
        limit: usize,
    ) -> CatalogResult<Vec<CatalogProduct>> {
        Self::fail_if(&self.fail_literal, "literal_search")?;
        let rows = self
            .rows
            .read()
            .map_err(|_| CatalogError::query("literal_search", "lock poisoned"))?;

        let needle = needle.to_lowercase();
        Ok(rows
            .values()
            .filter(|row| row.product.name.to_lowercase().contains(&needle))
            .take(limit)
            .map(|row| row.product.clone())
            .collect())
    }

    async fn vector_search(
        &self,
        query: &[f32],
        limit: usize,
    ) -> CatalogResult<Vec<ScoredProduct>> {
        Self::fail_if(&self.fail_vector, "vector_search")?;
        let rows = self
            .rows
            .read()
            .map_err(|_| CatalogError::query("vector_search", "lock poisoned"))?;

        let mut hits: Vec<ScoredProduct> = rows
            .values()
            .filter_map(|row| {
                let embedding = row.embedding.as_ref()?;
                Some(ScoredProduct {
                    product: row.product.clone(),
                    distance: 1.0 - f64::from(cosine_similarity(query, embedding)),
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn list_missing_embeddings(&self) -> CatalogResult<Vec<MissingEmbedding>> {
        Self::fail_if(&self.fail_list, "list_missing_embeddings")?;
        let rows = self
            .rows
            .read()
            .map_err(|_| CatalogError::query("list_missing_embeddings", "lock poisoned"))?;

        Ok(rows
            .values()
            .filter(|row| row.embedding.is_none())
            .map(|row| MissingEmbedding {
                id: row.product.id,
                name: row.product.name.clone(),
                description: row.product.description.clone(),
            })
            .collect())
    }

    async fn set_embedding(&self, id: i64, vector: &[f32]) -> CatalogResult<bool> {
        self.set_embedding_calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self
            .rows
            .write()
            .map_err(|_| CatalogError::query("set_embedding", "lock poisoned"))?;

        match rows.get_mut(&id) {
            Some(row) if row.embedding.is_none() => {
                row.embedding = Some(vector.to_vec());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_product(
        &self,
        product: &NewProduct,
        embedding: Option<&[f32]>,
    ) -> CatalogResult<CatalogProduct> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| CatalogError::query("insert_product", "lock poisoned"))?;

        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        let created = CatalogProduct {
            id,
            product_code: product.product_code.clone(),
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            image_url: product.image_url.clone(),
        };
        rows.insert(
            id,
            MockRow {
                product: created.clone(),
                embedding: embedding.map(<[f32]>::to_vec),
            },
        );
        Ok(created)
    }

    async fn ping(&self) -> CatalogResult<()> {
        Self::fail_if(&self.fail_ping, "ping")
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
