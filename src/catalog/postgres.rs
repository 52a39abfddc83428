//! PostgreSQL + pgvector catalog.
//!
//! Expects a products table shaped like
//! `(id, product_code, name, price, description, image_url, embedding vector(D))`.
//! The table name comes from configuration and is validated as a plain
//! identifier before being formatted into statements.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pgvector::Vector;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error, info, instrument};

use super::error::{CatalogError, CatalogResult};
use super::model::{CatalogProduct, MissingEmbedding, NewProduct, ScoredProduct};
use super::store::CatalogStore;
use crate::config::is_plain_identifier;
use crate::constants::DimConfig;

const PRODUCT_COLUMNS: &str =
    "id::int8, product_code, name, price::float8, description, image_url";

/// Escapes `%`, `_` and `\` so an `ILIKE` pattern matches `needle` literally.
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Catalog backed by a single shared `tokio_postgres` connection.
pub struct PgCatalogStore {
    client: Arc<Client>,
    table: String,
    dims: DimConfig,
    query_timeout: Duration,
}

impl std::fmt::Debug for PgCatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgCatalogStore")
            .field("table", &self.table)
            .field("embedding_dim", &self.dims.embedding_dim)
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

impl PgCatalogStore {
    /// Connects and spawns the connection driver task.
    pub async fn connect(
        database_url: &str,
        table: impl Into<String>,
        dims: DimConfig,
        query_timeout: Duration,
    ) -> CatalogResult<Self> {
        let table = table.into();
        if !is_plain_identifier(&table) {
            return Err(CatalogError::InvalidTableName { value: table });
        }

        let (client, connection) = tokio::time::timeout(
            query_timeout,
            tokio_postgres::connect(database_url, NoTls),
        )
        .await
        .map_err(|_| CatalogError::Timeout {
            operation: "connect",
            timeout_ms: query_timeout.as_millis() as u64,
        })?
        .map_err(|e| CatalogError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(error = %err, "Postgres connection error");
            }
        });

        info!(table = %table, "Connected to catalog database");

        Ok(Self {
            client: Arc::new(client),
            table,
            dims,
            query_timeout,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Creates the pgvector extension and the embedding column if missing.
    pub async fn ensure_schema(&self) -> CatalogResult<()> {
        self.timed("ensure_schema", async {
            self.client
                .execute("CREATE EXTENSION IF NOT EXISTS vector", &[])
                .await?;
            let alter = format!(
                "ALTER TABLE {} ADD COLUMN IF NOT EXISTS embedding vector({})",
                self.table, self.dims.embedding_dim
            );
            self.client.execute(&alter, &[]).await?;
            Ok::<_, tokio_postgres::Error>(())
        })
        .await
    }

    async fn timed<T, F>(&self, operation: &'static str, fut: F) -> CatalogResult<T>
    where
        F: Future<Output = Result<T, tokio_postgres::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(|e| CatalogError::query(operation, e)),
            Err(_) => Err(CatalogError::Timeout {
                operation,
                timeout_ms: self.query_timeout.as_millis() as u64,
            }),
        }
    }

    fn check_dimension(&self, vector: &[f32]) -> CatalogResult<()> {
        self.dims
            .check(vector)
            .map_err(|_| CatalogError::InvalidDimension {
                expected: self.dims.embedding_dim,
                actual: vector.len(),
            })
    }
}

fn product_from_row(row: &Row) -> Result<CatalogProduct, tokio_postgres::Error> {
    Ok(CatalogProduct {
        id: row.try_get(0)?,
        product_code: row.try_get(1)?,
        name: row.try_get(2)?,
        price: row.try_get(3)?,
        description: row.try_get(4)?,
        image_url: row.try_get(5)?,
    })
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    #[instrument(skip(self), fields(table = %self.table))]
    async fn literal_search(
        &self,
        needle: &str,
        limit: usize,
    ) -> CatalogResult<Vec<CatalogProduct>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM {} \
             WHERE name ILIKE '%' || $1 || '%' ESCAPE '\\' \
             ORDER BY id LIMIT $2",
            self.table
        );
        let pattern = escape_like(needle);
        let limit = limit as i64;

        let rows = self
            .timed("literal_search", self.client.query(&sql, &[&pattern, &limit]))
            .await?;

        let products = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatalogError::query("literal_search", e))?;
        debug!(hits = products.len(), "Literal search done");
        Ok(products)
    }

    #[instrument(skip(self, query), fields(table = %self.table, dims = query.len()))]
    async fn vector_search(
        &self,
        query: &[f32],
        limit: usize,
    ) -> CatalogResult<Vec<ScoredProduct>> {
        self.check_dimension(query)?;

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}, (embedding <=> $1)::float8 AS distance FROM {} \
             WHERE embedding IS NOT NULL \
             ORDER BY embedding <=> $1 LIMIT $2",
            self.table
        );
        let vector = Vector::from(query.to_vec());
        let limit = limit as i64;

        let rows = self
            .timed("vector_search", self.client.query(&sql, &[&vector, &limit]))
            .await?;

        let hits = rows
            .iter()
            .map(|row| {
                Ok(ScoredProduct {
                    product: product_from_row(row)?,
                    distance: row.try_get(6)?,
                })
            })
            .collect::<Result<Vec<_>, tokio_postgres::Error>>()
            .map_err(|e| CatalogError::query("vector_search", e))?;
        debug!(hits = hits.len(), "Vector search done");
        Ok(hits)
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn list_missing_embeddings(&self) -> CatalogResult<Vec<MissingEmbedding>> {
        let sql = format!(
            "SELECT id::int8, name, description FROM {} WHERE embedding IS NULL ORDER BY id",
            self.table
        );
        let rows = self
            .timed("list_missing_embeddings", self.client.query(&sql, &[]))
            .await?;

        rows.iter()
            .map(|row| {
                Ok(MissingEmbedding {
                    id: row.try_get(0)?,
                    name: row.try_get(1)?,
                    description: row.try_get(2)?,
                })
            })
            .collect::<Result<Vec<_>, tokio_postgres::Error>>()
            .map_err(|e| CatalogError::query("list_missing_embeddings", e))
    }

    #[instrument(skip(self, vector), fields(table = %self.table))]
    async fn set_embedding(&self, id: i64, vector: &[f32]) -> CatalogResult<bool> {
        self.check_dimension(vector)?;

        let sql = format!(
            "UPDATE {} SET embedding = $1 WHERE id = $2::int8 AND embedding IS NULL",
            self.table
        );
        let vector = Vector::from(vector.to_vec());

        let updated = self
            .timed("set_embedding", self.client.execute(&sql, &[&vector, &id]))
            .await?;
        Ok(updated == 1)
    }

    #[instrument(skip(self, product, embedding), fields(table = %self.table, name = %product.name))]
    async fn insert_product(
        &self,
        product: &NewProduct,
        embedding: Option<&[f32]>,
    ) -> CatalogResult<CatalogProduct> {
        if let Some(vector) = embedding {
            self.check_dimension(vector)?;
        }

        let sql = format!(
            "INSERT INTO {} (product_code, name, price, description, image_url, embedding) \
             VALUES ($1, $2, $3::float8, $4, $5, $6) \
             RETURNING {PRODUCT_COLUMNS}",
            self.table
        );
        let vector = embedding.map(|v| Vector::from(v.to_vec()));

        let row = self
            .timed(
                "insert_product",
                self.client.query_one(
                    &sql,
                    &[
                        &product.product_code,
                        &product.name,
                        &product.price,
                        &product.description,
                        &product.image_url,
                        &vector,
                    ],
                ),
            )
            .await?;

        product_from_row(&row).map_err(|e| CatalogError::query("insert_product", e))
    }

    async fn ping(&self) -> CatalogResult<()> {
        self.timed("ping", self.client.simple_query("SELECT 1"))
            .await
            .map(|_| ())
    }
}
