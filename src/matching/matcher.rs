use std::future::Future;

use tracing::{debug, instrument, warn};

use super::config::{LITERAL_LIMIT, MatcherConfig, SEMANTIC_LIMIT};
use super::merge::merge_candidates;
use super::types::MatchResult;
use crate::catalog::{CatalogProduct, ScoredProduct, SharedCatalog};
use crate::embedding::{EmbeddingMode, SharedEmbedder};
use crate::extraction::ItemMention;

/// Hybrid literal + semantic matcher. Never fails; degraded stages contribute
/// nothing.
#[derive(Clone)]
pub struct Matcher {
    catalog: SharedCatalog,
    embedder: SharedEmbedder,
    config: MatcherConfig,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Matcher {
    pub fn new(catalog: SharedCatalog, embedder: SharedEmbedder, config: MatcherConfig) -> Self {
        Self {
            catalog,
            embedder,
            config,
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Finds catalog candidates for one mention.
    #[instrument(skip(self, mention), fields(mention = %mention.name))]
    pub async fn match_mention(&self, mention: ItemMention) -> MatchResult {
        let key = mention.search_key();
        if key.is_empty() {
            debug!("Blank mention; skipping lookup");
            return MatchResult::empty(mention);
        }

        let (literal, semantic) = tokio::join!(self.literal_stage(key), self.semantic_stage(key));
        let candidates = merge_candidates(literal, semantic);

        debug!(candidates = candidates.len(), "Mention matched");
        MatchResult {
            original: mention,
            candidates,
        }
    }

    async fn literal_stage(&self, key: &str) -> Vec<CatalogProduct> {
        let search = self.catalog.literal_search(key, LITERAL_LIMIT);
        match self.bounded("literal_search", search).await {
            Some(Ok(hits)) => hits,
            Some(Err(e)) => {
                warn!(error = %e, "Literal search failed; continuing without literal hits");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    async fn semantic_stage(&self, key: &str) -> Vec<ScoredProduct> {
        let embedding = self.embedder.embed(key, EmbeddingMode::Query);
        let vector = match self.bounded("embed_query", embedding).await {
            Some(Ok(vector)) => vector,
            Some(Err(e)) => {
                warn!(error = %e, "Query embedding failed; continuing without semantic hits");
                return Vec::new();
            }
            None => return Vec::new(),
        };

        let search = self.catalog.vector_search(&vector, SEMANTIC_LIMIT);
        match self.bounded("vector_search", search).await {
            Some(Ok(hits)) => hits,
            Some(Err(e)) => {
                warn!(error = %e, "Vector search failed; continuing without semantic hits");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    async fn bounded<F: Future>(&self, stage: &'static str, fut: F) -> Option<F::Output> {
        match tokio::time::timeout(self.config.stage_timeout, fut).await {
            Ok(output) => Some(output),
            Err(_) => {
                warn!(
                    stage,
                    timeout_ms = self.config.stage_timeout.as_millis() as u64,
                    "Stage timed out"
                );
                None
            }
        }
    }
}
