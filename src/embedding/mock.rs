use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use super::error::{EmbeddingError, EmbeddingResult};
use super::mode::EmbeddingMode;
use super::provider::EmbeddingProvider;
use super::stub::StubEmbedder;
use crate::gemini::GeminiError;

/// Scriptable embedder that records every call.
#[derive(Debug, Default)]
pub struct MockEmbedder {
    embedding_dim: usize,
    vectors: RwLock<HashMap<String, Vec<f32>>>,
    failing: RwLock<HashSet<String>>,
    fail_all: RwLock<bool>,
    calls: RwLock<Vec<(String, EmbeddingMode)>>,
}

impl MockEmbedder {
    pub fn new(embedding_dim: usize) -> Self {
        Self {
            embedding_dim,
            ..Self::default()
        }
    }

    /// Returns `vector` for `text` instead of the hash-derived default.
    pub fn with_vector(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        if let Ok(mut vectors) = self.vectors.write() {
            vectors.insert(text.into(), vector);
        }
        self
    }

    /// Makes every call for `text` fail.
    pub fn fail_on(self, text: impl Into<String>) -> Self {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(text.into());
        }
        self
    }

    /// Makes every call fail.
    pub fn set_fail_all(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_all.write() {
            *flag = fail;
        }
    }

    pub fn calls(&self) -> Vec<(String, EmbeddingMode)> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str, mode: EmbeddingMode) -> EmbeddingResult<Vec<f32>> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push((text.to_string(), mode));
        }

        let fail_all = self.fail_all.read().map(|f| *f).unwrap_or(false);
        let failing = self
            .failing
            .read()
            .map(|f| f.contains(text))
            .unwrap_or(false);
        if fail_all || failing {
            return Err(EmbeddingError::Provider(GeminiError::Api {
                status: 503,
                message: "mock embedder failure".to_string(),
            }));
        }

        let scripted = self
            .vectors
            .read()
            .ok()
            .and_then(|v| v.get(text).cloned());
        Ok(scripted.unwrap_or_else(|| StubEmbedder::vector_for(text, self.embedding_dim)))
    }

    fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }
}
