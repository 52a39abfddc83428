use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;
use tracing::debug;

use super::error::EmbeddingResult;
use super::mode::EmbeddingMode;
use super::provider::EmbeddingProvider;

/// Deterministic, hash-seeded unit vectors.
///
/// Used when no API key is configured. Identical text maps to the identical
/// vector regardless of mode, so only exact-text semantic hits are meaningful.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    embedding_dim: usize,
}

impl StubEmbedder {
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    /// Synchronous generator shared with the mock embedder.
    pub fn vector_for(text: &str, embedding_dim: usize) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut embedding = Vec::with_capacity(embedding_dim);
        for _ in 0..embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        normalize(&mut embedding);
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str, mode: EmbeddingMode) -> EmbeddingResult<Vec<f32>> {
        debug!(text_len = text.len(), %mode, "Generating stub embedding");
        Ok(Self::vector_for(text, self.embedding_dim))
    }

    fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    fn is_stub(&self) -> bool {
        true
    }
}

fn normalize(embedding: &mut [f32]) {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in embedding.iter_mut() {
            *x /= norm;
        }
    }
}
