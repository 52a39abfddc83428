//! Gemini `embedContent` provider.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::error::{EmbeddingError, EmbeddingResult};
use super::mode::EmbeddingMode;
use super::provider::EmbeddingProvider;
use crate::constants::DimConfig;
use crate::gemini::{Content, EmbedContentRequest, GeminiClient, GeminiError, Part};

/// Title attached to document-mode requests.
pub const DOCUMENT_TITLE: &str = "Product Description";

/// Embedding provider backed by the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiEmbedder {
    client: GeminiClient,
    model: String,
    dims: DimConfig,
    timeout: Duration,
}

impl GeminiEmbedder {
    pub fn new(
        client: GeminiClient,
        model: impl Into<String>,
        dims: DimConfig,
        timeout: Duration,
    ) -> EmbeddingResult<Self> {
        dims.validate()
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: e.to_string(),
            })?;

        let model = model.into();
        if model.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding model name is empty".to_string(),
            });
        }

        Ok(Self {
            client,
            model,
            dims,
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, text: &str, mode: EmbeddingMode) -> EmbedContentRequest {
        EmbedContentRequest {
            model: format!("models/{}", self.model),
            content: Content {
                role: None,
                parts: vec![Part::text(text)],
            },
            task_type: Some(mode.task_type()),
            title: match mode {
                EmbeddingMode::Document => Some(DOCUMENT_TITLE.to_string()),
                EmbeddingMode::Query => None,
            },
        }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    #[instrument(skip(self, text), fields(mode = %mode, text_len = text.len()))]
    async fn embed(&self, text: &str, mode: EmbeddingMode) -> EmbeddingResult<Vec<f32>> {
        let request = self.build_request(text, mode);

        let response = self
            .client
            .embed_content(&self.model, &request)
            .await
            .map_err(|e| match e {
                GeminiError::Timeout => EmbeddingError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                },
                other => EmbeddingError::Provider(other),
            })?;

        let values = response.embedding.values;
        if values.is_empty() {
            return Err(EmbeddingError::Empty);
        }
        if values.len() != self.dims.embedding_dim {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dims.embedding_dim,
                actual: values.len(),
            });
        }

        debug!(dims = values.len(), "Embedding received");
        Ok(values)
    }

    fn embedding_dim(&self) -> usize {
        self.dims.embedding_dim
    }
}
