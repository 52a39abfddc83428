use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::error::ExtractionResult;
use super::model::ItemMention;

/// Image → ordered item mentions.
#[async_trait]
pub trait OcrExtractor: Send + Sync {
    /// Runs extraction and reports why it failed.
    async fn try_extract(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> ExtractionResult<Vec<ItemMention>>;

    /// Runs extraction, degrading every failure to an empty list.
    async fn extract(&self, image: &[u8], mime_type: &str) -> Vec<ItemMention> {
        match self.try_extract(image, mime_type).await {
            Ok(mentions) => mentions,
            Err(e) => {
                warn!(
                    error = %e,
                    image_bytes = image.len(),
                    mime_type,
                    "Extraction failed; treating sheet as empty"
                );
                Vec::new()
            }
        }
    }
}

/// Shared handle used by the pipeline.
pub type SharedExtractor = Arc<dyn OcrExtractor>;

/// Extractor used when no vision credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledExtractor;

#[async_trait]
impl OcrExtractor for DisabledExtractor {
    async fn try_extract(
        &self,
        _image: &[u8],
        _mime_type: &str,
    ) -> ExtractionResult<Vec<ItemMention>> {
        Ok(Vec::new())
    }
}
