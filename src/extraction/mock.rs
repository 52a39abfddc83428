use std::sync::RwLock;

use async_trait::async_trait;

use super::error::{ExtractionError, ExtractionResult};
use super::extractor::OcrExtractor;
use super::model::ItemMention;

/// Extractor returning a fixed answer and recording each call.
#[derive(Debug, Default)]
pub struct MockExtractor {
    mentions: Vec<ItemMention>,
    fail: bool,
    calls: RwLock<Vec<(usize, String)>>,
}

impl MockExtractor {
    pub fn new(mentions: Vec<ItemMention>) -> Self {
        Self {
            mentions,
            ..Self::default()
        }
    }

    /// An extractor whose every call fails with malformed output.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(image_len, mime_type)` of every call.
    pub fn calls(&self) -> Vec<(usize, String)> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl OcrExtractor for MockExtractor {
    async fn try_extract(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> ExtractionResult<Vec<ItemMention>> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push((image.len(), mime_type.to_string()));
        }
        if self.fail {
            return Err(ExtractionError::MalformedOutput {
                reason: "mock extractor failure".to_string(),
            });
        }
        Ok(self.mentions.clone())
    }
}
