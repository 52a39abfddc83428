//! Gemini vision extractor.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info, instrument};

use super::error::{ExtractionError, ExtractionResult};
use super::extractor::OcrExtractor;
use super::model::ItemMention;
use super::normalize::parse_mentions;
use crate::gemini::{Content, GeminiClient, GeminiError, GenerateContentRequest, Part};

/// Instruction sent alongside the image.
pub const EXTRACTION_PROMPT: &str = "\
You are the OCR assistant of a dental supply ordering system.
Analyze this purchase order or product list image.
Read the text in the image and extract every entry that is a product name.
Ignore quantities and prices. Focus on reading each product name exactly as written.
If a line also shows a product code, include it.

Return a JSON array of objects in this form:
- \"name\": the product name (string), exactly as written.
- \"code\": the product code (string), only when one is printed.

Example:
[
  {\"name\": \"ボンディング材\"},
  {\"name\": \"デンタルミラー\", \"code\": \"DM-01\"}
]

Output only the JSON array. Do not wrap it in markdown.";

/// OCR extractor backed by a Gemini multimodal model.
#[derive(Debug, Clone)]
pub struct GeminiVisionExtractor {
    client: GeminiClient,
    model: String,
    timeout: Duration,
}

impl GeminiVisionExtractor {
    pub fn new(client: GeminiClient, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            model: model.into(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(image: &[u8], mime_type: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::text(EXTRACTION_PROMPT),
                Part::inline_data(mime_type, STANDARD.encode(image)),
            ])],
            generation_config: None,
        }
    }
}

#[async_trait]
impl OcrExtractor for GeminiVisionExtractor {
    #[instrument(skip(self, image), fields(image_bytes = image.len(), mime_type = %mime_type))]
    async fn try_extract(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> ExtractionResult<Vec<ItemMention>> {
        if image.is_empty() {
            return Err(ExtractionError::EmptyImage);
        }
        if !mime_type.starts_with("image/") {
            return Err(ExtractionError::UnsupportedMimeType {
                mime_type: mime_type.to_string(),
            });
        }

        let request = Self::build_request(image, mime_type);
        let response = self
            .client
            .generate_content(&self.model, &request)
            .await
            .map_err(|e| match e {
                GeminiError::Timeout => ExtractionError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                },
                other => ExtractionError::Provider(other),
            })?;

        let text = response.text().ok_or(ExtractionError::EmptyResponse)?;
        debug!(output_len = text.len(), "Vision model answered");

        let mentions = parse_mentions(&text)?;
        info!(mentions = mentions.len(), "Order sheet extracted");
        Ok(mentions)
    }
}
