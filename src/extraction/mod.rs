//! Order-sheet OCR: image bytes → ordered [`ItemMention`]s.

mod error;
pub mod extractor;
pub mod gemini;
pub mod model;
pub mod normalize;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::{ExtractionError, ExtractionResult};
pub use extractor::{DisabledExtractor, OcrExtractor, SharedExtractor};
pub use gemini::{EXTRACTION_PROMPT, GeminiVisionExtractor};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockExtractor;
pub use model::ItemMention;
pub use normalize::{parse_mentions, strip_code_fences};
