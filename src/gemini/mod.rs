//! Gemini REST client shared by the embedder and the order-sheet OCR extractor.
//!
//! Only the two endpoints this crate needs are wrapped: `embedContent` and
//! `generateContent`. Higher-level code owns prompts and task types.

pub mod client;
pub mod error;
pub mod types;


pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{
    Blob, Content, EmbedContentRequest, EmbedContentResponse, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, Part, TaskType,
};
