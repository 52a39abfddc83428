use serde::Serialize;

use crate::gemini::TaskType;

/// Asymmetric embedding task.
///
/// Catalog text is always embedded with [`EmbeddingMode::Document`]; search
/// mentions always with [`EmbeddingMode::Query`]. Swapping them does not fail,
/// it silently degrades recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    Document,
    Query,
}

impl EmbeddingMode {
    #[inline]
    pub fn task_type(self) -> TaskType {
        match self {
            EmbeddingMode::Document => TaskType::RetrievalDocument,
            EmbeddingMode::Query => TaskType::RetrievalQuery,
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            EmbeddingMode::Document => "document",
            EmbeddingMode::Query => "query",
        }
    }
}

impl std::fmt::Display for EmbeddingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
