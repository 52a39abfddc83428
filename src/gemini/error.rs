use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the Gemini REST client.
pub enum GeminiError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Transport-level failure (DNS, connect, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Gemini answered with a non-success status.
    #[error("Gemini API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl GeminiError {
    /// Returns `true` for quota (429) responses.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GeminiError::Api { status: 429, .. })
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeminiError::Timeout
        } else if err.is_decode() {
            GeminiError::Decode(err.to_string())
        } else {
            GeminiError::Network(err.to_string())
        }
    }
}
