use std::time::Duration;

/// Maximum literal (substring) candidates per mention.
pub const LITERAL_LIMIT: usize = 3;

/// Maximum semantic (nearest-neighbour) candidates per mention.
pub const SEMANTIC_LIMIT: usize = 5;

/// Candidates at or above this similarity are `direct`.
pub const DIRECT_THRESHOLD: f64 = 0.8;

/// Similarity assigned to every literal hit.
pub const LITERAL_SIMILARITY: f64 = 1.0;

const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime knobs for [`crate::matching::Matcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Upper bound for each external call (store query, embedding request).
    pub stage_timeout: Duration,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            stage_timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }
}

impl MatcherConfig {
    pub fn with_stage_timeout(stage_timeout: Duration) -> Self {
        Self { stage_timeout }
    }
}
