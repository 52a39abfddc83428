//! Mention → catalog candidates.
//!
//! Two signals are queried per mention: a case-insensitive substring match on
//! the product name and a nearest-neighbour search over query-mode embeddings.
//! Literal hits are listed first with similarity `1.0`; semantic hits follow in
//! ascending distance, minus any id already present. Each candidate is then
//! bucketed as `direct` (similarity ≥ [`DIRECT_THRESHOLD`]) or `recommended`.

pub mod config;
pub mod matcher;
pub mod merge;
pub mod types;


pub use config::{
    DIRECT_THRESHOLD, LITERAL_LIMIT, LITERAL_SIMILARITY, MatcherConfig, SEMANTIC_LIMIT,
};
pub use matcher::Matcher;
pub use merge::merge_candidates;
pub use types::{Bucket, CandidateProduct, CandidateSource, MatchResult};
