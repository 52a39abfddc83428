use std::collections::HashSet;

use super::types::{CandidateProduct, CandidateSource};
use crate::catalog::{CatalogProduct, ScoredProduct};

/// Literal hits in store order, then semantic hits not already present.
///
/// The first occurrence of an id wins, so a product found by both stages keeps
/// its literal position and similarity.
pub fn merge_candidates(
    literal: Vec<CatalogProduct>,
    semantic: Vec<ScoredProduct>,
) -> Vec<CandidateProduct> {
    let sources = literal
        .into_iter()
        .map(CandidateSource::Literal)
        .chain(semantic.into_iter().map(CandidateSource::Semantic));

    let mut seen = HashSet::new();
    sources
        .filter(|source| seen.insert(source.id()))
        .map(CandidateSource::into_candidate)
        .collect()
}
