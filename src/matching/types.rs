use serde::Serialize;

use super::config::{DIRECT_THRESHOLD, LITERAL_SIMILARITY};
use crate::catalog::{CatalogProduct, ScoredProduct};
use crate::extraction::ItemMention;

/// Where a candidate came from, before merging.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateSource {
    Literal(CatalogProduct),
    Semantic(ScoredProduct),
}

impl CandidateSource {
    #[inline]
    pub fn id(&self) -> i64 {
        match self {
            CandidateSource::Literal(product) => product.id,
            CandidateSource::Semantic(hit) => hit.product.id,
        }
    }

    #[inline]
    pub fn similarity(&self) -> f64 {
        match self {
            CandidateSource::Literal(_) => LITERAL_SIMILARITY,
            CandidateSource::Semantic(hit) => hit.similarity(),
        }
    }

    pub fn into_candidate(self) -> CandidateProduct {
        let similarity = self.similarity();
        let product = match self {
            CandidateSource::Literal(product) => product,
            CandidateSource::Semantic(hit) => hit.product,
        };
        CandidateProduct::new(product, similarity)
    }
}

/// Confidence bucket of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Direct,
    Recommended,
}

impl Bucket {
    #[inline]
    pub fn for_similarity(similarity: f64) -> Self {
        if similarity >= DIRECT_THRESHOLD {
            Bucket::Direct
        } else {
            Bucket::Recommended
        }
    }
}

/// A catalog product proposed for a mention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProduct {
    #[serde(flatten)]
    pub product: CatalogProduct,
    pub similarity: f64,
    pub bucket: Bucket,
}

impl CandidateProduct {
    pub fn new(product: CatalogProduct, similarity: f64) -> Self {
        Self {
            product,
            similarity,
            bucket: Bucket::for_similarity(similarity),
        }
    }

    #[inline]
    pub fn id(&self) -> i64 {
        self.product.id
    }
}

/// Candidates for one mention, literal hits first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub original: ItemMention,
    pub candidates: Vec<CandidateProduct>,
}

impl MatchResult {
    pub fn empty(original: ItemMention) -> Self {
        Self {
            original,
            candidates: Vec::new(),
        }
    }

    pub fn direct(&self) -> impl Iterator<Item = &CandidateProduct> {
        self.candidates
            .iter()
            .filter(|c| c.bucket == Bucket::Direct)
    }

    pub fn recommended(&self) -> impl Iterator<Item = &CandidateProduct> {
        self.candidates
            .iter()
            .filter(|c| c.bucket == Bucket::Recommended)
    }

    #[inline]
    pub fn is_unmatched(&self) -> bool {
        self.candidates.is_empty()
    }
}
