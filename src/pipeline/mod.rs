//! Order sheet → ordered match results.

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{info, instrument};

use crate::extraction::SharedExtractor;
use crate::matching::{MatchResult, Matcher};


/// Default number of mentions matched at once.
pub const DEFAULT_MATCH_CONCURRENCY: usize = 4;

/// Runs extraction once, then matches every mention with bounded parallelism.
///
/// Results keep extraction order and count, including unmatched mentions.
/// Dropping the returned future abandons all in-flight matching.
#[derive(Clone)]
pub struct OrderSheetPipeline {
    extractor: SharedExtractor,
    matcher: Matcher,
    concurrency: usize,
}

impl std::fmt::Debug for OrderSheetPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSheetPipeline")
            .field("matcher", &self.matcher)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl OrderSheetPipeline {
    pub fn new(extractor: SharedExtractor, matcher: Matcher, concurrency: usize) -> Self {
        Self {
            extractor,
            matcher,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    #[instrument(skip(self, image), fields(image_bytes = image.len(), mime_type = %mime_type))]
    pub async fn process(&self, image: &[u8], mime_type: &str) -> Vec<MatchResult> {
        let mentions = self.extractor.extract(image, mime_type).await;
        let mention_count = mentions.len();

        let results: Vec<MatchResult> = stream::iter(mentions)
            .map(|mention| self.matcher.match_mention(mention))
            .buffered(self.concurrency)
            .collect()
            .await;

        let unmatched = results.iter().filter(|r| r.is_unmatched()).count();
        info!(mentions = mention_count, unmatched, "Order sheet processed");
        results
    }
}
