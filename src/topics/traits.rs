// Topic extractor trait: swap-ready abstraction.
//
// The engine only sees this trait, so the LDA backend can be replaced by the
// co-occurrence backend (or anything else) without touching callers.

use std::collections::BTreeMap;

use super::result::TopicResult;
use crate::error::Result;

/// Trait for decomposing one document into latent topics.
pub trait TopicExtractor: Send + Sync {
    /// Extract up to `k` topics from `text`, highest weight first.
    ///
    /// `k < 1` is an error. Fewer distinguishable terms than `k` yields fewer
    /// topics; an empty text yields none.
    fn extract(&self, text: &str, k: usize) -> Result<Vec<TopicResult>>;

    /// Map form: topic id -> ordered keywords.
    fn extract_keywords_by_topic(&self, text: &str, k: usize) -> Result<BTreeMap<usize, Vec<String>>> {
        Ok(self
            .extract(text, k)?
            .into_iter()
            .map(|topic| (topic.topic_id, topic.keywords))
            .collect())
    }
}
