// TextAnalytics: the engine's whole call surface as one trait.
//
// Callers (the CLI, a service layer) hold a `dyn TextAnalytics` and never see
// which sentiment, topic or embedding backends sit behind it.

use std::collections::BTreeMap;
use std::path::Path;

use crate::clustering::{group_by_cluster, ClusterResult};
use crate::error::Result;
use crate::sentiment::traits::SentimentResult;
use crate::structure::NovelStructure;
use crate::style::{ComplexityMetrics, WritingStyle};
use crate::topics::result::TopicResult;

pub trait TextAnalytics: Send + Sync {
    /// Similarity of two texts in [0, 1]. Symmetric.
    fn similarity(&self, text1: &str, text2: &str) -> f64;

    /// Similarity of `main_text` to each reference, in reference order.
    fn semantic_relatedness(&self, main_text: &str, references: &[String]) -> Vec<f64>;

    /// One cluster assignment per text, in input order. `k < 1` is an error.
    fn cluster(&self, texts: &[String], k: usize) -> Result<Vec<ClusterResult>>;

    /// Cluster id -> indices of the texts in that cluster.
    fn cluster_groups(&self, texts: &[String], k: usize) -> Result<BTreeMap<usize, Vec<usize>>> {
        Ok(group_by_cluster(&self.cluster(texts, k)?))
    }

    /// Category -> weight, summing to 1 for a non-empty category list.
    fn classify(&self, text: &str, categories: &[String]) -> BTreeMap<String, f64>;

    fn sentiment(&self, text: &str) -> SentimentResult;

    /// Up to `k` weighted topics, highest weight first.
    fn extract_topics(&self, text: &str, k: usize) -> Result<Vec<TopicResult>>;

    /// Map form of [`extract_topics`](Self::extract_topics): topic id -> keywords.
    fn extract_topics_with_lda(&self, text: &str, k: usize) -> Result<BTreeMap<usize, Vec<String>>> {
        Ok(self
            .extract_topics(text, k)?
            .into_iter()
            .map(|topic| (topic.topic_id, topic.keywords))
            .collect())
    }

    /// TF-IDF keywords across `texts`, best first.
    fn extract_keywords(&self, texts: &[String], n: usize) -> Vec<(String, f32)>;

    fn writing_style(&self, text: &str) -> WritingStyle;

    fn text_complexity(&self, text: &str) -> ComplexityMetrics;

    fn novel_structure(&self, chapters: &[String]) -> NovelStructure;

    /// Train and swap in a new word-vector model.
    ///
    /// `Ok(false)` when the corpus has nothing to train on; zero dimensions
    /// is an error.
    fn train_word_vector_model(&self, corpus: &[String], dimensions: usize) -> Result<bool>;

    /// Plot candidates scored against the current model. Empty when untrained.
    fn predict_plot_development(&self, chapters: &[String]) -> BTreeMap<String, f64>;

    /// Persist the current model. Saving while untrained is an error.
    fn save_model(&self, path: &Path) -> Result<()>;

    /// Load a persisted model and swap it in.
    fn load_model(&self, path: &Path) -> Result<()>;
}
