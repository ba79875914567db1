// NovelEngine: the configured analytics engine.
//
// Stateless operations delegate straight to their modules. The only mutable
// state is the word-vector model, held as an explicit Untrained/Trained state
// behind an RwLock. Training builds a complete model without holding the lock
// and then swaps it in, so readers see either the old model or the new one,
// never a half-trained one.

pub mod traits;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use self::traits::TextAnalytics;
use crate::classify::classify_text;
use crate::clustering::{ClusterResult, KMeansClusterer};
use crate::config::{Config, TopicBackend};
use crate::embeddings::model::WordVectorModel;
use crate::embeddings::predict::predict_plot_development;
use crate::embeddings::store;
use crate::embeddings::trainer::SkipGramTrainer;
use crate::error::{AnalyticsError, Result};
use crate::sentiment::lexicon::LexiconScorer;
use crate::sentiment::traits::{SentimentResult, SentimentScorer};
use crate::similarity::{calculate_semantic_relatedness, calculate_text_similarity};
use crate::structure::{analyze_novel_structure, NovelStructure};
use crate::style::{analyze_text_complexity, detect_writing_style, ComplexityMetrics, WritingStyle};
use crate::topics::cooccurrence::{extract_keywords, CooccurrenceExtractor};
use crate::topics::lda::LdaExtractor;
use crate::topics::result::TopicResult;
use crate::topics::traits::TopicExtractor;

/// Word-vector lifecycle.
#[derive(Debug, Clone, Default)]
pub enum ModelState {
    #[default]
    Untrained,
    Trained(Arc<WordVectorModel>),
}

pub struct NovelEngine {
    clusterer: KMeansClusterer,
    sentiment: Box<dyn SentimentScorer>,
    topics: Box<dyn TopicExtractor>,
    trainer: SkipGramTrainer,
    state: RwLock<ModelState>,
}

impl NovelEngine {
    /// Build an engine from configuration: loads the lexicon file if one is
    /// set and picks the topic backend.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let mut scorer = LexiconScorer::new(config.sentiment_epsilon);
        if let Some(path) = &config.sentiment_lexicon {
            scorer.merge_from_file(path)?;
        }

        let topics: Box<dyn TopicExtractor> = match config.topic_backend {
            TopicBackend::Lda => Box::new(LdaExtractor {
                keywords_per_topic: config.topic_keywords,
                iterations: config.lda_iterations,
                seed: config.seed,
                ..LdaExtractor::default()
            }),
            TopicBackend::Cooccurrence => Box::new(CooccurrenceExtractor {
                keywords_per_topic: config.topic_keywords,
                ..CooccurrenceExtractor::default()
            }),
        };

        info!(
            backend = ?config.topic_backend,
            lexicon_terms = scorer.lexicon_len(),
            "Engine configured"
        );

        Ok(Self::with_backends(config, Box::new(scorer), topics))
    }

    /// Build an engine around caller-supplied sentiment and topic backends.
    pub fn with_backends(
        config: Config,
        sentiment: Box<dyn SentimentScorer>,
        topics: Box<dyn TopicExtractor>,
    ) -> Self {
        Self {
            clusterer: KMeansClusterer {
                max_iterations: config.max_iterations,
            },
            sentiment,
            topics,
            trainer: SkipGramTrainer::new(config.training, config.seed),
            state: RwLock::new(ModelState::Untrained),
        }
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.current_state(), ModelState::Trained(_))
    }

    /// The current model, if any. The returned handle stays valid even if a
    /// retrain swaps in a newer model.
    pub fn model(&self) -> Option<Arc<WordVectorModel>> {
        match self.current_state() {
            ModelState::Trained(model) => Some(model),
            ModelState::Untrained => None,
        }
    }

    fn current_state(&self) -> ModelState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn install(&self, model: WordVectorModel) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = ModelState::Trained(Arc::new(model));
    }

    /// Run training on the blocking thread pool.
    ///
    /// The engine stays fully usable while training runs; predictions use the
    /// previous model (or none) until the new one is swapped in.
    pub async fn train_word_vectors_in_background(
        self: Arc<Self>,
        corpus: Vec<String>,
        dimensions: usize,
    ) -> Result<bool> {
        debug!(documents = corpus.len(), dimensions, "Offloading training");
        tokio::task::spawn_blocking(move || self.train_word_vector_model(&corpus, dimensions))
            .await
            .map_err(|e| AnalyticsError::TrainingTask(e.to_string()))?
    }
}

impl TextAnalytics for NovelEngine {
    fn similarity(&self, text1: &str, text2: &str) -> f64 {
        calculate_text_similarity(text1, text2)
    }

    fn semantic_relatedness(&self, main_text: &str, references: &[String]) -> Vec<f64> {
        calculate_semantic_relatedness(main_text, references)
    }

    fn cluster(&self, texts: &[String], k: usize) -> Result<Vec<ClusterResult>> {
        self.clusterer.cluster(texts, k)
    }

    fn classify(&self, text: &str, categories: &[String]) -> BTreeMap<String, f64> {
        classify_text(text, categories)
    }

    fn sentiment(&self, text: &str) -> SentimentResult {
        self.sentiment.score_text(text)
    }

    fn extract_topics(&self, text: &str, k: usize) -> Result<Vec<TopicResult>> {
        self.topics.extract(text, k)
    }

    fn extract_keywords(&self, texts: &[String], n: usize) -> Vec<(String, f32)> {
        extract_keywords(texts, n)
    }

    fn writing_style(&self, text: &str) -> WritingStyle {
        detect_writing_style(text)
    }

    fn text_complexity(&self, text: &str) -> ComplexityMetrics {
        analyze_text_complexity(text)
    }

    fn novel_structure(&self, chapters: &[String]) -> NovelStructure {
        analyze_novel_structure(chapters, self.sentiment.as_ref(), self.topics.as_ref())
    }

    fn train_word_vector_model(&self, corpus: &[String], dimensions: usize) -> Result<bool> {
        match self.trainer.train(corpus, dimensions)? {
            Some(model) => {
                let retrain = self.is_trained();
                info!(
                    vocabulary = model.vocabulary_size(),
                    dimensions,
                    retrain,
                    "Installing word-vector model"
                );
                self.install(model);
                Ok(true)
            }
            None => {
                warn!(documents = corpus.len(), "Nothing to train on, keeping current model");
                Ok(false)
            }
        }
    }

    fn predict_plot_development(&self, chapters: &[String]) -> BTreeMap<String, f64> {
        match self.model() {
            Some(model) => predict_plot_development(&model, chapters),
            None => {
                debug!("Prediction requested before training");
                BTreeMap::new()
            }
        }
    }

    fn save_model(&self, path: &Path) -> Result<()> {
        let model = self
            .model()
            .ok_or_else(|| AnalyticsError::ModelIo("no trained model to save".to_string()))?;
        store::save_model(&model, path)
    }

    fn load_model(&self, path: &Path) -> Result<()> {
        let model = store::load_model(path)?;
        self.install(model);
        Ok(())
    }
}
