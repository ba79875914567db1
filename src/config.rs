use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{AnalyticsError, Result};

/// Which topic extraction backend the engine uses.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicBackend {
    /// Collapsed Gibbs sampling LDA over sentences (default)
    Lda,
    /// TF-IDF keywords grouped by sentence co-occurrence
    Cooccurrence,
}

impl FromStr for TopicBackend {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lda" => Ok(TopicBackend::Lda),
            "cooccurrence" => Ok(TopicBackend::Cooccurrence),
            other => Err(AnalyticsError::InvalidArgument(format!(
                "NOVELSCOPE_TOPIC_BACKEND must be \"lda\" or \"cooccurrence\", got {other:?}"
            ))),
        }
    }
}

/// Engine configuration loaded from environment variables.
///
/// Every value has a default, so an empty environment is a valid setup.
/// The CLI loads `.env` via dotenvy before calling `Config::load()`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Iteration cap for centroid clustering
    pub max_iterations: usize,
    /// Half-width of the neutral band around 0.5 for sentiment labels
    pub sentiment_epsilon: f64,
    /// Optional `word score` lexicon file merged over the built-in lexicon
    pub sentiment_lexicon: Option<PathBuf>,
    /// Keywords reported per topic
    pub topic_keywords: usize,
    /// Gibbs sampling sweeps for LDA
    pub lda_iterations: usize,
    /// Which topic extractor to construct
    pub topic_backend: TopicBackend,
    /// Word-vector training settings
    pub training: TrainingConfig,
    /// Seed shared by every stochastic stage (LDA, training)
    pub seed: u64,
    /// Directory where the CLI persists trained word vectors
    pub model_dir: PathBuf,
}

/// Hyperparameters for skip-gram training.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub epochs: usize,
    /// Context words on each side of the center word
    pub window: usize,
    /// Negative samples per positive pair
    pub negative: usize,
    /// Initial SGD learning rate, decayed linearly to 1% of itself
    pub learning_rate: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 20,
            window: 2,
            negative: 5,
            learning_rate: 0.025,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            sentiment_epsilon: 0.05,
            sentiment_lexicon: None,
            topic_keywords: 5,
            lda_iterations: 200,
            topic_backend: TopicBackend::Lda,
            training: TrainingConfig::default(),
            seed: 42,
            model_dir: crate::embeddings::store::default_model_dir(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let topic_backend = match env::var("NOVELSCOPE_TOPIC_BACKEND") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.topic_backend,
        };

        let config = Self {
            max_iterations: parse_var("NOVELSCOPE_MAX_ITERATIONS", defaults.max_iterations)?,
            sentiment_epsilon: parse_var(
                "NOVELSCOPE_SENTIMENT_EPSILON",
                defaults.sentiment_epsilon,
            )?,
            sentiment_lexicon: env::var("NOVELSCOPE_SENTIMENT_LEXICON")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            topic_keywords: parse_var("NOVELSCOPE_TOPIC_KEYWORDS", defaults.topic_keywords)?,
            lda_iterations: parse_var("NOVELSCOPE_LDA_ITERATIONS", defaults.lda_iterations)?,
            topic_backend,
            training: TrainingConfig {
                epochs: parse_var("NOVELSCOPE_EPOCHS", defaults.training.epochs)?,
                window: parse_var("NOVELSCOPE_WINDOW", defaults.training.window)?,
                negative: parse_var("NOVELSCOPE_NEGATIVE", defaults.training.negative)?,
                learning_rate: parse_var(
                    "NOVELSCOPE_LEARNING_RATE",
                    defaults.training.learning_rate,
                )?,
            },
            seed: parse_var("NOVELSCOPE_SEED", defaults.seed)?,
            model_dir: env::var("NOVELSCOPE_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make an operation meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..0.5).contains(&self.sentiment_epsilon) {
            return Err(AnalyticsError::InvalidArgument(format!(
                "sentiment epsilon must be in [0, 0.5), got {}",
                self.sentiment_epsilon
            )));
        }
        if self.max_iterations == 0 {
            return Err(AnalyticsError::InvalidArgument(
                "max_iterations must be >= 1".to_string(),
            ));
        }
        if self.topic_keywords == 0 {
            return Err(AnalyticsError::InvalidArgument(
                "topic_keywords must be >= 1".to_string(),
            ));
        }
        if self.training.window == 0 || self.training.epochs == 0 {
            return Err(AnalyticsError::InvalidArgument(
                "training window and epochs must be >= 1".to_string(),
            ));
        }
        if !(self.training.learning_rate > 0.0 && self.training.learning_rate.is_finite()) {
            return Err(AnalyticsError::InvalidArgument(format!(
                "learning rate must be positive, got {}",
                self.training.learning_rate
            )));
        }
        Ok(())
    }
}

/// Parse an env var into `T`, using `default` when it is unset or empty.
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| {
            AnalyticsError::InvalidArgument(format!("{name} has an invalid value: {raw:?}"))
        }),
        _ => Ok(default),
    }
}
