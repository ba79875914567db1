// Error taxonomy for the analytics engine.
//
// Only contract violations are errors. "No signal" inputs (empty corpus,
// empty text, predicting before training) produce an empty or neutral
// result instead, so they never show up here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A caller-supplied parameter is out of range (k < 1, zero dimensions,
    /// malformed configuration value).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reading or writing a persisted word-vector model failed.
    #[error("Model I/O failed: {0}")]
    ModelIo(String),

    /// A sentiment lexicon file could not be read.
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    /// A background training task panicked or was cancelled.
    #[error("Training task failed: {0}")]
    TrainingTask(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Fail with `InvalidArgument` unless `k` is at least 1.
pub(crate) fn require_positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(AnalyticsError::InvalidArgument(format!(
            "{name} must be >= 1, got 0"
        )));
    }
    Ok(())
}
