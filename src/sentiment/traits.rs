// Sentiment scorer trait and result types.

use serde::{Deserialize, Serialize};

/// Neutral midpoint of the score range.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Default half-width of the neutral band around 0.5.
pub const DEFAULT_EPSILON: f64 = 0.05;

/// Categorical sentiment derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    /// Threshold policy: above `0.5 + epsilon` is positive, below
    /// `0.5 - epsilon` is negative, anything else is neutral.
    pub fn from_score(score: f64, epsilon: f64) -> Self {
        if score > NEUTRAL_SCORE + epsilon {
            SentimentLabel::Positive
        } else if score < NEUTRAL_SCORE - epsilon {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of scoring a single text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// 0.0 (very negative) to 1.0 (very positive), 0.5 when no cue matched
    pub score: f64,
    /// Always consistent with `score` under the scorer's epsilon
    pub sentiment: SentimentLabel,
}

impl SentimentResult {
    pub fn from_score(score: f64, epsilon: f64) -> Self {
        let score = score.clamp(0.0, 1.0);
        Self {
            score,
            sentiment: SentimentLabel::from_score(score, epsilon),
        }
    }

    pub fn neutral() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            sentiment: SentimentLabel::Neutral,
        }
    }
}

/// Trait for scoring the sentiment of a text.
pub trait SentimentScorer: Send + Sync {
    /// Score a single text.
    fn score_text(&self, text: &str) -> SentimentResult;

    /// Score multiple texts, returning results in the same order.
    fn score_batch(&self, texts: &[String]) -> Vec<SentimentResult> {
        texts.iter().map(|t| self.score_text(t)).collect()
    }
}
