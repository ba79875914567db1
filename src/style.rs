// Writing style and text complexity metrics.
//
// Style lengths are measured in characters so they mean the same thing for
// English and for unsegmented Chinese text. Complexity works on tokens, the
// same units every other module uses.

use std::collections::HashSet;

use serde::Serialize;

use crate::text;

/// Sentences longer than this many tokens count as long.
pub const LONG_SENTENCE_TOKENS: usize = 20;

/// Average sentence length (in tokens) at which the length term saturates.
const SATURATING_SENTENCE_TOKENS: f64 = 30.0;

const QUOTE_MARKS: &[char] = &['"', '\u{201C}', '\u{201D}', '\u{300C}', '\u{300D}', '\u{300E}', '\u{300F}'];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WritingStyle {
    /// Characters per sentence
    pub avg_sentence_length: f64,
    /// Characters per paragraph
    pub avg_paragraph_length: f64,
    /// Share of sentences containing a quotation mark
    pub dialogue_frequency: f64,
    /// Distinct tokens / total tokens
    pub vocabulary_richness: f64,
    /// Exclamation marks per sentence
    pub exclamation_rate: f64,
    /// Question marks per sentence
    pub question_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComplexityMetrics {
    pub vocabulary_diversity: f64,
    /// Tokens per sentence
    pub avg_sentence_length: f64,
    pub long_sentence_ratio: f64,
    /// Weighted blend of the three metrics above, in [0, 1]
    pub overall_complexity: f64,
}

/// Style metrics for a text. Empty text gives all zeros.
pub fn detect_writing_style(input: &str) -> WritingStyle {
    let sentences = text::sentences(input);
    if sentences.is_empty() {
        return WritingStyle::default();
    }
    let sentence_count = sentences.len() as f64;
    let paragraphs = text::paragraphs(input);

    let sentence_chars: usize = sentences.iter().map(|s| s.chars().count()).sum();
    let paragraph_chars: usize = paragraphs.iter().map(|p| p.chars().count()).sum();
    let dialogue = sentences
        .iter()
        .filter(|s| s.contains(QUOTE_MARKS))
        .count();

    let exclamations = input.chars().filter(|c| matches!(c, '!' | '！')).count();
    let questions = input.chars().filter(|c| matches!(c, '?' | '？')).count();

    WritingStyle {
        avg_sentence_length: sentence_chars as f64 / sentence_count,
        avg_paragraph_length: if paragraphs.is_empty() {
            0.0
        } else {
            paragraph_chars as f64 / paragraphs.len() as f64
        },
        dialogue_frequency: dialogue as f64 / sentence_count,
        vocabulary_richness: distinct_ratio(&text::tokenize(input)),
        exclamation_rate: exclamations as f64 / sentence_count,
        question_rate: questions as f64 / sentence_count,
    }
}

/// Complexity metrics for a text. Empty text gives all zeros.
pub fn analyze_text_complexity(input: &str) -> ComplexityMetrics {
    let sentence_tokens: Vec<usize> = text::sentences(input)
        .into_iter()
        .map(|s| text::tokenize(s).len())
        .filter(|&n| n > 0)
        .collect();
    if sentence_tokens.is_empty() {
        return ComplexityMetrics::default();
    }

    let sentence_count = sentence_tokens.len() as f64;
    let total_tokens: usize = sentence_tokens.iter().sum();
    let long = sentence_tokens
        .iter()
        .filter(|&&n| n > LONG_SENTENCE_TOKENS)
        .count();

    let vocabulary_diversity = distinct_ratio(&text::tokenize(input));
    let avg_sentence_length = total_tokens as f64 / sentence_count;
    let long_sentence_ratio = long as f64 / sentence_count;
    let overall_complexity = 0.4 * vocabulary_diversity
        + 0.4 * (avg_sentence_length / SATURATING_SENTENCE_TOKENS).min(1.0)
        + 0.2 * long_sentence_ratio;

    ComplexityMetrics {
        vocabulary_diversity,
        avg_sentence_length,
        long_sentence_ratio,
        overall_complexity: overall_complexity.clamp(0.0, 1.0),
    }
}

fn distinct_ratio(tokens: &[String]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let distinct: HashSet<&String> = tokens.iter().collect();
    distinct.len() as f64 / tokens.len() as f64
}
