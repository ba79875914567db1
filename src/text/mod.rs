// Text preprocessing shared by every analysis module.
//
// Tokenization is whitespace-based: each whitespace-separated token is
// trimmed of surrounding punctuation and lowercased, so "Excellent," and
// "excellent" are the same term. Sentence and paragraph splitting give the
// topic model and style metrics their units of observation.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

/// Split on whitespace and normalize each token.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().filter_map(normalize_token).collect()
}

/// Trim leading/trailing non-alphanumeric characters and lowercase.
/// Returns None when nothing alphanumeric is left.
pub fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[.!?。！？\n]+").expect("sentence pattern is valid"))
}

fn paragraph_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n[ \t\r]*\n").expect("paragraph pattern is valid"))
}

/// Split text into sentences, dropping fragments that are only whitespace.
pub fn sentences(text: &str) -> Vec<&str> {
    sentence_pattern()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split text into paragraphs on blank lines.
pub fn paragraphs(text: &str) -> Vec<&str> {
    paragraph_pattern()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// English stop words, loaded once.
pub fn stop_words() -> &'static HashSet<String> {
    static WORDS: OnceLock<HashSet<String>> = OnceLock::new();
    WORDS.get_or_init(|| {
        let words: Vec<String> = get(LANGUAGE::English);
        words.into_iter().map(|w| w.to_lowercase()).collect()
    })
}

pub fn is_stop_word(token: &str) -> bool {
    stop_words().contains(token)
}

/// Tokenize and drop stop words.
pub fn content_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !is_stop_word(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_strips_punctuation_and_case() {
        assert_eq!(
            tokenize("The Dragon, roared!  -- loudly"),
            vec!["the", "dragon", "roared", "loudly"]
        );
    }

    #[test]
    fn test_tokenize_keeps_inner_apostrophe() {
        assert_eq!(tokenize("wasn't \"fine\""), vec!["wasn't", "fine"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("   \n\t ").is_empty());
        assert!(tokenize("... !!").is_empty());
    }

    #[test]
    fn test_sentences() {
        let s = sentences("The mage left. Did he return?  Nobody knew!\nEnd");
        assert_eq!(s, vec!["The mage left", "Did he return", "Nobody knew", "End"]);
    }

    #[test]
    fn test_paragraphs() {
        let p = paragraphs("First part.\n\nSecond part.\n  \nThird.");
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_stop_words_loaded() {
        assert!(is_stop_word("the"));
        assert!(!is_stop_word("dragon"));
    }
}
