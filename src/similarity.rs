// Pairwise text similarity on top of the vector model.
//
// The vocabulary is built from the two inputs themselves, so the result
// depends only on the pair: deterministic, symmetric, and 1.0 for a text
// compared with itself whenever it has at least one token.

use tracing::debug;

use crate::vector::{cosine_similarity, Vocabulary};

/// Cosine similarity of two raw texts, in [0, 1].
pub fn calculate_text_similarity(text1: &str, text2: &str) -> f64 {
    let vocabulary = Vocabulary::build(&[text1, text2]);
    let a = vocabulary.vectorize(text1);
    let b = vocabulary.vectorize(text2);
    let score = cosine_similarity(&a, &b);

    debug!(
        vocabulary = vocabulary.len(),
        terms_a = a.len(),
        terms_b = b.len(),
        score,
        "Computed text similarity"
    );

    score
}

/// Similarity of `main_text` to each reference, in reference order.
///
/// An empty main text or an empty reference list gives an empty list.
pub fn calculate_semantic_relatedness<S: AsRef<str>>(
    main_text: &str,
    reference_texts: &[S],
) -> Vec<f64> {
    if main_text.trim().is_empty() || reference_texts.is_empty() {
        return Vec::new();
    }

    reference_texts
        .iter()
        .map(|reference| calculate_text_similarity(main_text, reference.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_overlap_between_zero_and_one() {
        let score = calculate_text_similarity(
            "the wizard crossed the bridge",
            "the knight crossed the river",
        );
        assert!(score > 0.0 && score < 1.0, "got {score}");
    }

    #[test]
    fn test_relatedness_preserves_order() {
        let scores = calculate_semantic_relatedness(
            "dragon fire mountain",
            &["dragon fire mountain", "quiet library books"],
        );
        assert_eq!(scores.len(), 2);
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn test_relatedness_empty_main() {
        assert!(calculate_semantic_relatedness("  ", &["anything"]).is_empty());
    }
}
