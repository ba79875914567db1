// Vocabulary and sparse TF-IDF document vectors.
//
// A Vocabulary maps each term seen in a reference corpus to a rarity weight.
// Documents are vectorized against it as term frequency x rarity weight,
// keeping only terms the vocabulary knows. Both maps are ordered (BTreeMap)
// so that summations run in the same order every time, which keeps cosine
// similarity exactly symmetric and exactly 1.0 for identical vectors.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::text;

/// Term -> rarity weight, built once from a corpus and then read-only.
///
/// Weights use smoothed IDF, `ln((1 + N) / (1 + df)) + 1`, which is finite,
/// strictly positive and decreasing in document frequency. A term that
/// appears in every document still carries weight, so a vocabulary built
/// from two identical texts does not collapse to zero vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    weights: BTreeMap<String, f64>,
    document_count: usize,
}

impl Vocabulary {
    /// Build a vocabulary from a corpus. An empty corpus yields an empty
    /// vocabulary, never an error.
    pub fn build<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for doc in corpus {
            let unique: BTreeSet<String> = text::tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n = corpus.len() as f64;
        let weights = document_frequency
            .into_iter()
            .map(|(term, df)| {
                let idf = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term, idf)
            })
            .collect();

        Self {
            weights,
            document_count: corpus.len(),
        }
    }

    pub fn weight(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.weights.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Number of documents the vocabulary was built from.
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Terms in sorted order. This order defines the dense layout used by
    /// `to_dense`.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    /// Convert a document into its sparse TF-IDF vector.
    ///
    /// `tf` is occurrences / total tokens in the document (including tokens
    /// the vocabulary does not know). Unknown terms are dropped silently.
    pub fn vectorize(&self, document: &str) -> DocumentVector {
        let tokens = text::tokenize(document);
        if tokens.is_empty() || self.is_empty() {
            return DocumentVector::default();
        }

        let total = tokens.len() as f64;
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }

        let weights = counts
            .into_iter()
            .filter_map(|(term, count)| {
                self.weight(&term)
                    .map(|idf| (term, (count as f64 / total) * idf))
            })
            .collect();

        DocumentVector { weights }
    }

    /// Lay a sparse vector out densely in vocabulary term order.
    pub fn to_dense(&self, vector: &DocumentVector) -> Vec<f64> {
        self.terms()
            .map(|term| vector.get(term).unwrap_or(0.0))
            .collect()
    }
}

/// Sparse term -> weight vector. Every key is a key of the vocabulary that
/// produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentVector {
    weights: BTreeMap<String, f64>,
}

impl DocumentVector {
    pub fn get(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(t, w)| (t.as_str(), *w))
    }

    fn squared_norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum()
    }

    pub fn norm(&self) -> f64 {
        self.squared_norm().sqrt()
    }
}

pub fn build_vocabulary<S: AsRef<str>>(corpus: &[S]) -> Vocabulary {
    Vocabulary::build(corpus)
}

pub fn vectorize(document: &str, vocabulary: &Vocabulary) -> DocumentVector {
    vocabulary.vectorize(document)
}

/// Cosine similarity between two sparse vectors, in [0, 1].
///
/// Returns exactly 0.0 when either vector has zero norm (empty document,
/// no known terms). Weights are non-negative, so the raw cosine is already
/// non-negative; the clamp only absorbs rounding above 1.0.
pub fn cosine_similarity(a: &DocumentVector, b: &DocumentVector) -> f64 {
    let sq_a = a.squared_norm();
    let sq_b = b.squared_norm();
    if sq_a <= 0.0 || sq_b <= 0.0 {
        return 0.0;
    }

    // Both maps iterate in sorted key order, so the intersection is summed
    // in the same order regardless of argument order.
    let dot: f64 = a
        .weights
        .iter()
        .filter_map(|(term, wa)| b.weights.get(term).map(|wb| wa * wb))
        .sum();

    (dot / (sq_a * sq_b).sqrt()).clamp(0.0, 1.0)
}

/// Cosine similarity between two dense vectors, in [0, 1].
///
/// Mismatched lengths, empty input and zero vectors all give 0.0.
/// Negative cosines (possible with embeddings) clamp to 0.0.
pub fn dense_cosine(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let sq_a: f64 = a.iter().map(|x| x * x).sum();
    let sq_b: f64 = b.iter().map(|x| x * x).sum();

    let denom = (sq_a * sq_b).sqrt();
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idf_is_monotone_in_rarity() {
        let vocab = Vocabulary::build(&["dragon castle", "dragon forest", "dragon sea"]);
        let common = vocab.weight("dragon").unwrap();
        let rare = vocab.weight("castle").unwrap();
        assert!(rare > common, "rare {rare} should outweigh common {common}");
        assert!(common > 0.0);
    }

    #[test]
    fn test_vectorize_drops_unknown_terms() {
        let vocab = Vocabulary::build(&["dragon castle"]);
        let v = vocab.vectorize("dragon spaceship");
        assert_eq!(v.len(), 1);
        // tf counts all tokens, known or not
        let expected = 0.5 * vocab.weight("dragon").unwrap();
        assert!((v.get("dragon").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_dense_layout_follows_term_order() {
        let vocab = Vocabulary::build(&["b a c"]);
        let dense = vocab.to_dense(&vocab.vectorize("c c"));
        assert_eq!(dense.len(), 3);
        assert_eq!(dense[0], 0.0);
        assert_eq!(dense[1], 0.0);
        assert!(dense[2] > 0.0);
    }

    #[test]
    fn test_dense_cosine_opposite_clamps() {
        assert_eq!(dense_cosine(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);
        assert_eq!(dense_cosine(&[1.0], &[1.0, 2.0]), 0.0);
    }
}
