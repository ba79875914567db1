// WordVectorModel: a trained term -> dense vector mapping.
//
// Built by the trainer, then only read: vector lookup, mean pooling over a
// token sequence, and nearest-neighbor search by cosine similarity.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vector::dense_cosine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordVectorModel {
    dimensions: usize,
    /// Terms in id order
    words: Vec<String>,
    /// Corpus frequency per term, same order as `words`
    counts: Vec<usize>,
    /// One `dimensions`-long vector per term
    vectors: Vec<Vec<f64>>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    trained_at: DateTime<Utc>,
}

impl WordVectorModel {
    /// Assemble a model. `words`, `counts` and `vectors` must be parallel,
    /// and every vector must have `dimensions` entries.
    pub fn new(
        dimensions: usize,
        words: Vec<String>,
        counts: Vec<usize>,
        vectors: Vec<Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(words.len(), vectors.len());
        debug_assert_eq!(words.len(), counts.len());

        let mut model = Self {
            dimensions,
            words,
            counts,
            vectors,
            index: HashMap::new(),
            trained_at: Utc::now(),
        };
        model.rebuild_index();
        model
    }

    /// Restore the lookup table after deserialization.
    pub(crate) fn rebuild_index(&mut self) {
        self.index = self
            .words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();
    }

    /// Check the shape invariants `new` assumes. A model read from disk is
    /// only trusted after this passes.
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        if self.dimensions == 0 {
            return Err("dimensions must be >= 1".to_string());
        }
        if self.words.len() != self.vectors.len() || self.words.len() != self.counts.len() {
            return Err(format!(
                "{} words, {} counts and {} vectors do not line up",
                self.words.len(),
                self.counts.len(),
                self.vectors.len()
            ));
        }
        if self.index.len() != self.words.len() {
            return Err("vocabulary has duplicate words".to_string());
        }
        for (word, vector) in self.words.iter().zip(&self.vectors) {
            if vector.len() != self.dimensions {
                return Err(format!(
                    "vector for {word:?} has {} entries, expected {}",
                    vector.len(),
                    self.dimensions
                ));
            }
            if !vector.iter().all(|x| x.is_finite()) {
                return Err(format!("vector for {word:?} has non-finite entries"));
            }
        }
        Ok(())
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn vocabulary_size(&self) -> usize {
        self.words.len()
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn vector(&self, word: &str) -> Option<&[f64]> {
        self.index.get(word).map(|&i| self.vectors[i].as_slice())
    }

    pub fn count(&self, word: &str) -> usize {
        self.index.get(word).map_or(0, |&i| self.counts[i])
    }

    /// Cosine similarity between two known words, clamped to [0, 1].
    pub fn similarity(&self, a: &str, b: &str) -> Option<f64> {
        Some(dense_cosine(self.vector(a)?, self.vector(b)?))
    }

    /// Mean of the vectors of the known tokens. None if no token is known.
    pub fn mean_vector<S: AsRef<str>>(&self, tokens: &[S]) -> Option<Vec<f64>> {
        let known: Vec<&[f64]> = tokens.iter().filter_map(|t| self.vector(t.as_ref())).collect();
        if known.is_empty() {
            return None;
        }
        Some(mean_embedding(&known, self.dimensions))
    }

    /// Vocabulary terms closest to `query`, best first, skipping any term for
    /// which `exclude` returns true. Zero-similarity terms are left out.
    pub fn nearest<F>(&self, query: &[f64], n: usize, exclude: F) -> Vec<(String, f64)>
    where
        F: Fn(&str) -> bool,
    {
        let mut scored: Vec<(usize, f64)> = self
            .vectors
            .iter()
            .enumerate()
            .filter(|(i, _)| !exclude(&self.words[*i]))
            .map(|(i, v)| (i, dense_cosine(query, v)))
            .filter(|(_, s)| *s > 0.0)
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        scored
            .into_iter()
            .take(n)
            .map(|(i, s)| (self.words[i].clone(), s))
            .collect()
    }

    /// Words nearest to a known word, excluding the word itself.
    pub fn words_nearest(&self, word: &str, n: usize) -> Vec<(String, f64)> {
        match self.vector(word) {
            Some(v) => {
                let v = v.to_vec();
                self.nearest(&v, n, |w| w == word)
            }
            None => Vec::new(),
        }
    }
}

/// Element-wise mean of equally sized vectors. Empty input gives a zero
/// vector of length `dimensions`.
pub fn mean_embedding<V: AsRef<[f64]>>(embeddings: &[V], dimensions: usize) -> Vec<f64> {
    let mut mean = vec![0.0_f64; dimensions];
    if embeddings.is_empty() {
        return mean;
    }

    for emb in embeddings {
        for (m, &val) in mean.iter_mut().zip(emb.as_ref()) {
            *m += val;
        }
    }

    let n = embeddings.len() as f64;
    for val in &mut mean {
        *val /= n;
    }
    mean
}
