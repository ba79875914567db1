// Latent Dirichlet Allocation with collapsed Gibbs sampling.
//
// The document is split into sentences, each sentence becoming one
// pseudo-document. Every token gets a topic assignment; each sweep resamples
// every assignment from
//
//   p(z = t) ∝ (n_dt + alpha) * (n_tw + beta) / (n_t + V * beta)
//
// where n_dt counts tokens of sentence d in topic t, n_tw counts term w in
// topic t, and n_t counts all tokens in topic t. After the final sweep a
// topic's keywords are its terms ranked by (n_tw + beta) / (n_t + V * beta)
// and its weight is its share of all tokens.
//
// Sampling is seeded, so the same text and settings give the same topics.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::result::TopicResult;
use super::traits::TopicExtractor;
use crate::error::{require_positive, Result};
use crate::text;

/// LDA topic extractor: the default backend.
pub struct LdaExtractor {
    /// Keywords reported per topic
    pub keywords_per_topic: usize,
    /// Gibbs sweeps over the whole document
    pub iterations: usize,
    /// Document-topic smoothing
    pub alpha: f64,
    /// Topic-word smoothing
    pub beta: f64,
    pub seed: u64,
}

impl Default for LdaExtractor {
    fn default() -> Self {
        Self {
            keywords_per_topic: 5,
            iterations: 200,
            alpha: 0.1,
            beta: 0.01,
            seed: 42,
        }
    }
}

/// Sentences as term-id sequences plus the id -> term table.
struct Corpus {
    docs: Vec<Vec<usize>>,
    terms: Vec<String>,
}

impl Corpus {
    /// Build pseudo-documents from sentences. Stop words are dropped unless
    /// that would leave nothing, in which case all tokens are kept.
    fn from_text(input: &str) -> Self {
        let sentences = text::sentences(input);

        let mut tokenized: Vec<Vec<String>> = sentences
            .iter()
            .map(|s| text::content_tokens(s))
            .filter(|t| !t.is_empty())
            .collect();
        if tokenized.is_empty() {
            tokenized = sentences
                .iter()
                .map(|s| text::tokenize(s))
                .filter(|t| !t.is_empty())
                .collect();
        }

        // Sorted term ids keep sampling independent of hash order
        let mut index: BTreeMap<String, usize> = BTreeMap::new();
        for tokens in &tokenized {
            for token in tokens {
                index.entry(token.clone()).or_insert(0);
            }
        }
        for (i, id) in index.values_mut().enumerate() {
            *id = i;
        }

        let docs = tokenized
            .iter()
            .map(|tokens| tokens.iter().map(|t| index[t]).collect())
            .collect();
        let terms = index.into_keys().collect();

        Self { docs, terms }
    }

    fn token_count(&self) -> usize {
        self.docs.iter().map(Vec::len).sum()
    }
}

/// Count tables for the sampler.
struct Counts {
    /// doc x topic
    doc_topic: Vec<Vec<usize>>,
    /// topic x term
    topic_term: Vec<Vec<usize>>,
    /// tokens per topic
    topic_total: Vec<usize>,
}

impl LdaExtractor {
    fn sample(&self, corpus: &Corpus, k: usize) -> Counts {
        let v = corpus.terms.len();
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut counts = Counts {
            doc_topic: vec![vec![0; k]; corpus.docs.len()],
            topic_term: vec![vec![0; v]; k],
            topic_total: vec![0; k],
        };

        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(corpus.docs.len());
        for (d, doc) in corpus.docs.iter().enumerate() {
            let mut doc_assignments = Vec::with_capacity(doc.len());
            for &w in doc {
                let t = rng.random_range(0..k);
                counts.doc_topic[d][t] += 1;
                counts.topic_term[t][w] += 1;
                counts.topic_total[t] += 1;
                doc_assignments.push(t);
            }
            assignments.push(doc_assignments);
        }

        let v_beta = v as f64 * self.beta;
        let mut weights = vec![0.0; k];

        for _ in 0..self.iterations {
            for (d, doc) in corpus.docs.iter().enumerate() {
                for (i, &w) in doc.iter().enumerate() {
                    let old = assignments[d][i];
                    counts.doc_topic[d][old] -= 1;
                    counts.topic_term[old][w] -= 1;
                    counts.topic_total[old] -= 1;

                    let mut total = 0.0;
                    for (t, weight) in weights.iter_mut().enumerate() {
                        *weight = (counts.doc_topic[d][t] as f64 + self.alpha)
                            * (counts.topic_term[t][w] as f64 + self.beta)
                            / (counts.topic_total[t] as f64 + v_beta);
                        total += *weight;
                    }

                    let mut target = rng.random::<f64>() * total;
                    let mut new = k - 1;
                    for (t, weight) in weights.iter().enumerate() {
                        if target < *weight {
                            new = t;
                            break;
                        }
                        target -= weight;
                    }

                    assignments[d][i] = new;
                    counts.doc_topic[d][new] += 1;
                    counts.topic_term[new][w] += 1;
                    counts.topic_total[new] += 1;
                }
            }
        }

        counts
    }

    /// Turn final counts into topics, dropping topics no token ended up in.
    fn summarize(&self, corpus: &Corpus, counts: &Counts) -> Vec<TopicResult> {
        let v_beta = corpus.terms.len() as f64 * self.beta;
        let total_tokens = corpus.token_count() as f64;

        let mut topics: Vec<(Vec<String>, f64)> = counts
            .topic_term
            .iter()
            .zip(&counts.topic_total)
            .filter(|(_, &total)| total > 0)
            .map(|(term_counts, &total)| {
                let mut ranked: Vec<(usize, f64)> = term_counts
                    .iter()
                    .enumerate()
                    .filter(|(_, &c)| c > 0)
                    .map(|(w, &c)| (w, (c as f64 + self.beta) / (total as f64 + v_beta)))
                    .collect();
                // Highest probability first, term order breaks ties
                ranked.sort_by(|a, b| {
                    b.1.partial_cmp(&a.1)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.0.cmp(&b.0))
                });

                let keywords = ranked
                    .into_iter()
                    .take(self.keywords_per_topic)
                    .map(|(w, _)| corpus.terms[w].clone())
                    .collect();
                (keywords, total as f64 / total_tokens)
            })
            .collect();

        topics.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        topics
            .into_iter()
            .enumerate()
            .map(|(topic_id, (keywords, weight))| TopicResult {
                topic_id,
                keywords,
                weight,
            })
            .collect()
    }
}

impl TopicExtractor for LdaExtractor {
    fn extract(&self, text: &str, k: usize) -> Result<Vec<TopicResult>> {
        require_positive("k", k)?;

        let corpus = Corpus::from_text(text);
        if corpus.terms.is_empty() {
            debug!("No terms to model, returning no topics");
            return Ok(Vec::new());
        }

        // Can't distinguish more topics than there are distinct terms
        let effective_k = k.min(corpus.terms.len());
        let counts = self.sample(&corpus, effective_k);
        let topics = self.summarize(&corpus, &counts);

        info!(
            sentences = corpus.docs.len(),
            terms = corpus.terms.len(),
            requested = k,
            topics = topics.len(),
            "Extracted LDA topics"
        );

        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "The young mage studied magic in the tower. \
                        Magic filled the old tower every night. \
                        The pirates sailed across the stormy sea. \
                        The sea swallowed the pirates and their ship.";

    #[test]
    fn test_corpus_drops_stop_words() {
        let corpus = Corpus::from_text("The dragon and the knight.");
        assert_eq!(corpus.terms, vec!["dragon", "knight"]);
    }

    #[test]
    fn test_corpus_falls_back_when_only_stop_words() {
        let corpus = Corpus::from_text("the and of");
        assert!(!corpus.terms.is_empty());
    }

    #[test]
    fn test_weights_sum_to_one_over_kept_topics() {
        let topics = LdaExtractor::default().extract(TEXT, 2).unwrap();
        assert!(!topics.is_empty());
        let sum: f64 = topics.iter().map(|t| t.weight).sum();
        assert!((sum - 1.0).abs() < 1e-9, "got {sum}");
    }

    #[test]
    fn test_same_seed_same_topics() {
        let a = LdaExtractor::default().extract(TEXT, 2).unwrap();
        let b = LdaExtractor::default().extract(TEXT, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_keywords_are_capped() {
        let extractor = LdaExtractor {
            keywords_per_topic: 2,
            ..LdaExtractor::default()
        };
        for topic in extractor.extract(TEXT, 3).unwrap() {
            assert!(topic.keywords.len() <= 2);
        }
    }
}
