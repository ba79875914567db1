// Skip-gram word-vector training with negative sampling.
//
// Every token is a center word; every other token within `window` positions of
// it in the same sentence is a positive context. For each positive pair the
// trainer also draws `negative` noise words from the unigram distribution
// raised to the 0.75 power and pushes the center vector away from them.
// The learning rate decays linearly over all updates, down to 1% of its
// starting value.
//
// The RNG is seeded, so a corpus trained twice with the same settings gives
// the same vectors.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::model::WordVectorModel;
use crate::config::TrainingConfig;
use crate::error::{require_positive, Result};
use crate::text;

/// Exponent applied to unigram counts for the noise distribution.
const NOISE_POWER: f64 = 0.75;

/// Floor for the decayed learning rate, as a fraction of the initial rate.
const MIN_LEARNING_RATE_FRACTION: f64 = 0.01;

/// Clamp for dot products before the logistic function.
const MAX_EXP: f64 = 6.0;

pub struct SkipGramTrainer {
    pub config: TrainingConfig,
    pub seed: u64,
}

impl Default for SkipGramTrainer {
    fn default() -> Self {
        Self {
            config: TrainingConfig::default(),
            seed: 42,
        }
    }
}

/// Tokenized corpus: sentences of term ids plus the term table.
struct TrainingCorpus {
    sentences: Vec<Vec<usize>>,
    words: Vec<String>,
    counts: Vec<usize>,
}

impl TrainingCorpus {
    fn build<S: AsRef<str>>(corpus: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = corpus
            .iter()
            .flat_map(|doc| text::sentences(doc.as_ref()))
            .map(text::tokenize)
            .filter(|tokens| !tokens.is_empty())
            .collect();

        let mut frequencies: BTreeMap<String, usize> = BTreeMap::new();
        for token in tokenized.iter().flatten() {
            *frequencies.entry(token.clone()).or_insert(0) += 1;
        }

        let ids: BTreeMap<&str, usize> = frequencies
            .keys()
            .enumerate()
            .map(|(i, w)| (w.as_str(), i))
            .collect();
        let sentences = tokenized
            .iter()
            .map(|tokens| tokens.iter().map(|t| ids[t.as_str()]).collect())
            .collect();

        let (words, counts) = frequencies.into_iter().unzip();
        Self {
            sentences,
            words,
            counts,
        }
    }

    fn token_count(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }
}

/// Cumulative noise distribution, sampled by binary search.
struct NoiseTable {
    cumulative: Vec<f64>,
}

impl NoiseTable {
    fn new(counts: &[usize]) -> Self {
        let mut running = 0.0;
        let cumulative = counts
            .iter()
            .map(|&c| {
                running += (c as f64).powf(NOISE_POWER);
                running
            })
            .collect();
        Self { cumulative }
    }

    fn sample(&self, rng: &mut StdRng) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let target = rng.random::<f64>() * total;
        self.cumulative
            .partition_point(|&c| c <= target)
            .min(self.cumulative.len() - 1)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x.clamp(-MAX_EXP, MAX_EXP)).exp())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl SkipGramTrainer {
    pub fn new(config: TrainingConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    /// Train vectors of length `dimensions` over `corpus`.
    ///
    /// Returns `Ok(None)` when the corpus has no tokens at all, and
    /// `InvalidArgument` when `dimensions` is zero.
    pub fn train<S: AsRef<str>>(
        &self,
        corpus: &[S],
        dimensions: usize,
    ) -> Result<Option<WordVectorModel>> {
        require_positive("dimensions", dimensions)?;

        let corpus = TrainingCorpus::build(corpus);
        if corpus.words.is_empty() {
            debug!("Training corpus has no tokens");
            return Ok(None);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let vocab_size = corpus.words.len();

        // Input vectors start small and random, output vectors at zero
        let half_width = 0.5 / dimensions as f64;
        let mut input: Vec<Vec<f64>> = (0..vocab_size)
            .map(|_| {
                (0..dimensions)
                    .map(|_| rng.random_range(-half_width..half_width))
                    .collect()
            })
            .collect();
        let mut output: Vec<Vec<f64>> = vec![vec![0.0; dimensions]; vocab_size];

        let noise = NoiseTable::new(&corpus.counts);
        let window = self.config.window;
        let initial_lr = self.config.learning_rate;
        let total_steps = (self.config.epochs * corpus.token_count()).max(1) as f64;
        let mut step = 0usize;
        let mut gradient = vec![0.0; dimensions];

        for epoch in 0..self.config.epochs {
            for sentence in &corpus.sentences {
                for (pos, &center) in sentence.iter().enumerate() {
                    let progress = step as f64 / total_steps;
                    let lr = initial_lr * (1.0 - progress).max(MIN_LEARNING_RATE_FRACTION);
                    step += 1;

                    let start = pos.saturating_sub(window);
                    let end = (pos + window + 1).min(sentence.len());

                    for ctx_pos in start..end {
                        if ctx_pos == pos {
                            continue;
                        }
                        let context = sentence[ctx_pos];
                        gradient.iter_mut().for_each(|g| *g = 0.0);

                        // One positive target, then the noise draws
                        for n in 0..=self.config.negative {
                            let (target, label) = if n == 0 {
                                (context, 1.0)
                            } else {
                                let drawn = noise.sample(&mut rng);
                                if drawn == context {
                                    continue;
                                }
                                (drawn, 0.0)
                            };

                            let g = (label - sigmoid(dot(&input[center], &output[target]))) * lr;
                            for (acc, &o) in gradient.iter_mut().zip(&output[target]) {
                                *acc += g * o;
                            }
                            for (o, &i) in output[target].iter_mut().zip(&input[center]) {
                                *o += g * i;
                            }
                        }

                        for (i, g) in input[center].iter_mut().zip(&gradient) {
                            *i += g;
                        }
                    }
                }
            }
            debug!(epoch, steps = step, "Finished training epoch");
        }

        info!(
            vocabulary = vocab_size,
            tokens = corpus.token_count(),
            dimensions,
            epochs = self.config.epochs,
            "Trained word vectors"
        );

        Ok(Some(WordVectorModel::new(
            dimensions,
            corpus.words,
            corpus.counts,
            input,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_ids_are_sorted() {
        let corpus = TrainingCorpus::build(&["zebra apple. mango"]);
        assert_eq!(corpus.words, vec!["apple", "mango", "zebra"]);
        assert_eq!(corpus.sentences, vec![vec![2, 0], vec![1]]);
    }

    #[test]
    fn test_noise_table_samples_in_range() {
        let table = NoiseTable::new(&[1, 10, 100]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(table.sample(&mut rng) < 3);
        }
    }

    #[test]
    fn test_noise_table_prefers_frequent_words() {
        let table = NoiseTable::new(&[1, 1000]);
        let mut rng = StdRng::seed_from_u64(7);
        let frequent = (0..500).filter(|_| table.sample(&mut rng) == 1).count();
        assert!(frequent > 400, "got {frequent}");
    }

    #[test]
    fn test_sigmoid_is_clamped() {
        assert!(sigmoid(1000.0) < 1.0);
        assert!(sigmoid(-1000.0) > 0.0);
        assert!((sigmoid(0.0) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(SkipGramTrainer::default().train(&["a b c"], 0).is_err());
    }

    #[test]
    fn test_empty_corpus_gives_none() {
        let empty: [&str; 0] = [];
        assert!(SkipGramTrainer::default().train(&empty, 8).unwrap().is_none());
        assert!(SkipGramTrainer::default().train(&["  ...  "], 8).unwrap().is_none());
    }
}
