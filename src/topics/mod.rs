// Topic extraction: latent topics within a single document.
//
// A document is split into sentences so the topic model sees several
// observations from one input. Two backends implement TopicExtractor: LDA
// with collapsed Gibbs sampling (default) and TF-IDF keywords grouped by
// co-occurrence.

pub mod cooccurrence;
pub mod lda;
pub mod overlap;
pub mod result;
pub mod traits;
