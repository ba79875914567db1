// Sentiment scoring: trait-based abstraction for swappable scorers.
//
// The SentimentScorer trait defines the interface. LexiconScorer implements
// it with a word lexicon plus negation and intensifier handling. Scorers are
// stateless per call: nothing learned from one text affects the next.

pub mod lexicon;
pub mod traits;
