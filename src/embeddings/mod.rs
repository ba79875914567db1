// Word embeddings: training, lookup, persistence and plot prediction.
//
// The trainer builds a WordVectorModel from a corpus with skip-gram and
// negative sampling. The model is immutable once built; the engine swaps in
// a new one on retraining instead of mutating it. The predictor reads a model
// to project where a story is heading from its recent chapters.

pub mod model;
pub mod predict;
pub mod store;
pub mod trainer;
