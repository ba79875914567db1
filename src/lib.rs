// Novelscope: text analytics for fiction.
//
// This is the library root. Each module is one analysis subsystem; `engine`
// ties them together behind the `TextAnalytics` trait.

pub mod classify;
pub mod clustering;
pub mod config;
pub mod embeddings;
pub mod engine;
pub mod error;
pub mod output;
pub mod sentiment;
pub mod similarity;
pub mod structure;
pub mod style;
pub mod text;
pub mod topics;
pub mod vector;

pub use engine::traits::TextAnalytics;
pub use engine::NovelEngine;
pub use error::{AnalyticsError, Result};
