// Unit tests for word-vector training, plot prediction and model persistence.
//
// Training: argument checks, degenerate corpora, determinism and that
// co-occurring words end up closer than unrelated ones. Prediction: the
// untrained and unknown-vocabulary cases and the score range. Persistence:
// save/load through the engine, including the Untrained -> Trained swap.

use std::sync::Arc;

use novelscope::config::{Config, TrainingConfig};
use novelscope::embeddings::predict::predict_plot_development;
use novelscope::embeddings::store::{load_model, save_model};
use novelscope::embeddings::trainer::SkipGramTrainer;
use novelscope::{AnalyticsError, NovelEngine, TextAnalytics};

fn corpus() -> Vec<String> {
    let mut docs = Vec::new();
    for _ in 0..20 {
        docs.push("the brave knight raised his sword for battle".to_string());
        docs.push("the brave knight won the battle with his sword".to_string());
        docs.push("her gentle heart sent a kiss to her beloved".to_string());
        docs.push("a gentle kiss from her heart to her beloved".to_string());
    }
    docs
}

fn trainer() -> SkipGramTrainer {
    SkipGramTrainer::new(
        TrainingConfig {
            epochs: 10,
            ..TrainingConfig::default()
        },
        42,
    )
}

// ============================================================
// SkipGramTrainer
// ============================================================

#[test]
fn model_has_requested_dimensions() {
    let model = trainer().train(&corpus(), 16).unwrap().unwrap();
    assert_eq!(model.dimensions(), 16);
    assert_eq!(model.vector("sword").map(<[f64]>::len), Some(16));
    assert!(model.contains("beloved"));
    assert!(!model.contains("dragon"));
}

#[test]
fn zero_dimensions_is_invalid_argument() {
    let err = trainer().train(&corpus(), 0).unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidArgument(_)));
}

#[test]
fn empty_corpus_trains_nothing() {
    let empty: Vec<String> = Vec::new();
    assert!(trainer().train(&empty, 8).unwrap().is_none());
    assert!(trainer().train(&["", "  ", "?!"], 8).unwrap().is_none());
}

#[test]
fn vectors_are_finite() {
    let model = trainer().train(&corpus(), 8).unwrap().unwrap();
    for word in ["knight", "sword", "heart", "kiss", "the"] {
        let v = model.vector(word).unwrap();
        assert!(v.iter().all(|x| x.is_finite()), "{word} has non-finite entries");
    }
}

#[test]
fn training_is_deterministic() {
    let a = trainer().train(&corpus(), 8).unwrap().unwrap();
    let b = trainer().train(&corpus(), 8).unwrap().unwrap();
    assert_eq!(a.vector("battle"), b.vector("battle"));
}

#[test]
fn cooccurring_words_are_closer() {
    let model = trainer().train(&corpus(), 24).unwrap().unwrap();
    let related = model.similarity("sword", "battle").unwrap();
    let unrelated = model.similarity("sword", "beloved").unwrap();
    assert!(related > unrelated, "related {related} vs unrelated {unrelated}");
}

// ============================================================
// predict_plot_development
// ============================================================

#[test]
fn prediction_scores_in_unit_range() {
    let model = trainer().train(&corpus(), 16).unwrap().unwrap();
    let chapters = ["the knight drew his sword", "the battle began", "the battle raged on"];
    let predictions = predict_plot_development(&model, &chapters);
    assert!(!predictions.is_empty());
    for (label, score) in &predictions {
        assert!((0.0..=1.0).contains(score), "{label} scored {score}");
    }
}

#[test]
fn concepts_skip_stop_words() {
    let model = trainer().train(&corpus(), 16).unwrap().unwrap();
    let predictions = predict_plot_development(&model, &["the knight and the sword"]);
    assert!(!predictions.contains_key("concept:the"));
    assert!(!predictions.contains_key("concept:and"));
}

#[test]
fn unknown_vocabulary_predicts_nothing() {
    let model = trainer().train(&corpus(), 8).unwrap().unwrap();
    assert!(predict_plot_development(&model, &["zeppelins over mars"]).is_empty());
    let none: [&str; 0] = [];
    assert!(predict_plot_development(&model, &none).is_empty());
}

// ============================================================
// Engine state and persistence
// ============================================================

#[test]
fn untrained_engine_predicts_empty() {
    let engine = NovelEngine::new(Config::default()).unwrap();
    let predictions = engine.predict_plot_development(&["the battle began".to_string()]);
    assert!(predictions.is_empty());
}

#[test]
fn training_transitions_to_trained() {
    let engine = NovelEngine::new(Config::default()).unwrap();
    assert!(engine.train_word_vector_model(&corpus(), 8).unwrap());
    assert!(engine.is_trained());
    assert!(!engine
        .predict_plot_development(&["the knight fought".to_string()])
        .is_empty());
}

#[test]
fn retraining_swaps_the_model() {
    let engine = NovelEngine::new(Config::default()).unwrap();
    engine.train_word_vector_model(&corpus(), 8).unwrap();
    let before = engine.model().unwrap();

    engine
        .train_word_vector_model(&["dragons breathe fire".to_string()], 4)
        .unwrap();
    let after = engine.model().unwrap();

    // Old handle is still intact for anyone holding it
    assert_eq!(before.dimensions(), 8);
    assert_eq!(after.dimensions(), 4);
    assert!(after.contains("dragons") && !after.contains("knight"));
}

#[test]
fn save_and_load_round_trip_through_engine() {
    let dir = std::env::temp_dir().join("novelscope-test-models");
    let path = dir.join("word_vectors.json");

    let trained = NovelEngine::new(Config::default()).unwrap();
    trained.train_word_vector_model(&corpus(), 8).unwrap();
    trained.save_model(&path).unwrap();

    let fresh = NovelEngine::new(Config::default()).unwrap();
    assert!(!fresh.is_trained());
    fresh.load_model(&path).unwrap();
    assert!(fresh.is_trained());

    let chapters = vec!["the knight drew his sword".to_string()];
    assert_eq!(
        trained.predict_plot_development(&chapters),
        fresh.predict_plot_development(&chapters)
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn loading_garbage_is_model_io() {
    let path = std::env::temp_dir().join("novelscope-test-garbage.json");
    std::fs::write(&path, "{ not a model").unwrap();
    assert!(matches!(load_model(&path), Err(AnalyticsError::ModelIo(_))));
    let _ = std::fs::remove_file(&path);
}

fn write_model_file(name: &str, body: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn loading_misaligned_arrays_is_model_io() {
    let path = write_model_file(
        "novelscope-test-misaligned.json",
        r#"{"dimensions":2,"words":["battle","sword"],"counts":[3,2],
            "vectors":[[1.0,0.0]],"trained_at":"2026-01-01T00:00:00Z"}"#,
    );

    let engine = NovelEngine::new(Config::default()).unwrap();
    let err = engine.load_model(&path).unwrap_err();
    assert!(matches!(err, AnalyticsError::ModelIo(_)), "got {err}");
    assert!(!engine.is_trained());
    assert!(engine
        .predict_plot_development(&["the sword fell".to_string()])
        .is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn loading_wrong_vector_width_is_model_io() {
    let path = write_model_file(
        "novelscope-test-width.json",
        r#"{"dimensions":3,"words":["battle","sword"],"counts":[3,2],
            "vectors":[[1.0,0.0,0.5],[0.2,0.1]],"trained_at":"2026-01-01T00:00:00Z"}"#,
    );
    assert!(matches!(load_model(&path), Err(AnalyticsError::ModelIo(_))));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn well_formed_handwritten_model_loads() {
    let path = write_model_file(
        "novelscope-test-handwritten.json",
        r#"{"dimensions":2,"words":["battle","sword"],"counts":[3,2],
            "vectors":[[1.0,0.0],[0.9,0.1]],"trained_at":"2026-01-01T00:00:00Z"}"#,
    );
    let model = load_model(&path).unwrap();
    assert_eq!(model.vector("sword"), Some(&[0.9, 0.1][..]));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn store_round_trip_keeps_lookup() {
    let path = std::env::temp_dir().join("novelscope-test-store.json");
    let model = trainer().train(&corpus(), 8).unwrap().unwrap();
    save_model(&model, &path).unwrap();
    let loaded = load_model(&path).unwrap();
    assert_eq!(loaded.vector("kiss"), model.vector("kiss"));
    let _ = std::fs::remove_file(&path);
}

// ============================================================
// Background training
// ============================================================

#[tokio::test]
async fn background_training_installs_model() {
    let engine = Arc::new(NovelEngine::new(Config::default()).unwrap());
    let trained = Arc::clone(&engine)
        .train_word_vectors_in_background(corpus(), 8)
        .await
        .unwrap();
    assert!(trained);
    assert!(engine.is_trained());
}

#[tokio::test]
async fn background_training_reports_bad_dimensions() {
    let engine = Arc::new(NovelEngine::new(Config::default()).unwrap());
    let result = Arc::clone(&engine)
        .train_word_vectors_in_background(corpus(), 0)
        .await;
    assert!(matches!(result, Err(AnalyticsError::InvalidArgument(_))));
    assert!(!engine.is_trained());
}
