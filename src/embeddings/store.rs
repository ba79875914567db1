// Persistence for trained word vectors.
//
// A model is one JSON file in a platform-appropriate directory
// (~/.local/share/novelscope/models/ on Linux) so the CLI can train once and
// predict in later runs. Nothing in the engine needs a file to work.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::model::WordVectorModel;
use crate::error::{AnalyticsError, Result};

const MODEL_FILE: &str = "word_vectors.json";

/// Returns the default directory for storing trained models.
/// Uses the platform data directory: ~/.local/share/novelscope/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("novelscope")
        .join("models")
}

/// Path of the model file inside `dir`.
pub fn model_path(dir: &Path) -> PathBuf {
    dir.join(MODEL_FILE)
}

pub fn model_file_present(dir: &Path) -> bool {
    model_path(dir).exists()
}

/// Write `model` as JSON to `path`, creating parent directories as needed.
pub fn save_model(model: &WordVectorModel, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AnalyticsError::ModelIo(format!(
                "failed to create model directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let json = serde_json::to_string(model)
        .map_err(|e| AnalyticsError::ModelIo(format!("failed to serialize model: {e}")))?;
    fs::write(path, json).map_err(|e| {
        AnalyticsError::ModelIo(format!("failed to write {}: {e}", path.display()))
    })?;

    info!(
        path = %path.display(),
        vocabulary = model.vocabulary_size(),
        dimensions = model.dimensions(),
        "Saved word-vector model"
    );
    Ok(())
}

/// Read a model written by [`save_model`]. Files whose arrays disagree in
/// length or dimensionality are rejected with `ModelIo`.
pub fn load_model(path: &Path) -> Result<WordVectorModel> {
    let json = fs::read_to_string(path).map_err(|e| {
        AnalyticsError::ModelIo(format!("failed to read {}: {e}", path.display()))
    })?;
    let mut model: WordVectorModel = serde_json::from_str(&json).map_err(|e| {
        AnalyticsError::ModelIo(format!("{} is not a valid model file: {e}", path.display()))
    })?;
    model.rebuild_index();
    model.check_consistency().map_err(|reason| {
        AnalyticsError::ModelIo(format!("{} is not a usable model: {reason}", path.display()))
    })?;

    info!(
        path = %path.display(),
        vocabulary = model.vocabulary_size(),
        trained_at = %model.trained_at(),
        "Loaded word-vector model"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir_is_under_novelscope() {
        let dir = default_model_dir();
        assert!(dir.ends_with("novelscope/models"), "got {}", dir.display());
    }

    #[test]
    fn test_model_path_file_name() {
        let path = model_path(Path::new("/tmp/models"));
        assert_eq!(path, PathBuf::from("/tmp/models/word_vectors.json"));
    }

    #[test]
    fn test_load_missing_file_is_model_io() {
        let err = load_model(Path::new("/nonexistent/novelscope/word_vectors.json")).unwrap_err();
        assert!(matches!(err, AnalyticsError::ModelIo(_)));
    }
}
