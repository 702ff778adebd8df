use std::path::PathBuf;

use thiserror::Error;

use crate::city::City;

/// Failures of a single prediction submission.
///
/// None of these are fatal to the process; the presentation layer reports them
/// inline and waits for the next submission.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// No artifact on disk. The loader recovers from this with a stub model,
    /// so callers only see it when asking for a trained model explicitly.
    #[error("Model file not found: {}", .path.display())]
    ArtifactMissing { path: PathBuf },

    /// The artifact exists but neither the JSON nor the legacy TOML format
    /// could be read from it.
    #[error("Error loading model {}: {reason}", .path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    #[error("Error making prediction: {reason}")]
    PredictionFailure { reason: String },

    #[error("{city} prediction needs at least {expected} values, got {actual}")]
    ShapeMismatch {
        city: City,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to read model file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ForecastError {
    pub fn prediction(reason: impl Into<String>) -> Self {
        Self::PredictionFailure { reason: reason.into() }
    }
}
