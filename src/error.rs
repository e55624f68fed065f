use thiserror::Error;

use crate::models::ObservationSlot;

/// Errors that can occur while loading models or forecasting growth.
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A model artifact or the store manifest could not be loaded.
    #[error("Load error ({artifact}): {reason}")]
    Load { artifact: String, reason: String },

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Missing observation: {0}")]
    MissingObservation(ObservationSlot),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A model and its declared feature/output shape disagree.
    #[error("Dimension mismatch for {model}: expected {expected} {what}, got {actual}")]
    DimensionMismatch {
        model: String,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid curve input: {0}")]
    InvalidCurveInput(String),
}

impl ForecastError {
    pub(crate) fn load(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        ForecastError::Load {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }
}
