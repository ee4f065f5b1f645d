use thiserror::Error;

/// Domain-level errors shared across application components.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The normalization file was missing, malformed, or incomplete.
    #[error("configuration error: {0}")]
    Config(String),

    /// The model artifact could not be opened by the inference runtime.
    #[error("model load error: {0}")]
    ModelLoad(String),

    /// The caller supplied a feature vector of the wrong length.
    #[error("dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The engine failed while evaluating the model.
    #[error("inference error: {0}")]
    Inference(String),

    /// The incoming payload could not be parsed into feature values.
    #[error("validation error: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
