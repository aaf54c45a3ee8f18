//! Model invocation error types

use thiserror::Error;

/// Failures reported by a prediction model collaborator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Model not loaded or otherwise not callable
    #[error("model unavailable: {reason}")]
    Unavailable { reason: String },
    /// Feature vector length does not match what the model was trained on
    #[error("feature vector has {actual} values, model expects {expected}")]
    FeatureCount { expected: usize, actual: usize },
    /// Model produced NaN or an infinity
    #[error("model returned a non-finite value: {value}")]
    NonFiniteOutput { value: f64 },
    /// No answer within the configured bound
    #[error("model invocation timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    /// Any other failure inside the model
    #[error("model failed: {reason}")]
    Failed { reason: String },
}

impl ModelError {
    /// Whether repeating the same call could succeed.
    ///
    /// The classifier never retries; hosts whose model is idempotent may.
    pub fn is_transient(&self) -> bool {
        matches!(self, ModelError::Unavailable { .. } | ModelError::Timeout { .. })
    }
}

/// Result type for model calls
pub type ModelResult<T> = Result<T, ModelError>;
