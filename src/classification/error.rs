use crate::model::ModelError;
use thiserror::Error;

/// Prediction failures after successful validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    /// The model collaborator failed, timed out or returned garbage
    #[error("model invocation failed: {cause}")]
    ModelInvocation { cause: ModelError },
}

impl From<ModelError> for PredictionError {
    fn from(cause: ModelError) -> Self {
        PredictionError::ModelInvocation { cause }
    }
}

pub type ClassifyResult<T> = Result<T, PredictionError>;

/// Rejected band cutoffs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("thresholds [{lower}, {upper}] must be finite")]
    NonFinite { lower: f64, upper: f64 },
    #[error("lower threshold {lower} must be strictly below upper threshold {upper}")]
    Unordered { lower: f64, upper: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ThresholdError::Unordered { lower: 25.0, upper: 15.0 };
        assert_eq!(
            err.to_string(),
            "lower threshold 25 must be strictly below upper threshold 15"
        );

        let err: PredictionError = ModelError::Timeout { timeout_ms: 50 }.into();
        assert_eq!(
            err.to_string(),
            "model invocation failed: model invocation timed out after 50 ms"
        );
    }
}
