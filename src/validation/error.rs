//! Input validation errors

use crate::core::Field;
use thiserror::Error;

/// Reasons a raw measurement set is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required field absent from the input
    #[error("missing required field: {field}")]
    MissingField { field: Field },
    /// Value outside the field's domain, including NaN and infinities
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: Field,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl ValidationError {
    /// Field the error refers to
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingField { field } => *field,
            ValidationError::OutOfRange { field, .. } => *field,
        }
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
