//! Measurement validation ahead of inference

pub mod error;
pub mod input;

pub use error::{ValidationError, ValidationResult};
pub use input::{InputValidator, ValidatedInput, ValidationConfig};
