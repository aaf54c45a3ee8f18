//! Model invocation and interpretation of the predicted DFI

pub mod band;
pub mod classifier;
pub mod error;

pub use band::{Band, ThresholdPolicy};
pub use classifier::{ClassifierConfig, PredictionClassifier, PredictionResult};
pub use error::{ClassifyResult, PredictionError, ThresholdError};
