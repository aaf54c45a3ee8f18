//! DFI Prediction Core
//!
//! Validates semen-analysis measurements, hands them to a pre-trained
//! regression model in its training feature order, and interprets the
//! predicted DNA Fragmentation Index as a Low / Moderate / High band with
//! clinical advisories.
//!
//! The model is an external collaborator behind [`PredictionModel`]; this
//! crate never trains or persists one.

pub mod core;
pub mod validation;
pub mod model;
pub mod classification;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{Advisory, FeatureVector, Field, MeasurementSet, RawMeasurements, FEATURE_ORDER};
pub use validation::{InputValidator, ValidatedInput, ValidationConfig, ValidationError, ValidationResult};
pub use model::{LinearModel, LinearModelConfig, MockModel, ModelError, ModelResult, PredictionModel, TimedModel};
pub use classification::{
    Band, ClassifierConfig, ClassifyResult, PredictionClassifier, PredictionError, PredictionResult,
    ThresholdError, ThresholdPolicy,
};
pub use utils::{ConfigError, ConfigResult, ConfigurationManager, SystemConfig};
pub use api::{
    ApiError, ApiResult, CsvFormatter, FormattedPrediction, JsonFormatter, OutputFormat, PredictionHistory,
    PredictionHistoryEntry, PredictionSession, ResultFormatter, SessionState, TextFormatter,
};
