//! Prediction model abstraction
//!
//! The trained regression model is owned by the host application and handed
//! to the core as a `PredictionModel`. The core only ever calls `predict`.

pub mod error;
pub mod linear;
pub mod mock;
pub mod timeout;

pub use error::{ModelError, ModelResult};
pub use linear::{LinearModel, LinearModelConfig};
pub use mock::MockModel;
pub use timeout::TimedModel;

/// Capability of a trained regression model
pub trait PredictionModel: Send + Sync {
    /// Predict the DFI percentage for one feature vector
    fn predict(&self, features: &[f64]) -> ModelResult<f64>;

    /// Number of features the model was trained on, if known
    fn expected_features(&self) -> Option<usize> {
        None
    }

    /// Name used in logs
    fn name(&self) -> &str {
        "model"
    }
}

impl<F> PredictionModel for F
where
    F: Fn(&[f64]) -> ModelResult<f64> + Send + Sync,
{
    fn predict(&self, features: &[f64]) -> ModelResult<f64> {
        self(features)
    }
}
