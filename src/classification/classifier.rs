use crate::classification::band::{Band, ThresholdPolicy};
use crate::classification::error::{ClassifyResult, PredictionError};
use crate::core::{
    Advisory, FeatureVector, Field, CONCENTRATION_REFERENCE_MIN, MORPHOLOGY_CRITICAL_MIN,
};
use crate::model::{ModelError, PredictionModel};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Band cutoffs `[lower, upper]`
    pub thresholds: ThresholdPolicy,
    /// Upper bound on a single model call (milliseconds), unbounded when absent
    pub model_timeout_ms: Option<u64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdPolicy::STANDARD,
            model_timeout_ms: None,
        }
    }
}

/// Outcome of one successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Raw model output (DFI %)
    pub score_value: f64,
    pub band: Band,
    /// Sum mismatch first, then concentration, then morphology
    pub advisories: Vec<Advisory>,
}

/// Invokes the model and interprets its output
#[derive(Debug, Clone, Default)]
pub struct PredictionClassifier {
    policy: ThresholdPolicy,
}

impl PredictionClassifier {
    pub fn new(policy: ThresholdPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: ThresholdPolicy) {
        self.policy = policy;
    }

    /// Run one prediction.
    ///
    /// The model is called at most once. `pending` is the advisory raised by
    /// the validator and leads the advisory list.
    pub fn predict(
        &self,
        features: &FeatureVector,
        pending: Option<Advisory>,
        model: &dyn PredictionModel,
    ) -> ClassifyResult<PredictionResult> {
        if let Some(expected) = model.expected_features() {
            if expected != features.len() {
                warn!(model = model.name(), expected, actual = features.len(), "feature count mismatch");
                return Err(PredictionError::ModelInvocation {
                    cause: ModelError::FeatureCount {
                        expected,
                        actual: features.len(),
                    },
                });
            }
        }

        let started = Instant::now();
        let score = model.predict(features.as_slice()).map_err(|cause| {
            warn!(model = model.name(), error = %cause, "model invocation failed");
            PredictionError::ModelInvocation { cause }
        })?;
        debug!(
            model = model.name(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "model invocation finished"
        );

        if !score.is_finite() {
            warn!(model = model.name(), score, "model returned a non-finite score");
            return Err(PredictionError::ModelInvocation {
                cause: ModelError::NonFiniteOutput { value: score },
            });
        }

        let result = self.classify_score(score, features, pending);
        info!(
            score = result.score_value,
            band = result.band.as_str(),
            advisories = result.advisories.len(),
            "prediction classified"
        );
        Ok(result)
    }

    /// Band and advisories for an already computed score
    pub fn classify_score(
        &self,
        score: f64,
        features: &FeatureVector,
        pending: Option<Advisory>,
    ) -> PredictionResult {
        PredictionResult {
            score_value: score,
            band: self.policy.classify(score),
            advisories: Self::advisories(features, pending),
        }
    }

    fn advisories(features: &FeatureVector, pending: Option<Advisory>) -> Vec<Advisory> {
        let mut advisories: Vec<Advisory> = pending.into_iter().collect();

        if let Some(value) = features
            .get(Field::Concentration)
            .filter(|value| *value < CONCENTRATION_REFERENCE_MIN)
        {
            advisories.push(Advisory::LowConcentration { value });
        }

        if let Some(value) = features
            .get(Field::NormalMorphology)
            .filter(|value| *value < MORPHOLOGY_CRITICAL_MIN)
        {
            advisories.push(Advisory::LowMorphology { value });
        }

        advisories
    }
}
