//! Linear reference model
//!
//! A weighted sum over the feature vector. Used by the command line tool and
//! in tests where a deterministic, inspectable collaborator is needed.

use crate::model::{ModelError, ModelResult, PredictionModel};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Coefficients for a `LinearModel`, in feature order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModelConfig {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// `score = weights · features + intercept`
#[derive(Debug, Clone)]
pub struct LinearModel {
    weights: DVector<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(weights: Vec<f64>, intercept: f64) -> ModelResult<Self> {
        if weights.is_empty() {
            return Err(ModelError::Unavailable {
                reason: "linear model has no weights".to_string(),
            });
        }
        if let Some(bad) = weights.iter().chain(std::iter::once(&intercept)).find(|w| !w.is_finite()) {
            return Err(ModelError::Unavailable {
                reason: format!("linear model coefficient {} is not finite", bad),
            });
        }

        Ok(Self {
            weights: DVector::from_vec(weights),
            intercept,
        })
    }

    pub fn from_config(config: &LinearModelConfig) -> ModelResult<Self> {
        Self::new(config.weights.clone(), config.intercept)
    }

    pub fn weights(&self) -> &[f64] {
        self.weights.as_slice()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl PredictionModel for LinearModel {
    fn predict(&self, features: &[f64]) -> ModelResult<f64> {
        if features.len() != self.weights.len() {
            return Err(ModelError::FeatureCount {
                expected: self.weights.len(),
                actual: features.len(),
            });
        }

        let input = DVector::from_column_slice(features);
        Ok(self.weights.dot(&input) + self.intercept)
    }

    fn expected_features(&self) -> Option<usize> {
        Some(self.weights.len())
    }

    fn name(&self) -> &str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_sum() {
        let model = LinearModel::new(vec![0.1, 0.2, 0.0, -0.05, -0.5], 20.0).unwrap();
        let score = model.predict(&[50.0, 40.0, 10.0, 50.0, 14.0]).unwrap();
        // 5 + 8 + 0 - 2.5 - 7 + 20
        assert!((score - 23.5).abs() < 1e-9);
        assert_eq!(model.expected_features(), Some(5));
    }

    #[test]
    fn test_wrong_feature_count() {
        let model = LinearModel::new(vec![1.0; 5], 0.0).unwrap();
        let err = model.predict(&[1.0; 6]).unwrap_err();
        assert_eq!(err, ModelError::FeatureCount { expected: 5, actual: 6 });
    }

    #[test]
    fn test_rejects_bad_coefficients() {
        assert!(LinearModel::new(Vec::new(), 0.0).is_err());
        assert!(LinearModel::new(vec![1.0, f64::NAN], 0.0).is_err());
        assert!(LinearModel::new(vec![1.0], f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_config() {
        let config = LinearModelConfig {
            weights: vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            intercept: 2.0,
        };
        let model = LinearModel::from_config(&config).unwrap();
        assert_eq!(model.predict(&[0.0, 0.0, 0.0, 0.0, 0.0, 3.0]).unwrap(), 5.0);
        assert_eq!(model.weights().len(), 6);
        assert_eq!(model.intercept(), 2.0);
    }
}
