use crate::classification::{ClassifierConfig, ThresholdError, ThresholdPolicy};
use crate::core::BASE_FEATURE_COUNT;
use crate::model::LinearModelConfig;
use crate::validation::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// System-wide configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SystemConfig {
    /// Measurement validation settings
    pub validation: ValidationConfig,
    /// Band thresholds and model call bound
    pub classification: ClassifierConfig,
    /// Maximum number of history entries kept per session (unbounded when absent)
    pub history_limit: Option<usize>,
    /// Coefficients of the linear reference model used by the command line tool
    pub reference_model: Option<LinearModelConfig>,
}

impl SystemConfig {
    /// Number of features the model receives under this configuration
    pub fn feature_count(&self) -> usize {
        if self.validation.include_volume {
            BASE_FEATURE_COUNT + 1
        } else {
            BASE_FEATURE_COUNT
        }
    }

    /// Collect errors and warnings for this configuration
    pub fn check(&self) -> ConfigCheck {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let tolerance = self.validation.sum_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "validation.sum_tolerance".to_string(),
                value: tolerance.to_string(),
                reason: "tolerance must be a finite, non-negative number".to_string(),
            });
        } else if tolerance > 5.0 {
            warnings.push(format!(
                "motility sum tolerance of {} points hides most entry mistakes",
                tolerance
            ));
        }

        match self.classification.model_timeout_ms {
            Some(0) => errors.push(ConfigError::InvalidParameter {
                parameter: "classification.model_timeout_ms".to_string(),
                value: "0".to_string(),
                reason: "timeout must be positive".to_string(),
            }),
            Some(timeout) if timeout < 10 => {
                warnings.push(format!("model timeout of {} ms is likely too short", timeout))
            }
            _ => {}
        }

        let thresholds = self.classification.thresholds;
        if thresholds.lower() < 0.0 || thresholds.upper() > 100.0 {
            warnings.push(format!(
                "band thresholds [{}, {}] extend outside 0-100%",
                thresholds.lower(),
                thresholds.upper()
            ));
        }

        if self.history_limit == Some(0) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "history_limit".to_string(),
                value: "0".to_string(),
                reason: "history limit must allow at least one entry".to_string(),
            });
        }

        if let Some(model) = &self.reference_model {
            let expected = self.feature_count();
            if model.weights.len() != expected {
                errors.push(ConfigError::InvalidParameter {
                    parameter: "reference_model.weights".to_string(),
                    value: model.weights.len().to_string(),
                    reason: format!("expected {} weights for the configured features", expected),
                });
            }
            if model.weights.iter().any(|w| !w.is_finite()) || !model.intercept.is_finite() {
                errors.push(ConfigError::InvalidParameter {
                    parameter: "reference_model".to_string(),
                    value: format!("{:?}", model.weights),
                    reason: "coefficients must be finite".to_string(),
                });
            }
        }

        ConfigCheck {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration file I/O error
    #[error("I/O error: {message}")]
    IoError { message: String },
    /// JSON serialization/deserialization error
    #[error("serialization error: {message}")]
    SerializationError { message: String },
    /// Band cutoffs rejected by the classifier
    #[error("invalid thresholds: {0}")]
    Thresholds(#[from] ThresholdError),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Outcome of checking a configuration
#[derive(Debug, Default)]
pub struct ConfigCheck {
    /// Whether configuration is valid
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl ConfigCheck {
    /// First error, if any
    pub fn into_result(self) -> ConfigResult<()> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Main configuration manager
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    system_config: SystemConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn get_system_config(&self) -> &SystemConfig {
        &self.system_config
    }

    /// Replace the whole configuration if it validates
    pub fn update_system_config(&mut self, config: SystemConfig) -> ConfigResult<()> {
        config.check().into_result()?;
        self.system_config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> ConfigResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("failed to read config file '{}': {}", path_str, e),
        })?;

        let config: SystemConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("failed to parse config file '{}': {}", path_str, e),
            })?;

        let check = config.check();
        for warning in &check.warnings {
            warn!(path = %path_str, "{}", warning);
        }
        check.into_result()?;

        self.system_config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        info!(path = ?self.config_file_path, "configuration loaded");
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> ConfigResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.system_config).map_err(|e| {
            ConfigError::SerializationError {
                message: format!("failed to serialize config: {}", e),
            }
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> ConfigResult<()> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::IoError {
                message: "no file path set for saving configuration".to_string(),
            }),
        }
    }

    /// Check if configuration has been modified since last load or save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Replace the band thresholds, returning the previous policy
    pub fn set_thresholds(&mut self, lower: f64, upper: f64) -> ConfigResult<ThresholdPolicy> {
        let policy = ThresholdPolicy::new(lower, upper)?;
        let old_value = std::mem::replace(&mut self.system_config.classification.thresholds, policy);
        self.is_modified = true;
        Ok(old_value)
    }

    pub fn get_thresholds(&self) -> ThresholdPolicy {
        self.system_config.classification.thresholds
    }

    /// Update the motility sum tolerance, returning the previous value
    pub fn set_sum_tolerance(&mut self, tolerance: f64) -> ConfigResult<f64> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "sum_tolerance".to_string(),
                value: tolerance.to_string(),
                reason: "tolerance must be a finite, non-negative number".to_string(),
            });
        }

        let old_value = std::mem::replace(&mut self.system_config.validation.sum_tolerance, tolerance);
        self.is_modified = true;
        Ok(old_value)
    }

    pub fn get_sum_tolerance(&self) -> f64 {
        self.system_config.validation.sum_tolerance
    }

    /// Update the model call bound; `None` removes it
    pub fn set_model_timeout(&mut self, timeout_ms: Option<u64>) -> ConfigResult<Option<u64>> {
        if timeout_ms == Some(0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "model_timeout_ms".to_string(),
                value: "0".to_string(),
                reason: "timeout must be positive".to_string(),
            });
        }

        let old_value = std::mem::replace(
            &mut self.system_config.classification.model_timeout_ms,
            timeout_ms,
        );
        self.is_modified = true;
        Ok(old_value)
    }

    pub fn get_model_timeout(&self) -> Option<u64> {
        self.system_config.classification.model_timeout_ms
    }

    /// Check a configuration without applying it
    pub fn validate_system_config(&self, config: &SystemConfig) -> ConfigCheck {
        config.check()
    }
}
