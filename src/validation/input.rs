use crate::core::{
    Advisory, FeatureVector, Field, MeasurementSet, RawMeasurements, DEFAULT_SUM_TOLERANCE,
    MOTILITY_TOTAL_PERCENT,
};
use crate::validation::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Configuration for measurement validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Allowed deviation of the motility sum from 100% before an advisory is raised
    pub sum_tolerance: f64,
    /// Require a volume measurement and feed it to the model as a sixth feature
    pub include_volume: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            sum_tolerance: DEFAULT_SUM_TOLERANCE,
            include_volume: false,
        }
    }
}

/// Validated measurements plus the advisory raised during validation, if any
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub measurements: MeasurementSet,
    /// Motility sum mismatch, carried into the prediction result
    pub advisory: Option<Advisory>,
}

/// Validator for raw measurement input
#[derive(Debug, Clone, Default)]
pub struct InputValidator {
    config: ValidationConfig,
}

impl InputValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with custom configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn update_config(&mut self, config: ValidationConfig) {
        self.config = config;
    }

    /// Validate raw fields in declaration order and return the first failure.
    ///
    /// A motility sum outside tolerance never fails validation; it is returned
    /// as an advisory instead.
    pub fn validate(&self, raw: &RawMeasurements) -> ValidationResult<ValidatedInput> {
        for name in raw.names() {
            match Field::from_name(name) {
                None => warn!(field = name, "ignoring unknown measurement field"),
                Some(Field::Volume) if !self.config.include_volume => {
                    debug!("volume supplied but not enabled, ignoring")
                }
                Some(_) => {}
            }
        }

        let mut values = [0.0; 5];
        for (slot, field) in values.iter_mut().zip(Field::REQUIRED) {
            *slot = Self::checked_value(raw, field)?;
        }

        let volume = if self.config.include_volume {
            Some(Self::checked_value(raw, Field::Volume)?)
        } else {
            None
        };

        let measurements = MeasurementSet::from_validated(values, volume);
        let advisory = self.check_motility_sum(&measurements);

        Ok(ValidatedInput {
            measurements,
            advisory,
        })
    }

    /// Reorder validated measurements into the model's feature order
    pub fn to_feature_vector(&self, measurements: &MeasurementSet) -> FeatureVector {
        FeatureVector::from_measurements(measurements)
    }

    fn checked_value(raw: &RawMeasurements, field: Field) -> ValidationResult<f64> {
        let value = raw
            .get(field)
            .ok_or(ValidationError::MissingField { field })?;

        let range = field.range();
        if !range.contains(value) {
            debug!(%field, value, "measurement out of range");
            return Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.min,
                max: range.max,
            });
        }

        Ok(value)
    }

    fn check_motility_sum(&self, measurements: &MeasurementSet) -> Option<Advisory> {
        let sum = measurements.motility_sum();
        if (sum - MOTILITY_TOTAL_PERCENT).abs() > self.config.sum_tolerance {
            warn!(sum, tolerance = self.config.sum_tolerance, "motility fractions do not sum to 100%");
            Some(Advisory::MotilitySumMismatch {
                sum,
                tolerance: self.config.sum_tolerance,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_reference_input() {
        let validator = InputValidator::new();
        let validated = validator.validate(&RawMeasurements::reference()).unwrap();

        assert_eq!(validated.measurements.progressive_motility(), 50.0);
        assert_eq!(validated.measurements.concentration(), 50.0);
        assert_eq!(validated.measurements.volume(), None);
        assert!(validated.advisory.is_none());
    }

    #[test]
    fn test_missing_field() {
        let validator = InputValidator::new();
        let mut raw = RawMeasurements::reference();
        raw.remove(Field::ImmotileSperm);

        let err = validator.validate(&raw).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: Field::ImmotileSperm });
    }

    #[test]
    fn test_concentration_out_of_range() {
        let validator = InputValidator::new();
        let raw = RawMeasurements::reference().with(Field::Concentration, 350.0);

        let err = validator.validate(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: Field::Concentration,
                value: 350.0,
                min: 0.0,
                max: 300.0,
            }
        );
    }

    #[test]
    fn test_negative_and_nan_values_rejected() {
        let validator = InputValidator::new();

        let raw = RawMeasurements::reference().with(Field::NormalMorphology, -1.0);
        assert_eq!(validator.validate(&raw).unwrap_err().field(), Field::NormalMorphology);

        let raw = RawMeasurements::reference().with(Field::ProgressiveMotility, f64::NAN);
        match validator.validate(&raw).unwrap_err() {
            ValidationError::OutOfRange { field, value, .. } => {
                assert_eq!(field, Field::ProgressiveMotility);
                assert!(value.is_nan());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_first_failing_field_in_declaration_order() {
        let validator = InputValidator::new();
        let raw = RawMeasurements::new()
            .with(Field::ProgressiveMotility, 150.0)
            .with(Field::Concentration, 400.0);

        let err = validator.validate(&raw).unwrap_err();
        assert_eq!(err.field(), Field::ProgressiveMotility);
    }

    #[test]
    fn test_range_boundaries_accepted() {
        let validator = InputValidator::new();
        let raw = RawMeasurements::new()
            .with(Field::ProgressiveMotility, 100.0)
            .with(Field::NonProgressiveMotility, 0.0)
            .with(Field::ImmotileSperm, 0.0)
            .with(Field::Concentration, 300.0)
            .with(Field::NormalMorphology, 0.0);

        assert!(validator.validate(&raw).is_ok());
    }

    #[test]
    fn test_sum_mismatch_is_advisory() {
        let validator = InputValidator::new();
        let raw = RawMeasurements::reference().with(Field::ImmotileSperm, 30.0);

        let validated = validator.validate(&raw).unwrap();
        assert_eq!(
            validated.advisory,
            Some(Advisory::MotilitySumMismatch { sum: 90.0, tolerance: 0.05 })
        );
    }

    #[test]
    fn test_sum_within_tolerance() {
        let validator = InputValidator::new();
        let raw = RawMeasurements::new()
            .with(Field::ProgressiveMotility, 33.3)
            .with(Field::NonProgressiveMotility, 33.3)
            .with(Field::ImmotileSperm, 33.4)
            .with(Field::Concentration, 40.0)
            .with(Field::NormalMorphology, 6.0);

        assert!(validator.validate(&raw).unwrap().advisory.is_none());

        let raw = raw.with(Field::ImmotileSperm, 33.5);
        assert!(validator.validate(&raw).unwrap().advisory.is_some());
    }

    #[test]
    fn test_volume_required_when_enabled() {
        let validator = InputValidator::with_config(ValidationConfig {
            include_volume: true,
            ..ValidationConfig::default()
        });

        let err = validator.validate(&RawMeasurements::reference()).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: Field::Volume });

        let raw = RawMeasurements::reference().with(Field::Volume, 12.0);
        assert_eq!(validator.validate(&raw).unwrap_err().field(), Field::Volume);

        let raw = RawMeasurements::reference().with(Field::Volume, 2.5);
        let validated = validator.validate(&raw).unwrap();
        assert_eq!(validated.measurements.volume(), Some(2.5));
        assert_eq!(validator.to_feature_vector(&validated.measurements).len(), 6);
    }

    #[test]
    fn test_volume_ignored_when_disabled() {
        let validator = InputValidator::new();
        let raw = RawMeasurements::reference().with(Field::Volume, 99.0);

        let validated = validator.validate(&raw).unwrap();
        assert_eq!(validated.measurements.volume(), None);
        assert_eq!(validator.to_feature_vector(&validated.measurements).len(), 5);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let validator = InputValidator::new();
        let mut raw = RawMeasurements::reference();
        raw.insert("ph", 7.4);

        assert!(validator.validate(&raw).is_ok());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let validator = InputValidator::new();
        let raw = RawMeasurements::reference().with(Field::ImmotileSperm, 25.0);

        assert_eq!(validator.validate(&raw), validator.validate(&raw));
    }
}
