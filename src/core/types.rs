//! Core data types for DFI prediction

use crate::core::constants::MOTILITY_TOTAL_PERCENT;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Measured semen-analysis parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Progressive motility (%)
    ProgressiveMotility,
    /// Non-progressive motility (%)
    NonProgressiveMotility,
    /// Immotile sperm (%)
    ImmotileSperm,
    /// Concentration (million/mL)
    Concentration,
    /// Normal morphology (%)
    NormalMorphology,
    /// Ejaculate volume (mL), only used when enabled in configuration
    Volume,
}

impl Field {
    /// Required fields in declaration order
    pub const REQUIRED: [Field; 5] = [
        Field::ProgressiveMotility,
        Field::NonProgressiveMotility,
        Field::ImmotileSperm,
        Field::Concentration,
        Field::NormalMorphology,
    ];

    pub const ALL: [Field; 6] = [
        Field::ProgressiveMotility,
        Field::NonProgressiveMotility,
        Field::ImmotileSperm,
        Field::Concentration,
        Field::NormalMorphology,
        Field::Volume,
    ];

    /// Wire name used in raw input maps and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ProgressiveMotility => "progressive_motility",
            Field::NonProgressiveMotility => "non_progressive_motility",
            Field::ImmotileSperm => "immotile_sperm",
            Field::Concentration => "concentration",
            Field::NormalMorphology => "normal_morphology",
            Field::Volume => "volume",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|field| field.as_str() == name)
    }

    /// Accepted value range for this field
    pub fn range(&self) -> FieldRange {
        match self {
            Field::ProgressiveMotility
            | Field::NonProgressiveMotility
            | Field::ImmotileSperm
            | Field::NormalMorphology => FieldRange::new(0.0, 100.0),
            Field::Concentration => FieldRange::new(0.0, 300.0),
            Field::Volume => FieldRange::new(0.0, 10.0),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed numeric interval a field must fall in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN and infinities are never contained.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Unvalidated measurements keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMeasurements {
    values: HashMap<String, f64>,
}

impl RawMeasurements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting values of the entry form
    pub fn reference() -> Self {
        Self::new()
            .with(Field::ProgressiveMotility, 50.0)
            .with(Field::NonProgressiveMotility, 10.0)
            .with(Field::ImmotileSperm, 40.0)
            .with(Field::Concentration, 50.0)
            .with(Field::NormalMorphology, 14.0)
    }

    pub fn with(mut self, field: Field, value: f64) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: Field, value: f64) {
        self.values.insert(field.as_str().to_string(), value);
    }

    /// Insert by raw name; names that match no field are kept and reported during validation
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn remove(&mut self, field: Field) -> Option<f64> {
        self.values.remove(field.as_str())
    }

    pub fn get(&self, field: Field) -> Option<f64> {
        self.values.get(field.as_str()).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, f64>> for RawMeasurements {
    fn from(values: HashMap<String, f64>) -> Self {
        Self { values }
    }
}

/// Measurements that passed range validation.
///
/// Only the validator builds these; every value lies within its field range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementSet {
    progressive_motility: f64,
    non_progressive_motility: f64,
    immotile_sperm: f64,
    concentration: f64,
    normal_morphology: f64,
    volume: Option<f64>,
}

impl MeasurementSet {
    /// `values` follows `Field::REQUIRED` order
    pub(crate) fn from_validated(values: [f64; 5], volume: Option<f64>) -> Self {
        let [progressive_motility, non_progressive_motility, immotile_sperm, concentration, normal_morphology] =
            values;
        Self {
            progressive_motility,
            non_progressive_motility,
            immotile_sperm,
            concentration,
            normal_morphology,
            volume,
        }
    }

    pub fn progressive_motility(&self) -> f64 {
        self.progressive_motility
    }

    pub fn non_progressive_motility(&self) -> f64 {
        self.non_progressive_motility
    }

    pub fn immotile_sperm(&self) -> f64 {
        self.immotile_sperm
    }

    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    pub fn normal_morphology(&self) -> f64 {
        self.normal_morphology
    }

    pub fn volume(&self) -> Option<f64> {
        self.volume
    }

    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::ProgressiveMotility => Some(self.progressive_motility),
            Field::NonProgressiveMotility => Some(self.non_progressive_motility),
            Field::ImmotileSperm => Some(self.immotile_sperm),
            Field::Concentration => Some(self.concentration),
            Field::NormalMorphology => Some(self.normal_morphology),
            Field::Volume => self.volume,
        }
    }

    /// Sum of the three motility fractions
    pub fn motility_sum(&self) -> f64 {
        self.progressive_motility + self.non_progressive_motility + self.immotile_sperm
    }
}

/// Feature order the model was trained on. Immotile precedes non-progressive.
pub const FEATURE_ORDER: [Field; 5] = [
    Field::ProgressiveMotility,
    Field::ImmotileSperm,
    Field::NonProgressiveMotility,
    Field::Concentration,
    Field::NormalMorphology,
];

/// Model input in `FEATURE_ORDER`, with volume appended when present
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    fields: Vec<Field>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn from_measurements(measurements: &MeasurementSet) -> Self {
        let mut fields = Vec::with_capacity(FEATURE_ORDER.len() + 1);
        let mut values = Vec::with_capacity(FEATURE_ORDER.len() + 1);

        for field in FEATURE_ORDER.iter().copied().chain(std::iter::once(Field::Volume)) {
            if let Some(value) = measurements.value(field) {
                fields.push(field);
                values.push(value);
            }
        }

        Self { fields, values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<f64> {
        self.fields
            .iter()
            .position(|candidate| *candidate == field)
            .map(|index| self.values[index])
    }
}

/// Non-blocking message attached to a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Motility fractions do not add up to 100%
    MotilitySumMismatch { sum: f64, tolerance: f64 },
    /// Concentration under the reference minimum
    LowConcentration { value: f64 },
    /// Normal morphology under the critical minimum
    LowMorphology { value: f64 },
}

impl Advisory {
    pub fn code(&self) -> &'static str {
        match self {
            Advisory::MotilitySumMismatch { .. } => "motility_sum_mismatch",
            Advisory::LowConcentration { .. } => "low_concentration",
            Advisory::LowMorphology { .. } => "low_morphology",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Advisory::MotilitySumMismatch { sum, .. } => format!(
                "motility percentages sum to {:.1}%, expected {:.0}%.",
                sum, MOTILITY_TOTAL_PERCENT
            ),
            Advisory::LowConcentration { .. } => {
                "concentration below typical reference threshold.".to_string()
            }
            Advisory::LowMorphology { .. } => "normal morphology critically low.".to_string(),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> MeasurementSet {
        MeasurementSet::from_validated([50.0, 10.0, 40.0, 50.0, 14.0], None)
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.as_str()), Some(field));
        }
        assert_eq!(Field::from_name("motility"), None);
    }

    #[test]
    fn test_field_ranges() {
        assert_eq!(Field::Concentration.range(), FieldRange::new(0.0, 300.0));
        assert_eq!(Field::Volume.range(), FieldRange::new(0.0, 10.0));
        assert_eq!(Field::ImmotileSperm.range(), FieldRange::new(0.0, 100.0));
    }

    #[test]
    fn test_range_rejects_non_finite() {
        let range = FieldRange::new(0.0, 100.0);
        assert!(range.contains(0.0));
        assert!(range.contains(100.0));
        assert!(!range.contains(f64::NAN));
        assert!(!range.contains(f64::INFINITY));
        assert!(!range.contains(-0.1));
    }

    #[test]
    fn test_feature_order_swaps_immotile_and_non_progressive() {
        let vector = FeatureVector::from_measurements(&sample_set());
        assert_eq!(vector.as_slice(), &[50.0, 40.0, 10.0, 50.0, 14.0]);
        assert_eq!(vector.fields(), &FEATURE_ORDER[..]);
    }

    #[test]
    fn test_feature_vector_appends_volume() {
        let set = MeasurementSet::from_validated([50.0, 10.0, 40.0, 50.0, 14.0], Some(3.2));
        let vector = FeatureVector::from_measurements(&set);
        assert_eq!(vector.len(), 6);
        assert_eq!(vector.as_slice()[5], 3.2);
        assert_eq!(vector.get(Field::Volume), Some(3.2));
    }

    #[test]
    fn test_feature_lookup_by_field() {
        let vector = FeatureVector::from_measurements(&sample_set());
        assert_eq!(vector.get(Field::Concentration), Some(50.0));
        assert_eq!(vector.get(Field::NonProgressiveMotility), Some(10.0));
        assert_eq!(vector.get(Field::Volume), None);
    }

    #[test]
    fn test_reference_measurements() {
        let raw = RawMeasurements::reference();
        assert_eq!(raw.len(), 5);
        assert_eq!(raw.get(Field::NormalMorphology), Some(14.0));
        assert_eq!(raw.get(Field::Volume), None);
    }

    #[test]
    fn test_advisory_messages() {
        assert_eq!(
            Advisory::LowConcentration { value: 10.0 }.to_string(),
            "concentration below typical reference threshold."
        );
        assert_eq!(
            Advisory::LowMorphology { value: 3.0 }.to_string(),
            "normal morphology critically low."
        );
        let mismatch = Advisory::MotilitySumMismatch { sum: 90.0, tolerance: 0.05 };
        assert_eq!(mismatch.to_string(), "motility percentages sum to 90.0%, expected 100%.");
        assert_eq!(mismatch.code(), "motility_sum_mismatch");
    }
}
