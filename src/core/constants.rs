//! Measurement ranges and clinical reference values

/// Motility fractions partition the whole sample (%)
pub const MOTILITY_TOTAL_PERCENT: f64 = 100.0;

/// Default allowed deviation of the motility sum from 100% (percentage points)
pub const DEFAULT_SUM_TOLERANCE: f64 = 0.05;

/// Concentration below this is flagged (million/mL)
pub const CONCENTRATION_REFERENCE_MIN: f64 = 15.0;

/// Normal morphology below this is flagged (%)
pub const MORPHOLOGY_CRITICAL_MIN: f64 = 4.0;

/// Default band cutoffs for the predicted DFI (%)
pub const DEFAULT_BAND_THRESHOLDS: [f64; 2] = [15.0, 25.0];

/// Number of features without the optional volume measurement
pub const BASE_FEATURE_COUNT: usize = 5;
