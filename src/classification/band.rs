//! Interpretation bands and the threshold policy that assigns them

use crate::core::DEFAULT_BAND_THRESHOLDS;
use crate::classification::error::ThresholdError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interpretation category for a predicted DFI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Low,
    Moderate,
    High,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Low => "low",
            Band::Moderate => "moderate",
            Band::High => "high",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::Low => f.write_str("Low"),
            Band::Moderate => f.write_str("Moderate"),
            Band::High => f.write_str("High"),
        }
    }
}

/// Two ordered cutoffs `[lower, upper]` splitting scores into three bands.
///
/// `score < lower` is Low, `lower <= score < upper` is Moderate and
/// `score >= upper` is High. Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct ThresholdPolicy {
    lower: f64,
    upper: f64,
}

impl ThresholdPolicy {
    /// Cutoffs at 15% and 25%
    pub const STANDARD: ThresholdPolicy = ThresholdPolicy {
        lower: DEFAULT_BAND_THRESHOLDS[0],
        upper: DEFAULT_BAND_THRESHOLDS[1],
    };

    /// Cutoffs at 15% and 30%
    pub const WIDE_MODERATE: ThresholdPolicy = ThresholdPolicy {
        lower: 15.0,
        upper: 30.0,
    };

    pub fn new(lower: f64, upper: f64) -> Result<Self, ThresholdError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(ThresholdError::NonFinite { lower, upper });
        }
        if lower >= upper {
            return Err(ThresholdError::Unordered { lower, upper });
        }

        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn thresholds(&self) -> [f64; 2] {
        [self.lower, self.upper]
    }

    pub fn classify(&self, score: f64) -> Band {
        if score < self.lower {
            Band::Low
        } else if score < self.upper {
            Band::Moderate
        } else {
            Band::High
        }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TryFrom<[f64; 2]> for ThresholdPolicy {
    type Error = ThresholdError;

    fn try_from([lower, upper]: [f64; 2]) -> Result<Self, Self::Error> {
        ThresholdPolicy::new(lower, upper)
    }
}

impl From<ThresholdPolicy> for [f64; 2] {
    fn from(policy: ThresholdPolicy) -> Self {
        policy.thresholds()
    }
}
