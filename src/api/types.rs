//! Common API types and data structures

use crate::classification::{Band, PredictionError};
use crate::utils::config::ConfigError;
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Input rejected before the model was called
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Model call failed
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    /// Invalid configuration
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    /// Output could not be rendered
    #[error("formatting failed: {reason}")]
    Formatting { reason: String },
}

/// Per-band prediction counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCounts {
    pub low: u32,
    pub moderate: u32,
    pub high: u32,
}

impl BandCounts {
    pub fn record(&mut self, band: Band) {
        match band {
            Band::Low => self.low += 1,
            Band::Moderate => self.moderate += 1,
            Band::High => self.high += 1,
        }
    }

    pub fn get(&self, band: Band) -> u32 {
        match band {
            Band::Low => self.low,
            Band::Moderate => self.moderate,
            Band::High => self.high,
        }
    }
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Successful predictions
    pub predictions: u32,
    /// Requests rejected by validation
    pub validation_failures: u32,
    /// Requests whose model call failed
    pub model_failures: u32,
    pub band_counts: BandCounts,
    /// Timestamp of the last successful prediction (ms since epoch)
    pub last_prediction_ms: Option<u64>,
    /// Session uptime (milliseconds)
    pub uptime_ms: u64,
}

impl SessionState {
    pub fn total_requests(&self) -> u32 {
        self.predictions + self.validation_failures + self.model_failures
    }
}
