//! Session API
//!
//! `PredictionSession` is the entry point for hosts; history, statistics and
//! output formatting live alongside it.

pub mod blocking;
pub mod formatting;
pub mod history;
pub mod types;

pub use blocking::PredictionSession;
pub use formatting::{
    interpretation, CsvFormatter, FormattedPrediction, JsonFormatter, OutputFormat, ResultFormatter,
    TextFormatter,
};
pub use history::{PredictionHistory, PredictionHistoryEntry};
pub use types::{ApiError, ApiResult, BandCounts, SessionState};
