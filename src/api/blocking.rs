//! Blocking API for running predictions
//!
//! `PredictionSession` wires the validator, classifier and model together and
//! keeps the per-session history and statistics. Calls run synchronously on
//! the caller's thread; a configured model timeout moves only the model call
//! onto a worker.

use crate::api::formatting::{CsvFormatter, FormattedPrediction, JsonFormatter, ResultFormatter, TextFormatter};
use crate::api::history::{PredictionHistory, PredictionHistoryEntry};
use crate::api::types::{ApiError, ApiResult, SessionState};
use crate::classification::{PredictionClassifier, PredictionResult};
use crate::core::RawMeasurements;
use crate::model::{PredictionModel, TimedModel};
use crate::utils::config::SystemConfig;
use crate::validation::InputValidator;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// One user's prediction session
pub struct PredictionSession {
    validator: InputValidator,
    classifier: PredictionClassifier,
    /// Model as supplied by the host
    base_model: Arc<dyn PredictionModel>,
    /// Model actually called, bounded when a timeout is configured
    model: Arc<dyn PredictionModel>,
    history: PredictionHistory,
    config: SystemConfig,
    state: SessionState,
    start_time: Instant,
}

impl PredictionSession {
    /// Create a session after checking the configuration
    pub fn new(model: Arc<dyn PredictionModel>, config: SystemConfig) -> ApiResult<Self> {
        config.check().into_result()?;
        Ok(Self::build(model, config))
    }

    /// Create a session with the default configuration
    pub fn with_defaults(model: Arc<dyn PredictionModel>) -> Self {
        Self::build(model, SystemConfig::default())
    }

    fn build(model: Arc<dyn PredictionModel>, config: SystemConfig) -> Self {
        info!(
            model = model.name(),
            thresholds = ?config.classification.thresholds.thresholds(),
            include_volume = config.validation.include_volume,
            "prediction session started"
        );

        Self {
            validator: InputValidator::with_config(config.validation.clone()),
            classifier: PredictionClassifier::new(config.classification.thresholds),
            model: Self::bounded(&model, config.classification.model_timeout_ms),
            base_model: model,
            history: PredictionHistory::with_limit(config.history_limit),
            config,
            state: SessionState::default(),
            start_time: Instant::now(),
        }
    }

    fn bounded(model: &Arc<dyn PredictionModel>, timeout_ms: Option<u64>) -> Arc<dyn PredictionModel> {
        match timeout_ms {
            Some(timeout_ms) => Arc::new(TimedModel::new(
                Arc::clone(model),
                Duration::from_millis(timeout_ms),
            )),
            None => Arc::clone(model),
        }
    }

    /// Validate, predict and record one request.
    ///
    /// Rejected input never reaches the model. Only successful predictions are
    /// added to the history.
    pub fn predict(&mut self, raw: &RawMeasurements) -> ApiResult<PredictionResult> {
        let validated = match self.validator.validate(raw) {
            Ok(validated) => validated,
            Err(err) => {
                self.state.validation_failures += 1;
                debug!(error = %err, "request rejected by validation");
                return Err(err.into());
            }
        };

        let features = self.validator.to_feature_vector(&validated.measurements);
        let result = match self
            .classifier
            .predict(&features, validated.advisory, self.model.as_ref())
        {
            Ok(result) => result,
            Err(err) => {
                self.state.model_failures += 1;
                return Err(err.into());
            }
        };

        self.state.predictions += 1;
        self.state.band_counts.record(result.band);
        self.state.last_prediction_ms = Some(now_ms());
        self.history.record(validated.measurements, result.clone());

        Ok(result)
    }

    /// Predict and prepare the result for display
    pub fn predict_formatted(&mut self, raw: &RawMeasurements) -> ApiResult<FormattedPrediction> {
        let result = self.predict(raw)?;
        Ok(ResultFormatter::new().format(&result, self.classifier.policy()))
    }

    /// Predict and render the result as human-readable text
    pub fn predict_text(&mut self, raw: &RawMeasurements, compact: bool) -> ApiResult<String> {
        let formatted = self.predict_formatted(raw)?;
        Ok(TextFormatter { compact }.format_text(&formatted))
    }

    /// Predict and render the result as JSON
    pub fn predict_json(&mut self, raw: &RawMeasurements, pretty: bool) -> ApiResult<String> {
        let formatted = self.predict_formatted(raw)?;
        json_formatter(pretty)
            .format_json(&formatted)
            .map_err(|e| ApiError::Formatting {
                reason: format!("JSON formatting error: {}", e),
            })
    }

    /// Session history as a JSON array
    pub fn export_history_json(&self, pretty: bool) -> ApiResult<String> {
        let entries: Vec<&PredictionHistoryEntry> = self.history.entries().collect();
        json_formatter(pretty)
            .format_json(&entries)
            .map_err(|e| ApiError::Formatting {
                reason: format!("JSON formatting error: {}", e),
            })
    }

    /// Session history as CSV, one row per prediction
    pub fn export_history_csv(&self, include_header: bool) -> String {
        CsvFormatter { include_header }.format_history(self.history.entries())
    }

    pub fn history(&self) -> &PredictionHistory {
        &self.history
    }

    /// Session statistics
    pub fn state(&mut self) -> SessionState {
        self.state.uptime_ms = self.start_time.elapsed().as_millis() as u64;
        self.state.clone()
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.base_model.name()
    }

    /// Apply a new configuration; the history is kept, trimmed to the new limit
    pub fn update_config(&mut self, config: SystemConfig) -> ApiResult<()> {
        config.check().into_result()?;

        self.validator.update_config(config.validation.clone());
        self.classifier.set_policy(config.classification.thresholds);
        self.history.set_limit(config.history_limit);
        if config.classification.model_timeout_ms != self.config.classification.model_timeout_ms {
            self.model = Self::bounded(&self.base_model, config.classification.model_timeout_ms);
        }
        self.config = config;

        info!("session configuration updated");
        Ok(())
    }

    /// Clear history and statistics
    pub fn reset(&mut self) {
        self.history.clear();
        self.state = SessionState::default();
        self.start_time = Instant::now();
    }
}

fn json_formatter(pretty: bool) -> JsonFormatter {
    if pretty {
        JsonFormatter::pretty()
    } else {
        JsonFormatter::new()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
