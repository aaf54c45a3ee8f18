//! Scripted model for testing and development

use crate::model::{ModelError, ModelResult, PredictionModel};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Mock model returning scripted responses
///
/// Queued responses are served first, then the fallback response. Every call
/// is counted and its input recorded.
pub struct MockModel {
    responses: Mutex<VecDeque<ModelResult<f64>>>,
    fallback: ModelResult<f64>,
    calls: AtomicUsize,
    last_input: Mutex<Option<Vec<f64>>>,
    delay: Option<Duration>,
    expected_features: Option<usize>,
}

impl MockModel {
    /// Always answers with `score`
    pub fn returning(score: f64) -> Self {
        Self::with_fallback(Ok(score))
    }

    /// Always fails with `error`
    pub fn failing(error: ModelError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: ModelResult<f64>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            last_input: Mutex::new(None),
            delay: None,
            expected_features: None,
        }
    }

    /// Serve `response` on the next unanswered call
    pub fn push_response(&self, response: ModelResult<f64>) {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_expected_features(mut self, count: usize) -> Self {
        self.expected_features = Some(count);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<Vec<f64>> {
        self.last_input
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl PredictionModel for MockModel {
    fn predict(&self, features: &[f64]) -> ModelResult<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_input
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(features.to_vec());

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    fn expected_features(&self) -> Option<usize> {
        self.expected_features
    }

    fn name(&self) -> &str {
        "mock"
    }
}
