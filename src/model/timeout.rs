//! Bounded model invocation

use crate::model::{ModelError, ModelResult, PredictionModel};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Wraps a model so that each call gives up after a fixed timeout.
///
/// The call runs on a worker thread. On expiry the worker is left to finish on
/// its own and its answer is discarded. At most one worker exists at a time:
/// while an expired call is still running, new calls fail immediately with
/// `ModelError::Unavailable`.
pub struct TimedModel {
    inner: Arc<dyn PredictionModel>,
    timeout: Duration,
    busy: Arc<AtomicBool>,
}

/// Clears the busy flag when the worker is done, including on panic
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TimedModel {
    pub fn new(inner: Arc<dyn PredictionModel>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a worker is still running a previous call
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl PredictionModel for TimedModel {
    fn predict(&self, features: &[f64]) -> ModelResult<f64> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(model = self.inner.name(), "previous model invocation still running");
            return Err(ModelError::Unavailable {
                reason: "previous invocation still running".to_string(),
            });
        }

        let guard = BusyGuard(Arc::clone(&self.busy));
        let (sender, receiver) = mpsc::channel();
        let model = Arc::clone(&self.inner);
        let input = features.to_vec();

        thread::Builder::new()
            .name("dfi-model".to_string())
            .spawn(move || {
                // The model handle is released before the busy flag.
                let result = {
                    let _guard = guard;
                    let model = model;
                    model.predict(&input)
                };
                // Receiver is gone after a timeout.
                let _ = sender.send(result);
            })
            .map_err(|e| ModelError::Unavailable {
                reason: format!("failed to spawn model worker: {}", e),
            })?;

        match receiver.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!(model = self.inner.name(), timeout_ms, "model invocation timed out");
                Err(ModelError::Timeout { timeout_ms })
            }
            Err(RecvTimeoutError::Disconnected) => Err(ModelError::Failed {
                reason: "model worker terminated without an answer".to_string(),
            }),
        }
    }

    fn expected_features(&self) -> Option<usize> {
        self.inner.expected_features()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
