//! Session-scoped prediction history

use crate::classification::PredictionResult;
use crate::core::MeasurementSet;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// One successful prediction and the measurements it was made from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionHistoryEntry {
    /// 1-based position within the session
    pub sequence: u64,
    /// Wall-clock time of the prediction (ms since epoch)
    pub recorded_at_ms: u64,
    pub measurements: MeasurementSet,
    pub result: PredictionResult,
}

/// Append-only list of predictions made in one session.
///
/// With a limit set, the oldest entry is dropped once the limit is reached.
#[derive(Debug, Default)]
pub struct PredictionHistory {
    entries: VecDeque<PredictionHistoryEntry>,
    limit: Option<usize>,
    next_sequence: u64,
}

impl PredictionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Change the limit, dropping the oldest entries that no longer fit
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.enforce_limit();
    }

    /// Append a prediction and return its sequence number
    pub fn record(&mut self, measurements: MeasurementSet, result: PredictionResult) -> u64 {
        self.next_sequence += 1;
        let recorded_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        self.entries.push_back(PredictionHistoryEntry {
            sequence: self.next_sequence,
            recorded_at_ms,
            measurements,
            result,
        });
        self.enforce_limit();
        debug!(sequence = self.next_sequence, entries = self.entries.len(), "prediction recorded");

        self.next_sequence
    }

    pub fn entries(&self) -> impl Iterator<Item = &PredictionHistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&PredictionHistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget all entries; sequence numbers restart at 1
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_sequence = 0;
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.pop_front();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::Band;
    use crate::core::RawMeasurements;
    use crate::validation::InputValidator;

    fn sample_measurements() -> MeasurementSet {
        InputValidator::new()
            .validate(&RawMeasurements::reference())
            .unwrap()
            .measurements
    }

    fn result(score: f64, band: Band) -> PredictionResult {
        PredictionResult {
            score_value: score,
            band,
            advisories: Vec::new(),
        }
    }

    #[test]
    fn test_append_in_order() {
        let mut history = PredictionHistory::new();
        history.record(sample_measurements(), result(12.3, Band::Low));
        history.record(sample_measurements(), result(27.0, Band::High));

        let sequences: Vec<u64> = history.entries().map(|entry| entry.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
        assert_eq!(history.latest().unwrap().result.band, Band::High);
        assert!(history.latest().unwrap().recorded_at_ms > 0);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = PredictionHistory::with_limit(Some(2));
        for score in [5.0, 10.0, 20.0] {
            history.record(sample_measurements(), result(score, Band::Low));
        }

        assert_eq!(history.len(), 2);
        let sequences: Vec<u64> = history.entries().map(|entry| entry.sequence).collect();
        assert_eq!(sequences, vec![2, 3]);

        history.set_limit(Some(1));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().result.score_value, 20.0);
    }

    #[test]
    fn test_clear_restarts_sequence() {
        let mut history = PredictionHistory::new();
        history.record(sample_measurements(), result(5.0, Band::Low));
        history.clear();
        assert!(history.is_empty());

        let sequence = history.record(sample_measurements(), result(5.0, Band::Low));
        assert_eq!(sequence, 1);
        assert_eq!(history.latest().unwrap().sequence, 1);
    }
}
