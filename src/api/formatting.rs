//! Prediction output formatting and serialization
//!
//! Human-readable text, JSON and CSV renderings of a prediction, plus the
//! interpretation guide shown next to each band.

use crate::api::history::PredictionHistoryEntry;
use crate::classification::{Band, PredictionResult, ThresholdPolicy};
use crate::core::{Advisory, Field};
use serde::{Deserialize, Serialize};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON document
    Json,
    /// CSV row with header
    Csv,
}

/// Guide text for a band, rendered with the active thresholds
pub fn interpretation(band: Band, policy: &ThresholdPolicy) -> String {
    match band {
        Band::Low => format!(
            "DFI < {}%: Generally considered normal/good fertility potential",
            policy.lower()
        ),
        Band::Moderate => format!(
            "DFI {}-{}%: Moderate fertility impact, may affect pregnancy outcomes",
            policy.lower(),
            policy.upper()
        ),
        Band::High => format!(
            "DFI > {}%: Higher impact on fertility, may indicate need for additional evaluation",
            policy.upper()
        ),
    }
}

/// Prediction prepared for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedPrediction {
    /// Score at the formatter precision with a percent sign, e.g. "12.3%"
    pub score_display: String,
    /// Score rounded to the formatter precision
    pub score_value: f64,
    pub band: Band,
    pub interpretation: String,
    /// Active `[lower, upper]` cutoffs
    pub thresholds: [f64; 2],
    pub advisories: Vec<AdvisoryNote>,
}

/// Advisory flattened for output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryNote {
    pub code: String,
    pub message: String,
}

impl From<&Advisory> for AdvisoryNote {
    fn from(advisory: &Advisory) -> Self {
        Self {
            code: advisory.code().to_string(),
            message: advisory.message(),
        }
    }
}

/// Turns a `PredictionResult` into a `FormattedPrediction`
#[derive(Debug, Clone)]
pub struct ResultFormatter {
    /// Decimal places kept in `score_value` and `score_display`
    precision: u8,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self { precision: 1 }
    }
}

impl ResultFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn format(&self, result: &PredictionResult, policy: &ThresholdPolicy) -> FormattedPrediction {
        let score_value = self.round_to_precision(result.score_value);
        FormattedPrediction {
            score_display: format!("{:.*}%", self.precision as usize, score_value),
            score_value,
            band: result.band,
            interpretation: interpretation(result.band, policy),
            thresholds: policy.thresholds(),
            advisories: result.advisories.iter().map(AdvisoryNote::from).collect(),
        }
    }

    fn round_to_precision(&self, value: f64) -> f64 {
        let multiplier = 10_f64.powi(self.precision as i32);
        (value * multiplier).round() / multiplier
    }
}

/// Human-readable text formatter
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    /// Single line output
    pub compact: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format_text(&self, formatted: &FormattedPrediction) -> String {
        if self.compact {
            let mut output = format!("Predicted DFI: {} ({})", formatted.score_display, formatted.band);
            if !formatted.advisories.is_empty() {
                let codes: Vec<&str> = formatted.advisories.iter().map(|note| note.code.as_str()).collect();
                output.push_str(&format!(" | advisories: {}", codes.join(", ")));
            }
            return output;
        }

        let mut output = String::new();
        output.push_str(&format!("Predicted DFI: {}\n", formatted.score_display));
        output.push_str(&format!("Interpretation: {}\n", formatted.band));
        output.push_str(&format!("  {}\n", formatted.interpretation));

        if formatted.advisories.is_empty() {
            output.push_str("Advisories: none\n");
        } else {
            output.push_str("Advisories:\n");
            for note in &formatted.advisories {
                output.push_str(&format!("  - {}\n", note.message));
            }
        }

        output
    }
}

/// JSON formatter for structured output
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

/// CSV formatter for history export, one row per prediction
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> String {
        let mut columns = vec!["sequence", "recorded_at_ms"];
        columns.extend(Field::ALL.iter().map(|field| field.as_str()));
        columns.extend(["score", "band", "advisories"]);
        columns.join(",")
    }

    /// Advisory codes are joined with `;` so the row stays comma separated
    pub fn format_csv(&self, entry: &PredictionHistoryEntry) -> String {
        let mut cells = vec![entry.sequence.to_string(), entry.recorded_at_ms.to_string()];
        cells.extend(Field::ALL.iter().map(|field| {
            entry
                .measurements
                .value(*field)
                .map(|value| value.to_string())
                .unwrap_or_default()
        }));
        cells.push(format!("{:.1}", entry.result.score_value));
        cells.push(entry.result.band.as_str().to_string());
        let codes: Vec<&str> = entry.result.advisories.iter().map(Advisory::code).collect();
        cells.push(codes.join(";"));
        cells.join(",")
    }

    pub fn format_history<'a, I>(&self, entries: I) -> String
    where
        I: IntoIterator<Item = &'a PredictionHistoryEntry>,
    {
        let mut output = String::new();
        if self.include_header {
            output.push_str(&self.header());
            output.push('\n');
        }
        for entry in entries {
            output.push_str(&self.format_csv(entry));
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::history::PredictionHistory;
    use crate::core::RawMeasurements;
    use crate::validation::InputValidator;

    fn result(score: f64, band: Band, advisories: Vec<Advisory>) -> PredictionResult {
        PredictionResult {
            score_value: score,
            band,
            advisories,
        }
    }

    #[test]
    fn test_interpretation_uses_active_thresholds() {
        let policy = ThresholdPolicy::WIDE_MODERATE;
        assert_eq!(
            interpretation(Band::Moderate, &policy),
            "DFI 15-30%: Moderate fertility impact, may affect pregnancy outcomes"
        );
        assert_eq!(
            interpretation(Band::High, &policy),
            "DFI > 30%: Higher impact on fertility, may indicate need for additional evaluation"
        );
        assert!(interpretation(Band::Low, &ThresholdPolicy::STANDARD).starts_with("DFI < 15%"));
    }

    #[test]
    fn test_score_display() {
        let formatted = ResultFormatter::new().format(&result(12.34, Band::Low, vec![]), &ThresholdPolicy::STANDARD);
        assert_eq!(formatted.score_display, "12.3%");
        assert_eq!(formatted.score_value, 12.3);
        assert_eq!(formatted.thresholds, [15.0, 25.0]);
    }

    #[test]
    fn test_precision_applies_to_display_and_value() {
        let result = result(12.34567, Band::Low, vec![]);

        let formatted = ResultFormatter::new()
            .with_precision(3)
            .format(&result, &ThresholdPolicy::STANDARD);
        assert_eq!(formatted.score_display, "12.346%");
        assert_eq!(formatted.score_value, 12.346);

        let formatted = ResultFormatter::new()
            .with_precision(0)
            .format(&result, &ThresholdPolicy::STANDARD);
        assert_eq!(formatted.score_display, "12%");
        assert_eq!(formatted.score_value, 12.0);
    }

    #[test]
    fn test_text_output() {
        let advisories = vec![Advisory::LowConcentration { value: 10.0 }];
        let formatted = ResultFormatter::new().format(&result(20.0, Band::Moderate, advisories), &ThresholdPolicy::STANDARD);

        let text = TextFormatter::new().format_text(&formatted);
        assert!(text.starts_with("Predicted DFI: 20.0%\n"));
        assert!(text.contains("Interpretation: Moderate"));
        assert!(text.contains("  - concentration below typical reference threshold."));

        let compact = TextFormatter { compact: true }.format_text(&formatted);
        assert_eq!(compact, "Predicted DFI: 20.0% (Moderate) | advisories: low_concentration");
    }

    #[test]
    fn test_json_output() {
        let formatted = ResultFormatter::new().format(&result(12.3, Band::Low, vec![]), &ThresholdPolicy::STANDARD);
        let json = JsonFormatter::new().format_json(&formatted).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["band"], "low");
        assert_eq!(value["score_display"], "12.3%");
        assert!(JsonFormatter::pretty().format_json(&formatted).unwrap().contains('\n'));
    }

    #[test]
    fn test_csv_rows() {
        let measurements = InputValidator::new()
            .validate(&RawMeasurements::reference())
            .unwrap()
            .measurements;
        let mut history = PredictionHistory::new();
        history.record(
            measurements,
            result(
                12.3,
                Band::Low,
                vec![
                    Advisory::LowConcentration { value: 10.0 },
                    Advisory::LowMorphology { value: 2.0 },
                ],
            ),
        );

        let formatter = CsvFormatter::new();
        assert_eq!(
            formatter.header(),
            "sequence,recorded_at_ms,progressive_motility,non_progressive_motility,immotile_sperm,concentration,normal_morphology,volume,score,band,advisories"
        );

        let output = formatter.format_history(history.entries());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("1,"));
        assert!(lines[1].ends_with(",50,10,40,50,14,,12.3,low,low_concentration;low_morphology"));
    }
}
