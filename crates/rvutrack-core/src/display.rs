//! Display-ready view of a calculation, consumed by UI adapters.

use serde::Serialize;

use crate::format::{format_fixed2, format_percent, format_percent_number};
use crate::models::{CalculationResult, StatusCategory};

/// Color/category tag for the status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Neutral,
    Success,
    Danger,
}

impl StatusTone {
    /// CSS color used by the web front-end for this tone.
    pub fn hex_color(&self) -> &'static str {
        match self {
            StatusTone::Neutral => "#333",
            StatusTone::Success => "#2b8a3e",
            StatusTone::Danger => "#c92a2a",
        }
    }
}

impl From<StatusCategory> for StatusTone {
    fn from(status: StatusCategory) -> Self {
        match status {
            StatusCategory::InvalidThreshold => StatusTone::Neutral,
            StatusCategory::Met => StatusTone::Success,
            StatusCategory::Below => StatusTone::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct TotalsView {
    pub total_text: String,
    pub percentage_text: String,
    pub status_message: String,
    pub tone: StatusTone,
    pub show_suggestions: bool,
    pub suggestions: Vec<String>,
}

impl TotalsView {
    pub fn status_message(result: &CalculationResult) -> String {
        match result.status {
            StatusCategory::InvalidThreshold => "Please enter a valid threshold.".to_string(),
            StatusCategory::Met => format!(
                "Great job! You achieved {}% of your daily RVU target and exceeded your threshold.",
                format_percent_number(result.percentage)
            ),
            StatusCategory::Below => format!(
                "You are at {}% of your daily RVU target. You need {} more RVUs to reach 100%.",
                format_percent_number(result.percentage),
                format_fixed2(result.remaining)
            ),
        }
    }
}

impl From<&CalculationResult> for TotalsView {
    fn from(result: &CalculationResult) -> Self {
        let show_suggestions = result.show_suggestions();
        let suggestions = if show_suggestions {
            result.suggestions.iter().map(|s| s.display_text()).collect()
        } else {
            Vec::new()
        };

        Self {
            total_text: format_fixed2(result.total_units),
            percentage_text: format_percent(result.percentage),
            status_message: Self::status_message(result),
            tone: StatusTone::from(result.status),
            show_suggestions,
            suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::calculate;
    use crate::models::{ExamCatalog, ExamType};

    fn sample_catalog() -> ExamCatalog {
        ExamCatalog::new(vec![
            ExamType::new("A", 2.21),
            ExamType::new("B", 1.82),
            ExamType::new("C", 0.80),
            ExamType::new("D", 0.18),
        ])
        .expect("valid catalog")
    }

    #[test]
    fn test_below_view() {
        let result = calculate(&sample_catalog(), &[1.0, 0.0, 0.0, 0.0], Some(10.0));
        let view = TotalsView::from(&result);
        assert_eq!(view.total_text, "2.21");
        assert_eq!(view.percentage_text, "22.10%");
        assert_eq!(
            view.status_message,
            "You are at 22.10% of your daily RVU target. You need 7.79 more RVUs to reach 100%."
        );
        assert_eq!(view.tone, StatusTone::Danger);
        assert!(view.show_suggestions);
        assert_eq!(
            view.suggestions,
            vec![
                "4 additional A exam(s)",
                "5 additional B exam(s)",
                "10 additional C exam(s)",
                "44 additional D exam(s)",
            ]
        );
    }

    #[test]
    fn test_met_view() {
        let result = calculate(&sample_catalog(), &[5.0, 0.0, 0.0, 0.0], Some(10.0));
        let view = TotalsView::from(&result);
        assert_eq!(view.total_text, "11.05");
        assert!(view.status_message.starts_with("Great job! You achieved 110."));
        assert!(view.status_message.ends_with("% of your daily RVU target and exceeded your threshold."));
        assert_eq!(view.tone, StatusTone::Success);
        assert!(!view.show_suggestions);
        assert!(view.suggestions.is_empty());
    }

    #[test]
    fn test_invalid_threshold_view() {
        let result = calculate(&sample_catalog(), &[3.0, 1.0, 0.0, 0.0], None);
        let view = TotalsView::from(&result);
        assert_eq!(view.total_text, "8.45");
        assert_eq!(view.percentage_text, "0.00%");
        assert_eq!(view.status_message, "Please enter a valid threshold.");
        assert_eq!(view.tone.hex_color(), "#333");
        assert!(!view.show_suggestions);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let result = calculate(&sample_catalog(), &[], None);
        let json = serde_json::to_value(TotalsView::from(&result)).expect("serializable");
        assert_eq!(json["totalText"], "0.00");
        assert_eq!(json["tone"], "neutral");
        assert_eq!(json["showSuggestions"], false);
    }
}
