//! RVU totals calculator.
//!
//! Every recalculation starts from the raw text of the input fields:
//! counts and threshold are parsed leniently, summed against the exam
//! catalog, and compared to the threshold. Nothing here fails; unparseable
//! input degrades to zero counts or an unset threshold so the form always
//! renders.

use std::sync::Arc;

use tracing::trace;

use crate::display::TotalsView;
use crate::models::{CalculationResult, ExamCatalog, StatusCategory, Suggestion};

/// Parse the longest leading decimal number in `text`, ignoring leading
/// whitespace and trailing garbage ("3 exams" -> 3). Returns `None` when no
/// number is present.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse().ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts if at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Parse an exam count field. Empty, non-numeric, and negative input all
/// count as zero exams.
pub fn parse_count(text: &str) -> f64 {
    match parse_leading_float(text) {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Parse the threshold field. Anything that is not a positive finite number
/// leaves the threshold unset.
pub fn parse_threshold(text: &str) -> Option<f64> {
    parse_leading_float(text).filter(|value| value.is_finite() && *value > 0.0)
}

/// Recompute totals from scratch.
///
/// `counts` is matched to `catalog` by position; missing counts are zero and
/// extra counts are ignored. Suggestions are computed per exam type in
/// isolation: each one alone closes the gap, without mixing types.
pub fn calculate(catalog: &ExamCatalog, counts: &[f64], threshold: Option<f64>) -> CalculationResult {
    let total_units: f64 = catalog
        .iter()
        .enumerate()
        .map(|(i, exam)| counts.get(i).copied().unwrap_or(0.0) * exam.units_per_exam)
        .sum();

    let threshold = match threshold.filter(|t| t.is_finite() && *t > 0.0) {
        Some(t) => t,
        None => {
            return CalculationResult {
                total_units,
                percentage: 0.0,
                status: StatusCategory::InvalidThreshold,
                remaining: 0.0,
                suggestions: Vec::new(),
            }
        }
    };

    let percentage = total_units / threshold;

    if total_units >= threshold {
        return CalculationResult {
            total_units,
            percentage,
            status: StatusCategory::Met,
            remaining: 0.0,
            suggestions: Vec::new(),
        };
    }

    let remaining = threshold - total_units;
    let suggestions = catalog
        .iter()
        .map(|exam| Suggestion {
            exam_name: exam.name.clone(),
            // Float-to-int `as` saturates, so absurd gaps stay representable
            needed_additional: (remaining / exam.units_per_exam).ceil() as u64,
        })
        .collect();

    CalculationResult {
        total_units,
        percentage,
        status: StatusCategory::Below,
        remaining,
        suggestions,
    }
}

/// Calculator bound to the catalog chosen at startup.
/// Clone is cheap - the catalog is shared.
#[derive(Debug, Clone)]
pub struct Calculator {
    catalog: Arc<ExamCatalog>,
}

impl Calculator {
    pub fn new(catalog: Arc<ExamCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ExamCatalog {
        &self.catalog
    }

    /// Parse raw field text and recompute.
    pub fn calculate_texts<S: AsRef<str>>(&self, count_texts: &[S], threshold_text: &str) -> CalculationResult {
        let counts: Vec<f64> = count_texts.iter().map(|t| parse_count(t.as_ref())).collect();
        let threshold = parse_threshold(threshold_text);
        let result = calculate(&self.catalog, &counts, threshold);
        trace!(
            total = result.total_units,
            ?threshold,
            status = ?result.status,
            "Recalculated totals"
        );
        result
    }

    /// Parse raw field text, recompute, and build the display view.
    pub fn view<S: AsRef<str>>(&self, count_texts: &[S], threshold_text: &str) -> TotalsView {
        TotalsView::from(&self.calculate_texts(count_texts, threshold_text))
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(Arc::new(ExamCatalog::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExamType;

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
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("12"), Some(12.0));
        assert_eq!(parse_leading_float("  3.5  "), Some(3.5));
        assert_eq!(parse_leading_float("3 exams"), Some(3.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float("-2"), Some(-2.0));
        assert_eq!(parse_leading_float("1e2"), Some(100.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float("-"), None);
    }

    #[test]
    fn test_parse_count_defaults_to_zero() {
        assert_eq!(parse_count(""), 0.0);
        assert_eq!(parse_count("abc"), 0.0);
        assert_eq!(parse_count("-4"), 0.0);
        assert_eq!(parse_count("7"), 7.0);
    }

    #[test]
    fn test_parse_threshold_unset() {
        assert_eq!(parse_threshold(""), None);
        assert_eq!(parse_threshold("0"), None);
        assert_eq!(parse_threshold("-10"), None);
        assert_eq!(parse_threshold("ten"), None);
        assert_eq!(parse_threshold("Infinity"), None);
        assert_eq!(parse_threshold("10"), Some(10.0));
    }

    #[test]
    fn test_below_threshold_suggestions() {
        let result = calculate(&sample_catalog(), &[1.0, 0.0, 0.0, 0.0], Some(10.0));
        assert!((result.total_units - 2.21).abs() < 1e-9);
        assert!((result.percentage - 0.221).abs() < 1e-9);
        assert_eq!(result.status, StatusCategory::Below);
        assert!((result.remaining - 7.79).abs() < 1e-9);

        let needed: Vec<u64> = result.suggestions.iter().map(|s| s.needed_additional).collect();
        assert_eq!(needed, vec![4, 5, 10, 44]);
        assert_eq!(result.suggestions[0].display_text(), "4 additional A exam(s)");
        assert_eq!(result.suggestions[3].display_text(), "44 additional D exam(s)");
        assert!(result.show_suggestions());
    }

    #[test]
    fn test_met_threshold() {
        let result = calculate(&sample_catalog(), &[5.0, 0.0, 0.0, 0.0], Some(10.0));
        assert!((result.total_units - 11.05).abs() < 1e-9);
        assert_eq!(result.status, StatusCategory::Met);
        assert!(result.suggestions.is_empty());
        assert!(!result.show_suggestions());
    }

    #[test]
    fn test_exactly_at_threshold_is_met() {
        let catalog = ExamCatalog::new(vec![ExamType::new("Half", 0.5)]).expect("valid catalog");
        let result = calculate(&catalog, &[20.0], Some(10.0));
        assert_eq!(result.status, StatusCategory::Met);
        assert_eq!(result.percentage, 1.0);
    }

    #[test]
    fn test_invalid_threshold_ignores_counts() {
        for threshold in [None, Some(0.0), Some(-3.0), Some(f64::NAN)] {
            let result = calculate(&sample_catalog(), &[100.0, 3.0, 2.0, 1.0], threshold);
            assert_eq!(result.status, StatusCategory::InvalidThreshold);
            assert_eq!(result.percentage, 0.0);
            assert!(result.suggestions.is_empty());
        }
    }

    #[test]
    fn test_zero_total_still_suggests_every_exam() {
        let result = calculate(&sample_catalog(), &[], Some(1.0));
        assert_eq!(result.status, StatusCategory::Below);
        assert_eq!(result.suggestions.len(), 4);
        assert_eq!(result.suggestions[3].needed_additional, 6);
    }

    #[test]
    fn test_extra_counts_ignored() {
        let result = calculate(&sample_catalog(), &[0.0, 0.0, 0.0, 0.0, 99.0], Some(10.0));
        assert_eq!(result.total_units, 0.0);
    }

    #[test]
    fn test_calculator_from_texts() {
        let calculator = Calculator::new(Arc::new(sample_catalog()));
        let result = calculator.calculate_texts(&["1", "", "abc", "0"], "10");
        assert!((result.total_units - 2.21).abs() < 1e-9);
        assert_eq!(result.status, StatusCategory::Below);

        let view = calculator.view(&["0", "0", "0", "0"], "");
        assert_eq!(view.total_text, "0.00");
        assert_eq!(view.percentage_text, "0.00%");
        assert!(!view.show_suggestions);
    }

    #[test]
    fn test_subnormal_threshold_reads_as_infinity() {
        let view = Calculator::default().view(&["1", "0", "0", "0"], "1e-320");
        assert_eq!(view.percentage_text, "Infinity%");
        assert_eq!(
            view.status_message,
            "Great job! You achieved Infinity% of your daily RVU target and exceeded your threshold."
        );
    }
}
