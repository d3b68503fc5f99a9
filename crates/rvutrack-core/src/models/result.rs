use serde::Serialize;

/// Where the day's total stands relative to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    /// Threshold missing, non-numeric, or not positive.
    InvalidThreshold,
    Met,
    Below,
}

/// Additional exams of a single type that would close the gap on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub exam_name: String,
    pub needed_additional: u64,
}

impl Suggestion {
    pub fn display_text(&self) -> String {
        format!("{} additional {} exam(s)", self.needed_additional, self.exam_name)
    }
}

/// Output of one full recalculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub total_units: f64,
    /// Fraction of the threshold reached (1.0 == 100%). Zero when the
    /// threshold is unset.
    pub percentage: f64,
    pub status: StatusCategory,
    /// Units still needed; zero unless `status` is `Below`.
    pub remaining: f64,
    pub suggestions: Vec<Suggestion>,
}

impl CalculationResult {
    pub fn show_suggestions(&self) -> bool {
        self.status == StatusCategory::Below
    }
}
