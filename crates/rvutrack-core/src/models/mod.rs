//! Data models for the RVU tracker.
//!
//! - `ExamType`, `ExamCatalog`: the fixed list of exam kinds and their RVU weights
//! - `CalculationResult`, `StatusCategory`, `Suggestion`: derived totals

pub mod exam;
pub mod result;

pub use exam::{ExamCatalog, ExamType};
pub use result::{CalculationResult, StatusCategory, Suggestion};
