//! Core library for rvutrack.
//!
//! Tracks daily radiology reading productivity: per-exam counts are weighted
//! by RVU, summed, and compared to a daily target, with suggestions for
//! closing any gap. A separate offline worker keeps the web front-end's
//! assets cached for use without a network.

pub mod assets;
pub mod calculator;
pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod format;
pub mod models;

pub use calculator::{calculate, parse_count, parse_threshold, Calculator};
pub use config::{AppConfig, CacheSettings, Config};
pub use display::{StatusTone, TotalsView};
pub use error::{CacheError, ConfigError, FetchError, FormError};
pub use form::{ExamForm, FormUpdate, SubscriptionId};
pub use models::{CalculationResult, ExamCatalog, ExamType, StatusCategory, Suggestion};
