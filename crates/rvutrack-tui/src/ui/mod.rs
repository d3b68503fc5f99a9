//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout for the exam table, totals, and suggestions
//! - `input`: keyboard event handling
//! - `styles`: color palette and status tones

pub mod input;
pub mod render;
pub mod styles;
