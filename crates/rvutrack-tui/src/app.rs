//! Application state for the RVU tracker TUI.
//!
//! The `App` owns the `ExamForm` and subscribes to it like any other UI
//! adapter: every recalculation lands in `display`, which the renderer
//! reads.

use std::sync::{Arc, Mutex};

use rvutrack_core::{AppConfig, Calculator, ExamForm, TotalsView};
use tracing::{debug, warn};

// ============================================================================
// Constants
// ============================================================================

/// Maximum characters accepted in a numeric field.
const MAX_FIELD_LENGTH: usize = 12;

/// Which input currently has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Threshold,
    Count(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    Quitting,
}

pub struct App {
    pub form: ExamForm,
    pub state: AppState,
    pub focus: Focus,
    pub status_message: Option<String>,
    display: Arc<Mutex<TotalsView>>,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let mut form = ExamForm::new(Calculator::new(Arc::clone(&config.catalog)));
        let display = Arc::new(Mutex::new(form.current().clone()));

        let sink = Arc::clone(&display);
        form.subscribe(move |update| {
            debug!(
                threshold = update.threshold_text,
                total = %update.view.total_text,
                tone = ?update.view.tone,
                "Totals updated"
            );
            match sink.lock() {
                Ok(mut view) => *view = update.view.clone(),
                Err(e) => warn!(error = %e, "Display state poisoned, skipping update"),
            }
        });

        Self {
            form,
            state: AppState::Normal,
            focus: Focus::Threshold,
            status_message: None,
            display,
        }
    }

    /// The most recent view pushed by the form.
    pub fn view(&self) -> TotalsView {
        match self.display.lock() {
            Ok(view) => view.clone(),
            Err(_) => self.form.current().clone(),
        }
    }

    fn field_count(&self) -> usize {
        self.form.count_texts().len() + 1
    }

    fn focus_index(&self) -> usize {
        match self.focus {
            Focus::Threshold => 0,
            Focus::Count(i) => i + 1,
        }
    }

    fn focus_from_index(index: usize) -> Focus {
        match index {
            0 => Focus::Threshold,
            i => Focus::Count(i - 1),
        }
    }

    pub fn focus_next(&mut self) {
        let next = (self.focus_index() + 1) % self.field_count();
        self.focus = Self::focus_from_index(next);
    }

    pub fn focus_prev(&mut self) {
        let count = self.field_count();
        let prev = (self.focus_index() + count - 1) % count;
        self.focus = Self::focus_from_index(prev);
    }

    /// Text of the focused field.
    pub fn focused_text(&self) -> String {
        match self.focus {
            Focus::Threshold => self.form.threshold_text().to_string(),
            Focus::Count(i) => self.form.count_text(i).unwrap_or_default().to_string(),
        }
    }

    fn set_focused_text(&mut self, text: String) {
        match self.focus {
            Focus::Threshold => self.form.set_threshold(text),
            Focus::Count(i) => {
                if let Err(e) = self.form.set_count(i, text) {
                    warn!(error = %e, "Count field out of range");
                    self.status_message = Some(e.to_string());
                }
            }
        }
    }

    pub fn type_char(&mut self, c: char) {
        let mut text = self.focused_text();
        // A field still showing the initial "0" is replaced, not appended to
        if text == "0" && c.is_ascii_digit() {
            text.clear();
        }
        if can_add_field_char(text.len(), c) {
            text.push(c);
            self.set_focused_text(text);
        }
    }

    pub fn backspace(&mut self) {
        let mut text = self.focused_text();
        text.pop();
        self.set_focused_text(text);
    }

    /// Bump the focused count by `delta`, never below zero.
    pub fn adjust_count(&mut self, delta: i64) {
        let Focus::Count(i) = self.focus else {
            return;
        };
        let current = rvutrack_core::parse_count(self.form.count_text(i).unwrap_or_default());
        let next = (current.floor() as i64 + delta).max(0);
        self.set_focused_text(next.to_string());
    }

    pub fn reset(&mut self) {
        self.form.reset();
        self.status_message = Some("Form reset".to_string());
    }
}

fn is_valid_field_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_field_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(&AppConfig::default())
    }

    #[test]
    fn test_focus_wraps() {
        let mut app = app();
        assert_eq!(app.focus, Focus::Threshold);
        app.focus_next();
        assert_eq!(app.focus, Focus::Count(0));
        app.focus_prev();
        app.focus_prev();
        assert_eq!(app.focus, Focus::Count(3));
        app.focus_next();
        assert_eq!(app.focus, Focus::Threshold);
    }

    #[test]
    fn test_typing_updates_display() {
        let mut app = app();
        for c in "10".chars() {
            app.type_char(c);
        }
        app.focus_next();
        app.type_char('1');
        let view = app.view();
        assert_eq!(app.form.count_text(0), Some("1"));
        assert_eq!(view.total_text, "2.21");
        assert_eq!(view.percentage_text, "22.10%");
        assert!(view.show_suggestions);
    }

    #[test]
    fn test_adjust_count_clamps_at_zero() {
        let mut app = app();
        app.focus = Focus::Count(2);
        app.adjust_count(3);
        assert_eq!(app.form.count_text(2), Some("3"));
        app.adjust_count(-5);
        assert_eq!(app.form.count_text(2), Some("0"));

        app.focus = Focus::Threshold;
        app.adjust_count(1);
        assert_eq!(app.form.threshold_text(), "");
    }

    #[test]
    fn test_backspace_and_reset() {
        let mut app = app();
        app.type_char('8');
        app.backspace();
        assert_eq!(app.form.threshold_text(), "");
        app.type_char('5');
        app.reset();
        assert_eq!(app.view().status_message, "Please enter a valid threshold.");
    }

    #[test]
    fn test_can_add_field_char() {
        assert!(can_add_field_char(0, '7'));
        assert!(can_add_field_char(3, '.'));
        assert!(!can_add_field_char(0, 'a'));
        assert!(!can_add_field_char(MAX_FIELD_LENGTH, '1'));
    }
}
