//! Keyboard input handling for the TUI.
//!
//! Every edit goes through the `ExamForm`, which recalculates and notifies
//! the display subscriber before the next frame is drawn.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') {
            app.reset();
        }
        return false;
    }

    app.status_message = None;

    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::Char('+') => app.adjust_count(1),
        KeyCode::Char('-') => app.adjust_count(-1),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.type_char(c),
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Focus;
    use rvutrack_core::AppConfig;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_escape_quits() {
        let mut app = App::new(&AppConfig::default());
        assert!(handle_input(&mut app, key(KeyCode::Esc)));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = App::new(&AppConfig::default());
        handle_input(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::ShowingHelp);
        assert!(!handle_input(&mut app, key(KeyCode::Char('5'))));
        assert_eq!(app.form.threshold_text(), "");
        handle_input(&mut app, key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_tally_with_plus() {
        let mut app = App::new(&AppConfig::default());
        handle_input(&mut app, key(KeyCode::Char('4')));
        handle_input(&mut app, key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Count(0));
        handle_input(&mut app, key(KeyCode::Char('+')));
        handle_input(&mut app, key(KeyCode::Char('+')));
        assert_eq!(app.form.count_text(0), Some("2"));
        assert_eq!(app.view().tone, rvutrack_core::StatusTone::Success);
    }

    #[test]
    fn test_ctrl_r_resets() {
        let mut app = App::new(&AppConfig::default());
        handle_input(&mut app, key(KeyCode::Char('9')));
        handle_input(&mut app, KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(app.form.threshold_text(), "");
    }
}
