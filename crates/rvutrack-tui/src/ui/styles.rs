use ratatui::style::{Color, Modifier, Style};
use rvutrack_core::StatusTone;

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

/// Status colors, matching the web front-end's tones.
pub const SUCCESS: Color = Color::Rgb(0x2b, 0x8a, 0x3e);
pub const DANGER: Color = Color::Rgb(0xc9, 0x2a, 0x2a);

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

/// Status message style. The neutral tone is lifted to white so it stays
/// readable on dark terminals.
pub fn tone_style(tone: StatusTone) -> Style {
    let color = match tone {
        StatusTone::Neutral => Color::White,
        StatusTone::Success => SUCCESS,
        StatusTone::Danger => DANGER,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
