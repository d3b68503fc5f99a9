use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};
use rvutrack_core::format::truncate_string;

use crate::app::{App, AppState, Focus};

use super::styles;

/// Widest exam name shown before truncating.
const MAX_EXAM_NAME_WIDTH: usize = 32;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  RVU Tracker";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(columns[0]);

    render_threshold_field(frame, app, left[0]);
    render_exam_table(frame, app, left[1]);
    render_results(frame, app, columns[1]);
}

fn render_threshold_field(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Threshold;
    let mut text = app.form.threshold_text().to_string();
    if focused {
        text.push('_');
    }

    let block = Block::default()
        .title(" Daily RVU threshold ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_exam_table(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Count(_));
    let catalog = app.form.calculator().catalog();

    let rows: Vec<Row> = catalog
        .iter()
        .enumerate()
        .map(|(i, exam)| {
            let selected = app.focus == Focus::Count(i);
            let mut count = app.form.count_text(i).unwrap_or_default().to_string();
            if selected {
                count.push('_');
            }
            let style = if selected {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(truncate_string(&exam.name, MAX_EXAM_NAME_WIDTH)),
                Cell::from(exam.display_units()),
                Cell::from(count),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["Exam", "RVU/exam", "Count"]).style(styles::highlight_style());

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(9),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(" Exams read today ")
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused)),
    );

    frame.render_widget(table, area);
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(area);

    let summary = vec![
        Line::from(vec![
            Span::styled("Total RVUs:  ", styles::muted_style()),
            Span::styled(view.total_text.clone(), styles::title_style()),
        ]),
        Line::from(vec![
            Span::styled("Of target:   ", styles::muted_style()),
            Span::styled(view.percentage_text.clone(), styles::title_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(view.status_message.clone(), styles::tone_style(view.tone))),
    ];

    let summary_block = Block::default()
        .title(" Results ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(
        Paragraph::new(summary).block(summary_block).wrap(Wrap { trim: true }),
        chunks[0],
    );

    if !view.show_suggestions {
        return;
    }

    let items: Vec<ListItem> = view
        .suggestions
        .iter()
        .map(|s| ListItem::new(format!("- {}", s)).style(styles::list_item_style()))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(" To reach your target, read one of ")
            .borders(Borders::ALL)
            .border_style(styles::border_style(false)),
    );
    frame.render_widget(list, chunks[1]);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[Tab] next | [+/-] count | [Ctrl+R] reset | [Esc] quit";

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} exam types ", app.form.count_texts().len()),
    };
    let padding = (area.width as usize).saturating_sub(left_text.len() + shortcuts.len() + 1);

    let line = Line::from(vec![
        Span::raw(left_text),
        Span::raw(" ".repeat(padding)),
        Span::raw(shortcuts),
    ]);

    frame.render_widget(Paragraph::new(line).style(styles::status_bar_style()), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());

    let bindings = [
        ("Tab / Down", "Next field"),
        ("Shift+Tab / Up", "Previous field"),
        ("0-9 .", "Edit the focused field"),
        ("Backspace", "Delete last character"),
        ("+ / -", "Add or remove one exam"),
        ("Ctrl+R", "Reset all fields"),
        ("Esc / Ctrl+C", "Quit"),
    ];

    let lines: Vec<Line> = bindings
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{:>16}  ", key), styles::help_key_style()),
                Span::styled(*desc, styles::help_desc_style()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Rectangle of the given percentage size centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
