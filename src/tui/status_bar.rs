use crate::app::{App, Focus, NavEntry};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use solis::store::MAX_ROWS;

pub(super) fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let entry = app.active_entry();

    let panel_text = match &entry {
        NavEntry::Category(name) => format!(
            "{} {}/{}",
            name,
            app.store.category_len(name),
            MAX_ROWS
        ),
        other => other.title().to_string(),
    };
    let link = if app.connection.connected {
        "LISTENING"
    } else {
        "OFFLINE"
    };
    let status_text = format!(
        " {} | Total rows: {} | {} | Focus: {}",
        panel_text,
        app.store.total_rows(),
        link,
        match app.focus {
            Focus::Sidebar => "sidebar",
            Focus::Content => "panel",
        }
    );

    let status_msg = app
        .status_message
        .as_ref()
        .filter(|(_, t)| t.elapsed().as_secs() < 3);

    let bottom_line = if let Some((msg, _)) = status_msg {
        Line::from(vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(Color::Green),
        )])
    } else {
        let help_text = match (&entry, app.focus) {
            (NavEntry::Category(_), Focus::Content) => {
                " j/k - Select | Space - Expand | a - Row menu | C - Clear | ? - Help"
            }
            _ => " q - Quit | Tab - Focus | 1-9 - Jump | j/k - Navigate | ? - Help",
        };
        Line::from(vec![Span::styled(
            help_text,
            Style::default().fg(Color::DarkGray),
        )])
    };

    let status_lines = vec![
        Line::from(vec![Span::styled(
            status_text,
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        bottom_line,
    ];

    let paragraph =
        Paragraph::new(status_lines).block(Block::default().borders(Borders::ALL).title("Status"));

    f.render_widget(paragraph, area);
}
