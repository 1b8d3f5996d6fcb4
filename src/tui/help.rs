use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

// Help overlay dimensions (as percentage of screen)
const HELP_POPUP_WIDTH_PERCENT: f32 = 0.6;
const HELP_POPUP_HEIGHT_PERCENT: f32 = 0.8;

fn section(title: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )])
}

pub(super) fn render_help_overlay(f: &mut Frame, area: Rect) {
    // Calculate centered popup area
    let popup_width = (area.width as f32 * HELP_POPUP_WIDTH_PERCENT) as u16;
    let popup_height = (area.height as f32 * HELP_POPUP_HEIGHT_PERCENT) as u16;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect {
        x: area.x + popup_x,
        y: area.y + popup_y,
        width: popup_width,
        height: popup_height,
    };

    let help_lines = vec![
        Line::from(vec![Span::styled(
            "Solis - Quick Reference",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        section("Navigation"),
        Line::from("  Tab           Toggle sidebar / panel focus"),
        Line::from("  1-9           Jump to sidebar entry"),
        Line::from("  j/k, ↑/↓      Move selection"),
        Line::from("  Enter, l      Open panel"),
        Line::from("  Esc, h        Back to sidebar"),
        Line::from(""),
        section("Telemetry Panels"),
        Line::from("  Space, Enter  Expand/collapse row"),
        Line::from("  g / G         First / last row"),
        Line::from("  a             Open/close row menu"),
        Line::from("  K / J         Move row up / down (menu open)"),
        Line::from("  d             Delete row (menu open)"),
        Line::from("  C             Clear panel"),
        Line::from(""),
        section("Connection"),
        Line::from("  e             Edit field (Enter saves, Esc cancels)"),
        Line::from("  c / x         Connect / disconnect"),
        Line::from(""),
        section("Audio"),
        Line::from("  h/l, ←/→      Change device or volume"),
        Line::from("  s             Start/stop capture"),
        Line::from("  r             Refresh device lists"),
        Line::from(""),
        section("General"),
        Line::from("  ?             Show this help"),
        Line::from("  q, Ctrl+C     Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )]),
    ];

    let help_paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(help_paragraph, popup_area);
}
