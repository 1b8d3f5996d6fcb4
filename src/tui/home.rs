use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub(super) fn render_home(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    let welcome = vec![
        Line::from(Span::styled(
            " Welcome to Solis",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(" Live telemetry from your racing simulator, grouped by packet type."),
        Line::from(Span::styled(
            " Tab to focus a panel, 1-9 to jump, ? for help.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(welcome).block(Block::default().borders(Borders::ALL).title("Home")),
        chunks[0],
    );

    let card_count = app.home_cards.len().max(1) as u32;
    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, card_count); card_count as usize])
        .split(chunks[1]);

    for (card, card_area) in app.home_cards.iter().zip(card_areas.iter()) {
        let body = Paragraph::new(vec![
            Line::from(Span::styled(
                card.subtitle,
                Style::default().fg(Color::Yellow),
            )),
            Line::from(""),
            Line::from(card.description),
        ])
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(card.title));
        f.render_widget(body, *card_area);
    }
}
