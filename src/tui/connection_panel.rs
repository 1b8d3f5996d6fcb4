use crate::app::forms::{ConnectionField, PACKET_FORMATS};
use crate::app::{catalog, App, Focus};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn render_connection_panel(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.connection;
    let focused = app.focus == Focus::Content;

    let field_line = |label: &str, value: String, field: ConnectionField| {
        let is_current = focused && form.field == field;
        let marker = if is_current { ">" } else { " " };
        let editing = is_current && form.is_editing();
        let value_style = if editing {
            Style::default().fg(Color::Yellow)
        } else if is_current {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let shown = if editing {
            format!("{}_", form.edit_buffer.as_deref().unwrap_or_default())
        } else {
            value
        };
        Line::from(vec![
            Span::styled(format!(" {} {:<16}", marker, label), Style::default().fg(Color::Cyan)),
            Span::styled(shown, value_style),
        ])
    };

    let status = if form.connected {
        Span::styled(
            format!("Listening on {}:{}", form.address, form.port),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::styled(
            "No connection established",
            Style::default().fg(Color::Red),
        )
    };

    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", catalog::CONNECTION.subtitle),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        field_line("UDP Address", form.address.clone(), ConnectionField::Address),
        field_line("UDP Port", form.port.clone(), ConnectionField::Port),
        field_line(
            "Packet Format",
            format!("{} (supported: {})", form.packet_format, PACKET_FORMATS.join(", ")),
            ConnectionField::PacketFormat,
        ),
        Line::from(""),
        Line::from(vec![Span::raw(" Status: "), status]),
        Line::from(""),
        Line::from(Span::styled(
            " j/k field | e edit | c connect | x disconnect",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(catalog::CONNECTION.title),
    );
    f.render_widget(paragraph, area);
}
