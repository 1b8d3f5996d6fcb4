use crate::app::forms::AudioField;
use crate::app::{catalog, App, Focus};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const VOLUME_BAR_WIDTH: usize = 20;

fn volume_bar(volume: u8) -> String {
    let filled = volume as usize * VOLUME_BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(VOLUME_BAR_WIDTH - filled),
        volume
    )
}

pub(super) fn render_audio_panel(f: &mut Frame, area: Rect, app: &App) {
    let audio = &app.audio;
    let focused = app.focus == Focus::Content;

    let field_line = |label: &str, value: String, field: AudioField| {
        let is_current = focused && audio.field == field;
        let marker = if is_current { ">" } else { " " };
        let style = if is_current {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Line::from(vec![
            Span::styled(format!(" {} {:<16}", marker, label), Style::default().fg(Color::Cyan)),
            Span::styled(value, style),
        ])
    };

    let capture = if audio.capturing {
        Span::styled("capturing", Style::default().fg(Color::Green))
    } else {
        Span::styled("idle", Style::default().fg(Color::DarkGray))
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", catalog::AUDIO.subtitle),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        field_line(
            "Input Device",
            format!("< {} >", audio.selected_input),
            AudioField::InputDevice,
        ),
        field_line(
            "Output Device",
            format!("< {} >", audio.selected_output),
            AudioField::OutputDevice,
        ),
        field_line(
            "Input Volume",
            volume_bar(audio.input_volume),
            AudioField::InputVolume,
        ),
        field_line(
            "Output Volume",
            volume_bar(audio.output_volume),
            AudioField::OutputVolume,
        ),
        Line::from(""),
        Line::from(vec![Span::raw(" Capture: "), capture]),
        Line::from(""),
        Line::from(Span::styled(
            " Available inputs",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    lines.extend(
        audio
            .input_devices
            .iter()
            .map(|d| Line::from(format!("   {}", d))),
    );
    lines.push(Line::from(Span::styled(
        " Available outputs",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.extend(
        audio
            .output_devices
            .iter()
            .map(|d| Line::from(format!("   {}", d))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " j/k field | h/l change | s capture | r refresh devices",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(catalog::AUDIO.title));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_bar() {
        assert_eq!(volume_bar(0), format!("[{}]   0%", "-".repeat(20)));
        assert_eq!(volume_bar(100), format!("[{}] 100%", "#".repeat(20)));
        assert!(volume_bar(50).starts_with("[##########-"));
    }
}
