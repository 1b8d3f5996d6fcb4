use crate::app::{catalog, App, Focus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use solis::store::RowView;

const SELECTED_BG: Color = Color::DarkGray;
const EXPANDED_BG: Color = Color::Rgb(30, 30, 40);
/// Payload lines shown under an expanded row before the rest is elided
const MAX_PAYLOAD_LINES: usize = 20;

pub(super) fn render_data_panel(f: &mut Frame, area: Rect, app: &mut App, category: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let header = Paragraph::new(Line::from(Span::styled(
        format!(" {}", catalog::subtitle_for(category)),
        Style::default().fg(Color::DarkGray),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                category.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(header, chunks[0]);

    // Re-derived every frame; nothing about the rows is cached between draws
    let rows = app.store.view(category);
    let ids: Vec<&str> = rows.iter().map(|v| v.row.id.as_str()).collect();
    let visible_height = chunks[1].height.saturating_sub(2) as usize;
    let resolved = app.viewport_mut(category).resolve(&ids, visible_height);
    let is_focused = app.focus == Focus::Content;

    // The viewport counts rows, but expanded rows span many lines
    let heights: Vec<usize> = rows.iter().map(row_height).collect();
    let start_idx = fit_selected(
        &heights,
        resolved.scroll_position,
        resolved.selected_index,
        visible_height,
    );

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .skip(start_idx)
        .map(|(idx, view)| {
            let selected = is_focused && idx == resolved.selected_index;
            ListItem::new(row_lines(view, selected))
        })
        .collect();

    let title = format!("Rows ({})", rows.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    if items.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            " Waiting for data...",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        f.render_widget(empty, chunks[1]);
        return;
    }

    f.render_widget(List::new(items).block(block), chunks[1]);
}

fn row_lines(view: &RowView, selected: bool) -> Vec<Line<'static>> {
    let row = &view.row;
    let arrow = if view.expanded { "▼" } else { "▶" };
    let label = if row.label.is_empty() {
        row.id.as_str()
    } else {
        row.label.as_str()
    };

    let mut header = vec![
        Span::raw(format!(" {} ", arrow)),
        Span::styled(
            format!("{} ", row.timestamp),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(label.to_string(), Style::default().fg(Color::White)),
    ];
    if let Some(packet_id) = &row.packet_id {
        header.push(Span::styled(
            format!("  #{}", packet_id),
            Style::default().fg(Color::Cyan),
        ));
    }
    if view.actions_open {
        header.push(Span::styled(
            "  [K] up  [J] down  [d] delete",
            Style::default().fg(Color::Yellow),
        ));
    }
    if selected {
        for span in &mut header {
            span.style = span.style.bg(SELECTED_BG).add_modifier(Modifier::BOLD);
        }
    }

    let mut lines = vec![Line::from(header)];
    if view.expanded {
        let body = payload_lines(&row.payload);
        let total = body.len();
        for text in body.into_iter().take(MAX_PAYLOAD_LINES) {
            lines.push(
                Line::from(Span::raw(format!("     {}", text)))
                    .style(Style::default().bg(EXPANDED_BG)),
            );
        }
        if total > MAX_PAYLOAD_LINES {
            lines.push(Line::from(Span::styled(
                format!("     ... {} more lines", total - MAX_PAYLOAD_LINES),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines
}

/// Lines a row occupies in the list.
fn row_height(view: &RowView) -> usize {
    if !view.expanded {
        return 1;
    }
    let body = payload_lines(&view.row.payload).len();
    let overflow = usize::from(body > MAX_PAYLOAD_LINES);
    1 + body.min(MAX_PAYLOAD_LINES) + overflow
}

/// Advance `start_idx` until the selected row's last line fits in `visible_height`.
fn fit_selected(
    heights: &[usize],
    mut start_idx: usize,
    selected: usize,
    visible_height: usize,
) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let end = selected.min(heights.len() - 1);
    start_idx = start_idx.min(end);
    let mut visual_rows: usize = heights[start_idx..=end].iter().sum();
    while visual_rows > visible_height && start_idx < end {
        visual_rows -= heights[start_idx];
        start_idx += 1;
    }
    start_idx
}

/// Split a payload for display, pretty-printing it first when it is JSON.
fn payload_lines(payload: &str) -> Vec<String> {
    let pretty = serde_json::from_str::<serde_json::Value>(payload)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok());
    let text = pretty.as_deref().unwrap_or(payload);
    if text.is_empty() {
        return vec!["(empty)".to_string()];
    }
    text.lines().map(str::to_string).collect()
}
