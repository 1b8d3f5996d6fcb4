use crate::app::{App, Focus, NavEntry};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub(super) fn render_side_panel(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(6)])
        .split(area);

    render_nav_list(f, chunks[0], app);
    render_stats_panel(f, chunks[1], app);
}

fn section_header(title: &str) -> ListItem<'static> {
    ListItem::new(Line::from(vec![Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
}

/// Shorten `name` to `max_width` columns, marking the cut with "...".
fn truncate_name(name: &str, max_width: usize) -> String {
    if name.width() <= max_width {
        return name.to_string();
    }
    let mut out = String::new();
    for ch in name.chars() {
        if out.width() + 3 >= max_width {
            break;
        }
        out.push(ch);
    }
    format!("{}...", out)
}

fn render_nav_list(f: &mut Frame, area: Rect, app: &App) {
    let entries = app.nav_entries();
    let active = app.nav_selected.min(entries.len() - 1);
    let is_focused = app.focus == Focus::Sidebar;

    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_row = 0usize;

    for (idx, entry) in entries.iter().enumerate() {
        // Headers sit above the first panel and the first telemetry category
        if idx == 0 {
            items.push(section_header("General"));
        } else if idx == 3 {
            items.push(section_header("Telemetry"));
        }

        let number = if idx < 9 {
            format!("{}", idx + 1)
        } else {
            " ".to_string()
        };
        let indicator = if idx == active { ">" } else { " " };

        let count = match entry {
            NavEntry::Category(name) => Some(app.store.category_len(name)),
            _ => None,
        };
        let meta = count.map(|c| format!(" {}", format_count(c))).unwrap_or_default();

        let max_len = (area.width as usize).saturating_sub(8 + meta.len());
        let name = truncate_name(entry.title(), max_len);

        let item_style = if idx == active && is_focused {
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else if idx == active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let mut line = Line::from(vec![Span::styled(
            format!("  {}{} {}", number, indicator, name),
            item_style,
        )]);
        if let Some(c) = count {
            let color = if c > 0 { Color::Green } else { Color::DarkGray };
            line.spans.push(Span::styled(meta, Style::default().fg(color)));
        }

        if idx == active {
            selected_row = items.len();
        }
        items.push(ListItem::new(line));
    }

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Solis"),
    );

    let mut state = ListState::default();
    state.select(Some(selected_row));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_stats_panel(f: &mut Frame, area: Rect, app: &App) {
    let lines = vec![
        Line::from(vec![
            Span::styled(" Rows: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_count(app.store.total_rows())),
        ]),
        Line::from(vec![
            Span::styled(" Batches: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_count(app.batches_received as usize)),
        ]),
        Line::from(vec![
            Span::styled(" Dups: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_count(app.ingest_totals.duplicates)),
        ]),
        Line::from(vec![
            Span::styled(" Evicted: ", Style::default().fg(Color::DarkGray)),
            Span::raw(format_count(app.ingest_totals.evicted)),
        ]),
    ];
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Stats"));
    f.render_widget(paragraph, area);
}

pub(super) fn format_count(count: usize) -> String {
    if count >= 1_000_000 {
        let val = count as f64 / 1_000_000.0;
        if val >= 10.0 {
            format!("{}M", val as u64)
        } else {
            format!("{:.1}M", val)
        }
    } else if count >= 1_000 {
        let val = count as f64 / 1_000.0;
        if val >= 10.0 {
            format!("{}K", val as u64)
        } else {
            format!("{:.1}K", val)
        }
    } else {
        count.to_string()
    }
}
