mod audio_panel;
mod connection_panel;
mod data_panel;
mod help;
mod home;
mod side_panel;
mod status_bar;

use crate::app::{App, NavEntry};
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App) -> Result<()> {
    // Main horizontal layout: side panel + content area
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(app.side_panel_width), Constraint::Min(1)])
        .split(f.area());

    side_panel::render_side_panel(f, main_chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Main content
            Constraint::Length(4), // Status bar (2 lines + borders)
        ])
        .split(main_chunks[1]);

    match app.active_entry() {
        NavEntry::Home => home::render_home(f, content_chunks[0], app),
        NavEntry::Connection => connection_panel::render_connection_panel(f, content_chunks[0], app),
        NavEntry::Audio => audio_panel::render_audio_panel(f, content_chunks[0], app),
        NavEntry::Category(category) => {
            data_panel::render_data_panel(f, content_chunks[0], app, &category)
        }
    }
    status_bar::render_status_bar(f, content_chunks[1], app);

    // Render help overlay on top of everything if active
    if app.show_help {
        help::render_help_overlay(f, f.area());
    }

    Ok(())
}
