use crate::app::{App, AppEvent, Focus, InputMode, NavEntry};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input and return corresponding events
/// Does not mutate app state directly - returns events to be processed
pub fn handle_input_event(key: KeyEvent, app: &App) -> Vec<AppEvent> {
    // If help is showing, most keys just hide help (except quit)
    if app.show_help {
        return handle_help_mode(key);
    }

    match app.input_mode {
        InputMode::EditingField => handle_edit_mode(key),
        InputMode::Normal => handle_normal_mode(key, app),
    }
}

/// Handle keyboard input when help overlay is showing
fn handle_help_mode(key: KeyEvent) -> Vec<AppEvent> {
    match key.code {
        KeyCode::Char('q') => vec![AppEvent::Quit],
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            vec![AppEvent::Quit]
        }
        // Any other key hides help
        _ => vec![AppEvent::HideHelp],
    }
}

/// Handle keyboard input while a connection field is being edited
fn handle_edit_mode(key: KeyEvent) -> Vec<AppEvent> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            vec![AppEvent::Quit]
        }
        KeyCode::Char(c) => vec![AppEvent::EditChar(c)],
        KeyCode::Backspace => vec![AppEvent::EditBackspace],
        KeyCode::Enter => vec![AppEvent::EditSubmit],
        KeyCode::Esc => vec![AppEvent::EditCancel],
        _ => vec![],
    }
}

/// Handle keyboard input in normal navigation mode
fn handle_normal_mode(key: KeyEvent, app: &App) -> Vec<AppEvent> {
    match key.code {
        KeyCode::Char('q') => return vec![AppEvent::Quit],
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return vec![AppEvent::Quit]
        }
        KeyCode::Char('?') => return vec![AppEvent::ShowHelp],
        KeyCode::Tab => return vec![AppEvent::ToggleFocus],
        KeyCode::Char(c @ '1'..='9') => {
            let idx = c as usize - '1' as usize;
            return vec![AppEvent::SelectNav(idx)];
        }
        _ => {}
    }

    match app.focus {
        Focus::Sidebar => handle_sidebar(key),
        Focus::Content => match app.active_entry() {
            NavEntry::Home => handle_home(key),
            NavEntry::Connection => handle_connection_panel(key),
            NavEntry::Audio => handle_audio_panel(key),
            NavEntry::Category(_) => handle_data_panel(key),
        },
    }
}

fn handle_sidebar(key: KeyEvent) -> Vec<AppEvent> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => vec![AppEvent::NavDown],
        KeyCode::Up | KeyCode::Char('k') => vec![AppEvent::NavUp],
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => vec![AppEvent::FocusContent],
        _ => vec![],
    }
}

fn handle_home(key: KeyEvent) -> Vec<AppEvent> {
    match key.code {
        KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => vec![AppEvent::FocusSidebar],
        _ => vec![],
    }
}

fn handle_data_panel(key: KeyEvent) -> Vec<AppEvent> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => vec![AppEvent::RowSelectDown],
        KeyCode::Up | KeyCode::Char('k') => vec![AppEvent::RowSelectUp],
        KeyCode::Char('g') | KeyCode::Home => vec![AppEvent::RowSelectFirst],
        KeyCode::Char('G') | KeyCode::End => vec![AppEvent::RowSelectLast],
        KeyCode::Enter | KeyCode::Char(' ') => vec![AppEvent::ToggleExpanded],
        KeyCode::Char('a') => vec![AppEvent::ToggleActions],
        KeyCode::Char('K') => vec![AppEvent::MoveRowUp],
        KeyCode::Char('J') => vec![AppEvent::MoveRowDown],
        KeyCode::Char('d') | KeyCode::Delete => vec![AppEvent::DeleteRow],
        KeyCode::Char('C') => vec![AppEvent::ClearPanel],
        KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => vec![AppEvent::FocusSidebar],
        _ => vec![],
    }
}

fn handle_connection_panel(key: KeyEvent) -> Vec<AppEvent> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => vec![AppEvent::FieldNext],
        KeyCode::Up | KeyCode::Char('k') => vec![AppEvent::FieldPrev],
        KeyCode::Char('e') | KeyCode::Enter => vec![AppEvent::StartEdit],
        KeyCode::Char('c') => vec![AppEvent::Connect],
        KeyCode::Char('x') => vec![AppEvent::Disconnect],
        KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => vec![AppEvent::FocusSidebar],
        _ => vec![],
    }
}

fn handle_audio_panel(key: KeyEvent) -> Vec<AppEvent> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => vec![AppEvent::FieldNext],
        KeyCode::Up | KeyCode::Char('k') => vec![AppEvent::FieldPrev],
        KeyCode::Left | KeyCode::Char('h') => vec![AppEvent::AdjustDown],
        KeyCode::Right | KeyCode::Char('l') => vec![AppEvent::AdjustUp],
        KeyCode::Char('s') => vec![AppEvent::ToggleCapture],
        KeyCode::Char('r') => vec![AppEvent::RefreshDevices],
        KeyCode::Esc => vec![AppEvent::FocusSidebar],
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solis::config::Config;
    use solis::prefs::Prefs;

    fn new_app() -> App {
        App::new(&Config::default(), Prefs::ephemeral())
    }

    fn app_on(entry_idx: usize) -> App {
        let mut app = new_app();
        app.nav_selected = entry_idx;
        app.focus = Focus::Content;
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_on_q() {
        let app = new_app();
        let events = handle_input_event(key(KeyCode::Char('q')), &app);
        assert_eq!(events, vec![AppEvent::Quit]);
    }

    #[test]
    fn test_quit_on_ctrl_c() {
        let app = new_app();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let events = handle_input_event(key, &app);
        assert_eq!(events, vec![AppEvent::Quit]);
    }

    #[test]
    fn test_sidebar_navigation() {
        let app = new_app();
        assert_eq!(
            handle_input_event(key(KeyCode::Char('j')), &app),
            vec![AppEvent::NavDown]
        );
        assert_eq!(
            handle_input_event(key(KeyCode::Enter), &app),
            vec![AppEvent::FocusContent]
        );
    }

    #[test]
    fn test_digit_jumps_to_entry() {
        let app = new_app();
        assert_eq!(
            handle_input_event(key(KeyCode::Char('4')), &app),
            vec![AppEvent::SelectNav(3)]
        );
    }

    #[test]
    fn test_tab_toggles_focus() {
        let app = app_on(5);
        assert_eq!(
            handle_input_event(key(KeyCode::Tab), &app),
            vec![AppEvent::ToggleFocus]
        );
    }

    #[test]
    fn test_data_panel_keys() {
        // First telemetry category follows Home, Connection, Audio
        let app = app_on(3);
        assert_eq!(
            handle_input_event(key(KeyCode::Char('j')), &app),
            vec![AppEvent::RowSelectDown]
        );
        assert_eq!(
            handle_input_event(key(KeyCode::Char(' ')), &app),
            vec![AppEvent::ToggleExpanded]
        );
        assert_eq!(
            handle_input_event(key(KeyCode::Char('a')), &app),
            vec![AppEvent::ToggleActions]
        );
        assert_eq!(
            handle_input_event(key(KeyCode::Char('K')), &app),
            vec![AppEvent::MoveRowUp]
        );
        assert_eq!(
            handle_input_event(key(KeyCode::Char('d')), &app),
            vec![AppEvent::DeleteRow]
        );
    }

    #[test]
    fn test_connection_panel_keys() {
        let app = app_on(1);
        assert_eq!(
            handle_input_event(key(KeyCode::Char('c')), &app),
            vec![AppEvent::Connect]
        );
        assert_eq!(
            handle_input_event(key(KeyCode::Char('x')), &app),
            vec![AppEvent::Disconnect]
        );
        assert_eq!(
            handle_input_event(key(KeyCode::Char('e')), &app),
            vec![AppEvent::StartEdit]
        );
    }

    #[test]
    fn test_edit_mode_captures_text() {
        let mut app = app_on(1);
        app.input_mode = InputMode::EditingField;
        // 'q' is text here, not quit
        assert_eq!(
            handle_input_event(key(KeyCode::Char('q')), &app),
            vec![AppEvent::EditChar('q')]
        );
        assert_eq!(
            handle_input_event(key(KeyCode::Esc), &app),
            vec![AppEvent::EditCancel]
        );
    }

    #[test]
    fn test_audio_panel_keys() {
        let app = app_on(2);
        assert_eq!(
            handle_input_event(key(KeyCode::Char('l')), &app),
            vec![AppEvent::AdjustUp]
        );
        assert_eq!(
            handle_input_event(key(KeyCode::Char('s')), &app),
            vec![AppEvent::ToggleCapture]
        );
    }

    #[test]
    fn test_help_mode_hides_on_any_key() {
        let mut app = new_app();
        app.show_help = true;
        assert_eq!(
            handle_input_event(key(KeyCode::Char('j')), &app),
            vec![AppEvent::HideHelp]
        );
    }
}
