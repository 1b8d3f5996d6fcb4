pub mod catalog;
pub mod event;
pub mod forms;
pub mod viewport;

pub use event::AppEvent;

use catalog::PanelInfo;
use forms::{AudioChange, AudioSettings, ConnectionForm};
use rand::seq::SliceRandom;
use solis::config::Config;
use solis::host::Host;
use solis::prefs::Prefs;
use solis::store::{MergeSummary, MoveDirection, RowStore};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn};
use viewport::RowViewport;

/// Number of cards shown on the welcome screen
const HOME_CARD_COUNT: usize = 3;

/// Default side panel width in columns
const SIDE_PANEL_WIDTH: u16 = 28;

/// One destination in the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    Home,
    Connection,
    Audio,
    Category(String),
}

impl NavEntry {
    pub fn title(&self) -> &str {
        match self {
            NavEntry::Home => "Home",
            NavEntry::Connection => catalog::CONNECTION.title,
            NavEntry::Audio => catalog::AUDIO.title,
            NavEntry::Category(name) => name,
        }
    }
}

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

/// Input mode for user interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingField,
}

/// Main application state
pub struct App {
    /// All telemetry rows and their UI flags
    pub store: RowStore,

    /// Index into [`App::nav_entries`]
    pub nav_selected: usize,

    pub focus: Focus,

    pub input_mode: InputMode,

    pub connection: ConnectionForm,

    pub audio: AudioSettings,

    /// Panels featured on the welcome screen, picked once per session
    pub home_cards: Vec<&'static PanelInfo>,

    /// Transient message shown in the status bar
    pub status_message: Option<(String, Instant)>,

    /// Batches delivered by the ingestion listener so far
    pub batches_received: u64,

    /// Running merge counters since startup
    pub ingest_totals: MergeSummary,

    pub show_help: bool,

    pub should_quit: bool,

    pub side_panel_width: u16,

    /// Per-category selection state
    viewports: HashMap<String, RowViewport>,
}

impl App {
    pub fn new(config: &Config, prefs: Prefs) -> Self {
        Self {
            store: RowStore::new(),
            nav_selected: 0,
            focus: Focus::Sidebar,
            input_mode: InputMode::Normal,
            connection: ConnectionForm::from_config(config),
            audio: AudioSettings::from_prefs(prefs),
            home_cards: pick_home_cards(),
            status_message: None,
            batches_received: 0,
            ingest_totals: MergeSummary::default(),
            show_help: false,
            should_quit: false,
            side_panel_width: SIDE_PANEL_WIDTH,
            viewports: HashMap::new(),
        }
    }

    /// Sidebar entries: fixed panels, known categories, then any other
    /// category that has received rows (e.g. "Unknown").
    pub fn nav_entries(&self) -> Vec<NavEntry> {
        let mut entries = vec![NavEntry::Home, NavEntry::Connection, NavEntry::Audio];
        entries.extend(
            catalog::TELEMETRY
                .iter()
                .map(|p| NavEntry::Category(p.title.to_string())),
        );
        entries.extend(
            self.store
                .categories()
                .iter()
                .filter(|c| catalog::telemetry_info(c).is_none())
                .map(|c| NavEntry::Category(c.clone())),
        );
        entries
    }

    pub fn active_entry(&self) -> NavEntry {
        let entries = self.nav_entries();
        let idx = self.nav_selected.min(entries.len() - 1);
        entries[idx].clone()
    }

    pub fn active_category(&self) -> Option<String> {
        match self.active_entry() {
            NavEntry::Category(name) => Some(name),
            _ => None,
        }
    }

    pub fn viewport_mut(&mut self, category: &str) -> &mut RowViewport {
        self.viewports.entry(category.to_string()).or_default()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Record what the ingestion listener merged this tick.
    pub fn note_ingest(&mut self, batches_total: u64, summary: MergeSummary) {
        self.batches_received = batches_total;
        self.ingest_totals.absorb(summary);
    }

    /// Apply an event to app state, sending host commands where needed.
    pub fn apply_event(&mut self, event: AppEvent, host: &mut dyn Host) {
        match event {
            AppEvent::NavUp => self.nav_selected = self.nav_selected.saturating_sub(1),
            AppEvent::NavDown => {
                let last = self.nav_entries().len() - 1;
                self.nav_selected = (self.nav_selected + 1).min(last);
            }
            AppEvent::SelectNav(idx) => {
                if idx < self.nav_entries().len() {
                    self.nav_selected = idx;
                }
            }
            AppEvent::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Sidebar => Focus::Content,
                    Focus::Content => Focus::Sidebar,
                }
            }
            AppEvent::FocusContent => self.focus = Focus::Content,
            AppEvent::FocusSidebar => self.focus = Focus::Sidebar,

            AppEvent::RowSelectUp => self.move_selection(-1),
            AppEvent::RowSelectDown => self.move_selection(1),
            AppEvent::RowSelectFirst => self.with_selection(|vp, ids| vp.select_index(0, ids)),
            AppEvent::RowSelectLast => self.with_selection(|vp, ids| vp.select_last(ids)),
            AppEvent::ToggleExpanded => {
                if let Some((_, id)) = self.selected_row() {
                    self.store.toggle_expanded(&id);
                }
            }
            AppEvent::ToggleActions => {
                if let Some((_, id)) = self.selected_row() {
                    self.store.toggle_actions_open(&id);
                }
            }
            AppEvent::MoveRowUp => self.move_selected_row(MoveDirection::Up),
            AppEvent::MoveRowDown => self.move_selected_row(MoveDirection::Down),
            AppEvent::DeleteRow => self.delete_selected_row(),
            AppEvent::ClearPanel => {
                if let Some(category) = self.active_category() {
                    let removed = self.store.clear_category(&category);
                    self.set_status(format!("Cleared {} rows from {}", removed, category));
                }
            }

            AppEvent::FieldNext => match self.active_entry() {
                NavEntry::Connection => self.connection.next_field(),
                NavEntry::Audio => self.audio.next_field(),
                _ => {}
            },
            AppEvent::FieldPrev => match self.active_entry() {
                NavEntry::Connection => self.connection.prev_field(),
                NavEntry::Audio => self.audio.prev_field(),
                _ => {}
            },
            AppEvent::StartEdit => {
                if self.active_entry() == NavEntry::Connection && self.connection.start_edit() {
                    self.input_mode = InputMode::EditingField;
                }
            }
            AppEvent::EditChar(c) => self.connection.push_char(c),
            AppEvent::EditBackspace => self.connection.backspace(),
            AppEvent::EditSubmit => {
                if let Err(msg) = self.connection.submit_edit() {
                    self.set_status(msg);
                }
                self.input_mode = InputMode::Normal;
            }
            AppEvent::EditCancel => {
                self.connection.cancel_edit();
                self.input_mode = InputMode::Normal;
            }
            AppEvent::AdjustDown => self.adjust_audio(false, host),
            AppEvent::AdjustUp => self.adjust_audio(true, host),

            AppEvent::Connect => self.connect(host),
            AppEvent::Disconnect => {
                if self.connection.connected {
                    host.stop_listener();
                    self.connection.connected = false;
                    self.set_status("Disconnected");
                }
            }
            AppEvent::ToggleCapture => self.toggle_capture(host),
            AppEvent::RefreshDevices => {
                self.audio
                    .update_devices(host.input_devices(), host.output_devices());
            }

            AppEvent::ShowHelp => self.show_help = true,
            AppEvent::HideHelp => self.show_help = false,
            AppEvent::Quit => self.should_quit = true,
        }
    }

    /// Active category with its current row ids, newest first.
    fn active_ids(&self) -> Option<(String, Vec<String>)> {
        let category = self.active_category()?;
        let ids = self
            .store
            .bucket(&category)
            .iter()
            .map(|r| r.id.clone())
            .collect();
        Some((category, ids))
    }

    fn with_selection(&mut self, f: impl FnOnce(&mut RowViewport, &[&str])) {
        if let Some((category, ids)) = self.active_ids() {
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            f(self.viewport_mut(&category), &refs);
        }
    }

    fn move_selection(&mut self, delta: i32) {
        self.with_selection(|vp, ids| vp.move_selection(delta, ids));
    }

    /// Category and id of the selected row in the active data panel.
    pub fn selected_row(&mut self) -> Option<(String, String)> {
        let (category, ids) = self.active_ids()?;
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let id = self.viewport_mut(&category).selected_id(&refs)?.to_string();
        Some((category, id))
    }

    fn move_selected_row(&mut self, direction: MoveDirection) {
        let Some((category, id)) = self.selected_row() else {
            return;
        };
        if !self.store.ui().is_actions_open(&id) {
            self.set_status("Open the row menu with 'a' to move or delete");
            return;
        }
        self.store.move_row(&category, &id, direction);
    }

    fn delete_selected_row(&mut self) {
        let Some((category, id)) = self.selected_row() else {
            return;
        };
        if !self.store.ui().is_actions_open(&id) {
            self.set_status("Open the row menu with 'a' to move or delete");
            return;
        }
        if self.store.delete_row(&category, &id) {
            self.set_status("Row deleted");
        }
    }

    fn connect(&mut self, host: &mut dyn Host) {
        if self.connection.connected {
            self.set_status("Already connected");
            return;
        }
        let address = self.connection.address.clone();
        let port = self.connection.port.clone();
        let connected = match host.start_listener(&address, &port) {
            Ok(ok) => ok,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "connect failed");
                false
            }
        };

        self.connection.connected = connected;
        if connected {
            info!(%address, %port, "connected");
            self.set_status(format!("Listening on {}:{}", address, port));
        } else {
            self.set_status(format!("Could not listen on {}:{}", address, port));
        }
    }

    fn toggle_capture(&mut self, host: &mut dyn Host) {
        if self.audio.capturing {
            host.stop_audio_capture();
            self.audio.capturing = false;
            self.set_status("Audio capture stopped");
            return;
        }
        match host.start_audio_capture() {
            Ok(true) => {
                self.audio.capturing = true;
                self.set_status("Audio capture started");
            }
            Ok(false) => self.set_status("Audio capture is not available"),
            Err(e) => {
                warn!(error = %format!("{:#}", e), "audio capture failed");
                self.set_status("Audio capture failed");
            }
        }
    }

    fn adjust_audio(&mut self, up: bool, host: &mut dyn Host) {
        if self.active_entry() != NavEntry::Audio {
            return;
        }
        match self.audio.adjust(up) {
            Some(AudioChange::InputDevice(name)) => host.set_input_device(&name),
            Some(AudioChange::OutputDevice(name)) => host.set_output_device(&name),
            Some(AudioChange::InputVolume(v)) => host.set_input_volume(v),
            Some(AudioChange::OutputVolume(v)) => host.set_output_volume(v),
            None => {}
        }
    }
}

fn pick_home_cards() -> Vec<&'static PanelInfo> {
    let mut cards = catalog::card_candidates();
    cards.shuffle(&mut rand::rng());
    cards.truncate(HOME_CARD_COUNT);
    cards
}
