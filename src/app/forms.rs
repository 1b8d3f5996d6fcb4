use solis::config::types::DEFAULT_PORT;
use solis::config::Config;
use solis::host::DEFAULT_DEVICE;
use solis::prefs::{self, Prefs};

/// Only packet format the host decodes.
pub const PACKET_FORMATS: &[&str] = &["2022"];

const VOLUME_STEP: u8 = 5;

/// Editable fields of the connection form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionField {
    Address,
    Port,
    PacketFormat,
}

impl ConnectionField {
    fn next(self) -> Self {
        match self {
            Self::Address => Self::Port,
            Self::Port => Self::PacketFormat,
            Self::PacketFormat => Self::Address,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Address => Self::PacketFormat,
            Self::Port => Self::Address,
            Self::PacketFormat => Self::Port,
        }
    }
}

/// Connection panel state. `connected` only mirrors what the host reported.
#[derive(Debug, Clone)]
pub struct ConnectionForm {
    pub address: String,
    pub port: String,
    pub packet_format: &'static str,
    pub connected: bool,
    pub field: ConnectionField,
    /// Text being typed while a field is in edit mode
    pub edit_buffer: Option<String>,
}

impl ConnectionForm {
    pub fn from_config(config: &Config) -> Self {
        Self {
            address: config.address.clone(),
            port: config.port.to_string(),
            packet_format: PACKET_FORMATS[0],
            connected: false,
            field: ConnectionField::Address,
            edit_buffer: None,
        }
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.prev();
    }

    /// Begin editing the focused text field. Returns false for non-text fields.
    pub fn start_edit(&mut self) -> bool {
        let current = match self.field {
            ConnectionField::Address => self.address.clone(),
            ConnectionField::Port => self.port.clone(),
            ConnectionField::PacketFormat => return false,
        };
        self.edit_buffer = Some(current);
        true
    }

    pub fn push_char(&mut self, c: char) {
        let port_field = self.field == ConnectionField::Port;
        if let Some(buf) = self.edit_buffer.as_mut() {
            if port_field && !c.is_ascii_digit() {
                return;
            }
            buf.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buf) = self.edit_buffer.as_mut() {
            buf.pop();
        }
    }

    /// Commit the edit buffer. An empty or out-of-range port is rejected and
    /// the previous value kept; returns an explanation in that case.
    pub fn submit_edit(&mut self) -> Result<(), String> {
        let Some(buf) = self.edit_buffer.take() else {
            return Ok(());
        };
        match self.field {
            ConnectionField::Address => {
                let trimmed = buf.trim();
                if trimmed.is_empty() {
                    return Err("Address cannot be empty".to_string());
                }
                self.address = trimmed.to_string();
            }
            ConnectionField::Port => match buf.parse::<u16>() {
                Ok(p) if p > 0 => self.port = p.to_string(),
                _ => {
                    return Err(format!(
                        "Invalid port '{}' (expected 1-65535, e.g. {})",
                        buf, DEFAULT_PORT
                    ))
                }
            },
            ConnectionField::PacketFormat => {}
        }
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.edit_buffer = None;
    }

    pub fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }
}

/// Focusable rows of the audio panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioField {
    InputDevice,
    OutputDevice,
    InputVolume,
    OutputVolume,
}

impl AudioField {
    const ALL: [AudioField; 4] = [
        AudioField::InputDevice,
        AudioField::OutputDevice,
        AudioField::InputVolume,
        AudioField::OutputVolume,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Change the audio panel wants forwarded to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioChange {
    InputDevice(String),
    OutputDevice(String),
    InputVolume(i8),
    OutputVolume(i8),
}

/// Audio panel state, seeded from and written back to the preferences cache.
#[derive(Debug)]
pub struct AudioSettings {
    pub input_devices: Vec<String>,
    pub output_devices: Vec<String>,
    pub selected_input: String,
    pub selected_output: String,
    pub input_volume: u8,
    pub output_volume: u8,
    pub capturing: bool,
    pub field: AudioField,
    prefs: Prefs,
}

impl AudioSettings {
    pub fn from_prefs(cache: Prefs) -> Self {
        Self {
            input_devices: cache.get_list(prefs::INPUT_DEVICES),
            output_devices: cache.get_list(prefs::OUTPUT_DEVICES),
            selected_input: cache.get_string(prefs::SELECTED_INPUT_DEVICE),
            selected_output: cache.get_string(prefs::SELECTED_OUTPUT_DEVICE),
            input_volume: 100,
            output_volume: 100,
            capturing: false,
            field: AudioField::InputDevice,
            prefs: cache,
        }
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.prev();
    }

    /// Replace the device lists with what the host reports. A selection that
    /// disappeared falls back to the default device.
    pub fn update_devices(&mut self, inputs: Vec<String>, outputs: Vec<String>) {
        self.input_devices = non_empty(inputs);
        self.output_devices = non_empty(outputs);
        if !self.input_devices.contains(&self.selected_input) {
            self.selected_input = DEFAULT_DEVICE.to_string();
        }
        if !self.output_devices.contains(&self.selected_output) {
            self.selected_output = DEFAULT_DEVICE.to_string();
        }
        self.prefs.set_list(prefs::INPUT_DEVICES, &self.input_devices);
        self.prefs.set_list(prefs::OUTPUT_DEVICES, &self.output_devices);
        self.prefs
            .set_string(prefs::SELECTED_INPUT_DEVICE, &self.selected_input);
        self.prefs
            .set_string(prefs::SELECTED_OUTPUT_DEVICE, &self.selected_output);
    }

    /// Step the focused field by one unit (`up` = next device / louder).
    pub fn adjust(&mut self, up: bool) -> Option<AudioChange> {
        match self.field {
            AudioField::InputDevice => {
                let next = cycle(&self.input_devices, &self.selected_input, up)?;
                self.selected_input = next.clone();
                self.prefs.set_string(prefs::SELECTED_INPUT_DEVICE, &next);
                Some(AudioChange::InputDevice(next))
            }
            AudioField::OutputDevice => {
                let next = cycle(&self.output_devices, &self.selected_output, up)?;
                self.selected_output = next.clone();
                self.prefs.set_string(prefs::SELECTED_OUTPUT_DEVICE, &next);
                Some(AudioChange::OutputDevice(next))
            }
            AudioField::InputVolume => {
                self.input_volume = step_volume(self.input_volume, up);
                Some(AudioChange::InputVolume(self.input_volume as i8))
            }
            AudioField::OutputVolume => {
                self.output_volume = step_volume(self.output_volume, up);
                Some(AudioChange::OutputVolume(self.output_volume as i8))
            }
        }
    }
}

fn non_empty(list: Vec<String>) -> Vec<String> {
    if list.is_empty() {
        vec![DEFAULT_DEVICE.to_string()]
    } else {
        list
    }
}

fn cycle(list: &[String], current: &str, forward: bool) -> Option<String> {
    if list.len() < 2 {
        return None;
    }
    let idx = list.iter().position(|d| d == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % list.len()
    } else {
        (idx + list.len() - 1) % list.len()
    };
    Some(list[next].clone())
}

fn step_volume(volume: u8, up: bool) -> u8 {
    if up {
        volume.saturating_add(VOLUME_STEP).min(100)
    } else {
        volume.saturating_sub(VOLUME_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_edit_accepts_digits_only() {
        let mut form = ConnectionForm::from_config(&Config::default());
        form.field = ConnectionField::Port;
        assert!(form.start_edit());
        form.backspace();
        form.push_char('x');
        form.push_char('8');
        assert_eq!(form.edit_buffer.as_deref(), Some("20778"));
        assert!(form.submit_edit().is_ok());
        assert_eq!(form.port, "20778");
    }

    #[test]
    fn test_invalid_port_keeps_previous() {
        let mut form = ConnectionForm::from_config(&Config::default());
        form.field = ConnectionField::Port;
        form.start_edit();
        form.edit_buffer = Some("99999".to_string());
        assert!(form.submit_edit().is_err());
        assert_eq!(form.port, "20777");
        assert!(!form.is_editing());
    }

    #[test]
    fn test_packet_format_not_editable() {
        let mut form = ConnectionForm::from_config(&Config::default());
        form.prev_field();
        assert_eq!(form.field, ConnectionField::PacketFormat);
        assert!(!form.start_edit());
    }

    #[test]
    fn test_audio_defaults_from_empty_prefs() {
        let audio = AudioSettings::from_prefs(Prefs::ephemeral());
        assert_eq!(audio.selected_input, "Default");
        assert_eq!(audio.output_devices, vec!["Default"]);
    }

    #[test]
    fn test_device_cycle_and_fallback() {
        let mut audio = AudioSettings::from_prefs(Prefs::ephemeral());
        audio.update_devices(
            vec!["Default".to_string(), "USB Mic".to_string()],
            Vec::new(),
        );
        assert_eq!(
            audio.adjust(true),
            Some(AudioChange::InputDevice("USB Mic".to_string()))
        );

        audio.update_devices(vec!["Default".to_string()], Vec::new());
        assert_eq!(audio.selected_input, "Default");
        assert_eq!(audio.adjust(true), None);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut audio = AudioSettings::from_prefs(Prefs::ephemeral());
        audio.field = AudioField::InputVolume;
        assert_eq!(audio.adjust(true), Some(AudioChange::InputVolume(100)));
        for _ in 0..30 {
            audio.adjust(false);
        }
        assert_eq!(audio.input_volume, 0);
    }
}
