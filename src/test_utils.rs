use anyhow::{bail, Result};
use solis::host::Host;

/// Mock Host for testing. Records every command it receives.
#[derive(Debug, Default)]
pub struct MockHost {
    pub fail_connect: bool,
    pub listening: bool,
    /// (address, port) of every start_listener call, successful or not
    pub started: Vec<(String, String)>,
    pub stopped: usize,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub input_device: Option<String>,
    pub output_device: Option<String>,
    pub input_volume: Option<i8>,
    pub output_volume: Option<i8>,
}

impl Host for MockHost {
    fn start_listener(&mut self, address: &str, port: &str) -> Result<bool> {
        self.started.push((address.to_string(), port.to_string()));
        if self.fail_connect {
            bail!("address in use");
        }
        self.listening = true;
        Ok(true)
    }

    fn stop_listener(&mut self) {
        self.stopped += 1;
        self.listening = false;
    }

    fn is_listening(&self) -> bool {
        self.listening
    }

    fn start_audio_capture(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn stop_audio_capture(&mut self) {}

    fn input_devices(&self) -> Vec<String> {
        self.inputs.clone()
    }

    fn output_devices(&self) -> Vec<String> {
        self.outputs.clone()
    }

    fn set_input_device(&mut self, name: &str) {
        self.input_device = Some(name.to_string());
    }

    fn set_output_device(&mut self, name: &str) {
        self.output_device = Some(name.to_string());
    }

    fn set_input_volume(&mut self, volume: i8) {
        self.input_volume = Some(volume);
    }

    fn set_output_volume(&mut self, volume: i8) {
        self.output_volume = Some(volume);
    }
}
