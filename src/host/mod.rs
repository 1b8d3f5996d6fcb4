//! Outbound command surface towards the telemetry host.
//!
//! The viewer never decodes game packets itself. It asks a [`Host`] to open or
//! close the listening socket and to drive audio, and only looks at the
//! boolean outcome of those requests.

mod replay;
mod udp;

pub use replay::ReplayFeed;
pub use udp::UdpBridge;

use anyhow::Result;

/// Device name used whenever nothing better is known.
pub const DEFAULT_DEVICE: &str = "Default";

/// Commands the UI can send to the host process.
pub trait Host {
    /// Bind the telemetry socket. `Ok(false)` means the host declined.
    fn start_listener(&mut self, address: &str, port: &str) -> Result<bool>;
    fn stop_listener(&mut self);
    fn is_listening(&self) -> bool;

    fn start_audio_capture(&mut self) -> Result<bool>;
    fn stop_audio_capture(&mut self);

    fn input_devices(&self) -> Vec<String>;
    fn output_devices(&self) -> Vec<String>;
    fn set_input_device(&mut self, name: &str);
    fn set_output_device(&mut self, name: &str);
    fn set_input_volume(&mut self, volume: i8);
    fn set_output_volume(&mut self, volume: i8);
}
