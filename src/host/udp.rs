use super::{Host, DEFAULT_DEVICE};
use crate::ingest::{decode_batch, Emitter};
use crate::store::RawRow;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Rows held between flushes; older rows are dropped past this.
const PENDING_ROW_LIMIT: usize = 250;
const SOCKET_READ_TIMEOUT: Duration = Duration::from_millis(100);
const MAX_DATAGRAM: usize = 65_536;

struct RunningListener {
    stop: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
    local_addr: SocketAddr,
}

impl RunningListener {
    fn shutdown(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        info!(addr = %self.local_addr, "udp listener stopped");
    }
}

/// Host bridge that receives decoded rows as JSON datagrams.
///
/// Each datagram carries a JSON array of row objects (or one object). Rows are
/// buffered and flushed onto the row-batch channel at a fixed interval. There
/// is no audio backend: device queries report the default device and audio
/// requests are only recorded.
pub struct UdpBridge {
    emitter: Emitter,
    flush_interval: Duration,
    listener: Option<RunningListener>,
    input_device: String,
    output_device: String,
    input_volume: i8,
    output_volume: i8,
}

impl UdpBridge {
    pub fn new(emitter: Emitter, flush_interval: Duration) -> Self {
        Self {
            emitter,
            flush_interval,
            listener: None,
            input_device: DEFAULT_DEVICE.to_string(),
            output_device: DEFAULT_DEVICE.to_string(),
            input_volume: 100,
            output_volume: 100,
        }
    }

    /// Devices last selected through this bridge (input, output).
    #[cfg(test)]
    pub fn selected_devices(&self) -> (&str, &str) {
        (&self.input_device, &self.output_device)
    }

    /// Volumes last requested (input, output).
    #[cfg(test)]
    pub fn volumes(&self) -> (i8, i8) {
        (self.input_volume, self.output_volume)
    }

    /// Address the socket is actually bound to (useful with port 0).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().map(|l| l.local_addr)
    }

    fn spawn_receiver(
        socket: UdpSocket,
        pending: Arc<Mutex<Vec<RawRow>>>,
        stop: Arc<AtomicBool>,
    ) -> JoinHandle<()> {
        thread::spawn(move || {
            let mut buf = vec![0u8; MAX_DATAGRAM];
            while !stop.load(Ordering::SeqCst) {
                let len = match socket.recv_from(&mut buf) {
                    Ok((len, _)) => len,
                    Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                        continue
                    }
                    Err(e) => {
                        warn!(error = %e, "udp receive failed");
                        continue;
                    }
                };

                let rows = match decode_batch(&buf[..len]) {
                    Ok(rows) => rows,
                    Err(e) => {
                        warn!(error = %e, bytes = len, "dropping undecodable datagram");
                        continue;
                    }
                };

                if let Ok(mut pending) = pending.lock() {
                    pending.extend(rows);
                    if pending.len() > PENDING_ROW_LIMIT {
                        let excess = pending.len() - PENDING_ROW_LIMIT;
                        pending.drain(0..excess);
                    }
                }
            }
        })
    }

    fn spawn_flusher(
        emitter: Emitter,
        interval: Duration,
        pending: Arc<Mutex<Vec<RawRow>>>,
        stop: Arc<AtomicBool>,
    ) -> JoinHandle<()> {
        thread::spawn(move || loop {
            thread::sleep(interval);
            let batch = match pending.lock() {
                Ok(mut pending) => std::mem::take(&mut *pending),
                Err(_) => return,
            };
            if !batch.is_empty() {
                let delivered = emitter.emit(batch);
                debug!(delivered, "flushed row batch");
            }
            if stop.load(Ordering::SeqCst) {
                return;
            }
        })
    }
}

impl Host for UdpBridge {
    fn start_listener(&mut self, address: &str, port: &str) -> Result<bool> {
        if let Some(running) = self.listener.take() {
            running.shutdown();
        }

        let addr: SocketAddr = format!("{}:{}", address.trim(), port.trim())
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", address, port))?;
        let socket =
            UdpSocket::bind(addr).with_context(|| format!("Failed to bind UDP socket {}", addr))?;
        socket
            .set_read_timeout(Some(SOCKET_READ_TIMEOUT))
            .context("Failed to set socket read timeout")?;
        let local_addr = socket.local_addr().unwrap_or(addr);

        let stop = Arc::new(AtomicBool::new(false));
        let pending = Arc::new(Mutex::new(Vec::new()));
        let handles = vec![
            Self::spawn_receiver(socket, Arc::clone(&pending), Arc::clone(&stop)),
            Self::spawn_flusher(
                self.emitter.clone(),
                self.flush_interval,
                pending,
                Arc::clone(&stop),
            ),
        ];

        info!(addr = %local_addr, "udp listener started");
        self.listener = Some(RunningListener {
            stop,
            handles,
            local_addr,
        });
        Ok(true)
    }

    fn stop_listener(&mut self) {
        if let Some(running) = self.listener.take() {
            running.shutdown();
        }
    }

    fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    fn start_audio_capture(&mut self) -> Result<bool> {
        warn!(
            input = %self.input_device,
            output = %self.output_device,
            input_volume = self.input_volume,
            output_volume = self.output_volume,
            "audio capture requested but no audio backend is attached"
        );
        Ok(false)
    }

    fn stop_audio_capture(&mut self) {
        debug!("audio capture stop requested");
    }

    fn input_devices(&self) -> Vec<String> {
        vec![DEFAULT_DEVICE.to_string()]
    }

    fn output_devices(&self) -> Vec<String> {
        vec![DEFAULT_DEVICE.to_string()]
    }

    fn set_input_device(&mut self, name: &str) {
        info!(device = name, "input device selected");
        self.input_device = name.to_string();
    }

    fn set_output_device(&mut self, name: &str) {
        info!(device = name, "output device selected");
        self.output_device = name.to_string();
    }

    fn set_input_volume(&mut self, volume: i8) {
        debug!(volume, "input volume set");
        self.input_volume = volume;
    }

    fn set_output_volume(&mut self, volume: i8) {
        debug!(volume, "output volume set");
        self.output_volume = volume;
    }
}

impl Drop for UdpBridge {
    fn drop(&mut self) {
        self.stop_listener();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{EventHub, IngestionListener, ROW_BATCH_CHANNEL};
    use crate::store::RowStore;
    use std::time::Instant;

    fn bridge(hub: &EventHub) -> UdpBridge {
        UdpBridge::new(hub.emitter(ROW_BATCH_CHANNEL), Duration::from_millis(10))
    }

    #[test]
    fn test_invalid_address_is_error() {
        let hub = EventHub::new();
        let mut bridge = bridge(&hub);
        assert!(bridge.start_listener("not-an-ip", "20777").is_err());
        assert!(!bridge.is_listening());
    }

    #[test]
    fn test_datagram_reaches_store() {
        let hub = EventHub::new();
        let mut listener = IngestionListener::new(&hub);
        let mut store = RowStore::new();
        let mut bridge = bridge(&hub);

        assert!(bridge.start_listener("127.0.0.1", "0").unwrap());
        let target = bridge.local_addr().unwrap();

        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender
            .send_to(br#"[{"id":"a","title":"Events","rawData":"x"}]"#, target)
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while store.total_rows() == 0 && Instant::now() < deadline {
            listener.pump(&mut store);
            thread::sleep(Duration::from_millis(10));
        }

        assert_eq!(store.category_len("Events"), 1);
        bridge.stop_listener();
        assert!(!bridge.is_listening());
    }

    #[test]
    fn test_audio_reports_default_device() {
        let hub = EventHub::new();
        let mut bridge = bridge(&hub);
        assert_eq!(bridge.input_devices(), vec![DEFAULT_DEVICE.to_string()]);
        assert!(!bridge.start_audio_capture().unwrap());

        bridge.set_input_device("USB Mic");
        bridge.set_output_volume(40);
        assert_eq!(bridge.selected_devices(), ("USB Mic", DEFAULT_DEVICE));
        assert_eq!(bridge.volumes(), (100, 40));
    }
}
