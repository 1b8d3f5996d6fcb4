use crate::ingest::{decode_batch, Emitter};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};

/// Feeds a recorded session into the row-batch channel.
///
/// The file holds one JSON batch per line, in the same shape the UDP bridge
/// accepts. Lines are emitted one per `interval`. Dropping the feed stops it.
pub struct ReplayFeed {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ReplayFeed {
    pub fn start(path: &Path, emitter: Emitter, interval: Duration) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open replay file: {}", path.display()))?;
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let name = path.display().to_string();

        let handle = thread::spawn(move || {
            let mut emitted = 0usize;
            for (line_no, line) in BufReader::new(file).lines().enumerate() {
                if stop_flag.load(Ordering::SeqCst) {
                    break;
                }
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(file = %name, error = %e, "replay read failed");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                match decode_batch(line.as_bytes()) {
                    Ok(batch) => {
                        emitter.emit(batch);
                        emitted += 1;
                    }
                    Err(e) => warn!(file = %name, line = line_no + 1, error = %e, "skipping replay line"),
                }
                thread::sleep(interval);
            }
            info!(file = %name, batches = emitted, "replay finished");
        });

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ReplayFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{EventHub, IngestionListener, ROW_BATCH_CHANNEL};
    use crate::store::RowStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_replay_emits_each_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"[{{"id":"a","title":"Events"}}]"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "garbage").unwrap();
        writeln!(file, r#"{{"id":"b","title":"Lap Data"}}"#).unwrap();
        file.flush().unwrap();

        let hub = EventHub::new();
        let mut listener = IngestionListener::new(&hub);
        let mut feed = ReplayFeed::start(
            file.path(),
            hub.emitter(ROW_BATCH_CHANNEL),
            Duration::from_millis(1),
        )
        .unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while !feed.is_finished() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(feed.is_finished());
        feed.stop();

        let mut store = RowStore::new();
        listener.pump(&mut store);
        assert_eq!(store.category_len("Events"), 1);
        assert_eq!(store.category_len("Lap Data"), 1);
    }

    #[test]
    fn test_missing_file_is_error() {
        let hub = EventHub::new();
        let result = ReplayFeed::start(
            Path::new("/path/that/does/not/exist.jsonl"),
            hub.emitter(ROW_BATCH_CHANNEL),
            Duration::from_millis(1),
        );
        assert!(result.is_err());
    }
}
