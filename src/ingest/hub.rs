use crate::store::RawRow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// One delivery on a channel.
pub type Batch = Vec<RawRow>;

type Subscribers = HashMap<String, Vec<(u64, Sender<Batch>)>>;

/// Named channels carrying row batches from host threads to the UI thread.
///
/// Cloning is cheap; all clones share the same subscriber table.
#[derive(Clone, Default)]
pub struct EventHub {
    subscribers: Arc<Mutex<Subscribers>>,
    next_token: Arc<AtomicU64>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start receiving batches emitted on `channel`.
    pub fn subscribe(&self, channel_name: &str) -> Subscription {
        let (tx, rx) = channel();
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.entry(channel_name.to_string())
                .or_default()
                .push((token, tx));
        }
        debug!(channel = channel_name, token, "subscribed");

        Subscription {
            hub: self.clone(),
            channel: channel_name.to_string(),
            token,
            receiver: Some(rx),
        }
    }

    /// Handle for host threads to emit on `channel`.
    pub fn emitter(&self, channel_name: &str) -> Emitter {
        Emitter {
            hub: self.clone(),
            channel: channel_name.to_string(),
        }
    }

    /// Deliver `batch` to every live subscriber of `channel`.
    /// Returns how many subscribers received it.
    pub fn emit(&self, channel_name: &str, batch: Batch) -> usize {
        let Ok(mut subs) = self.subscribers.lock() else {
            return 0;
        };
        let Some(list) = subs.get_mut(channel_name) else {
            return 0;
        };

        // Drop subscribers whose receiving side is gone
        list.retain(|(_, tx)| tx.send(batch.clone()).is_ok());
        list.len()
    }

    pub fn subscriber_count(&self, channel_name: &str) -> usize {
        self.subscribers
            .lock()
            .map(|subs| subs.get(channel_name).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn unsubscribe(&self, channel_name: &str, token: u64) {
        if let Ok(mut subs) = self.subscribers.lock() {
            if let Some(list) = subs.get_mut(channel_name) {
                list.retain(|(t, _)| *t != token);
                if list.is_empty() {
                    subs.remove(channel_name);
                }
            }
        }
        debug!(channel = channel_name, token, "unsubscribed");
    }
}

/// Sending side of a named channel, handed to host threads.
#[derive(Clone)]
pub struct Emitter {
    hub: EventHub,
    channel: String,
}

impl Emitter {
    pub fn emit(&self, batch: Batch) -> usize {
        self.hub.emit(&self.channel, batch)
    }
}

/// A live subscription to one channel.
///
/// [`release`](Subscription::release) detaches it from the hub and discards
/// anything still queued. Releasing twice is a no-op; dropping releases.
pub struct Subscription {
    hub: EventHub,
    channel: String,
    token: u64,
    receiver: Option<Receiver<Batch>>,
}

impl Subscription {
    /// Next queued batch, without blocking. Always `None` once released.
    pub fn try_next(&self) -> Option<Batch> {
        let rx = self.receiver.as_ref()?;
        match rx.try_recv() {
            Ok(batch) => Some(batch),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn release(&mut self) {
        if self.receiver.take().is_some() {
            self.hub.unsubscribe(&self.channel, self.token);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
