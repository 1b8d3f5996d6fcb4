//! Host-to-store ingestion.
//!
//! Host threads emit row batches on a named [`EventHub`] channel; the
//! [`IngestionListener`] owns the subscription and merges whatever has arrived
//! into the [`RowStore`] when the UI loop pumps it.

mod decode;
mod hub;

pub use decode::decode_batch;
pub use hub::{Batch, Emitter, EventHub, Subscription};

use crate::store::{MergeSummary, RowStore};
use tracing::{debug, info};

/// Channel the host emits decoded row batches on.
pub const ROW_BATCH_CHANNEL: &str = "createDataRowBatch";

/// Upper bound on batches merged per pump, so one frame never stalls on a flood.
const MAX_BATCHES_PER_PUMP: usize = 256;

/// Bridges the row-batch channel into a [`RowStore`].
pub struct IngestionListener {
    subscription: Subscription,
    batches_seen: u64,
}

impl IngestionListener {
    /// Subscribe to [`ROW_BATCH_CHANNEL`] on `hub`.
    pub fn new(hub: &EventHub) -> Self {
        Self::on_channel(hub, ROW_BATCH_CHANNEL)
    }

    pub fn on_channel(hub: &EventHub, channel: &str) -> Self {
        info!(channel, "ingestion listener attached");
        Self {
            subscription: hub.subscribe(channel),
            batches_seen: 0,
        }
    }

    /// Merge every batch delivered since the last pump, in arrival order.
    pub fn pump(&mut self, store: &mut RowStore) -> MergeSummary {
        let mut total = MergeSummary::default();
        for _ in 0..MAX_BATCHES_PER_PUMP {
            let Some(batch) = self.subscription.try_next() else {
                break;
            };
            self.batches_seen += 1;
            if batch.is_empty() {
                continue;
            }
            let summary = store.merge_batch(batch);
            debug!(
                inserted = summary.inserted,
                duplicates = summary.duplicates,
                evicted = summary.evicted,
                "merged batch"
            );
            total.absorb(summary);
        }
        total
    }

    pub fn batches_seen(&self) -> u64 {
        self.batches_seen
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    /// Stop listening. Later emits are dropped; calling again does nothing.
    pub fn release(&mut self) {
        if self.subscription.is_active() {
            info!(channel = self.subscription.channel(), "ingestion listener released");
        }
        self.subscription.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RawRow;

    fn row(id: &str, category: &str, ts: &str) -> RawRow {
        RawRow {
            timestamp: Some(ts.to_string()),
            ..RawRow::new(Some(id), Some(category), "")
        }
    }

    #[test]
    fn test_pump_merges_in_arrival_order() {
        let hub = EventHub::new();
        let mut listener = IngestionListener::new(&hub);
        let mut store = RowStore::new();

        hub.emit(ROW_BATCH_CHANNEL, vec![row("a", "Events", "5.0")]);
        hub.emit(ROW_BATCH_CHANNEL, vec![row("b", "Events", "1.0")]);

        let summary = listener.pump(&mut store);
        assert_eq!(summary.inserted, 2);
        let ids: Vec<_> = store.bucket("Events").iter().map(|r| r.id.clone()).collect();
        // Timestamps never reorder rows
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let hub = EventHub::new();
        let mut listener = IngestionListener::new(&hub);
        let mut store = RowStore::new();

        hub.emit(ROW_BATCH_CHANNEL, Vec::new());
        assert_eq!(listener.pump(&mut store), MergeSummary::default());
        assert_eq!(listener.batches_seen(), 1);
        assert_eq!(store.total_rows(), 0);
    }

    #[test]
    fn test_no_mutation_after_release() {
        let hub = EventHub::new();
        let mut listener = IngestionListener::new(&hub);
        let mut store = RowStore::new();

        hub.emit(ROW_BATCH_CHANNEL, vec![row("queued", "Events", "0")]);
        listener.release();
        hub.emit(ROW_BATCH_CHANNEL, vec![row("late", "Events", "0")]);
        listener.release();

        listener.pump(&mut store);
        assert_eq!(store.total_rows(), 0);
        assert!(!listener.is_active());
    }
}
