//! Bounded per-category row store.
//!
//! [`RowStore`] is the single mutation surface for telemetry rows: ingestion
//! merges batches into it and the panels route expand/reorder/delete through it.
//! Readers get immutable [`Bucket`] snapshots.

mod buckets;
mod row;
mod ui_state;

pub use buckets::{Bucket, CategoryBuckets, MergeSummary, MoveDirection, MAX_ROWS};
pub use row::{RawRow, Row, RowIdGenerator, UNKNOWN_CATEGORY};
pub use ui_state::RowUiState;

use std::sync::Arc;

/// A row composed with its presentation flags for one render pass.
#[derive(Debug, Clone)]
pub struct RowView {
    pub row: Arc<Row>,
    pub expanded: bool,
    pub actions_open: bool,
}

/// Rows bucketed by category plus the per-row UI flags that go with them.
#[derive(Debug, Default)]
pub struct RowStore {
    buckets: CategoryBuckets,
    ui: RowUiState,
    ids: RowIdGenerator,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a batch of host records. Duplicate ids are skipped, each touched
    /// category is cut back to [`MAX_ROWS`] afterwards.
    pub fn merge_batch(&mut self, rows: Vec<RawRow>) -> MergeSummary {
        let outcome = self.buckets.merge(rows, &self.ids);
        for id in &outcome.evicted_ids {
            self.ui.purge(id);
        }
        outcome.summary
    }

    /// Swap a row with its neighbour. A completed move closes every open
    /// actions menu in the category; a no-op leaves everything untouched.
    pub fn move_row(&mut self, category: &str, id: &str, direction: MoveDirection) -> bool {
        if !self.buckets.move_row(category, id, direction) {
            return false;
        }
        let bucket = self.buckets.get(category);
        self.ui.close_actions(bucket.iter().map(|r| r.id.as_str()));
        true
    }

    /// Delete a row if present. The id's UI flags are purged either way.
    pub fn delete_row(&mut self, category: &str, id: &str) -> bool {
        let removed = self.buckets.delete_row(category, id).is_some();
        self.ui.purge(id);
        removed
    }

    /// Drop every row of a category. Other categories are untouched.
    pub fn clear_category(&mut self, category: &str) -> usize {
        let removed = self.buckets.clear(category);
        for row in &removed {
            self.ui.purge(&row.id);
        }
        removed.len()
    }

    /// Snapshot of a category, empty if it never received data.
    pub fn bucket(&self, category: &str) -> Bucket {
        self.buckets.get(category)
    }

    /// Rows of `category` composed with the current UI flags.
    pub fn view(&self, category: &str) -> Vec<RowView> {
        self.buckets
            .get(category)
            .iter()
            .map(|row| RowView {
                expanded: self.ui.is_expanded(&row.id),
                actions_open: self.ui.is_actions_open(&row.id),
                row: Arc::clone(row),
            })
            .collect()
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        self.ui.toggle_expanded(id);
    }

    pub fn toggle_actions_open(&mut self, id: &str) {
        self.ui.toggle_actions_open(id);
    }

    pub fn ui(&self) -> &RowUiState {
        &self.ui
    }

    pub fn category_len(&self, category: &str) -> usize {
        self.buckets.len(category)
    }

    pub fn total_rows(&self) -> usize {
        self.buckets.total_rows()
    }

    /// Categories that have received data, in order of first arrival.
    pub fn categories(&self) -> &[String] {
        self.buckets.categories()
    }
}
