use super::row::{Row, RowIdGenerator};
use super::RawRow;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Maximum number of rows kept per category.
pub const MAX_ROWS: usize = 250;

/// Immutable snapshot of one category's rows, most recent first.
pub type Bucket = Arc<[Arc<Row>]>;

/// Direction for [`CategoryBuckets::move_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Counters describing what a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub evicted: usize,
}

impl MergeSummary {
    pub fn absorb(&mut self, other: MergeSummary) {
        self.inserted += other.inserted;
        self.duplicates += other.duplicates;
        self.evicted += other.evicted;
    }
}

/// Result of a merge: counters plus the ids that fell off the tail.
#[derive(Debug, Default)]
pub(crate) struct MergeOutcome {
    pub summary: MergeSummary,
    pub evicted_ids: Vec<String>,
}

/// Per-category row sequences.
///
/// Every mutation builds a new snapshot for the affected category and swaps it
/// in, so a [`Bucket`] handed out earlier never changes underneath its reader.
#[derive(Debug, Default)]
pub struct CategoryBuckets {
    buckets: HashMap<String, Bucket>,
    /// Category names in order of first arrival
    order: Vec<String>,
}

impl CategoryBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot for `category`, or an empty one if it never received data.
    pub fn get(&self, category: &str) -> Bucket {
        self.buckets
            .get(category)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    pub fn len(&self, category: &str) -> usize {
        self.buckets.get(category).map_or(0, |b| b.len())
    }

    pub fn total_rows(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    /// Categories that have ever received data, in order of first arrival.
    pub fn categories(&self) -> &[String] {
        &self.order
    }

    /// Merge a batch, assigning ids where missing.
    ///
    /// Rows are grouped by category; each touched category is rebuilt once
    /// after the whole batch is placed, newest first, then cut to [`MAX_ROWS`].
    pub(crate) fn merge(&mut self, batch: Vec<RawRow>, ids: &RowIdGenerator) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        if batch.is_empty() {
            return outcome;
        }

        // category -> (ids already present or pending, pending rows in arrival order)
        let mut pending: HashMap<String, (HashSet<String>, Vec<Arc<Row>>)> = HashMap::new();
        let mut touched: Vec<String> = Vec::new();

        for raw in batch {
            let row = Row::from_raw(raw, ids);
            let entry = pending.entry(row.category.clone()).or_insert_with(|| {
                touched.push(row.category.clone());
                let seen = self
                    .buckets
                    .get(&row.category)
                    .map(|b| b.iter().map(|r| r.id.clone()).collect())
                    .unwrap_or_default();
                (seen, Vec::new())
            });

            if entry.0.insert(row.id.clone()) {
                entry.1.push(Arc::new(row));
                outcome.summary.inserted += 1;
            } else {
                outcome.summary.duplicates += 1;
            }
        }

        for category in touched {
            let Some((_, new_rows)) = pending.remove(&category) else {
                continue;
            };
            if new_rows.is_empty() {
                continue;
            }

            let existing = self.get(&category);
            let mut rows: Vec<Arc<Row>> = Vec::with_capacity(new_rows.len() + existing.len());
            rows.extend(new_rows.into_iter().rev());
            rows.extend(existing.iter().cloned());

            if rows.len() > MAX_ROWS {
                for evicted in rows.drain(MAX_ROWS..) {
                    outcome.evicted_ids.push(evicted.id.clone());
                }
            }

            if !self.buckets.contains_key(&category) {
                self.order.push(category.clone());
            }
            self.buckets.insert(category, Arc::from(rows));
        }

        outcome.summary.evicted = outcome.evicted_ids.len();
        outcome
    }

    /// Swap the row with its neighbour. Returns false when nothing moved.
    pub fn move_row(&mut self, category: &str, id: &str, direction: MoveDirection) -> bool {
        let Some(bucket) = self.buckets.get(category) else {
            return false;
        };
        let Some(idx) = bucket.iter().position(|r| r.id == id) else {
            return false;
        };

        let other = match direction {
            MoveDirection::Up if idx > 0 => idx - 1,
            MoveDirection::Down if idx + 1 < bucket.len() => idx + 1,
            _ => return false,
        };

        let mut rows = bucket.to_vec();
        rows.swap(idx, other);
        self.buckets.insert(category.to_string(), Arc::from(rows));
        true
    }

    /// Remove the row with `id` from `category`, returning it if it was present.
    pub fn delete_row(&mut self, category: &str, id: &str) -> Option<Arc<Row>> {
        let bucket = self.buckets.get(category)?;
        let idx = bucket.iter().position(|r| r.id == id)?;

        let mut rows = bucket.to_vec();
        let removed = rows.remove(idx);
        self.buckets.insert(category.to_string(), Arc::from(rows));
        Some(removed)
    }

    /// Empty a category, returning the rows it held.
    pub fn clear(&mut self, category: &str) -> Vec<Arc<Row>> {
        match self.buckets.get_mut(category) {
            Some(bucket) => {
                let removed = bucket.to_vec();
                *bucket = Arc::from(Vec::new());
                removed
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, category: &str) -> RawRow {
        RawRow::new(Some(id), Some(category), id)
    }

    fn ids_of(bucket: &Bucket) -> Vec<String> {
        bucket.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_merge_prepends_newest_first() {
        let ids = RowIdGenerator::new();
        let mut buckets = CategoryBuckets::new();
        buckets.merge(vec![raw("a", "Events")], &ids);
        buckets.merge(vec![raw("b", "Events"), raw("c", "Events")], &ids);
        assert_eq!(ids_of(&buckets.get("Events")), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_merge_skips_duplicates_within_batch() {
        let ids = RowIdGenerator::new();
        let mut buckets = CategoryBuckets::new();
        let outcome = buckets.merge(vec![raw("a", "Events"), raw("a", "Events")], &ids);
        assert_eq!(outcome.summary.inserted, 1);
        assert_eq!(outcome.summary.duplicates, 1);
        assert_eq!(buckets.len("Events"), 1);
    }

    #[test]
    fn test_same_id_in_other_category_is_distinct() {
        let ids = RowIdGenerator::new();
        let mut buckets = CategoryBuckets::new();
        buckets.merge(vec![raw("a", "Events"), raw("a", "Lap Data")], &ids);
        assert_eq!(buckets.len("Events"), 1);
        assert_eq!(buckets.len("Lap Data"), 1);
    }

    #[test]
    fn test_oversized_batch_keeps_newest() {
        let ids = RowIdGenerator::new();
        let mut buckets = CategoryBuckets::new();
        let batch: Vec<RawRow> = (0..MAX_ROWS + 10)
            .map(|i| raw(&format!("r{i}"), "Motion Data"))
            .collect();
        let outcome = buckets.merge(batch, &ids);

        let bucket = buckets.get("Motion Data");
        assert_eq!(bucket.len(), MAX_ROWS);
        assert_eq!(bucket[0].id, format!("r{}", MAX_ROWS + 9));
        assert_eq!(bucket[MAX_ROWS - 1].id, "r10");
        assert_eq!(outcome.summary.evicted, 10);
        assert_eq!(outcome.evicted_ids[0], "r9");
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_mutation() {
        let ids = RowIdGenerator::new();
        let mut buckets = CategoryBuckets::new();
        buckets.merge(vec![raw("a", "Events"), raw("b", "Events")], &ids);

        let before = buckets.get("Events");
        buckets.move_row("Events", "a", MoveDirection::Up);
        buckets.delete_row("Events", "b");

        assert_eq!(ids_of(&before), vec!["b", "a"]);
        assert_eq!(ids_of(&buckets.get("Events")), vec!["a"]);
    }

    #[test]
    fn test_move_at_boundary_is_noop() {
        let ids = RowIdGenerator::new();
        let mut buckets = CategoryBuckets::new();
        buckets.merge(vec![raw("a", "Events"), raw("b", "Events")], &ids);

        assert!(!buckets.move_row("Events", "b", MoveDirection::Up));
        assert!(!buckets.move_row("Events", "a", MoveDirection::Down));
        assert!(!buckets.move_row("Events", "zzz", MoveDirection::Down));
        assert!(!buckets.move_row("Nope", "a", MoveDirection::Down));
        assert_eq!(ids_of(&buckets.get("Events")), vec!["b", "a"]);
    }

    #[test]
    fn test_get_unknown_category_is_empty() {
        let buckets = CategoryBuckets::new();
        assert!(buckets.get("Car Damage").is_empty());
        assert!(buckets.categories().is_empty());
    }

    #[test]
    fn test_categories_keep_arrival_order() {
        let ids = RowIdGenerator::new();
        let mut buckets = CategoryBuckets::new();
        buckets.merge(vec![raw("a", "Lap Data"), raw("b", "Events")], &ids);
        buckets.merge(vec![raw("c", "Lap Data")], &ids);
        assert_eq!(buckets.categories(), &["Lap Data".to_string(), "Events".to_string()]);
        assert_eq!(buckets.total_rows(), 3);
    }

    #[test]
    fn test_clear_returns_rows_and_keeps_others() {
        let ids = RowIdGenerator::new();
        let mut buckets = CategoryBuckets::new();
        buckets.merge(vec![raw("a", "Lap Data"), raw("b", "Events")], &ids);
        let removed = buckets.clear("Lap Data");
        assert_eq!(removed.len(), 1);
        assert!(buckets.get("Lap Data").is_empty());
        assert_eq!(buckets.len("Events"), 1);
    }
}
