use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Category used for rows that arrive without one.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// A decoded telemetry record as delivered by the host, before normalization.
///
/// Every field is optional on the wire. Field names follow the host's
/// camelCase payload (`title` is the category, `rowTitle` the inline label).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "title")]
    pub category: Option<String>,
    #[serde(default, rename = "rowTitle")]
    pub label: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub packet_id: Option<String>,
    #[serde(default, rename = "rawData")]
    pub payload: Option<String>,
}

impl RawRow {
    /// Shorthand used by tests and the replay feed.
    pub fn new(id: Option<&str>, category: Option<&str>, payload: &str) -> Self {
        Self {
            id: id.map(str::to_string),
            category: category.map(str::to_string),
            payload: Some(payload.to_string()),
            ..Self::default()
        }
    }
}

/// A normalized row owned by the store. Content never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub category: String,
    pub timestamp: String,
    pub label: String,
    pub packet_id: Option<String>,
    pub payload: String,
}

impl Row {
    /// Normalize a raw record, drawing an id from `ids` when the sender gave none.
    pub(crate) fn from_raw(raw: RawRow, ids: &RowIdGenerator) -> Self {
        let id = match raw.id {
            Some(id) if !id.is_empty() => id,
            _ => ids.next_id(),
        };
        let category = match raw.category {
            Some(c) if !c.trim().is_empty() => c,
            _ => UNKNOWN_CATEGORY.to_string(),
        };

        Self {
            id,
            category,
            timestamp: raw.timestamp.unwrap_or_default(),
            label: raw.label.unwrap_or_default(),
            packet_id: raw.packet_id,
            payload: raw.payload.unwrap_or_default(),
        }
    }
}

/// Process-local id source for rows that arrive without an id.
///
/// Ids combine the generator's creation time with a monotonic counter, so two
/// generators in the same process (e.g. two stores in tests) still differ, and
/// one generator never repeats itself.
#[derive(Debug)]
pub struct RowIdGenerator {
    epoch_ms: u128,
    counter: AtomicU64,
}

static GENERATOR_SEQ: AtomicU64 = AtomicU64::new(0);

impl RowIdGenerator {
    pub fn new() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        // Mix in a process-wide sequence so generators created in the same
        // millisecond do not share a prefix.
        let seq = GENERATOR_SEQ.fetch_add(1, Ordering::Relaxed) as u128;
        Self {
            epoch_ms: (now << 16) | (seq & 0xffff),
            counter: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{:x}-{:x}", self.epoch_ms, n)
    }
}

impl Default for RowIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids = RowIdGenerator::new();
        let seen: HashSet<String> = (0..10_000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 10_000);
    }

    #[test]
    fn test_separate_generators_do_not_collide() {
        let a = RowIdGenerator::new();
        let b = RowIdGenerator::new();
        assert_ne!(a.next_id(), b.next_id());
    }

    #[test]
    fn test_from_raw_defaults_category_and_id() {
        let ids = RowIdGenerator::new();
        let row = Row::from_raw(RawRow::new(None, None, "p"), &ids);
        assert!(!row.id.is_empty());
        assert_eq!(row.category, UNKNOWN_CATEGORY);
        assert_eq!(row.payload, "p");
        assert_eq!(row.label, "");
    }

    #[test]
    fn test_from_raw_treats_empty_id_as_missing() {
        let ids = RowIdGenerator::new();
        let row = Row::from_raw(RawRow::new(Some(""), Some("Events"), "p"), &ids);
        assert!(!row.id.is_empty());
        assert_eq!(row.category, "Events");
    }

    #[test]
    fn test_raw_row_host_field_names() {
        let json = r#"{"title":"Lap Data","rowTitle":"LapData","timestamp":"12.5","packetId":"2","rawData":"{}"}"#;
        let raw: RawRow = serde_json::from_str(json).unwrap();
        assert_eq!(raw.category.as_deref(), Some("Lap Data"));
        assert_eq!(raw.label.as_deref(), Some("LapData"));
        assert_eq!(raw.packet_id.as_deref(), Some("2"));
        assert_eq!(raw.payload.as_deref(), Some("{}"));
        assert!(raw.id.is_none());
    }
}
