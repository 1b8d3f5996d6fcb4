use super::hub::Batch;
use crate::store::RawRow;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

/// Decode a host payload into a batch.
///
/// Accepts a JSON array of row objects or a single row object. Elements are
/// decoded one by one; a malformed element is logged and skipped without
/// affecting its neighbours. Only a payload that is not JSON at all fails.
pub fn decode_batch(bytes: &[u8]) -> Result<Batch> {
    let value: Value = serde_json::from_slice(bytes).context("batch payload is not valid JSON")?;

    let elements = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        Value::Null => Vec::new(),
        other => {
            warn!(kind = json_kind(&other), "ignoring non-row batch payload");
            Vec::new()
        }
    };

    let mut batch = Vec::with_capacity(elements.len());
    for (idx, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<RawRow>(element) {
            Ok(row) => batch.push(row),
            Err(e) => warn!(index = idx, error = %e, "skipping malformed row"),
        }
    }
    Ok(batch)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_array() {
        let batch = decode_batch(br#"[{"id":"a","title":"Events"},{"title":"Lap Data"}]"#).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id.as_deref(), Some("a"));
        assert!(batch[1].id.is_none());
    }

    #[test]
    fn test_decode_single_object() {
        let batch = decode_batch(br#"{"title":"Events","rawData":"x"}"#).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].payload.as_deref(), Some("x"));
    }

    #[test]
    fn test_malformed_element_is_isolated() {
        let batch =
            decode_batch(br#"[{"id":"a"}, 42, {"id": 7}, "text", {"id":"b","title":"Events"}]"#)
                .unwrap();
        let ids: Vec<_> = batch.iter().map(|r| r.id.clone().unwrap_or_default()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_json_fails() {
        assert!(decode_batch(b"not json").is_err());
    }

    #[test]
    fn test_empty_array() {
        assert!(decode_batch(b"[]").unwrap().is_empty());
    }
}
