//! Best-effort field decoding for upstream payloads.
//!
//! Upstream schemas drift: fields turn up as `null`, change type, or carry
//! list items that no longer match. These helpers are used with
//! `#[serde(deserialize_with = "...")]` so that one bad value degrades to its
//! default instead of failing the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode the field, or fall back to `T::default()` when it is `null` or the
/// wrong shape.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a list, keeping only the items that decode. Anything other than an
/// array is an empty list.
pub(crate) fn valid_items<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(items_from_value(value))
}

pub(crate) fn items_from_value<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "or_default")]
        name: String,
        #[serde(default, deserialize_with = "or_default")]
        count: Option<u64>,
        #[serde(default, deserialize_with = "valid_items")]
        tags: Vec<u32>,
    }

    #[test]
    fn test_null_and_wrong_types_fall_back() {
        let record: Record = serde_json::from_str(r#"{"name": null, "count": "many", "tags": {"a": 1}}"#).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.count, None);
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_bad_items_are_dropped() {
        let record: Record = serde_json::from_str(r#"{"name": "x", "tags": [1, null, "two", 3]}"#).unwrap();
        assert_eq!(record.name, "x");
        assert_eq!(record.tags, vec![1, 3]);
    }
}
