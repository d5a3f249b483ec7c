//! Defensive unwrapping of list responses.
//!
//! List endpoints are inconsistent: some return a bare array, filter
//! endpoints wrap rows in `results`, `result` or `data`. Anything else is
//! treated as an empty list rather than an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Keys checked, in order, for wrapped list responses.
pub const LIST_KEYS: [&str; 3] = ["results", "result", "data"];

/// Rows of a list response; empty when the shape is unexpected.
pub fn list_rows(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(rows) => rows.clone(),
        Value::Object(map) => LIST_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Decode rows into `T`, skipping rows that do not fit.
pub fn typed_rows<T: DeserializeOwned>(value: &Value) -> Vec<T> {
    let rows = list_rows(value);
    let total = rows.len();
    let typed: Vec<T> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect();
    if typed.len() != total {
        tracing::warn!(
            skipped = total - typed.len(),
            total,
            "dropped list rows with an unexpected shape"
        );
    }
    typed
}
