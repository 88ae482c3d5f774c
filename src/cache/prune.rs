//! Null-field pruning used by the compression toggle.
//!
//! Nothing is compressed: object fields whose value is `null` are dropped,
//! recursively through arrays and nested objects. Array elements are kept even
//! when null so positions do not shift.

use serde_json::Value;

/// Returns `value` with every null object field removed.
pub fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune_nulls).collect()),
        other => other,
    }
}
