//! Value-shape policy for patch application.

use serde_json::Value;

/// Reduce a patch value to the replacement for an existing entry.
///
/// Returns `None` when the patch value leaves the entry unchanged. The rules,
/// one arm per shape:
///
/// - a string replaces the entry as-is
/// - a non-empty list replaces it with the list's last element
/// - a non-empty mapping replaces it with the value of its last-inserted key
///   (insertion order, not sort order)
/// - an empty list, empty mapping, number, boolean, or null changes nothing
///
/// The caller still records the key as patched in the `None` case.
pub fn reduce_patch_value(value: Value) -> Option<Value> {
    match value {
        Value::String(_) => Some(value),
        Value::Array(items) if !items.is_empty() => items.into_iter().last(),
        Value::Object(fields) if !fields.is_empty() => {
            fields.into_iter().last().map(|(_, value)| value)
        }
        Value::Array(_) | Value::Object(_) | Value::Null | Value::Bool(_) | Value::Number(_) => {
            None
        }
    }
}
