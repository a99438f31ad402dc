//! Checked dotted-path traversal over a JSON tree
//!
//! A missing key, a non-object step or an explicit `null` all resolve to
//! `None`; lookups never fail.

use serde_json::Value;

/// Resolve a dotted path such as `properties.folder.name`
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = current.as_object()?.get(segment)?;
    }

    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Resolve a path to a string cell.
///
/// Strings come back as-is; other scalars and nested values are rendered
/// as compact JSON so a mistyped field still shows up in the inventory.
pub fn lookup_str(value: &Value, path: &str) -> Option<String> {
    lookup(value, path).and_then(as_cell)
}

/// Render a single value as a cell, `null` becoming `None`
pub fn as_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Resolve a path to an array, treating absent or non-array values as empty
pub fn lookup_array<'a>(value: &'a Value, path: &str) -> &'a [Value] {
    lookup(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_lookup() {
        let value = json!({"properties": {"folder": {"name": "Ingest"}}});
        assert_eq!(lookup_str(&value, "properties.folder.name").as_deref(), Some("Ingest"));
    }

    #[test]
    fn test_missing_and_null_are_none() {
        let value = json!({"properties": {"description": null}});
        assert!(lookup(&value, "properties.folder.name").is_none());
        assert!(lookup(&value, "properties.description").is_none());
        assert!(lookup(&value, "properties.description.inner").is_none());
    }

    #[test]
    fn test_non_object_step_is_none() {
        let value = json!({"properties": ["not", "an", "object"]});
        assert!(lookup(&value, "properties.folder").is_none());
    }

    #[test]
    fn test_non_string_scalar_rendered() {
        let value = json!({"properties": {"retries": 3}});
        assert_eq!(lookup_str(&value, "properties.retries").as_deref(), Some("3"));
    }

    #[test]
    fn test_lookup_array_defaults_to_empty() {
        let value = json!({"dependsOn": "oops", "activities": [1, 2]});
        assert!(lookup_array(&value, "dependsOn").is_empty());
        assert!(lookup_array(&value, "missing").is_empty());
        assert_eq!(lookup_array(&value, "activities").len(), 2);
    }
}
