//! Utility functions for the templating system.

use serde_json::Value;

/// Perform a deep merge of two JSON values.
///
/// Recursively merges `overrides` into `base`. For objects, fields from `overrides`
/// are added or replace fields in `base`. For arrays and primitives, `overrides`
/// completely replaces `base`.
///
/// Layout composition calls this with the new layout's front matter as `base` and
/// the accumulated `payload.layout` as `overrides`, so values set by inner layouts
/// survive the defaults of outer ones.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use jrender::templating::deep_merge_json;
///
/// let outer = json!({ "a": 2, "b": 3 });
/// let accumulated = json!({ "a": 1 });
///
/// let result = deep_merge_json(outer, &accumulated);
/// assert_eq!(result, json!({ "a": 1, "b": 3 }));
/// ```
pub fn deep_merge_json(mut base: Value, overrides: &Value) -> Value {
    match (base.as_object_mut(), overrides.as_object()) {
        (Some(base_obj), Some(override_obj)) => {
            for (key, override_value) in override_obj {
                match base_obj.get_mut(key) {
                    Some(base_value) if base_value.is_object() && override_value.is_object() => {
                        let merged = deep_merge_json(base_value.take(), override_value);
                        *base_value = merged;
                    }
                    _ => {
                        base_obj.insert(key.clone(), override_value.clone());
                    }
                }
            }
            base
        }
        (_, _) => overrides.clone(),
    }
}

/// Render a JSON value as indented `key: value` lines for debug logging.
///
/// Long strings are truncated and only the first few items of arrays are shown.
pub fn format_value_as_kv(value: &Value) -> String {
    fn format_entry(key: &str, value: &Value, indent: usize, lines: &mut Vec<String>) {
        let prefix = "  ".repeat(indent);
        match value {
            Value::Object(map) => {
                lines.push(format!("{prefix}{key}:"));
                for (k, v) in map {
                    format_entry(k, v, indent + 1, lines);
                }
            }
            Value::Array(items) => {
                lines.push(format!("{prefix}{key}: [{} items]", items.len()));
                for (i, item) in items.iter().take(3).enumerate() {
                    format_entry(&format!("[{i}]"), item, indent + 1, lines);
                }
                if items.len() > 3 {
                    lines.push(format!("{prefix}  ... {} more items", items.len() - 3));
                }
            }
            Value::String(s) if s.chars().count() > 100 => {
                let head: String = s.chars().take(97).collect();
                lines.push(format!("{prefix}{key}: \"{head}...\" ({} chars)", s.chars().count()));
            }
            Value::String(s) => lines.push(format!("{prefix}{key}: \"{s}\"")),
            other => lines.push(format!("{prefix}{key}: {other}")),
        }
    }

    let mut lines = Vec::new();
    if let Value::Object(map) = value {
        for (key, value) in map {
            format_entry(key, value, 1, &mut lines);
        }
    }
    lines.join("\n")
}
