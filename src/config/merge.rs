//! Deep merge of configuration overlays

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Keys that are never merged from an overlay
const RESERVED_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Returns true for keys that an overlay must not set
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Merge `overlay` onto `base`, returning a new value.
///
/// Nested objects are merged recursively; arrays and scalars in the overlay
/// replace the base value wholesale. Reserved keys are skipped with a
/// warning. `base` is left untouched.
pub fn merge_overlay(base: &Value, overlay: &Value) -> Result<Value> {
    let overlay = overlay.as_object().ok_or_else(|| {
        Error::Validation(format!(
            "configuration overrides must be an object, got {}",
            type_name(overlay)
        ))
    })?;
    Ok(merge_objects(base, overlay))
}

fn merge_objects(base: &Value, overlay: &Map<String, Value>) -> Value {
    let mut merged = match base {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    for (key, value) in overlay {
        if is_reserved_key(key) {
            tracing::warn!("Ignoring reserved configuration key {:?}", key);
            continue;
        }

        let next = match (merged.get(key), value) {
            (Some(existing @ Value::Object(_)), Value::Object(nested)) => {
                merge_objects(existing, nested)
            }
            (None, Value::Object(nested)) => merge_objects(&Value::Null, nested),
            _ => value.clone(),
        };
        merged.insert(key.clone(), next);
    }

    Value::Object(merged)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
