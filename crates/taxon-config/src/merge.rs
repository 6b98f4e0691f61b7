//! Deep merging of configuration trees.
//!
//! A package ships a default configuration tree; the application overlays
//! its own. Objects merge key-recursively with the incoming side winning
//! on leaves, a non-empty array replaces an array wholesale, and a
//! structural mismatch between a container and anything else is a hard
//! conflict carrying the dotted path.

use crate::error::ConfigError;
use serde_json::Value;

/// Merge `incoming` over `original`, returning the combined tree.
pub fn merge(original: Value, incoming: Value) -> Result<Value, ConfigError> {
    let mut path = Vec::new();
    merge_at(original, incoming, &mut path)
}

fn merge_at(
    original: Value,
    incoming: Value,
    path: &mut Vec<String>,
) -> Result<Value, ConfigError> {
    match (original, incoming) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                path.push(key.clone());
                let merged = match base.get(&key) {
                    Some(existing) => merge_at(existing.clone(), value, path)?,
                    None => value,
                };
                path.pop();
                // Re-inserting an existing key keeps its position.
                base.insert(key, merged);
            }
            Ok(Value::Object(base))
        }
        (Value::Array(base), Value::Array(overlay)) => Ok(Value::Array(if overlay.is_empty() {
            base
        } else {
            overlay
        })),
        // An empty incoming container of the wrong flavor changes nothing.
        (original @ Value::Object(_), Value::Array(overlay)) if overlay.is_empty() => Ok(original),
        (original @ Value::Array(_), Value::Object(overlay)) if overlay.is_empty() => Ok(original),
        (original @ (Value::Object(_) | Value::Array(_)), incoming) => {
            Err(ConfigError::MergeConflict {
                path: path.join("."),
                original,
                incoming,
            })
        }
        (_, incoming) => Ok(incoming),
    }
}
