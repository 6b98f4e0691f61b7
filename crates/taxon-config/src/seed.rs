//! Resolving configuration trees into registry seeds.
//!
//! The manager accepts a tagged [`ElementSeed`]; it never sniffs shapes at
//! runtime. The shape resolution happens here, at the configuration
//! boundary: a string array becomes names, an object is split per-entry
//! into native values (scalar entries) and attribute maps (object
//! entries), preserving entry order within each.

use crate::error::ConfigError;
use indexmap::IndexMap;
use serde_json::Value;
use taxon_kernel::{AttrValue, ElementSeed};

/// Map a configuration value onto an attribute value. Floats, nulls and
/// objects have no attribute counterpart and are rejected with `path` in
/// the report.
pub fn attr_from_value(value: &Value, path: &str) -> Result<AttrValue, ConfigError> {
    match value {
        Value::String(s) => Ok(AttrValue::Str(s.clone())),
        Value::Bool(b) => Ok(AttrValue::Bool(*b)),
        Value::Number(n) => n.as_i64().map(AttrValue::Int).ok_or_else(|| {
            ConfigError::UnsupportedValue {
                path: path.to_string(),
                found: format!("non-integer number {n}"),
            }
        }),
        Value::Array(items) => {
            let mut resolved = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                resolved.push(attr_from_value(item, &format!("{path}[{idx}]"))?);
            }
            Ok(AttrValue::List(resolved))
        }
        Value::Null => Err(ConfigError::UnsupportedValue {
            path: path.to_string(),
            found: "null".to_string(),
        }),
        Value::Object(_) => Err(ConfigError::UnsupportedValue {
            path: path.to_string(),
            found: "object".to_string(),
        }),
    }
}

/// Resolve a configuration value into the seeds it describes.
///
/// Mixed objects are legal in configuration files; they split into a
/// native-value seed and an attribute-map seed, applied in that order.
pub fn seeds_from_value(value: &Value) -> Result<Vec<ElementSeed>, ConfigError> {
    match value {
        Value::Array(items) => {
            let mut names = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                match item {
                    Value::String(name) => names.push(name.clone()),
                    other => {
                        return Err(ConfigError::UnsupportedValue {
                            path: format!("[{idx}]"),
                            found: format!("non-string element name {other}"),
                        });
                    }
                }
            }
            Ok(vec![ElementSeed::Names(names)])
        }
        Value::Object(map) => {
            let mut natives: IndexMap<String, AttrValue> = IndexMap::new();
            let mut attribute_maps: IndexMap<String, IndexMap<String, AttrValue>> =
                IndexMap::new();

            for (name, entry) in map {
                match entry {
                    Value::Object(attrs) => {
                        let mut attributes = IndexMap::new();
                        for (key, value) in attrs {
                            let path = format!("{name}.{key}");
                            attributes.insert(key.clone(), attr_from_value(value, &path)?);
                        }
                        attribute_maps.insert(name.clone(), attributes);
                    }
                    scalar => {
                        natives.insert(name.clone(), attr_from_value(scalar, name)?);
                    }
                }
            }

            let mut seeds = Vec::new();
            if !natives.is_empty() {
                seeds.push(ElementSeed::NativeValues(natives));
            }
            if !attribute_maps.is_empty() {
                seeds.push(ElementSeed::AttributeMaps(attribute_maps));
            }
            Ok(seeds)
        }
        other => Err(ConfigError::UnsupportedValue {
            path: String::new(),
            found: format!("top-level {other} (expected an array or an object)"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_arrays_become_names() {
        let seeds = seeds_from_value(&json!(["int", "string"])).unwrap();
        assert_eq!(
            seeds,
            vec![ElementSeed::Names(vec![
                "int".to_string(),
                "string".to_string()
            ])]
        );
    }

    #[test]
    fn mixed_objects_split_in_order() {
        let seeds = seeds_from_value(&json!({
            "int": 5,
            "text": { "native": "varchar", "length": 255 },
            "bool": "boolean",
        }))
        .unwrap();

        assert_eq!(seeds.len(), 2);
        match &seeds[0] {
            ElementSeed::NativeValues(entries) => {
                let listed: Vec<&str> = entries.keys().map(String::as_str).collect();
                assert_eq!(listed, ["int", "bool"]);
                assert_eq!(entries["int"], AttrValue::Int(5));
            }
            other => panic!("expected native values, got {other:?}"),
        }
        match &seeds[1] {
            ElementSeed::AttributeMaps(entries) => {
                assert_eq!(entries["text"]["native"], AttrValue::from("varchar"));
                assert_eq!(entries["text"]["length"], AttrValue::Int(255));
            }
            other => panic!("expected attribute maps, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_values_carry_their_path() {
        let err = seeds_from_value(&json!({ "int": { "scale": 1.5 } })).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedValue { path, .. } if path == "int.scale"
        ));

        let err = seeds_from_value(&json!({ "int": null })).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedValue { path, .. } if path == "int"
        ));
    }

    #[test]
    fn non_string_names_are_rejected() {
        let err = seeds_from_value(&json!(["int", 3])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedValue { path, .. } if path == "[1]"
        ));
    }
}
