//! A miniature reference family.
//!
//! `ToyField` is a small field-type family used by the integration tests
//! and by downstream crates as a worked example of the capability table:
//! one computed getter (`label`, derived from the name) and one
//! intercepting setter (`native`, normalized to lowercase on the way in).

use crate::element::{Accessor, Element, ElementKind, Mutator};
use crate::error::Error;
use crate::manager::{ElementSeed, Manager};
use crate::value::AttrValue;
use heck::ToUpperCamelCase;

/// Marker for the toy field-type family.
pub struct ToyField;

fn label(element: &Element<ToyField>) -> AttrValue {
    AttrValue::Str(element.name().to_upper_camel_case())
}

fn set_native(element: &mut Element<ToyField>, value: AttrValue) -> Result<(), Error> {
    let value = match value {
        AttrValue::Str(s) => AttrValue::Str(s.to_ascii_lowercase()),
        other => other,
    };
    element.store("native", value)?;
    Ok(())
}

impl ElementKind for ToyField {
    const KIND: &'static str = "toy field type";

    fn accessor(key: &str) -> Option<Accessor<Self>> {
        match key {
            "label" => Some(label),
            _ => None,
        }
    }

    fn mutator(key: &str) -> Option<Mutator<Self>> {
        match key {
            "native" => Some(set_native),
            _ => None,
        }
    }
}

/// A seeded toy manager: three scalar types plus a name-defaulted
/// `migration` definition.
pub fn toy_manager() -> Result<Manager<ToyField>, Error> {
    let mut manager = Manager::new(ElementSeed::Names(vec![
        "integer".to_string(),
        "string".to_string(),
        "boolean".to_string(),
    ]))?;
    manager.define("migration", None)?;
    Ok(manager)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toy_manager_is_seeded() {
        let manager = toy_manager().unwrap();
        assert_eq!(manager.count(), 3);
        assert!(manager.does_define("migration"));
        assert_eq!(
            manager.get("boolean").unwrap().get("migration").unwrap(),
            AttrValue::from("boolean")
        );
    }

    #[test]
    fn label_is_computed_from_the_name() {
        let mut manager = toy_manager().unwrap();
        manager.create("big_integer", None).unwrap();
        assert_eq!(
            manager.get("big_integer").unwrap().get("label").unwrap(),
            AttrValue::from("BigInteger")
        );
    }

    #[test]
    fn native_values_are_normalized() {
        let mut manager = toy_manager().unwrap();
        manager
            .create("timestamp", Some(AttrValue::from("TIMESTAMP")))
            .unwrap();
        assert_eq!(
            manager.get("timestamp").unwrap().get("native").unwrap(),
            AttrValue::from("timestamp")
        );
    }
}
