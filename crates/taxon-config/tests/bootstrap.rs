//! Integration tests: from configuration tree to a locked family.

use serde_json::json;
use taxon_config::{merge, seeds_from_value};
use taxon_kernel::toy::ToyField;
use taxon_kernel::{AttrValue, Lockable, Manager};

#[test]
fn merged_configuration_seeds_a_family() {
    let defaults = json!({
        "int": "INTEGER",
        "string": { "native": "VARCHAR", "length": 255 },
    });
    let overlay = json!({
        "string": { "length": 1024 },
        "bool": "BOOLEAN",
    });

    let merged = merge(defaults, overlay).unwrap();
    let seeds = seeds_from_value(&merged).unwrap();

    let mut manager = Manager::<ToyField>::default();
    for seed in seeds {
        manager.configure(seed).unwrap();
    }
    manager.define("migration", None).unwrap();
    manager.lock().unwrap();

    // Scalar entries land as native values, run through the family's
    // native mutator (lowercasing), in configuration order.
    let listed: Vec<&str> = manager.all().map(|element| element.name()).collect();
    assert_eq!(listed, ["int", "bool", "string"]);
    assert_eq!(
        manager.get("int").unwrap().get("native").unwrap(),
        AttrValue::from("integer")
    );
    assert_eq!(
        manager.get("bool").unwrap().get("native").unwrap(),
        AttrValue::from("boolean")
    );

    // Object entries land as full attribute maps, with the overlay merged.
    let string = manager.get("string").unwrap();
    assert_eq!(string.get("native").unwrap(), AttrValue::from("varchar"));
    assert_eq!(string.get("length").unwrap(), AttrValue::Int(1024));

    // Definitions applied before locking reached every element.
    assert_eq!(
        string.get("migration").unwrap(),
        AttrValue::from("string")
    );
}
