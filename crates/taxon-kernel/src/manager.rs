//! Element managers: the registry owning one element family.
//!
//! A manager indexes elements by name in insertion order, creates and
//! bulk-configures them, and carries the family-wide attribute defaults
//! ("definitions") that are propagated eagerly in both directions:
//! defining after elements exist backfills them, and creating an element
//! after a definition exists seeds it.
//!
//! Locking a manager cascades to every element. Single-threaded by design:
//! `create`, `define` and `configure` interleave reads and writes across
//! the element and definition maps and must observe each other atomically.

use crate::element::{Element, ElementKind};
use crate::error::Error;
use crate::lock::{Lockable, Phase};
use crate::value::AttrValue;
use heck::ToSnakeCase;
use indexmap::IndexMap;
use serde_json::{Value, json};
use std::fmt;
use tracing::debug;

/// Bulk-configuration input, resolved by the caller into one of the three
/// accepted shapes rather than sniffed at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSeed {
    /// Plain names; each element's native value defaults to its name.
    Names(Vec<String>),
    /// Name → native value.
    NativeValues(IndexMap<String, AttrValue>),
    /// Name → full attribute map.
    AttributeMaps(IndexMap<String, IndexMap<String, AttrValue>>),
}

impl ElementSeed {
    /// A seed creating nothing.
    pub fn empty() -> Self {
        Self::Names(Vec::new())
    }
}

/// The registry owning all elements of one family, keyed by name.
pub struct Manager<K: ElementKind> {
    elements: IndexMap<String, Element<K>>,
    definitions: IndexMap<String, Option<AttrValue>>,
    phase: Phase,
}

impl<K: ElementKind> Default for Manager<K> {
    fn default() -> Self {
        Self {
            elements: IndexMap::new(),
            definitions: IndexMap::new(),
            phase: Phase::Unlocked,
        }
    }
}

impl<K: ElementKind> Manager<K> {
    /// Build a manager seeded with default elements.
    pub fn new(seed: ElementSeed) -> Result<Self, Error> {
        let mut manager = Self::default();
        manager.configure(seed)?;
        Ok(manager)
    }

    pub fn has(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All elements, in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Element<K>> {
        self.elements.values()
    }

    pub fn get(&self, name: &str) -> Result<&Element<K>, Error> {
        self.elements.get(name).ok_or_else(|| Error::UnknownElement {
            kind: K::KIND,
            name: name.to_string(),
        })
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Element<K>, Error> {
        self.elements
            .get_mut(name)
            .ok_or_else(|| Error::UnknownElement {
                kind: K::KIND,
                name: name.to_string(),
            })
    }

    /// The first-inserted element whose `native` attribute equals the
    /// argument. A linear scan: families hold tens of elements, not
    /// thousands.
    pub fn find(&self, native: &AttrValue) -> Result<&Element<K>, Error> {
        self.elements
            .values()
            .find(|element| {
                element
                    .get("native")
                    .map(|value| value == *native)
                    .unwrap_or(false)
            })
            .ok_or_else(|| Error::UnknownNativeElement {
                kind: K::KIND,
                native: native.to_string(),
            })
    }

    /// Create and register an element. The native value defaults to the
    /// name. Re-using an existing name replaces the prior element — a
    /// documented sharp edge, not an error.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        native: Option<AttrValue>,
    ) -> Result<&mut Element<K>, Error> {
        let name = name.into();
        self.require_unlocked(&format!("create [{name}]"))?;
        let native = native.unwrap_or_else(|| AttrValue::Str(name.clone()));
        let element = Element::new(name, native)?;
        self.insert(element)
    }

    pub fn get_or_create(&mut self, name: &str) -> Result<&mut Element<K>, Error> {
        if self.has(name) {
            return self.get_mut(name);
        }
        self.create(name, None)
    }

    /// Register a single element under its own name, then seed every
    /// definition it lacks: the registered default, or the element's name
    /// when the default is unset.
    pub fn insert(&mut self, element: Element<K>) -> Result<&mut Element<K>, Error> {
        let name = element.name().to_string();
        self.require_unlocked(&format!("register [{name}]"))?;
        if self.has(&name) {
            debug!(kind = K::KIND, element = %name, "replacing registered element");
        } else {
            debug!(kind = K::KIND, element = %name, "registering element");
        }

        let mut element = element;
        for (key, default) in &self.definitions {
            if !element.has(key) {
                let value = default
                    .clone()
                    .unwrap_or_else(|| AttrValue::Str(element.name().to_string()));
                element.set(key.clone(), value)?;
            }
        }

        // IndexMap keeps the original slot for an existing key, so a
        // replaced name retains its position in iteration order.
        self.elements.insert(name.clone(), element);
        self.get_mut(&name)
    }

    /// Bulk-configure from a seed, dispatching on its shape.
    pub fn configure(&mut self, seed: ElementSeed) -> Result<(), Error> {
        match seed {
            ElementSeed::Names(names) => {
                for name in names {
                    self.create(name, None)?;
                }
            }
            ElementSeed::NativeValues(entries) => {
                for (name, native) in entries {
                    self.create(name, Some(native))?;
                }
            }
            ElementSeed::AttributeMaps(entries) => {
                for (name, attributes) in entries {
                    let element = self.create(name, None)?;
                    for (key, value) in attributes {
                        element.set(key, value)?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn does_define(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Record a family-wide attribute default and backfill every element
    /// lacking it: the given default, or the element's own name when the
    /// default is `None`. The first definition wins; a repeat is a no-op.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        default: Option<AttrValue>,
    ) -> Result<(), Error> {
        let name = name.into();
        self.require_unlocked(&format!("define [{name}]"))?;
        if self.does_define(&name) {
            return Ok(());
        }
        debug!(kind = K::KIND, definition = %name, "defining family-wide attribute");
        self.definitions.insert(name.clone(), default.clone());

        for element in self.elements.values_mut() {
            if !element.has(&name) {
                let value = default
                    .clone()
                    .unwrap_or_else(|| AttrValue::Str(element.name().to_string()));
                element.set(name.clone(), value)?;
            }
        }
        Ok(())
    }

    /// The recorded definitions, in definition order.
    pub fn definitions(&self) -> &IndexMap<String, Option<AttrValue>> {
        &self.definitions
    }

    /// Name-normalizing lookup convenience: snake-cases the name, creates
    /// the element implicitly while unlocked, and falls back to a plain
    /// lookup once locked.
    pub fn fetch(&mut self, name: &str) -> Result<&Element<K>, Error> {
        let normalized = name.to_snake_case();
        if !self.has(&normalized) && !self.is_locked() {
            self.create(normalized.clone(), None)?;
        }
        self.get(&normalized)
    }

    /// Diagnostic snapshot of the whole family.
    pub fn describe(&self) -> Value {
        let definitions: serde_json::Map<String, Value> = self
            .definitions
            .iter()
            .map(|(name, default)| {
                let default = default
                    .as_ref()
                    .map(AttrValue::to_json)
                    .unwrap_or(Value::Null);
                (name.clone(), default)
            })
            .collect();
        json!({
            "kind": K::KIND,
            "locked": self.is_locked(),
            "definitions": definitions,
            "elements": self.elements.values().map(Element::describe).collect::<Vec<_>>(),
        })
    }
}

impl<K: ElementKind> Lockable for Manager<K> {
    fn kind(&self) -> &'static str {
        K::KIND
    }

    fn label(&self) -> &str {
        "manager"
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn phase_mut(&mut self) -> &mut Phase {
        &mut self.phase
    }

    /// Cascade-lock every element. The first element failure propagates
    /// and the manager stays unlocked.
    fn locking(&mut self) -> Result<(), Error> {
        for element in self.elements.values_mut() {
            element.lock()?;
        }
        debug!(kind = K::KIND, elements = self.elements.len(), "locked element family");
        Ok(())
    }
}

impl<K: ElementKind> fmt::Debug for Manager<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("kind", &K::KIND)
            .field("elements", &self.elements)
            .field("definitions", &self.definitions)
            .field("phase", &self.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    struct Plain;

    impl ElementKind for Plain {
        const KIND: &'static str = "plain";
    }

    fn names(names: &[&str]) -> ElementSeed {
        ElementSeed::Names(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn seeding_with_names() {
        let manager = Manager::<Plain>::new(names(&["int", "string"])).unwrap();
        assert_eq!(manager.count(), 2);
        let listed: Vec<&str> = manager.all().map(Element::name).collect();
        assert_eq!(listed, ["int", "string"]);
        assert_eq!(
            manager.get("int").unwrap().get("native").unwrap(),
            AttrValue::from("int")
        );
    }

    #[test]
    fn seeding_with_native_values() {
        let manager = Manager::<Plain>::new(ElementSeed::NativeValues(indexmap! {
            "a".to_string() => AttrValue::Int(5),
        }))
        .unwrap();
        assert_eq!(
            manager.get("a").unwrap().get("native").unwrap(),
            AttrValue::Int(5)
        );
    }

    #[test]
    fn seeding_with_attribute_maps() {
        let manager = Manager::<Plain>::new(ElementSeed::AttributeMaps(indexmap! {
            "a".to_string() => indexmap! {
                "x".to_string() => AttrValue::Int(1),
            },
        }))
        .unwrap();
        let element = manager.get("a").unwrap();
        assert_eq!(element.get("x").unwrap(), AttrValue::Int(1));
        // The native value still defaults to the name.
        assert_eq!(element.get("native").unwrap(), AttrValue::from("a"));
    }

    #[test]
    fn definitions_backfill_existing_elements() {
        let mut manager = Manager::<Plain>::new(names(&["int", "string"])).unwrap();
        manager.define("migration", None).unwrap();
        assert_eq!(
            manager.get("int").unwrap().get("migration").unwrap(),
            AttrValue::from("int")
        );
        assert_eq!(
            manager.get("string").unwrap().get("migration").unwrap(),
            AttrValue::from("string")
        );
    }

    #[test]
    fn definitions_seed_future_elements() {
        let mut manager = Manager::<Plain>::default();
        manager.define("factory", Some(AttrValue::Bool(true))).unwrap();
        manager.create("bool", None).unwrap();
        assert_eq!(
            manager.get("bool").unwrap().get("factory").unwrap(),
            AttrValue::Bool(true)
        );
    }

    #[test]
    fn first_definition_wins() {
        let mut manager = Manager::<Plain>::new(names(&["int"])).unwrap();
        manager.define("migration", Some(AttrValue::from("first"))).unwrap();
        manager.define("migration", Some(AttrValue::from("second"))).unwrap();
        assert_eq!(
            manager.definitions().get("migration").unwrap(),
            &Some(AttrValue::from("first"))
        );
        assert_eq!(
            manager.get("int").unwrap().get("migration").unwrap(),
            AttrValue::from("first")
        );
    }

    #[test]
    fn define_does_not_override_an_existing_attribute() {
        let mut manager = Manager::<Plain>::new(names(&["int"])).unwrap();
        manager
            .get_mut("int")
            .unwrap()
            .set("migration", "custom")
            .unwrap();
        manager.define("migration", None).unwrap();
        assert_eq!(
            manager.get("int").unwrap().get("migration").unwrap(),
            AttrValue::from("custom")
        );
    }

    #[test]
    fn find_returns_the_first_inserted_match() {
        let mut manager = Manager::<Plain>::default();
        manager.create("int", Some(AttrValue::from("number"))).unwrap();
        manager.create("float", Some(AttrValue::from("number"))).unwrap();

        let found = manager.find(&AttrValue::from("number")).unwrap();
        assert_eq!(found.name(), "int");

        assert!(matches!(
            manager.find(&AttrValue::from("blob")),
            Err(Error::UnknownNativeElement { native, .. }) if native == "blob"
        ));
    }

    #[test]
    fn create_replaces_and_keeps_the_slot() {
        let mut manager = Manager::<Plain>::new(names(&["int", "string"])).unwrap();
        manager
            .create("int", Some(AttrValue::from("int8")))
            .unwrap();
        assert_eq!(manager.count(), 2);
        let listed: Vec<&str> = manager.all().map(Element::name).collect();
        assert_eq!(listed, ["int", "string"]);
        assert_eq!(
            manager.get("int").unwrap().get("native").unwrap(),
            AttrValue::from("int8")
        );
    }

    #[test]
    fn get_or_create_reuses_existing_elements() {
        let mut manager = Manager::<Plain>::new(names(&["int"])).unwrap();
        manager
            .get_mut("int")
            .unwrap()
            .set("marker", AttrValue::Bool(true))
            .unwrap();
        assert!(manager.get_or_create("int").unwrap().has("marker"));
        assert!(!manager.has("bool"));
        manager.get_or_create("bool").unwrap();
        assert!(manager.has("bool"));
    }

    #[test]
    fn fetch_normalizes_and_creates_while_unlocked() {
        let mut manager = Manager::<Plain>::default();
        let element = manager.fetch("BigInteger").unwrap();
        assert_eq!(element.name(), "big_integer");

        manager.lock().unwrap();
        assert!(manager.fetch("big_integer").is_ok());
        assert!(matches!(
            manager.fetch("SmallInteger"),
            Err(Error::UnknownElement { .. })
        ));
    }

    #[test]
    fn locked_manager_rejects_every_mutation() {
        let mut manager = Manager::<Plain>::new(names(&["int"])).unwrap();
        manager.lock().unwrap();
        assert!(manager.is_locked());
        assert!(manager.get("int").unwrap().is_locked());

        assert!(matches!(
            manager.create("float", None),
            Err(Error::LockViolation { .. })
        ));
        assert!(matches!(
            manager.define("migration", None),
            Err(Error::LockViolation { .. })
        ));
        assert!(matches!(
            manager.configure(names(&["bool"])),
            Err(Error::LockViolation { .. })
        ));
        let orphan = Element::<Plain>::new("bool", "bool").unwrap();
        assert!(matches!(
            manager.insert(orphan),
            Err(Error::LockViolation { .. })
        ));
    }

    #[test]
    fn describe_reports_the_family() {
        let mut manager = Manager::<Plain>::new(names(&["int"])).unwrap();
        manager.define("migration", None).unwrap();
        let snapshot = manager.describe();
        assert_eq!(snapshot["kind"], "plain");
        assert_eq!(snapshot["locked"], false);
        assert_eq!(snapshot["definitions"]["migration"], serde_json::Value::Null);
        assert_eq!(snapshot["elements"][0]["name"], "int");
        assert_eq!(snapshot["elements"][0]["attributes"]["migration"], "int");
    }
}
