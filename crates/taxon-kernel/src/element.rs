//! Named, attribute-bearing, lockable elements.
//!
//! An element is one member of an extensible family (a field type, an
//! operator, a state, …). It carries an open key/value attribute map and a
//! one-way lock. Reads fall through a fixed chain:
//!
//! ```text
//! accessor capability → the literal "name" → stored value → error
//! ```
//!
//! The capability table lives on the family marker type implementing
//! [`ElementKind`], not on the instance: computed getters and custom
//! setters are resolved statically per concrete family, never by runtime
//! method-name rewriting.

use crate::error::Error;
use crate::lock::{Lockable, Phase};
use crate::value::AttrValue;
use indexmap::IndexMap;
use serde_json::{Value, json};
use std::fmt;
use std::marker::PhantomData;

/// A computed getter: takes precedence over the stored value for its key.
pub type Accessor<K> = fn(&Element<K>) -> AttrValue;

/// A custom setter: takes precedence over the plain store for its key. It
/// may call [`Element::store`] itself, or apply side effects.
pub type Mutator<K> = fn(&mut Element<K>, AttrValue) -> Result<(), Error>;

/// A family of elements: the polymorphism point tying a manager to the
/// concrete elements it produces.
///
/// The default capability table is empty; a family overrides `accessor`
/// and `mutator` for the keys it computes or intercepts.
pub trait ElementKind: Sized + 'static {
    /// Family label used in diagnostics and error messages.
    const KIND: &'static str;

    fn accessor(_key: &str) -> Option<Accessor<Self>> {
        None
    }

    fn mutator(_key: &str) -> Option<Mutator<Self>> {
        None
    }
}

/// One named member of an element family.
pub struct Element<K: ElementKind> {
    name: String,
    attributes: IndexMap<String, AttrValue>,
    phase: Phase,
    _kind: PhantomData<K>,
}

impl<K: ElementKind> Element<K> {
    /// Create an element and store its native value through the full `set`
    /// path, so a `native` mutator capability applies at construction.
    pub fn new(name: impl Into<String>, native: impl Into<AttrValue>) -> Result<Self, Error> {
        let mut element = Self {
            name: name.into(),
            attributes: IndexMap::new(),
            phase: Phase::Unlocked,
            _kind: PhantomData,
        };
        element.set("native", native)?;
        Ok(element)
    }

    /// The immutable identity of this element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a value is stored under `key`. `name` is not a stored
    /// attribute — it is special-cased by [`Element::get`].
    pub fn has(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Read an attribute: accessor capability first, then the literal
    /// `name`, then the stored value.
    pub fn get(&self, key: &str) -> Result<AttrValue, Error> {
        if let Some(accessor) = K::accessor(key) {
            return Ok(accessor(self));
        }
        if key == "name" {
            return Ok(AttrValue::Str(self.name.clone()));
        }
        if let Some(value) = self.attributes.get(key) {
            return Ok(value.clone());
        }
        Err(Error::UndefinedAttribute {
            kind: K::KIND,
            name: self.name.clone(),
            key: key.to_string(),
        })
    }

    /// Write an attribute: mutator capability first, else a plain store.
    /// Fails once locked. Returns `self` for chaining.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<&mut Self, Error> {
        let key = key.into();
        self.require_unlocked(&format!("set [{key}]"))?;
        if let Some(mutator) = K::mutator(&key) {
            mutator(self, value.into())?;
        } else {
            self.attributes.insert(key, value.into());
        }
        Ok(self)
    }

    /// Store a value directly, bypassing the mutator capability. This is
    /// the primitive a mutator delegates to for its own key.
    pub fn store(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<&mut Self, Error> {
        let key = key.into();
        self.require_unlocked(&format!("store [{key}]"))?;
        self.attributes.insert(key, value.into());
        Ok(self)
    }

    /// The narrowed call convenience: with a key, read and resolve the
    /// attribute one level; without, the canonical string form (the name).
    pub fn invoke(&self, key: Option<&str>) -> Result<AttrValue, Error> {
        match key {
            Some(key) => Ok(self.get(key)?.resolve()),
            None => Ok(AttrValue::Str(self.name.clone())),
        }
    }

    /// Diagnostic snapshot of this element.
    pub fn describe(&self) -> Value {
        let attributes: serde_json::Map<String, Value> = self
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        json!({
            "kind": K::KIND,
            "name": self.name,
            "locked": self.is_locked(),
            "attributes": attributes,
        })
    }
}

impl<K: ElementKind> Lockable for Element<K> {
    fn kind(&self) -> &'static str {
        K::KIND
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn phase_mut(&mut self) -> &mut Phase {
        &mut self.phase
    }

    fn locking(&mut self) -> Result<(), Error> {
        if !self.has("native") {
            return Err(Error::LockViolation {
                kind: K::KIND,
                name: self.name.clone(),
                operation: "a native definition is required before locking".to_string(),
            });
        }
        Ok(())
    }
}

impl<K: ElementKind> fmt::Display for Element<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl<K: ElementKind> fmt::Debug for Element<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &K::KIND)
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("phase", &self.phase)
            .finish()
    }
}
