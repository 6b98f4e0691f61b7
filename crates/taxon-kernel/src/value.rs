//! Opaque attribute values.
//!
//! Elements store arbitrary key/value attributes. The kernel does not type
//! check them — a value is a string, a bool, an integer, a list, a deferred
//! computation, or a by-name reference to another element of the same
//! family. Resolution of a deferred value goes exactly one level deep.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A deferred attribute computation, evaluated on demand by [`AttrValue::resolve`].
pub type Thunk = Arc<dyn Fn() -> AttrValue + Send + Sync>;

/// An attribute value carried by an element.
#[derive(Clone)]
pub enum AttrValue {
    Str(String),
    Bool(bool),
    Int(i64),
    List(Vec<AttrValue>),
    /// A callable producing a value when resolved.
    Lazy(Thunk),
    /// A by-name reference to another element of the same family.
    Ref(String),
}

impl AttrValue {
    /// Wrap a deferred computation.
    pub fn lazy(f: impl Fn() -> AttrValue + Send + Sync + 'static) -> Self {
        Self::Lazy(Arc::new(f))
    }

    /// Evaluate a deferred value exactly one level; anything else is cloned.
    ///
    /// A thunk returning another thunk is handed back as-is — recursive
    /// resolution is out of scope for the kernel.
    pub fn resolve(&self) -> AttrValue {
        match self {
            Self::Lazy(thunk) => thunk(),
            other => other.clone(),
        }
    }

    /// Borrow the string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Diagnostic projection onto JSON. Deferred values render as `"<lazy>"`,
    /// references as `"@name"`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Lazy(_) => Value::String("<lazy>".to_string()),
            Self::Ref(name) => Value::String(format!("@{name}")),
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            // Deferred values compare by identity, not by what they produce.
            (Self::Lazy(a), Self::Lazy(b)) => Arc::ptr_eq(a, b),
            (Self::Ref(a), Self::Ref(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Lazy(_) => write!(f, "Lazy(<thunk>)"),
            Self::Ref(name) => f.debug_tuple("Ref").field(name).finish(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Self::Lazy(_) => write!(f, "<lazy>"),
            Self::Ref(name) => write!(f, "@{name}"),
        }
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(items: Vec<AttrValue>) -> Self {
        Self::List(items)
    }
}
