//! # Taxon Kernel
//!
//! Lockable named-element registries: a family of immutable-after-lock
//! elements identified by name, each carrying an open attribute map, plus
//! the manager that indexes, creates, bulk-configures, and cascade-locks
//! the whole family.
//!
//! This crate is **family-agnostic**: it does not prescribe what an element
//! family means (field types, operators, states, …). It only prescribes how
//! members behave under configuration, definition propagation, and locking.
//!
//! ## Architecture
//!
//! ```text
//! Phase / Lockable       ← One-way Unlocked → Locked lifecycle
//!     │
//! AttrValue              ← Opaque values, resolved one lazy level deep
//!     │
//! Element<K>             ← Named attribute bundles; capability-table reads/writes
//!     │
//! Manager<K>             ← The family registry: definitions + cascading lock
//!
//! Owned / Ownable        ← Single-owner assignment, independent of the above
//! ```

pub mod element;
pub mod error;
pub mod lock;
pub mod manager;
pub mod owned;
pub mod toy;
pub mod value;

pub use element::{Accessor, Element, ElementKind, Mutator};
pub use error::Error;
pub use lock::{Lockable, Phase};
pub use manager::{ElementSeed, Manager};
pub use owned::{Ownable, Owned, Owner};
pub use value::{AttrValue, Thunk};
