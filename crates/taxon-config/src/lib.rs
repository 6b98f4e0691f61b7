//! # Taxon Config
//!
//! The configuration boundary for Taxon registries: deep merging of
//! configuration trees (package defaults under application overlays) and
//! resolution of the merged tree into the tagged seeds a
//! [`taxon_kernel::Manager`] consumes.
//!
//! Reading configuration from disk belongs to the host application; this
//! crate only defines the merge and resolution semantics.

pub mod error;
pub mod merge;
pub mod seed;

pub use error::ConfigError;
pub use merge::merge;
pub use seed::{attr_from_value, seeds_from_value};
