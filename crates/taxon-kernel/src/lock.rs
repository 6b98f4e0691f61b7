//! The one-way lock lifecycle.
//!
//! Every registry participant starts unlocked, accepts configuration
//! freely, and is locked exactly once by the owning application bootstrap.
//! The transition is irreversible: once locked, all reads must succeed
//! without further mutation, and every mutation path fails loudly.
//!
//! The `locking` hook runs once, before the phase flips. A hook failure
//! aborts the transition and leaves the instance unlocked, so a caller can
//! repair the precondition and retry.

use crate::error::Error;
use serde::Serialize;

/// The two lifecycle states. `Unlocked → Locked` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Unlocked,
    Locked,
}

/// The lockable lifecycle contract.
///
/// Implementors provide identity (for diagnostics) and phase storage; the
/// transition logic and the guard operations are provided.
pub trait Lockable {
    /// Family label for diagnostics, e.g. the element kind.
    fn kind(&self) -> &'static str;

    /// Instance label for diagnostics, e.g. the element name.
    fn label(&self) -> &str;

    fn phase(&self) -> Phase;

    fn phase_mut(&mut self) -> &mut Phase;

    /// Extension point invoked exactly once during [`Lockable::lock`],
    /// before the phase flips. Subclass-specific validation lives here.
    fn locking(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Transition to `Locked`. A no-op when already locked. A failing
    /// `locking` hook propagates and the instance stays unlocked.
    fn lock(&mut self) -> Result<(), Error> {
        if self.is_locked() {
            return Ok(());
        }
        self.locking()?;
        *self.phase_mut() = Phase::Locked;
        Ok(())
    }

    fn is_locked(&self) -> bool {
        self.phase() == Phase::Locked
    }

    /// Fail with a lock violation if the instance is locked. `operation`
    /// labels the attempted action for diagnostics.
    fn require_unlocked(&self, operation: &str) -> Result<(), Error> {
        if self.is_locked() {
            return Err(Error::LockViolation {
                kind: self.kind(),
                name: self.label().to_string(),
                operation: format!("{operation} requires an unlocked instance"),
            });
        }
        Ok(())
    }

    /// Fail with a lock violation if the instance is still unlocked.
    fn require_locked(&self, operation: &str) -> Result<(), Error> {
        if !self.is_locked() {
            return Err(Error::LockViolation {
                kind: self.kind(),
                name: self.label().to_string(),
                operation: format!("{operation} requires a locked instance"),
            });
        }
        Ok(())
    }
}
