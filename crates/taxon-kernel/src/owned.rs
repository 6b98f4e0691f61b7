//! Single-owner assignment.
//!
//! Any entity can carry a back-reference to the context that assigned it,
//! plus the name it was assigned under. The relation is set exactly once
//! and both halves are set together; there is no release operation.
//!
//! The owner is held weakly — an owned entity never extends its owner's
//! lifetime.

use crate::error::Error;
use std::sync::{Arc, Weak};

/// What an assigning context must expose to its owned entities.
pub trait Owner: Send + Sync {
    /// Diagnostic identity of the owner, e.g. a model or manager name.
    fn owner_label(&self) -> String;
}

/// The embeddable ownership state: at most one owner, assigned once,
/// together with the name the owner chose.
#[derive(Debug, Default)]
pub struct Owned {
    owner: Option<Weak<dyn Owner>>,
    assigned_name: Option<String>,
}

impl Owned {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The ownership contract for entities embedding [`Owned`].
pub trait Ownable {
    /// Entity label for diagnostics.
    fn kind(&self) -> &'static str;

    fn owned(&self) -> &Owned;

    fn owned_mut(&mut self) -> &mut Owned;

    /// Callback invoked once, after a successful assignment. The
    /// back-validation point for entities that need to check or mirror
    /// state on their new owner.
    fn owned_hook(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Assign the unique owner and the name chosen by it. Fails with an
    /// ownership violation when called twice.
    fn own<O>(&mut self, owner: &Arc<O>, name: impl Into<String>) -> Result<(), Error>
    where
        O: Owner + 'static,
    {
        self.require_unowned("own")?;
        let weak = Arc::downgrade(owner);
        let weak: Weak<dyn Owner> = weak;
        let relation = self.owned_mut();
        relation.owner = Some(weak);
        relation.assigned_name = Some(name.into());
        self.owned_hook()
    }

    /// The owner, if it is still alive.
    fn owner(&self) -> Option<Arc<dyn Owner>> {
        self.owned().owner.as_ref().and_then(Weak::upgrade)
    }

    /// Whether an owner was ever assigned. Stays true even after the owner
    /// has been dropped.
    fn is_owned(&self) -> bool {
        self.owned().owner.is_some()
    }

    /// The name this entity was assigned under, once owned.
    fn assigned_name(&self) -> Option<&str> {
        self.owned().assigned_name.as_deref()
    }

    /// Fail with an ownership violation unless an owner was assigned.
    fn require_owned(&self, operation: &str) -> Result<(), Error> {
        if !self.is_owned() {
            return Err(Error::OwnershipViolation {
                kind: self.kind(),
                name: self.assigned_name().unwrap_or("unnamed").to_string(),
                operation: format!("{operation} requires an owned instance"),
            });
        }
        Ok(())
    }

    /// Fail with an ownership violation if an owner was already assigned.
    fn require_unowned(&self, operation: &str) -> Result<(), Error> {
        if self.is_owned() {
            return Err(Error::OwnershipViolation {
                kind: self.kind(),
                name: self.assigned_name().unwrap_or("unnamed").to_string(),
                operation: format!("{operation} requires an unowned instance"),
            });
        }
        Ok(())
    }
}
