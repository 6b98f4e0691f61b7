//! Error types for Taxon kernel operations.
//!
//! Every failure is a hard stop for the operation that raised it. The kernel
//! is a pure metadata layer: there is no retry logic and no partial
//! application anywhere, so each variant surfaces a programmer or
//! configuration error immediately.

/// Errors arising from registry misuse or lifecycle violations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A mutation was attempted in the wrong lock phase, or a locking hook
    /// precondition failed.
    #[error("lock violation on {kind} [{name}]: {operation}")]
    LockViolation {
        kind: &'static str,
        name: String,
        operation: String,
    },

    /// `get` found no accessor capability, no special-cased key, and no
    /// stored value.
    #[error("the {kind} element [{name}] has no value for key [{key}]")]
    UndefinedAttribute {
        kind: &'static str,
        name: String,
        key: String,
    },

    /// A name lookup on a manager found nothing.
    #[error("the {kind} element [{name}] does not exist")]
    UnknownElement { kind: &'static str, name: String },

    /// A native-value scan on a manager found no matching element.
    #[error("no {kind} element carries the native value [{native}]")]
    UnknownNativeElement { kind: &'static str, native: String },

    /// `own` was called twice, or an owned-only/unowned-only operation ran
    /// in the wrong ownership state.
    #[error("ownership violation on {kind} [{name}]: {operation}")]
    OwnershipViolation {
        kind: &'static str,
        name: String,
        operation: String,
    },
}
