//! Error types for configuration handling.

use serde_json::Value;

/// Errors arising while merging configuration trees or resolving them into
/// registry seeds. All propagate to the caller; a broken configuration is
/// never partially applied.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Two configuration trees disagree structurally at `path`.
    #[error("config merge conflict at [{path}]: cannot merge {incoming} into {original}")]
    MergeConflict {
        path: String,
        original: Value,
        incoming: Value,
    },

    /// A configuration value has no attribute-value counterpart.
    #[error("unsupported config value at [{path}]: {found}")]
    UnsupportedValue { path: String, found: String },
}
