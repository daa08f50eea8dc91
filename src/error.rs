//! Error Types - One Enum, Typed Conditions
//!
//! Every failure is surfaced synchronously as a distinct condition and
//! aborts the whole operation. No local recovery inside the core.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// String rejected by the charset policy.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The (group, category, name) coordinate is already taken.
    #[error("Already registered: {0}")]
    Duplicate(String),

    /// Id or name references a nonexistent entity.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Indexed accessor called at or beyond the current count.
    #[error("Index {index} out of range (count {count})")]
    OutOfRange { index: u32, count: u32 },

    /// Submitter is not on the allow-list and the bypass switch is off.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Codec precondition violated.
    #[error("Malformed part body: {0}")]
    MalformedInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
