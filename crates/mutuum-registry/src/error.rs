//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The caller is already registered; registration is one-shot.
    #[error("Address is already registered")]
    AlreadyRegistered,

    /// The caller is not registered.
    #[error("Address is not registered")]
    NotRegistered,

    /// The display name failed validation.
    #[error("Invalid name: {reason}")]
    NameInvalid {
        /// Why the name was rejected.
        reason: String,
    },

    /// A nested re-entry into a mutating operation was detected.
    #[error("Re-entrant call detected")]
    Reentrancy,
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
