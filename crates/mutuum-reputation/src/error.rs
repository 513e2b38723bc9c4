//! Error types for reputation operations.

use mutuum_token::TokenError;
use thiserror::Error;

/// Errors that can occur during reputation operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReputationError {
    /// A party to the operation is not registered.
    #[error("Address is not registered")]
    NotRegistered,

    /// The caller is not the configured authority or owner.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An argument failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No such vouch.
    #[error("Vouch not found")]
    NotFound,

    /// A vouch for this (voucher, borrower) pair is already active.
    #[error("Vouch already active for this pair")]
    DoubleSpend,

    /// A nested re-entry into a mutating operation was detected.
    #[error("Re-entrant call detected")]
    Reentrancy,

    /// The token collaborator refused a movement.
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Result type for reputation operations.
pub type Result<T> = std::result::Result<T, ReputationError>;
