//! Error types for the protocol facade.

use mutuum_lending::LendingError;
use mutuum_registry::RegistryError;
use mutuum_reputation::ReputationError;
use mutuum_token::TokenError;
use thiserror::Error;

/// Errors surfaced by the protocol facade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The block clock only moves forward.
    #[error("Time reversal: clock is at {current}, requested {requested}")]
    TimeReversal {
        /// The clock's current timestamp.
        current: u64,
        /// The rejected earlier timestamp.
        requested: u64,
    },

    /// A registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A reputation operation failed.
    #[error(transparent)]
    Reputation(#[from] ReputationError),

    /// A lending operation failed.
    #[error(transparent)]
    Lending(#[from] LendingError),

    /// A token operation failed.
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, CoreError>;
