//! Error types for token operations.

use mutuum_types::Amount;
use thiserror::Error;

/// Errors surfaced by the fungible-token collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The zero address was passed where a real token was required.
    #[error("Zero address is not a valid token")]
    ZeroToken,

    /// The owner's balance does not cover the movement.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Amount the movement required.
        required: Amount,
        /// Amount actually available.
        available: Amount,
    },

    /// The spender's allowance does not cover the pull.
    #[error("Insufficient allowance: required {required}, approved {approved}")]
    InsufficientAllowance {
        /// Amount the pull required.
        required: Amount,
        /// Amount actually approved.
        approved: Amount,
    },
}

/// Result type for token operations.
pub type Result<T> = std::result::Result<T, TokenError>;
