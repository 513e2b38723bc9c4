//! Error types for lending operations.

use mutuum_reputation::ReputationError;
use mutuum_token::TokenError;
use mutuum_types::Amount;
use thiserror::Error;

use crate::agreement::LoanStatus;

/// Errors that can occur during lending operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LendingError {
    /// A party to the operation is not registered.
    #[error("Address is not registered")]
    NotRegistered,

    /// The caller is not the party this operation belongs to.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An argument failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No such offer, request, or agreement.
    #[error("Not found")]
    NotFound,

    /// The operation is not valid in the agreement's current status.
    #[error("Illegal state: {status:?}")]
    IllegalState {
        /// The status the agreement was in.
        status: LoanStatus,
    },

    /// The offer or request was already fulfilled.
    #[error("Already fulfilled")]
    DoubleSpend,

    /// The payment would exceed the remaining amount due.
    #[error("Overpayment: {payment} exceeds remaining due {remaining}")]
    OverPayment {
        /// The attempted payment.
        payment: Amount,
        /// The remaining amount due.
        remaining: Amount,
    },

    /// Default was invoked before the due date passed.
    #[error("Agreement is not overdue")]
    NotOverdue,

    /// The agreement already reached a terminal status.
    #[error("Agreement is already settled")]
    AlreadySettled,

    /// A nested re-entry into a mutating operation was detected.
    #[error("Re-entrant call detected")]
    Reentrancy,

    /// The token collaborator refused a movement.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The reputation book refused a mutation.
    #[error(transparent)]
    Reputation(#[from] ReputationError),
}

/// Result type for lending operations.
pub type Result<T> = std::result::Result<T, LendingError>;
