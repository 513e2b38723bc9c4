//! Error types for primitive-type parsing.

use thiserror::Error;

/// Errors that can occur while constructing primitive types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Byte input had the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        actual: usize,
    },

    /// Input was not valid hexadecimal.
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
}

/// Result type for primitive-type construction.
pub type Result<T> = std::result::Result<T, TypesError>;
