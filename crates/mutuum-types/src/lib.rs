//! # mutuum-types
//!
//! Shared primitive types for the mutuum lending protocol.
//!
//! Provides:
//! - [`Address`]: opaque 20-byte account identifier with a zero sentinel
//! - [`OfferId`], [`RequestId`], [`AgreementId`]: collision-resistant
//!   32-byte identifiers derived from domain-separated BLAKE3 hashes
//! - [`Amount`]: unsigned 256-bit monetary amount in a token's smallest unit
//! - [`ReentrancyGuard`]: whole-call re-entrancy lock for externally
//!   reachable mutating operations
//!
//! ## Numeric Conventions
//!
//! Monetary amounts are `U256`; basis points use a `u16` with
//! [`BPS_DENOMINATOR`] = 10_000 = 100.00%. Division truncates toward zero.
//! Products that may exceed 256 bits are computed with wide multiplication
//! (`full_mul` into `U512`) before dividing back down.
//!
//! ## Example
//!
//! ```
//! use mutuum_types::{Address, Amount, BPS_DENOMINATOR};
//!
//! let lender = Address::repeat_byte(0x11);
//! assert!(!lender.is_zero());
//! assert!(Address::ZERO.is_zero());
//!
//! let principal = Amount::from(100u64) * Amount::from(10u64).pow(Amount::from(18u64));
//! assert_eq!(BPS_DENOMINATOR, 10_000);
//! # let _ = principal;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod error;
pub mod guard;
pub mod ids;

pub use address::{Address, TokenAddress};
pub use error::{Result, TypesError};
pub use guard::{EnterGuard, ReentrancyGuard};
pub use ids::{AgreementId, OfferId, RequestId};

/// Unsigned 256-bit monetary amount in a token's smallest unit.
pub type Amount = primitive_types::U256;

/// Wide intermediate for products that may exceed 256 bits.
pub type WideAmount = primitive_types::U512;

/// Basis-point denominator: 10_000 basis points = 100.00%.
pub const BPS_DENOMINATOR: u64 = 10_000;
