//! # mutuum-core
//!
//! High-level facade for the mutuum lending protocol.
//!
//! [`Protocol`] wires the three modules (user registry, reputation
//! book, lending desk) together over one token ledger and one
//! block clock, and gives every mutating operation transaction
//! semantics: an operation either completes in full or leaves no trace.
//!
//! ## Quick Start
//!
//! ```
//! use mutuum_core::Protocol;
//! use mutuum_types::{Address, Amount};
//!
//! let admin = Address::repeat_byte(0xee);
//! let token = Address::repeat_byte(0xaa);
//! let (lender, borrower) = (Address::repeat_byte(1), Address::repeat_byte(2));
//!
//! let mut protocol = Protocol::new(admin, 1_700_000_000).unwrap();
//! protocol.register(lender, "lender").unwrap();
//! protocol.register(borrower, "borrower").unwrap();
//!
//! protocol.mint(token, lender, Amount::from(1_000u64));
//! protocol
//!     .approve(lender, token, protocol.lending_address(), Amount::MAX)
//!     .unwrap();
//!
//! let offer = protocol
//!     .create_offer(
//!         lender,
//!         Amount::from(100u64),
//!         token,
//!         1_000,      // 10% premium
//!         86_400,     // one day
//!         Amount::zero(),
//!         Address::ZERO,
//!     )
//!     .unwrap();
//! # let _ = offer;
//! ```
//!
//! ## Execution Model
//!
//! Single-threaded and transaction-serialized: each facade call is one
//! whole transaction. Timestamps come from the owned [`BlockClock`] and
//! only move forward; wall time is never consulted.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod error;
pub mod protocol;

pub use clock::BlockClock;
pub use error::{CoreError, Result};
pub use protocol::Protocol;
