//! # mutuum-token
//!
//! Fungible-token collaborator interface for the mutuum protocol.
//!
//! The lending and reputation modules never touch balances directly; every
//! monetary movement is a pull (`transfer_from`) or a push (`transfer`)
//! against the [`Tokens`] trait. The trait is a directory over many
//! fungible tokens, each identified by a [`TokenAddress`]; per-token it
//! exposes the usual balance / allowance / approve / transfer surface.
//!
//! [`InMemoryTokens`] is the reference implementation used by the protocol
//! facade and by every test: a plain in-memory balance and allowance book
//! with a mint helper.
//!
//! ## Example
//!
//! ```
//! use mutuum_token::{InMemoryTokens, Tokens};
//! use mutuum_types::{Address, Amount};
//!
//! let token = Address::repeat_byte(0xaa);
//! let alice = Address::repeat_byte(1);
//! let bob = Address::repeat_byte(2);
//!
//! let mut tokens = InMemoryTokens::new();
//! tokens.mint(token, alice, Amount::from(100u64));
//! tokens.transfer(token, alice, bob, Amount::from(40u64)).unwrap();
//! assert_eq!(tokens.balance_of(token, bob), Amount::from(40u64));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod ledger;

pub use error::{Result, TokenError};
pub use ledger::{InMemoryTokens, Tokens};
