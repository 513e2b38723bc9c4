//! # mutuum-reputation
//!
//! Vouch escrow, reputation scores, and the payment-outcome delta tables
//! for the mutuum protocol.
//!
//! The reputation book tracks per-account tallies and a signed,
//! unbounded score. Registered users may stake tokens to vouch for a
//! borrower; on default the lending authority slashes a portion of each
//! active vouch and routes it to the wronged lender.
//!
//! ## Authority Model
//!
//! The sensitive mutators [`ReputationManager::record_loan_payment_outcome`],
//! [`ReputationManager::record_loan_default`], and
//! [`ReputationManager::slash_vouch_and_reputation`] only accept calls
//! from the configured lending authority address. The administrative
//! owner sets and rotates that address; the owner has no other powers.
//!
//! ## Scoring
//!
//! Score deltas are named constants in [`deltas`]; test suites read the
//! constants rather than hardcoding values. The score is an `i64` with no
//! lower or upper bound and no saturation.
//!
//! ## Example
//!
//! ```
//! use mutuum_registry::UserRegistry;
//! use mutuum_reputation::ReputationManager;
//! use mutuum_token::{InMemoryTokens, Tokens};
//! use mutuum_types::{Address, Amount};
//!
//! let owner = Address::repeat_byte(0xee);
//! let custody = Address::derive(b"mutuum/reputation-custody");
//! let token = Address::repeat_byte(0xaa);
//! let (voucher, borrower) = (Address::repeat_byte(1), Address::repeat_byte(2));
//!
//! let mut registry = UserRegistry::new();
//! registry.register(voucher, "v", 0).unwrap();
//! registry.register(borrower, "b", 0).unwrap();
//!
//! let mut tokens = InMemoryTokens::new();
//! tokens.mint(token, voucher, Amount::from(100u64));
//! tokens.approve(token, voucher, custody, Amount::from(100u64)).unwrap();
//!
//! let mut reputation = ReputationManager::new(owner, custody);
//! reputation
//!     .add_vouch(&mut tokens, &registry, voucher, borrower, Amount::from(100u64), token, 0)
//!     .unwrap();
//! assert_eq!(tokens.balance_of(token, custody), Amount::from(100u64));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod deltas;
pub mod error;
pub mod event;
pub mod manager;
pub mod outcome;
pub mod profile;
pub mod vouch;

pub use error::{ReputationError, Result};
pub use event::ReputationEvent;
pub use manager::{ActiveVouch, ReputationManager};
pub use outcome::{ModificationKind, PaymentOutcome};
pub use profile::ReputationProfile;
pub use vouch::{Vouch, VouchRecord};
