//! # mutuum-registry
//!
//! Authoritative identity directory for the mutuum protocol.
//!
//! Maps an account address to a profile (display name, registration
//! timestamp). Registration is one-shot: once an address registers it
//! stays registered forever; only the display name may change. Every
//! mutation is authenticated by the caller's own identity; there is no
//! privileged surface.
//!
//! ## Example
//!
//! ```
//! use mutuum_registry::UserRegistry;
//! use mutuum_types::Address;
//!
//! let alice = Address::repeat_byte(1);
//! let mut registry = UserRegistry::new();
//!
//! registry.register(alice, "alice", 1_700_000_000).unwrap();
//! assert!(registry.is_registered(alice));
//! assert_eq!(registry.total_registered(), 1);
//!
//! registry.update_name(alice, "alice-lender").unwrap();
//! assert_eq!(registry.profile(alice).unwrap().name, "alice-lender");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod name;
pub mod registry;

pub use error::{RegistryError, Result};
pub use name::{validate_display_name, MAX_NAME_BYTES, MIN_NAME_BYTES};
pub use registry::{RegistryEvent, UserProfile, UserRegistry};
