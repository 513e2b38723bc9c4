//! Opaque 20-byte account identifiers.
//!
//! An [`Address`] names an account or a fungible token in the protocol.
//! The all-zero address is a sentinel: as a token identifier it means
//! "no token" (the uncollateralized case); as an account it is never a
//! valid party and is rejected wherever a real account is required.
//!
//! The zero check uses constant-time comparison so that custody-sensitive
//! code paths do not leak address contents through timing.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::{Result, TypesError};

/// Domain separator for addresses derived from labels (module accounts).
const ADDRESS_DERIVE_DOMAIN: &[u8] = b"MUTUUM-ADDRESS-v1";

/// An opaque 20-byte account identifier.
///
/// Addresses are ordered and hashable so they can key both `HashMap` and
/// `BTreeMap` state (the latter wherever deterministic iteration order is
/// observable through the event log).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 20]);

/// A fungible-token identifier. `Address::ZERO` denotes "no token".
pub type TokenAddress = Address;

impl Address {
    /// Size of an address in bytes.
    pub const SIZE: usize = 20;

    /// The zero address sentinel.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create an address from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidLength`] if the input is not exactly
    /// 20 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SIZE {
            return Err(TypesError::InvalidLength {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// An address with every byte set to `byte`. Handy in tests.
    #[must_use]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Derive an address from a label (used for module custody accounts).
    ///
    /// Computed as the first 20 bytes of
    /// `BLAKE3(ADDRESS_DERIVE_DOMAIN || label)` with length-prefixed inputs.
    #[must_use]
    pub fn derive(label: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(ADDRESS_DERIVE_DOMAIN.len() as u64).to_le_bytes());
        hasher.update(ADDRESS_DERIVE_DOMAIN);
        hasher.update(&(label.len() as u64).to_le_bytes());
        hasher.update(label);
        let hash = hasher.finalize();
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&hash.as_bytes()[..20]);
        Self(arr)
    }

    /// Get the address as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to an owned byte array.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 20] {
        self.0
    }

    /// Check whether this is the zero sentinel.
    ///
    /// Uses constant-time comparison.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.ct_eq(&[0u8; 20]).into()
    }

    /// Format as a lowercase hexadecimal string (40 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hexadecimal string (40 characters, optional `0x` prefix).
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidHex`] on malformed input and
    /// [`TypesError::InvalidLength`] if the decoded value is not 20 bytes.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address(0x{})", self.to_hex())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sentinel() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::repeat_byte(1).is_zero());
    }

    #[test]
    fn test_hex_round_trip() {
        let addr = Address::repeat_byte(0xab);
        let hex = addr.to_hex();
        assert_eq!(hex.len(), 40);
        assert_eq!(Address::from_hex(&hex).unwrap(), addr);
        assert_eq!(Address::from_hex(&format!("0x{hex}")).unwrap(), addr);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        let err = Address::from_bytes(&[0u8; 19]).unwrap_err();
        assert_eq!(
            err,
            TypesError::InvalidLength {
                expected: 20,
                actual: 19
            }
        );
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(matches!(
            Address::from_hex("zz").unwrap_err(),
            TypesError::InvalidHex(_)
        ));
    }

    #[test]
    fn test_derive_is_stable_and_distinct() {
        let a = Address::derive(b"mutuum/lending");
        let b = Address::derive(b"mutuum/reputation");
        assert_eq!(a, Address::derive(b"mutuum/lending"));
        assert_ne!(a, b);
        assert!(!a.is_zero());
    }

    #[test]
    fn test_display_has_prefix() {
        let addr = Address::repeat_byte(0x01);
        assert!(addr.to_string().starts_with("0x01"));
    }
}
