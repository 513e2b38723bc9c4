//! Collision-resistant identifiers for offers, requests, and agreements.
//!
//! Ids are 32-byte values derived by hashing a tuple of
//! (actor, terms, timestamp, per-actor sequence) with BLAKE3. Each id kind
//! uses its own domain separator and every input field is length-prefixed,
//! so ids of different kinds can never collide with each other. Uniqueness
//! within a kind comes from the per-actor sequence counter in the input.
//!
//! The all-zero id is a sentinel: a [`LoanAgreement`]'s unused origin id
//! (offer- or request-side) is zero.
//!
//! [`LoanAgreement`]: https://docs.rs/mutuum-lending

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::{Address, Amount, Result, TypesError};

/// Domain separator for offer ids.
const OFFER_ID_DOMAIN: &[u8] = b"MUTUUM-OFFER-ID-v1";

/// Domain separator for request ids.
const REQUEST_ID_DOMAIN: &[u8] = b"MUTUUM-REQUEST-ID-v1";

/// Domain separator for agreement ids.
const AGREEMENT_ID_DOMAIN: &[u8] = b"MUTUUM-AGREEMENT-ID-v1";

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            /// Size of the id in bytes.
            pub const SIZE: usize = 32;

            /// The zero sentinel (an unset id).
            pub const ZERO: $name = $name([0u8; 32]);

            /// Create an id from raw bytes.
            ///
            /// # Errors
            ///
            /// Returns [`TypesError::InvalidLength`] if the input is not
            /// exactly 32 bytes.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
                if bytes.len() != Self::SIZE {
                    return Err(TypesError::InvalidLength {
                        expected: Self::SIZE,
                        actual: bytes.len(),
                    });
                }
                let mut arr = [0u8; 32];
                arr.copy_from_slice(bytes);
                Ok(Self(arr))
            }

            /// Get the id as a byte slice.
            #[must_use]
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Check whether this is the zero sentinel (constant-time).
            #[must_use]
            pub fn is_zero(&self) -> bool {
                self.0.ct_eq(&[0u8; 32]).into()
            }

            /// Format as a lowercase hexadecimal string (64 characters).
            #[must_use]
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({}…)", stringify!($name), &self.to_hex()[..8])
            }
        }
    };
}

define_id! {
    /// Identifier of a standing loan offer.
    OfferId
}

define_id! {
    /// Identifier of a standing loan request.
    RequestId
}

define_id! {
    /// Identifier of a formed loan agreement.
    AgreementId
}

/// Hash a sequence of length-prefixed fields under a domain separator.
fn hash_fields(domain: &[u8], fields: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(domain.len() as u64).to_le_bytes());
    hasher.update(domain);
    for field in fields {
        hasher.update(&(field.len() as u64).to_le_bytes());
        hasher.update(field);
    }
    *hasher.finalize().as_bytes()
}

/// Derive an offer id from the lender, the offered terms, the block
/// timestamp, and the lender's sequence counter.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn derive_offer_id(
    lender: &Address,
    token: &Address,
    amount: &Amount,
    interest_rate_bps: u16,
    duration_seconds: u64,
    timestamp: u64,
    sequence: u64,
) -> OfferId {
    OfferId(hash_fields(
        OFFER_ID_DOMAIN,
        &[
            lender.as_bytes(),
            token.as_bytes(),
            &amount.to_big_endian(),
            &interest_rate_bps.to_le_bytes(),
            &duration_seconds.to_le_bytes(),
            &timestamp.to_le_bytes(),
            &sequence.to_le_bytes(),
        ],
    ))
}

/// Derive a request id from the borrower, the proposed terms, the block
/// timestamp, and the borrower's sequence counter.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn derive_request_id(
    borrower: &Address,
    token: &Address,
    amount: &Amount,
    interest_rate_bps: u16,
    duration_seconds: u64,
    timestamp: u64,
    sequence: u64,
) -> RequestId {
    RequestId(hash_fields(
        REQUEST_ID_DOMAIN,
        &[
            borrower.as_bytes(),
            token.as_bytes(),
            &amount.to_big_endian(),
            &interest_rate_bps.to_le_bytes(),
            &duration_seconds.to_le_bytes(),
            &timestamp.to_le_bytes(),
            &sequence.to_le_bytes(),
        ],
    ))
}

/// Derive an agreement id from the origin id, the counterparty who
/// completed the match, the start time, and the counterparty's sequence
/// counter.
#[must_use]
pub fn derive_agreement_id(
    origin: &[u8; 32],
    counterparty: &Address,
    start_time: u64,
    sequence: u64,
) -> AgreementId {
    AgreementId(hash_fields(
        AGREEMENT_ID_DOMAIN,
        &[
            origin,
            counterparty.as_bytes(),
            &start_time.to_le_bytes(),
            &sequence.to_le_bytes(),
        ],
    ))
}
