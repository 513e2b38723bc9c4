//! Events emitted by the reputation book.

use serde::{Deserialize, Serialize};

use mutuum_types::{Address, AgreementId, Amount, TokenAddress};

use crate::outcome::PaymentOutcome;

/// Events emitted by the reputation book, in emission order.
///
/// The first address-typed field of each event is the indexed topic in
/// the on-chain encoding. Within one operation the emission order is part
/// of the contract: slashing emits `VouchSlashed` before the voucher's
/// `ReputationUpdated`; outcome recording emits the borrower's pair of
/// events before the lender's.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReputationEvent {
    /// A vouch was placed and its stake escrowed.
    VouchAdded {
        /// The staking account.
        voucher: Address,
        /// The borrower vouched for.
        borrower: Address,
        /// The escrowed token.
        token: TokenAddress,
        /// Stake placed.
        amount: Amount,
    },
    /// A voucher voluntarily removed a vouch and recovered its stake.
    VouchRemoved {
        /// The staking account.
        voucher: Address,
        /// The borrower that was vouched for.
        borrower: Address,
        /// The escrowed token.
        token: TokenAddress,
        /// Remaining stake returned.
        amount: Amount,
    },
    /// The lending authority slashed part of a vouch stake.
    VouchSlashed {
        /// The penalized voucher.
        voucher: Address,
        /// The defaulting borrower.
        borrower: Address,
        /// The escrowed token.
        token: TokenAddress,
        /// Amount seized.
        amount: Amount,
        /// Recipient of the seized stake (the wronged lender).
        payee: Address,
    },
    /// An account's score changed.
    ///
    /// Never emitted for a zero delta.
    ReputationUpdated {
        /// The account whose score changed.
        account: Address,
        /// The score after the change.
        new_score: i64,
        /// Human-readable reason.
        reason: String,
    },
    /// A settled loan's outcome was recorded for one party.
    LoanTermOutcomeRecorded {
        /// The settled agreement.
        agreement_id: AgreementId,
        /// The party this record is for.
        account: Address,
        /// The score delta applied to this party.
        delta: i64,
        /// Human-readable reason.
        reason: String,
        /// The classified outcome.
        outcome: PaymentOutcome,
    },
}
