//! Per-account reputation profiles.

use serde::{Deserialize, Serialize};

use mutuum_types::Amount;

/// Per-account reputation tallies and the signed score.
///
/// The score is an `i64` with no bounds and no saturation; it may go
/// arbitrarily negative.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationProfile {
    /// Loans this account has taken (settled or defaulted).
    pub loans_taken: u64,
    /// Loans this account has given (settled or defaulted).
    pub loans_given: u64,
    /// Loans repaid on time (original terms, extension met, or partial
    /// agreement met).
    pub loans_repaid_on_time: u64,
    /// Loans repaid late within grace.
    pub loans_repaid_late_grace: u64,
    /// Loans this account defaulted on.
    pub loans_defaulted: u64,
    /// Cumulative principal borrowed.
    pub total_value_borrowed: Amount,
    /// Cumulative principal lent.
    pub total_value_lent: Amount,
    /// Sum of currently escrowed vouch stakes this account has given,
    /// aggregated across tokens (display aggregate; the per-vouch records
    /// are the source of truth per token).
    pub vouching_stake_active: Amount,
    /// Number of vouches this account has ever placed.
    pub times_vouched: u64,
    /// Number of times a vouchee of this account defaulted.
    pub times_defaulted_as_voucher: u64,
    /// Modifications this account approved as a lender.
    pub modifications_approved_by_lender: u64,
    /// Modifications this account rejected as a lender.
    pub modifications_rejected_by_lender: u64,
    /// Current signed reputation score.
    pub current_score: i64,
}

impl ReputationProfile {
    /// A fresh profile: all tallies zero, score zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
