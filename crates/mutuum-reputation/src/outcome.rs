//! Payment-outcome and modification-kind classifications.

use serde::{Deserialize, Serialize};

/// How a settled loan's payment trajectory is classified.
///
/// Defaults are handled separately (see
/// [`ReputationManager::record_loan_default`]); this enum only covers
/// loans that were fully repaid.
///
/// [`ReputationManager::record_loan_default`]: crate::ReputationManager::record_loan_default
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentOutcome {
    /// Repaid in full by the original due date, no approved modification.
    OnTimeOriginal,
    /// Repaid in full after the due date, no approved modification.
    LateGraceOriginal,
    /// Repaid by the extended due date under an approved extension.
    OnTimeExtended,
    /// Repaid after even the extended due date.
    LateExtended,
    /// Repaid after meeting an approved partial-payment agreement.
    PartialAgreementMetAndRepaid,
}

/// A negotiated term modification the borrower may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModificationKind {
    /// Push the due date out to a later timestamp.
    DueDateExtension,
    /// Agree on a specific partial payment amount.
    PartialPaymentAgreement,
}
