//! Loan agreements and their status machine.

use serde::{Deserialize, Serialize};

use mutuum_reputation::ModificationKind;
use mutuum_types::{Address, AgreementId, Amount, OfferId, RequestId, TokenAddress};

use crate::math;
use crate::Result;

/// Status of a loan agreement.
///
/// `Repaid` and `Defaulted` are terminal for agreements; `Cancelled` is
/// the terminal observation for withdrawn offers and requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// Running, within the due date.
    Active,
    /// Running, past the due date, still repayable.
    Overdue,
    /// A requested term modification awaits the lender's response.
    PendingModificationApproval,
    /// A partial-payment agreement is in force.
    ActivePartialPaymentAgreed,
    /// Fully repaid.
    Repaid,
    /// Defaulted; collateral seized, vouches slashed.
    Defaulted,
    /// Withdrawn before fulfillment (offers and requests only).
    Cancelled,
}

impl LoanStatus {
    /// Whether repayments are accepted in this status.
    #[must_use]
    pub fn accepts_repayment(&self) -> bool {
        matches!(
            self,
            LoanStatus::Active | LoanStatus::Overdue | LoanStatus::ActivePartialPaymentAgreed
        )
    }

    /// Whether this status is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoanStatus::Repaid | LoanStatus::Defaulted | LoanStatus::Cancelled
        )
    }

    /// Whether the desk still holds collateral in this status.
    #[must_use]
    pub fn holds_collateral(&self) -> bool {
        matches!(
            self,
            LoanStatus::Active
                | LoanStatus::Overdue
                | LoanStatus::PendingModificationApproval
                | LoanStatus::ActivePartialPaymentAgreed
        )
    }
}

/// A formed loan between a lender and a borrower.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanAgreement {
    /// Unique identifier.
    pub id: AgreementId,
    /// The originating offer, or the zero sentinel.
    pub origin_offer_id: OfferId,
    /// The originating request, or the zero sentinel.
    pub origin_request_id: RequestId,
    /// The lender.
    pub lender: Address,
    /// The borrower.
    pub borrower: Address,
    /// Principal lent.
    pub principal_amount: Amount,
    /// Principal token.
    pub loan_token: TokenAddress,
    /// Fixed premium on principal, in basis points.
    pub interest_rate_bps: u16,
    /// Original term length in seconds.
    pub duration_seconds: u64,
    /// Escrowed collateral; zero if uncollateralized.
    pub collateral_amount: Amount,
    /// Collateral token, or the zero sentinel for none.
    pub collateral_token: TokenAddress,
    /// Block timestamp at formation.
    pub start_time: u64,
    /// Current due date; starts at `start_time + duration_seconds` and
    /// moves only through an approved extension.
    pub due_date: u64,
    /// Cumulative repayments received.
    pub amount_paid: Amount,
    /// Current status.
    pub status: LoanStatus,
    /// The modification currently or last requested.
    ///
    /// Kept (with `modification_approved_by_lender`) after an approved
    /// partial agreement is met, as the durable record the settlement
    /// classifier reads; only the agreed value is cleared at that point.
    pub requested_modification_type: Option<ModificationKind>,
    /// Interpretation depends on the kind: a timestamp for an extension,
    /// a payment amount for a partial agreement.
    pub requested_modification_value: Amount,
    /// True only after the lender approved the current request.
    pub modification_approved_by_lender: bool,
}

impl LoanAgreement {
    /// Principal plus the fixed basis-point premium, truncating division.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the product overflows 256 bits; creation
    /// validates terms, so this cannot fire on a stored agreement.
    pub fn total_due(&self) -> Result<Amount> {
        math::total_due(self.principal_amount, self.interest_rate_bps)
    }

    /// What is still owed.
    pub fn remaining_due(&self) -> Result<Amount> {
        Ok(self.total_due()?.saturating_sub(self.amount_paid))
    }

    /// Whether collateral was posted.
    #[must_use]
    pub fn has_collateral(&self) -> bool {
        !self.collateral_amount.is_zero() && !self.collateral_token.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(LoanStatus::Active.accepts_repayment());
        assert!(LoanStatus::Overdue.accepts_repayment());
        assert!(LoanStatus::ActivePartialPaymentAgreed.accepts_repayment());
        assert!(!LoanStatus::PendingModificationApproval.accepts_repayment());
        assert!(!LoanStatus::Repaid.accepts_repayment());

        assert!(LoanStatus::Repaid.is_terminal());
        assert!(LoanStatus::Defaulted.is_terminal());
        assert!(LoanStatus::Cancelled.is_terminal());
        assert!(!LoanStatus::Overdue.is_terminal());

        assert!(LoanStatus::PendingModificationApproval.holds_collateral());
        assert!(!LoanStatus::Defaulted.holds_collateral());
    }
}
