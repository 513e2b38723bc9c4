//! The payment-outcome classifier.
//!
//! Evaluated at the moment of the settling repayment, over the effective
//! due date (which may already reflect an approved extension) and the
//! modification state snapshotted *before* that repayment mutated the
//! agreement. First matching rule wins.

use mutuum_reputation::{ModificationKind, PaymentOutcome};

/// Classify a settled loan's payment trajectory.
///
/// Rules, first match wins:
///
/// 1. on time + approved extension → [`PaymentOutcome::OnTimeExtended`]
/// 2. on time + approved partial agreement →
///    [`PaymentOutcome::PartialAgreementMetAndRepaid`]
/// 3. on time → [`PaymentOutcome::OnTimeOriginal`]
/// 4. late + approved extension → [`PaymentOutcome::LateExtended`]
/// 5. late → [`PaymentOutcome::LateGraceOriginal`]
#[must_use]
pub fn classify_payment_outcome(
    now: u64,
    due_date: u64,
    modification: Option<ModificationKind>,
    lender_approved: bool,
) -> PaymentOutcome {
    let on_time = now <= due_date;
    match (on_time, lender_approved, modification) {
        (true, true, Some(ModificationKind::DueDateExtension)) => PaymentOutcome::OnTimeExtended,
        (true, true, Some(ModificationKind::PartialPaymentAgreement)) => {
            PaymentOutcome::PartialAgreementMetAndRepaid
        }
        (true, _, _) => PaymentOutcome::OnTimeOriginal,
        (false, true, Some(ModificationKind::DueDateExtension)) => PaymentOutcome::LateExtended,
        (false, _, _) => PaymentOutcome::LateGraceOriginal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_time_no_modification() {
        assert_eq!(
            classify_payment_outcome(5, 10, None, false),
            PaymentOutcome::OnTimeOriginal
        );
        // Boundary: exactly at the due date is on time.
        assert_eq!(
            classify_payment_outcome(10, 10, None, false),
            PaymentOutcome::OnTimeOriginal
        );
    }

    #[test]
    fn test_late_no_modification() {
        assert_eq!(
            classify_payment_outcome(11, 10, None, false),
            PaymentOutcome::LateGraceOriginal
        );
    }

    #[test]
    fn test_approved_extension() {
        assert_eq!(
            classify_payment_outcome(5, 10, Some(ModificationKind::DueDateExtension), true),
            PaymentOutcome::OnTimeExtended
        );
        assert_eq!(
            classify_payment_outcome(11, 10, Some(ModificationKind::DueDateExtension), true),
            PaymentOutcome::LateExtended
        );
    }

    #[test]
    fn test_approved_partial_agreement() {
        assert_eq!(
            classify_payment_outcome(
                5,
                10,
                Some(ModificationKind::PartialPaymentAgreement),
                true
            ),
            PaymentOutcome::PartialAgreementMetAndRepaid
        );
        // Late with a partial agreement falls through to late grace.
        assert_eq!(
            classify_payment_outcome(
                11,
                10,
                Some(ModificationKind::PartialPaymentAgreement),
                true
            ),
            PaymentOutcome::LateGraceOriginal
        );
    }

    #[test]
    fn test_unapproved_modification_is_ignored() {
        assert_eq!(
            classify_payment_outcome(5, 10, Some(ModificationKind::DueDateExtension), false),
            PaymentOutcome::OnTimeOriginal
        );
        assert_eq!(
            classify_payment_outcome(11, 10, Some(ModificationKind::DueDateExtension), false),
            PaymentOutcome::LateGraceOriginal
        );
    }
}
