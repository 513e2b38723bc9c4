//! Property tests for the classifier and loan arithmetic.

use proptest::prelude::*;

use mutuum_reputation::{ModificationKind, PaymentOutcome};
use mutuum_types::{Amount, BPS_DENOMINATOR};

use crate::classifier::classify_payment_outcome;
use crate::math::{slash_amount, total_due};

fn any_modification() -> impl Strategy<Value = Option<ModificationKind>> {
    prop_oneof![
        Just(None),
        Just(Some(ModificationKind::DueDateExtension)),
        Just(Some(ModificationKind::PartialPaymentAgreement)),
    ]
}

proptest! {
    #[test]
    fn classifier_timeliness_partition(
        now in 0u64..=u64::MAX,
        due in 0u64..=u64::MAX,
        modification in any_modification(),
        approved in any::<bool>(),
    ) {
        let outcome = classify_payment_outcome(now, due, modification, approved);
        if now <= due {
            prop_assert!(matches!(
                outcome,
                PaymentOutcome::OnTimeOriginal
                    | PaymentOutcome::OnTimeExtended
                    | PaymentOutcome::PartialAgreementMetAndRepaid
            ));
        } else {
            prop_assert!(matches!(
                outcome,
                PaymentOutcome::LateGraceOriginal | PaymentOutcome::LateExtended
            ));
        }
    }

    #[test]
    fn classifier_modified_outcomes_require_approval(
        now in 0u64..=u64::MAX,
        due in 0u64..=u64::MAX,
        modification in any_modification(),
        approved in any::<bool>(),
    ) {
        let outcome = classify_payment_outcome(now, due, modification, approved);
        match outcome {
            PaymentOutcome::OnTimeExtended | PaymentOutcome::LateExtended => {
                prop_assert!(approved);
                prop_assert_eq!(modification, Some(ModificationKind::DueDateExtension));
            }
            PaymentOutcome::PartialAgreementMetAndRepaid => {
                prop_assert!(approved);
                prop_assert_eq!(
                    modification,
                    Some(ModificationKind::PartialPaymentAgreement)
                );
            }
            PaymentOutcome::OnTimeOriginal | PaymentOutcome::LateGraceOriginal => {}
        }
    }

    #[test]
    fn classifier_is_deterministic(
        now in 0u64..=u64::MAX,
        due in 0u64..=u64::MAX,
        modification in any_modification(),
        approved in any::<bool>(),
    ) {
        prop_assert_eq!(
            classify_payment_outcome(now, due, modification, approved),
            classify_payment_outcome(now, due, modification, approved)
        );
    }

    #[test]
    fn total_due_bounds(principal in any::<u128>(), rate in any::<u16>()) {
        let principal = Amount::from(principal);
        let total = total_due(principal, rate).unwrap();
        // The premium is principal * rate / 10_000, truncated.
        prop_assert!(total >= principal);
        let interest = total - principal;
        prop_assert!(interest <= principal * Amount::from(rate) / Amount::from(BPS_DENOMINATOR) + Amount::from(1u64));
    }

    #[test]
    fn slash_amount_bounds(stake in 1u128..) {
        let stake = Amount::from(stake);
        let slash = slash_amount(stake);
        prop_assert!(slash >= Amount::from(1u64));
        prop_assert!(slash <= stake);
        // At 10 units and above the floor never engages.
        if stake >= Amount::from(10u64) {
            prop_assert_eq!(slash, stake * Amount::from(1_000u64) / Amount::from(BPS_DENOMINATOR));
        }
    }
}
