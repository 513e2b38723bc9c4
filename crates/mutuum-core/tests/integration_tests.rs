//! End-to-end scenarios for the wired protocol.
//!
//! Each scenario drives the facade the way an external caller would:
//! registration, approvals, offers, repayments, modifications, and
//! defaults, asserting final statuses, score movements (read from the
//! named delta constants), and net token balances.

use mutuum_core::{CoreError, Protocol};
use mutuum_lending::{LendingError, LendingEvent, LoanStatus};
use mutuum_reputation::{deltas, ModificationKind};
use mutuum_types::{Address, AgreementId, Amount, OfferId};

const DAY: u64 = 86_400;
const T0: u64 = 1_700_000_000;

fn admin() -> Address {
    Address::repeat_byte(0xee)
}

fn lender() -> Address {
    Address::repeat_byte(1)
}

fn borrower() -> Address {
    Address::repeat_byte(2)
}

fn voucher() -> Address {
    Address::repeat_byte(3)
}

fn loan_token() -> Address {
    Address::repeat_byte(0xaa)
}

fn collateral_token() -> Address {
    Address::repeat_byte(0xbb)
}

/// 18-decimal units.
fn wad(n: u64) -> Amount {
    Amount::from(n) * Amount::from(10u64).pow(Amount::from(18u64))
}

fn day(n: u64) -> u64 {
    T0 + n * DAY
}

/// A protocol with three registered, funded, fully-approved participants.
fn setup() -> Protocol {
    let mut protocol = Protocol::new(admin(), T0).unwrap();
    for (addr, name) in [
        (lender(), "lender"),
        (borrower(), "borrower"),
        (voucher(), "voucher"),
    ] {
        protocol.register(addr, name).unwrap();
    }
    let desk = protocol.lending_address();
    let book = protocol.reputation_address();
    for addr in [lender(), borrower(), voucher()] {
        protocol.mint(loan_token(), addr, wad(1_000));
        protocol.approve(addr, loan_token(), desk, Amount::MAX).unwrap();
        protocol.approve(addr, loan_token(), book, Amount::MAX).unwrap();
    }
    protocol.mint(collateral_token(), borrower(), Amount::from(1_000_000_000u64));
    protocol
        .approve(borrower(), collateral_token(), desk, Amount::MAX)
        .unwrap();
    protocol
}

fn open_loan(protocol: &mut Protocol, amount: Amount, rate_bps: u16, days: u64) -> AgreementId {
    let offer = protocol
        .create_offer(
            lender(),
            amount,
            loan_token(),
            rate_bps,
            days * DAY,
            Amount::zero(),
            Address::ZERO,
        )
        .unwrap();
    protocol
        .accept_offer(borrower(), offer, Amount::zero(), Address::ZERO)
        .unwrap()
}

#[test]
fn s1_on_time_repayment_original_terms() {
    let mut protocol = setup();
    let id = open_loan(&mut protocol, wad(100), 1_000, 7);

    protocol.advance_time_to(day(6)).unwrap();
    protocol.repay(borrower(), id, wad(110)).unwrap();

    let agreement = protocol.lending().agreement(id).unwrap();
    assert_eq!(agreement.status, LoanStatus::Repaid);
    assert_eq!(
        protocol.reputation().score(borrower()),
        deltas::REPAID_ON_TIME_ORIGINAL
    );
    assert_eq!(
        protocol.reputation().score(lender()),
        deltas::LENT_SUCCESSFULLY_ON_TIME_ORIGINAL
    );

    // Net movement: the lender earned the 10% premium, the borrower paid it.
    assert_eq!(protocol.balance_of(loan_token(), lender()), wad(1_010));
    assert_eq!(protocol.balance_of(loan_token(), borrower()), wad(990));
    assert!(protocol
        .balance_of(loan_token(), protocol.lending_address())
        .is_zero());
}

#[test]
fn s2_partial_then_overdue_settlement() {
    let mut protocol = setup();
    let id = open_loan(&mut protocol, wad(200), 1_000, 14);

    protocol.advance_time_to(day(7)).unwrap();
    protocol.repay(borrower(), id, wad(110)).unwrap();
    assert_eq!(
        protocol.lending().agreement(id).unwrap().status,
        LoanStatus::Active
    );

    protocol.advance_time_to(day(15)).unwrap();
    protocol.repay(borrower(), id, wad(110)).unwrap();
    assert_eq!(
        protocol.lending().agreement(id).unwrap().status,
        LoanStatus::Repaid
    );
    assert_eq!(
        protocol.reputation().score(borrower()),
        deltas::REPAID_LATE_GRACE
    );
    assert_eq!(
        protocol.reputation().score(lender()),
        deltas::LENT_SUCCESSFULLY_AFTER_MODIFICATION
    );
}

#[test]
fn s3_approved_extension_paid_on_time() {
    let mut protocol = setup();
    let id = open_loan(&mut protocol, wad(70), 1_000, 7);

    protocol.advance_time_to(day(6)).unwrap();
    protocol
        .request_modification(
            borrower(),
            id,
            ModificationKind::DueDateExtension,
            Amount::from(day(14)),
        )
        .unwrap();
    protocol
        .respond_to_modification(lender(), id, true)
        .unwrap();
    assert_eq!(protocol.lending().agreement(id).unwrap().due_date, day(14));

    protocol.advance_time_to(day(13)).unwrap();
    protocol.repay(borrower(), id, wad(77)).unwrap();

    assert_eq!(
        protocol.reputation().score(borrower()),
        deltas::REPAID_ON_TIME_AFTER_EXTENSION
    );
    assert_eq!(
        protocol.reputation().score(lender()),
        deltas::LENT_SUCCESSFULLY_AFTER_MODIFICATION + deltas::LENDER_APPROVED_EXTENSION
    );
    assert_eq!(
        protocol
            .reputation()
            .profile(lender())
            .unwrap()
            .modifications_approved_by_lender,
        1
    );
}

#[test]
fn s4_default_with_collateral_and_vouch() {
    let mut protocol = setup();
    let collateral = Amount::from(50_000_000u64);
    let offer = protocol
        .create_offer(
            lender(),
            wad(100),
            loan_token(),
            1_000,
            7 * DAY,
            collateral,
            collateral_token(),
        )
        .unwrap();
    let id = protocol
        .accept_offer(borrower(), offer, collateral, collateral_token())
        .unwrap();
    protocol
        .add_vouch(voucher(), borrower(), wad(50), loan_token())
        .unwrap();

    // Invariant: the reputation book's custody covers the active stake.
    assert_eq!(
        protocol.balance_of(loan_token(), protocol.reputation_address()),
        wad(50)
    );

    protocol.advance_time_to(day(8)).unwrap();
    let lender_t1_before = protocol.balance_of(loan_token(), lender());
    protocol.handle_default(id).unwrap();

    assert_eq!(
        protocol.lending().agreement(id).unwrap().status,
        LoanStatus::Defaulted
    );
    // All collateral seized for the lender.
    assert_eq!(
        protocol.balance_of(collateral_token(), lender()),
        collateral
    );
    assert_eq!(protocol.reputation().score(borrower()), deltas::DEFAULTED);

    // 10% of the 50-wad stake flowed to the lender; the rest remains.
    assert_eq!(
        protocol.balance_of(loan_token(), lender()),
        lender_t1_before + wad(5)
    );
    let vouch = protocol
        .reputation()
        .vouch_details(voucher(), borrower())
        .unwrap();
    assert_eq!(vouch.staked_amount, wad(45));
    assert_eq!(
        protocol.reputation().score(voucher()),
        deltas::VOUCH_DEFAULTED_VOUCHER
    );
    assert_eq!(
        protocol.balance_of(loan_token(), protocol.reputation_address()),
        wad(45)
    );
}

#[test]
fn s5_partial_agreement_met_then_settled() {
    let mut protocol = setup();
    let id = open_loan(&mut protocol, wad(90), 1_000, 10);

    protocol
        .request_modification(
            borrower(),
            id,
            ModificationKind::PartialPaymentAgreement,
            wad(30),
        )
        .unwrap();
    protocol
        .respond_to_modification(lender(), id, true)
        .unwrap();
    assert_eq!(
        protocol.lending().agreement(id).unwrap().status,
        LoanStatus::ActivePartialPaymentAgreed
    );

    protocol.advance_time_to(day(2)).unwrap();
    protocol.repay(borrower(), id, wad(30)).unwrap();
    let agreement = protocol.lending().agreement(id).unwrap();
    assert_eq!(agreement.status, LoanStatus::Active);
    assert!(agreement.requested_modification_value.is_zero());

    protocol.advance_time_to(day(5)).unwrap();
    protocol.repay(borrower(), id, wad(69)).unwrap();

    assert_eq!(
        protocol.lending().agreement(id).unwrap().status,
        LoanStatus::Repaid
    );
    assert_eq!(
        protocol.reputation().score(borrower()),
        deltas::REPAID_WITH_PARTIAL_AGREEMENT_MET
    );
    assert_eq!(
        protocol.reputation().score(lender()),
        deltas::LENT_SUCCESSFULLY_AFTER_MODIFICATION + deltas::LENDER_APPROVED_PARTIAL_AGREEMENT
    );
}

#[test]
fn s6_rejected_modification_keeps_terms() {
    let mut protocol = setup();
    let id = open_loan(&mut protocol, wad(100), 1_000, 7);

    protocol
        .request_modification(
            borrower(),
            id,
            ModificationKind::DueDateExtension,
            Amount::from(day(14)),
        )
        .unwrap();
    protocol
        .respond_to_modification(lender(), id, false)
        .unwrap();

    let agreement = protocol.lending().agreement(id).unwrap();
    assert_eq!(agreement.due_date, day(7));
    assert_eq!(agreement.status, LoanStatus::Active);
    // No reputation movement at rejection time.
    assert_eq!(protocol.reputation().score(borrower()), 0);
    assert_eq!(protocol.reputation().score(lender()), 0);
    assert!(protocol.reputation().events().is_empty());
}

#[test]
fn offer_escrow_invariant_and_cancellation() {
    let mut protocol = setup();
    let offer_a = protocol
        .create_offer(
            lender(),
            wad(100),
            loan_token(),
            1_000,
            7 * DAY,
            Amount::zero(),
            Address::ZERO,
        )
        .unwrap();
    let offer_b = protocol
        .create_offer(
            lender(),
            wad(200),
            loan_token(),
            500,
            14 * DAY,
            Amount::zero(),
            Address::ZERO,
        )
        .unwrap();

    // The desk holds the sum of all active offers' principal.
    assert_eq!(
        protocol.balance_of(loan_token(), protocol.lending_address()),
        wad(300)
    );

    protocol.cancel_offer(lender(), offer_a).unwrap();
    assert_eq!(
        protocol.balance_of(loan_token(), protocol.lending_address()),
        wad(200)
    );
    assert_eq!(protocol.balance_of(loan_token(), lender()), wad(800));

    // A cancelled offer is gone for good.
    let err = protocol
        .accept_offer(borrower(), offer_a, Amount::zero(), Address::ZERO)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Lending(LendingError::IllegalState { .. })
    ));
    assert!(protocol.lending().offer(offer_b).unwrap().active);
}

#[test]
fn request_flow_funds_borrower_directly() {
    let mut protocol = setup();
    let request = protocol
        .create_request(
            borrower(),
            wad(200),
            loan_token(),
            1_000,
            14 * DAY,
            Amount::zero(),
            Address::ZERO,
        )
        .unwrap();
    let id = protocol.fund_request(lender(), request).unwrap();

    assert_eq!(protocol.balance_of(loan_token(), borrower()), wad(1_200));
    assert_eq!(protocol.balance_of(loan_token(), lender()), wad(800));

    protocol.advance_time_to(day(10)).unwrap();
    protocol.repay(borrower(), id, wad(220)).unwrap();
    assert_eq!(
        protocol.lending().agreement(id).unwrap().status,
        LoanStatus::Repaid
    );
    assert_eq!(protocol.balance_of(loan_token(), lender()), wad(1_020));
}

#[test]
fn failed_operation_leaves_no_trace() {
    let mut protocol = setup();
    let id = open_loan(&mut protocol, wad(100), 1_000, 7);

    let borrower_before = protocol.balance_of(loan_token(), borrower());
    let lender_before = protocol.balance_of(loan_token(), lender());
    let events_before = protocol.lending().events().len();
    let agreement_before = protocol.lending().agreement(id).unwrap().clone();

    // Overpayment aborts the transaction in toto.
    let err = protocol.repay(borrower(), id, wad(111)).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Lending(LendingError::OverPayment { .. })
    ));

    assert_eq!(protocol.balance_of(loan_token(), borrower()), borrower_before);
    assert_eq!(protocol.balance_of(loan_token(), lender()), lender_before);
    assert_eq!(protocol.lending().events().len(), events_before);
    assert_eq!(protocol.lending().agreement(id).unwrap(), &agreement_before);
}

#[test]
fn settlement_reverts_whole_transaction_when_authority_rotated_away() {
    let mut protocol = setup();
    let id = open_loan(&mut protocol, wad(100), 1_000, 7);

    // Rotating the authority to a stranger makes the desk's reputation
    // call fail at settlement; the payment itself must roll back too.
    protocol
        .set_lending_authority(admin(), Address::repeat_byte(0x66))
        .unwrap();

    let borrower_before = protocol.balance_of(loan_token(), borrower());
    let err = protocol.repay(borrower(), id, wad(110)).unwrap_err();
    assert!(matches!(err, CoreError::Lending(LendingError::Reputation(_))));

    assert_eq!(protocol.balance_of(loan_token(), borrower()), borrower_before);
    assert_eq!(
        protocol.lending().agreement(id).unwrap().status,
        LoanStatus::Active
    );
    assert!(protocol.lending().agreement(id).unwrap().amount_paid.is_zero());

    // Rotating it back restores settlement.
    protocol
        .set_lending_authority(admin(), protocol.lending_address())
        .unwrap();
    protocol.repay(borrower(), id, wad(110)).unwrap();
    assert_eq!(
        protocol.lending().agreement(id).unwrap().status,
        LoanStatus::Repaid
    );
}

#[test]
fn vouch_can_be_removed_while_loan_is_active() {
    let mut protocol = setup();
    let _id = open_loan(&mut protocol, wad(100), 1_000, 7);
    protocol
        .add_vouch(voucher(), borrower(), wad(50), loan_token())
        .unwrap();

    // The stake is protective, not a hold requirement.
    protocol.remove_vouch(voucher(), borrower()).unwrap();
    assert_eq!(protocol.balance_of(loan_token(), voucher()), wad(1_000));
    assert!(protocol
        .reputation()
        .active_vouches_for_borrower(borrower())
        .is_empty());
}

#[test]
fn default_with_removed_vouch_slashes_nothing() {
    let mut protocol = setup();
    let id = open_loan(&mut protocol, wad(100), 1_000, 7);
    protocol
        .add_vouch(voucher(), borrower(), wad(50), loan_token())
        .unwrap();
    protocol.remove_vouch(voucher(), borrower()).unwrap();

    protocol.advance_time_to(day(8)).unwrap();
    protocol.handle_default(id).unwrap();

    assert_eq!(protocol.reputation().score(voucher()), 0);
    assert_eq!(protocol.balance_of(loan_token(), voucher()), wad(1_000));
}

#[test]
fn clock_never_runs_backwards() {
    let mut protocol = setup();
    protocol.advance_time_to(day(3)).unwrap();
    let err = protocol.advance_time_to(day(2)).unwrap_err();
    assert!(matches!(err, CoreError::TimeReversal { .. }));
    assert_eq!(protocol.now(), day(3));
}

#[test]
fn registry_gates_every_entry_point() {
    let mut protocol = setup();
    let stranger = Address::repeat_byte(9);
    protocol.mint(loan_token(), stranger, wad(100));
    protocol
        .approve(stranger, loan_token(), protocol.lending_address(), Amount::MAX)
        .unwrap();

    let err = protocol
        .create_offer(
            stranger,
            wad(10),
            loan_token(),
            1_000,
            7 * DAY,
            Amount::zero(),
            Address::ZERO,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Lending(LendingError::NotRegistered)
    ));

    let offer: OfferId = protocol
        .create_offer(
            lender(),
            wad(10),
            loan_token(),
            1_000,
            7 * DAY,
            Amount::zero(),
            Address::ZERO,
        )
        .unwrap();
    let err = protocol
        .accept_offer(stranger, offer, Amount::zero(), Address::ZERO)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Lending(LendingError::NotRegistered)
    ));
}

#[test]
fn repayment_events_and_idempotence() {
    let mut protocol = setup();
    let id = open_loan(&mut protocol, wad(100), 1_000, 7);

    protocol.advance_time_to(day(1)).unwrap();
    protocol.repay(borrower(), id, wad(50)).unwrap();
    protocol.repay(borrower(), id, wad(60)).unwrap();

    // The settling call emits LoanRepayment then LoanAgreementRepaid.
    let events = protocol.lending().events();
    let n = events.len();
    assert!(matches!(
        events[n - 2],
        LendingEvent::LoanRepayment {
            status_after: LoanStatus::Repaid,
            ..
        }
    ));
    assert!(matches!(events[n - 1], LendingEvent::LoanAgreementRepaid { .. }));

    // Further repayments fail with IllegalState.
    let err = protocol.repay(borrower(), id, wad(1)).unwrap_err();
    assert!(matches!(
        err,
        CoreError::Lending(LendingError::IllegalState {
            status: LoanStatus::Repaid
        })
    ));
}
