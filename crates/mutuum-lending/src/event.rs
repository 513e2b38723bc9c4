//! Events emitted by the lending desk.

use serde::{Deserialize, Serialize};

use mutuum_reputation::ModificationKind;
use mutuum_types::{Address, AgreementId, Amount, OfferId, RequestId, TokenAddress};

use crate::agreement::LoanStatus;

/// Events emitted by the lending desk, in emission order.
///
/// The first address-typed field of each event is the indexed topic in
/// the on-chain encoding. Emission order within one operation is part of
/// the contract: a settling repayment emits `LoanRepayment` then
/// `LoanAgreementRepaid`; a default emits `LoanAgreementDefaulted` then,
/// if collateral was posted, `CollateralSeized`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LendingEvent {
    /// A lender escrowed principal behind a standing offer.
    LoanOfferCreated {
        /// The offering lender.
        lender: Address,
        /// The new offer.
        offer_id: OfferId,
        /// Principal token.
        token: TokenAddress,
        /// Principal on offer.
        amount: Amount,
        /// Premium in basis points.
        interest_rate_bps: u16,
        /// Term length in seconds.
        duration_seconds: u64,
        /// Required collateral (zero for none).
        required_collateral_amount: Amount,
        /// Collateral token (zero sentinel for none).
        collateral_token: TokenAddress,
    },
    /// A lender withdrew an unfulfilled offer and recovered its escrow.
    LoanOfferCancelled {
        /// The withdrawing lender.
        lender: Address,
        /// The cancelled offer.
        offer_id: OfferId,
    },
    /// A borrower posted a standing request.
    LoanRequestCreated {
        /// The soliciting borrower.
        borrower: Address,
        /// The new request.
        request_id: RequestId,
        /// Principal token.
        token: TokenAddress,
        /// Principal requested.
        amount: Amount,
        /// Proposed premium in basis points.
        proposed_interest_rate_bps: u16,
        /// Proposed term length in seconds.
        proposed_duration_seconds: u64,
        /// Offered collateral (zero for none).
        offered_collateral_amount: Amount,
        /// Collateral token (zero sentinel for none).
        collateral_token: TokenAddress,
    },
    /// A borrower withdrew an unfulfilled request.
    LoanRequestCancelled {
        /// The withdrawing borrower.
        borrower: Address,
        /// The cancelled request.
        request_id: RequestId,
    },
    /// An offer was accepted or a request funded.
    LoanAgreementCreated {
        /// The borrower.
        borrower: Address,
        /// The new agreement.
        agreement_id: AgreementId,
        /// The lender.
        lender: Address,
        /// Principal lent.
        principal_amount: Amount,
        /// Principal token.
        loan_token: TokenAddress,
        /// Formation timestamp.
        start_time: u64,
        /// Initial due date.
        due_date: u64,
    },
    /// A repayment was received.
    LoanRepayment {
        /// The paying borrower.
        borrower: Address,
        /// The agreement paid into.
        agreement_id: AgreementId,
        /// This payment.
        amount: Amount,
        /// Cumulative paid after this payment.
        total_paid: Amount,
        /// Status after this payment.
        status_after: LoanStatus,
    },
    /// The agreement settled in full.
    LoanAgreementRepaid {
        /// The borrower.
        borrower: Address,
        /// The settled agreement.
        agreement_id: AgreementId,
        /// The lender.
        lender: Address,
        /// Total paid over the agreement's life.
        total_paid: Amount,
    },
    /// The agreement defaulted.
    LoanAgreementDefaulted {
        /// The defaulting borrower.
        borrower: Address,
        /// The defaulted agreement.
        agreement_id: AgreementId,
        /// The wronged lender.
        lender: Address,
        /// What had been paid before the default.
        amount_paid: Amount,
    },
    /// Collateral was seized for the lender on default.
    CollateralSeized {
        /// The defaulting borrower.
        borrower: Address,
        /// The defaulted agreement.
        agreement_id: AgreementId,
        /// The receiving lender.
        lender: Address,
        /// Collateral token.
        collateral_token: TokenAddress,
        /// Collateral amount seized.
        collateral_amount: Amount,
    },
    /// The borrower requested a term modification.
    PaymentModificationRequested {
        /// The requesting borrower.
        borrower: Address,
        /// The agreement.
        agreement_id: AgreementId,
        /// The requested modification kind.
        kind: ModificationKind,
        /// The requested value (timestamp or payment amount).
        value: Amount,
    },
    /// The lender responded to a requested modification.
    PaymentModificationResponded {
        /// The responding lender.
        lender: Address,
        /// The agreement.
        agreement_id: AgreementId,
        /// Whether the request was approved.
        approved: bool,
    },
}
