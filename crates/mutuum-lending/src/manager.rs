//! The lending desk: offers, requests, agreements, and settlement.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use mutuum_registry::UserRegistry;
use mutuum_reputation::{ModificationKind, ReputationManager};
use mutuum_token::{TokenError, Tokens};
use mutuum_types::{
    ids, Address, AgreementId, Amount, OfferId, ReentrancyGuard, RequestId, TokenAddress,
};

use crate::agreement::{LoanAgreement, LoanStatus};
use crate::classifier::classify_payment_outcome;
use crate::event::LendingEvent;
use crate::math::{slash_amount, total_due};
use crate::offer::LoanOffer;
use crate::request::LoanRequest;
use crate::{LendingError, Result};

/// The lending desk.
///
/// Owns offer and agreement escrow (under its module address), the
/// agreement state machine, and the ordered event log. It is the sole
/// caller of the reputation book's sensitive mutators, identifying
/// itself by its module address.
#[derive(Clone, Debug)]
pub struct LendingManager {
    address: Address,
    platform_wallet: Address,
    offers: HashMap<OfferId, LoanOffer>,
    requests: HashMap<RequestId, LoanRequest>,
    agreements: HashMap<AgreementId, LoanAgreement>,
    offers_by_lender: HashMap<Address, Vec<OfferId>>,
    requests_by_borrower: HashMap<Address, Vec<RequestId>>,
    agreements_as_lender: HashMap<Address, Vec<AgreementId>>,
    agreements_as_borrower: HashMap<Address, Vec<AgreementId>>,
    sequences: HashMap<Address, u64>,
    events: Vec<LendingEvent>,
    guard: ReentrancyGuard,
}

impl LendingManager {
    /// Create a lending desk.
    ///
    /// `address` is the desk's own token account (escrow custody) and the
    /// identity it presents to the reputation book; `platform_wallet` is
    /// stored configuration reserved for fee routing (the protocol
    /// currently levies only the fixed basis-point premium).
    #[must_use]
    pub fn new(address: Address, platform_wallet: Address) -> Self {
        Self {
            address,
            platform_wallet,
            offers: HashMap::new(),
            requests: HashMap::new(),
            agreements: HashMap::new(),
            offers_by_lender: HashMap::new(),
            requests_by_borrower: HashMap::new(),
            agreements_as_lender: HashMap::new(),
            agreements_as_borrower: HashMap::new(),
            sequences: HashMap::new(),
            events: Vec::new(),
            guard: ReentrancyGuard::new(),
        }
    }

    /// The desk's module address (escrow custody and authority identity).
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The configured platform wallet.
    #[must_use]
    pub fn platform_wallet(&self) -> Address {
        self.platform_wallet
    }

    /// Create a standing offer, escrowing the principal.
    ///
    /// # Errors
    ///
    /// - `NotRegistered` if the caller is unregistered
    /// - `InvalidArgument` for a zero amount, zero duration, zero token,
    ///   inconsistent collateral fields, or terms whose total overflows
    /// - `Token` if the caller's balance or allowance cannot cover the
    ///   escrow pull
    #[allow(clippy::too_many_arguments)]
    pub fn create_offer(
        &mut self,
        tokens: &mut dyn Tokens,
        registry: &UserRegistry,
        caller: Address,
        amount: Amount,
        token: TokenAddress,
        interest_rate_bps: u16,
        duration_seconds: u64,
        required_collateral_amount: Amount,
        collateral_token: TokenAddress,
        now: u64,
    ) -> Result<OfferId> {
        let _enter = self.guard.enter().ok_or(LendingError::Reentrancy)?;
        if !registry.is_registered(caller) {
            return Err(LendingError::NotRegistered);
        }
        Self::validate_terms(amount, token, interest_rate_bps, duration_seconds)?;
        Self::validate_collateral_shape(required_collateral_amount, collateral_token)?;
        Self::require_balance(tokens, token, caller, amount)?;

        let sequence = self.next_sequence(caller);
        let id = ids::derive_offer_id(
            &caller,
            &token,
            &amount,
            interest_rate_bps,
            duration_seconds,
            now,
            sequence,
        );

        tokens.transfer_from(token, self.address, caller, self.address, amount)?;

        self.offers.insert(
            id,
            LoanOffer {
                id,
                lender: caller,
                amount,
                token,
                interest_rate_bps,
                duration_seconds,
                required_collateral_amount,
                collateral_token,
                active: true,
                fulfilled: false,
            },
        );
        self.offers_by_lender.entry(caller).or_default().push(id);

        info!(lender = %caller, offer = %id, %amount, "offer created");
        self.events.push(LendingEvent::LoanOfferCreated {
            lender: caller,
            offer_id: id,
            token,
            amount,
            interest_rate_bps,
            duration_seconds,
            required_collateral_amount,
            collateral_token,
        });
        Ok(id)
    }

    /// Withdraw an unfulfilled offer and recover its escrowed principal.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless the caller is the offering lender;
    /// `DoubleSpend` if the offer was already fulfilled; `IllegalState`
    /// if it was already cancelled.
    pub fn cancel_offer(
        &mut self,
        tokens: &mut dyn Tokens,
        caller: Address,
        offer_id: OfferId,
    ) -> Result<()> {
        let _enter = self.guard.enter().ok_or(LendingError::Reentrancy)?;
        let offer = self.offers.get_mut(&offer_id).ok_or(LendingError::NotFound)?;
        if offer.lender != caller {
            return Err(LendingError::Unauthorized(
                "only the offering lender may cancel".to_string(),
            ));
        }
        if offer.fulfilled {
            return Err(LendingError::DoubleSpend);
        }
        if !offer.active {
            return Err(LendingError::IllegalState {
                status: LoanStatus::Cancelled,
            });
        }
        offer.active = false;
        let (token, amount) = (offer.token, offer.amount);

        tokens.transfer(token, self.address, caller, amount)?;

        self.events.push(LendingEvent::LoanOfferCancelled {
            lender: caller,
            offer_id,
        });
        Ok(())
    }

    /// Post a standing request. Escrows nothing; offered collateral is
    /// only checked to exist in the borrower's balance.
    #[allow(clippy::too_many_arguments)]
    pub fn create_request(
        &mut self,
        tokens: &mut dyn Tokens,
        registry: &UserRegistry,
        caller: Address,
        amount: Amount,
        token: TokenAddress,
        proposed_interest_rate_bps: u16,
        proposed_duration_seconds: u64,
        offered_collateral_amount: Amount,
        collateral_token: TokenAddress,
        now: u64,
    ) -> Result<RequestId> {
        let _enter = self.guard.enter().ok_or(LendingError::Reentrancy)?;
        if !registry.is_registered(caller) {
            return Err(LendingError::NotRegistered);
        }
        Self::validate_terms(amount, token, proposed_interest_rate_bps, proposed_duration_seconds)?;
        Self::validate_collateral_shape(offered_collateral_amount, collateral_token)?;
        if !offered_collateral_amount.is_zero() {
            Self::require_balance(tokens, collateral_token, caller, offered_collateral_amount)?;
        }

        let sequence = self.next_sequence(caller);
        let id = ids::derive_request_id(
            &caller,
            &token,
            &amount,
            proposed_interest_rate_bps,
            proposed_duration_seconds,
            now,
            sequence,
        );

        self.requests.insert(
            id,
            LoanRequest {
                id,
                borrower: caller,
                amount,
                token,
                proposed_interest_rate_bps,
                proposed_duration_seconds,
                offered_collateral_amount,
                collateral_token,
                active: true,
                fulfilled: false,
            },
        );
        self.requests_by_borrower.entry(caller).or_default().push(id);

        info!(borrower = %caller, request = %id, %amount, "request created");
        self.events.push(LendingEvent::LoanRequestCreated {
            borrower: caller,
            request_id: id,
            token,
            amount,
            proposed_interest_rate_bps,
            proposed_duration_seconds,
            offered_collateral_amount,
            collateral_token,
        });
        Ok(id)
    }

    /// Withdraw an unfulfilled request.
    pub fn cancel_request(&mut self, caller: Address, request_id: RequestId) -> Result<()> {
        let _enter = self.guard.enter().ok_or(LendingError::Reentrancy)?;
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(LendingError::NotFound)?;
        if request.borrower != caller {
            return Err(LendingError::Unauthorized(
                "only the soliciting borrower may cancel".to_string(),
            ));
        }
        if request.fulfilled {
            return Err(LendingError::DoubleSpend);
        }
        if !request.active {
            return Err(LendingError::IllegalState {
                status: LoanStatus::Cancelled,
            });
        }
        request.active = false;

        self.events.push(LendingEvent::LoanRequestCancelled {
            borrower: caller,
            request_id,
        });
        Ok(())
    }

    /// Accept a standing offer, forming an active agreement.
    ///
    /// The collateral parameters must restate the offer's requirement
    /// exactly (both zero, or both equal to the requirement). Collateral
    /// is pulled from the caller; the escrowed principal is paid out to
    /// the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn accept_offer(
        &mut self,
        tokens: &mut dyn Tokens,
        registry: &UserRegistry,
        caller: Address,
        offer_id: OfferId,
        collateral_amount: Amount,
        collateral_token: TokenAddress,
        now: u64,
    ) -> Result<AgreementId> {
        let _enter = self.guard.enter().ok_or(LendingError::Reentrancy)?;
        let offer = self.offers.get(&offer_id).ok_or(LendingError::NotFound)?;
        if offer.fulfilled {
            return Err(LendingError::DoubleSpend);
        }
        if !offer.active {
            return Err(LendingError::IllegalState {
                status: LoanStatus::Cancelled,
            });
        }
        if offer.lender == caller {
            return Err(LendingError::InvalidArgument(
                "cannot accept your own offer".to_string(),
            ));
        }
        if !registry.is_registered(caller) {
            return Err(LendingError::NotRegistered);
        }
        if collateral_amount != offer.required_collateral_amount
            || collateral_token != offer.collateral_token
        {
            return Err(LendingError::InvalidArgument(
                "collateral parameters must match the offer requirement".to_string(),
            ));
        }
        let offer = offer.clone();
        let due_date = Self::due_date_for(now, offer.duration_seconds)?;

        // Pull collateral before paying out the principal.
        if !offer.required_collateral_amount.is_zero() {
            tokens.transfer_from(
                offer.collateral_token,
                self.address,
                caller,
                self.address,
                offer.required_collateral_amount,
            )?;
        }

        let sequence = self.next_sequence(caller);
        let agreement_id = ids::derive_agreement_id(offer_id.as_bytes(), &caller, now, sequence);
        let agreement = LoanAgreement {
            id: agreement_id,
            origin_offer_id: offer_id,
            origin_request_id: RequestId::ZERO,
            lender: offer.lender,
            borrower: caller,
            principal_amount: offer.amount,
            loan_token: offer.token,
            interest_rate_bps: offer.interest_rate_bps,
            duration_seconds: offer.duration_seconds,
            collateral_amount: offer.required_collateral_amount,
            collateral_token: offer.collateral_token,
            start_time: now,
            due_date,
            amount_paid: Amount::zero(),
            status: LoanStatus::Active,
            requested_modification_type: None,
            requested_modification_value: Amount::zero(),
            modification_approved_by_lender: false,
        };
        self.insert_agreement(agreement);
        let stored = self
            .offers
            .get_mut(&offer_id)
            .expect("just looked up");
        stored.fulfilled = true;
        stored.active = false;

        // Principal leaves custody only after the books are consistent.
        tokens.transfer(offer.token, self.address, caller, offer.amount)?;

        info!(agreement = %agreement_id, lender = %offer.lender, borrower = %caller, "offer accepted");
        self.events.push(LendingEvent::LoanAgreementCreated {
            borrower: caller,
            agreement_id,
            lender: offer.lender,
            principal_amount: offer.amount,
            loan_token: offer.token,
            start_time: now,
            due_date,
        });
        Ok(agreement_id)
    }

    /// Fund a standing request, forming an active agreement.
    ///
    /// The principal moves from the caller directly to the borrower; the
    /// request's offered collateral (if any) is pulled from the borrower
    /// into custody, relying on the borrower's pre-approval.
    pub fn fund_request(
        &mut self,
        tokens: &mut dyn Tokens,
        registry: &UserRegistry,
        caller: Address,
        request_id: RequestId,
        now: u64,
    ) -> Result<AgreementId> {
        let _enter = self.guard.enter().ok_or(LendingError::Reentrancy)?;
        let request = self.requests.get(&request_id).ok_or(LendingError::NotFound)?;
        if request.fulfilled {
            return Err(LendingError::DoubleSpend);
        }
        if !request.active {
            return Err(LendingError::IllegalState {
                status: LoanStatus::Cancelled,
            });
        }
        if request.borrower == caller {
            return Err(LendingError::InvalidArgument(
                "cannot fund your own request".to_string(),
            ));
        }
        if !registry.is_registered(caller) {
            return Err(LendingError::NotRegistered);
        }
        Self::require_balance(tokens, request.token, caller, request.amount)?;
        let request = request.clone();
        let due_date = Self::due_date_for(now, request.proposed_duration_seconds)?;

        // Principal goes straight to the borrower.
        tokens.transfer_from(
            request.token,
            self.address,
            caller,
            request.borrower,
            request.amount,
        )?;
        // Collateral comes into custody at funding time.
        if !request.offered_collateral_amount.is_zero() {
            tokens.transfer_from(
                request.collateral_token,
                self.address,
                request.borrower,
                self.address,
                request.offered_collateral_amount,
            )?;
        }

        let sequence = self.next_sequence(caller);
        let agreement_id = ids::derive_agreement_id(request_id.as_bytes(), &caller, now, sequence);
        let agreement = LoanAgreement {
            id: agreement_id,
            origin_offer_id: OfferId::ZERO,
            origin_request_id: request_id,
            lender: caller,
            borrower: request.borrower,
            principal_amount: request.amount,
            loan_token: request.token,
            interest_rate_bps: request.proposed_interest_rate_bps,
            duration_seconds: request.proposed_duration_seconds,
            collateral_amount: request.offered_collateral_amount,
            collateral_token: request.collateral_token,
            start_time: now,
            due_date,
            amount_paid: Amount::zero(),
            status: LoanStatus::Active,
            requested_modification_type: None,
            requested_modification_value: Amount::zero(),
            modification_approved_by_lender: false,
        };
        self.insert_agreement(agreement);
        let stored = self
            .requests
            .get_mut(&request_id)
            .expect("just looked up");
        stored.fulfilled = true;
        stored.active = false;

        info!(agreement = %agreement_id, lender = %caller, borrower = %request.borrower, "request funded");
        self.events.push(LendingEvent::LoanAgreementCreated {
            borrower: request.borrower,
            agreement_id,
            lender: caller,
            principal_amount: request.amount,
            loan_token: request.token,
            start_time: now,
            due_date,
        });
        Ok(agreement_id)
    }

    /// Pay into an agreement.
    ///
    /// Pulls the payment from the borrower straight to the lender, then
    /// advances the state machine. A payment that brings the cumulative
    /// total to the amount due settles the agreement: collateral is
    /// released, the outcome classified, and the reputation book updated.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless the caller is the borrower
    /// - `IllegalState` outside Active / Overdue /
    ///   ActivePartialPaymentAgreed (in particular, once Repaid)
    /// - `InvalidArgument` for a zero payment
    /// - `OverPayment` if the payment exceeds the remaining due
    pub fn repay(
        &mut self,
        tokens: &mut dyn Tokens,
        reputation: &mut ReputationManager,
        caller: Address,
        agreement_id: AgreementId,
        payment_amount: Amount,
        now: u64,
    ) -> Result<()> {
        let _enter = self.guard.enter().ok_or(LendingError::Reentrancy)?;
        let agreement = self
            .agreements
            .get(&agreement_id)
            .ok_or(LendingError::NotFound)?;
        if agreement.borrower != caller {
            return Err(LendingError::Unauthorized(
                "only the borrower may repay".to_string(),
            ));
        }
        if !agreement.status.accepts_repayment() {
            return Err(LendingError::IllegalState {
                status: agreement.status,
            });
        }
        if payment_amount.is_zero() {
            return Err(LendingError::InvalidArgument(
                "payment must be positive".to_string(),
            ));
        }
        let due = agreement.total_due()?;
        let remaining = due.saturating_sub(agreement.amount_paid);
        if payment_amount > remaining {
            return Err(LendingError::OverPayment {
                payment: payment_amount,
                remaining,
            });
        }

        // Snapshot the modification state before any mutation: the
        // settlement classifier and the lender's add-on read the state as
        // it was when this payment arrived.
        let modification_before = agreement.requested_modification_type;
        let approved_before = agreement.modification_approved_by_lender;
        let agreed_partial_value = agreement.requested_modification_value;
        let status_before = agreement.status;
        let (lender, token, due_date, principal) = (
            agreement.lender,
            agreement.loan_token,
            agreement.due_date,
            agreement.principal_amount,
        );
        let (collateral_amount, collateral_token) =
            (agreement.collateral_amount, agreement.collateral_token);

        tokens.transfer_from(token, self.address, caller, lender, payment_amount)?;

        let total_paid = agreement.amount_paid + payment_amount;
        let settled = total_paid >= due;
        let exact_partial_met = !settled
            && status_before == LoanStatus::ActivePartialPaymentAgreed
            && payment_amount == agreed_partial_value;
        let next_status = if settled {
            LoanStatus::Repaid
        } else if status_before == LoanStatus::ActivePartialPaymentAgreed && !exact_partial_met {
            LoanStatus::ActivePartialPaymentAgreed
        } else {
            Self::status_for_time(now, due_date)
        };

        let agreement = self
            .agreements
            .get_mut(&agreement_id)
            .expect("just looked up");
        agreement.amount_paid = total_paid;
        agreement.status = next_status;
        if exact_partial_met {
            // The agreed value is spent; the kind and approval remain as
            // the durable record the settlement classifier reads.
            agreement.requested_modification_value = Amount::zero();
        }

        if settled {
            if !collateral_amount.is_zero() {
                tokens.transfer(collateral_token, self.address, caller, collateral_amount)?;
            }
            let outcome =
                classify_payment_outcome(now, due_date, modification_before, approved_before);
            reputation.record_loan_payment_outcome(
                self.address,
                agreement_id,
                caller,
                lender,
                principal,
                outcome,
                modification_before,
                approved_before,
            )?;
            info!(agreement = %agreement_id, ?outcome, "agreement repaid");
            self.events.push(LendingEvent::LoanRepayment {
                borrower: caller,
                agreement_id,
                amount: payment_amount,
                total_paid,
                status_after: LoanStatus::Repaid,
            });
            self.events.push(LendingEvent::LoanAgreementRepaid {
                borrower: caller,
                agreement_id,
                lender,
                total_paid,
            });
        } else {
            debug!(agreement = %agreement_id, %payment_amount, ?next_status, "repayment received");
            self.events.push(LendingEvent::LoanRepayment {
                borrower: caller,
                agreement_id,
                amount: payment_amount,
                total_paid,
                status_after: next_status,
            });
        }
        Ok(())
    }

    /// Request a term modification.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless the caller is the borrower
    /// - `IllegalState` outside Active / Overdue
    /// - `InvalidArgument` for a zero value, or an extension that does
    ///   not strictly exceed the current due date
    pub fn request_modification(
        &mut self,
        caller: Address,
        agreement_id: AgreementId,
        kind: ModificationKind,
        value: Amount,
        _now: u64,
    ) -> Result<()> {
        let _enter = self.guard.enter().ok_or(LendingError::Reentrancy)?;
        let agreement = self
            .agreements
            .get_mut(&agreement_id)
            .ok_or(LendingError::NotFound)?;
        if agreement.borrower != caller {
            return Err(LendingError::Unauthorized(
                "only the borrower may request a modification".to_string(),
            ));
        }
        if !matches!(agreement.status, LoanStatus::Active | LoanStatus::Overdue) {
            return Err(LendingError::IllegalState {
                status: agreement.status,
            });
        }
        if value.is_zero() {
            return Err(LendingError::InvalidArgument(
                "modification value must be positive".to_string(),
            ));
        }
        if kind == ModificationKind::DueDateExtension {
            if value > Amount::from(u64::MAX) {
                return Err(LendingError::InvalidArgument(
                    "extension timestamp out of range".to_string(),
                ));
            }
            if value <= Amount::from(agreement.due_date) {
                return Err(LendingError::InvalidArgument(
                    "extension must move the due date forward".to_string(),
                ));
            }
        }

        agreement.requested_modification_type = Some(kind);
        agreement.requested_modification_value = value;
        agreement.modification_approved_by_lender = false;
        agreement.status = LoanStatus::PendingModificationApproval;

        debug!(agreement = %agreement_id, ?kind, %value, "modification requested");
        self.events.push(LendingEvent::PaymentModificationRequested {
            borrower: caller,
            agreement_id,
            kind,
            value,
        });
        Ok(())
    }

    /// Respond to a pending modification request.
    ///
    /// Approving an extension moves the due date; approving a partial
    /// agreement arms the exact-payment tracking. Rejection keeps the
    /// original terms. Reputation consequences are deferred to final
    /// settlement.
    pub fn respond_to_modification(
        &mut self,
        caller: Address,
        agreement_id: AgreementId,
        approved: bool,
        now: u64,
    ) -> Result<()> {
        let _enter = self.guard.enter().ok_or(LendingError::Reentrancy)?;
        let agreement = self
            .agreements
            .get_mut(&agreement_id)
            .ok_or(LendingError::NotFound)?;
        if agreement.lender != caller {
            return Err(LendingError::Unauthorized(
                "only the lender may respond".to_string(),
            ));
        }
        if agreement.status != LoanStatus::PendingModificationApproval {
            return Err(LendingError::IllegalState {
                status: agreement.status,
            });
        }
        let kind = agreement
            .requested_modification_type
            .ok_or(LendingError::IllegalState {
                status: agreement.status,
            })?;

        if approved {
            agreement.modification_approved_by_lender = true;
            match kind {
                ModificationKind::DueDateExtension => {
                    // Range-validated at request time.
                    agreement.due_date = agreement.requested_modification_value.low_u64();
                    agreement.status = Self::status_for_time(now, agreement.due_date);
                }
                ModificationKind::PartialPaymentAgreement => {
                    agreement.status = LoanStatus::ActivePartialPaymentAgreed;
                }
            }
        } else {
            agreement.status = Self::status_for_time(now, agreement.due_date);
        }

        debug!(agreement = %agreement_id, approved, "modification response");
        self.events.push(LendingEvent::PaymentModificationResponded {
            lender: caller,
            agreement_id,
            approved,
        });
        Ok(())
    }

    /// Declare a default on an overdue agreement. Anyone may call.
    ///
    /// Seizes collateral for the lender, records the default with the
    /// reputation book, then slashes every active vouch for the borrower
    /// at [`SLASH_BPS`](crate::SLASH_BPS), paying the lender.
    ///
    /// # Errors
    ///
    /// - `AlreadySettled` if the agreement is terminal
    /// - `IllegalState` while a modification request is pending
    /// - `NotOverdue` before the due date passes
    pub fn handle_default(
        &mut self,
        tokens: &mut dyn Tokens,
        reputation: &mut ReputationManager,
        agreement_id: AgreementId,
        now: u64,
    ) -> Result<()> {
        let _enter = self.guard.enter().ok_or(LendingError::Reentrancy)?;
        let agreement = self
            .agreements
            .get(&agreement_id)
            .ok_or(LendingError::NotFound)?;
        match agreement.status {
            LoanStatus::Active | LoanStatus::Overdue => {}
            LoanStatus::Repaid | LoanStatus::Defaulted | LoanStatus::Cancelled => {
                return Err(LendingError::AlreadySettled);
            }
            status => return Err(LendingError::IllegalState { status }),
        }
        if now <= agreement.due_date {
            return Err(LendingError::NotOverdue);
        }
        // Reaching the amount due settles in `repay`, so an Active or
        // Overdue agreement is always short of it.
        let due = agreement.total_due()?;
        debug_assert!(agreement.amount_paid < due);

        let (borrower, lender, principal, amount_paid) = (
            agreement.borrower,
            agreement.lender,
            agreement.principal_amount,
            agreement.amount_paid,
        );
        let (collateral_amount, collateral_token) =
            (agreement.collateral_amount, agreement.collateral_token);

        let agreement = self
            .agreements
            .get_mut(&agreement_id)
            .expect("just looked up");
        agreement.status = LoanStatus::Defaulted;

        warn!(agreement = %agreement_id, borrower = %borrower, "agreement defaulted");
        self.events.push(LendingEvent::LoanAgreementDefaulted {
            borrower,
            agreement_id,
            lender,
            amount_paid,
        });

        if !collateral_amount.is_zero() {
            tokens.transfer(collateral_token, self.address, lender, collateral_amount)?;
            self.events.push(LendingEvent::CollateralSeized {
                borrower,
                agreement_id,
                lender,
                collateral_token,
                collateral_amount,
            });
        }

        reputation.record_loan_default(self.address, borrower, lender, principal)?;
        for vouch in reputation.active_vouches_for_borrower(borrower) {
            let slash = slash_amount(vouch.stake);
            reputation.slash_vouch_and_reputation(
                tokens,
                self.address,
                vouch.voucher,
                borrower,
                slash,
                lender,
            )?;
        }
        Ok(())
    }

    /// Look up an offer.
    #[must_use]
    pub fn offer(&self, id: OfferId) -> Option<&LoanOffer> {
        self.offers.get(&id)
    }

    /// Look up a request.
    #[must_use]
    pub fn request(&self, id: RequestId) -> Option<&LoanRequest> {
        self.requests.get(&id)
    }

    /// Look up an agreement.
    #[must_use]
    pub fn agreement(&self, id: AgreementId) -> Option<&LoanAgreement> {
        self.agreements.get(&id)
    }

    /// Total owed under an agreement (principal plus premium).
    pub fn total_due(&self, id: AgreementId) -> Result<Amount> {
        self.agreements
            .get(&id)
            .ok_or(LendingError::NotFound)?
            .total_due()
    }

    /// Offers a lender has created, in creation order.
    #[must_use]
    pub fn offers_by_lender(&self, lender: Address) -> &[OfferId] {
        self.offers_by_lender.get(&lender).map_or(&[], Vec::as_slice)
    }

    /// Requests a borrower has created, in creation order.
    #[must_use]
    pub fn requests_by_borrower(&self, borrower: Address) -> &[RequestId] {
        self.requests_by_borrower
            .get(&borrower)
            .map_or(&[], Vec::as_slice)
    }

    /// Agreements where `lender` lends, in formation order.
    #[must_use]
    pub fn agreements_as_lender(&self, lender: Address) -> &[AgreementId] {
        self.agreements_as_lender
            .get(&lender)
            .map_or(&[], Vec::as_slice)
    }

    /// Agreements where `borrower` borrows, in formation order.
    #[must_use]
    pub fn agreements_as_borrower(&self, borrower: Address) -> &[AgreementId] {
        self.agreements_as_borrower
            .get(&borrower)
            .map_or(&[], Vec::as_slice)
    }

    /// The ordered event log.
    #[must_use]
    pub fn events(&self) -> &[LendingEvent] {
        &self.events
    }

    fn insert_agreement(&mut self, agreement: LoanAgreement) {
        self.agreements_as_lender
            .entry(agreement.lender)
            .or_default()
            .push(agreement.id);
        self.agreements_as_borrower
            .entry(agreement.borrower)
            .or_default()
            .push(agreement.id);
        self.agreements.insert(agreement.id, agreement);
    }

    fn next_sequence(&mut self, actor: Address) -> u64 {
        let counter = self.sequences.entry(actor).or_insert(0);
        let sequence = *counter;
        *counter += 1;
        sequence
    }

    fn status_for_time(now: u64, due_date: u64) -> LoanStatus {
        if now > due_date {
            LoanStatus::Overdue
        } else {
            LoanStatus::Active
        }
    }

    fn due_date_for(now: u64, duration_seconds: u64) -> Result<u64> {
        now.checked_add(duration_seconds).ok_or_else(|| {
            LendingError::InvalidArgument("due date out of range".to_string())
        })
    }

    fn validate_terms(
        amount: Amount,
        token: TokenAddress,
        rate_bps: u16,
        duration_seconds: u64,
    ) -> Result<()> {
        if amount.is_zero() {
            return Err(LendingError::InvalidArgument(
                "amount must be positive".to_string(),
            ));
        }
        if duration_seconds == 0 {
            return Err(LendingError::InvalidArgument(
                "duration must be positive".to_string(),
            ));
        }
        if token.is_zero() {
            return Err(LendingError::InvalidArgument(
                "loan token must not be the zero address".to_string(),
            ));
        }
        // Terms must produce a representable total.
        total_due(amount, rate_bps)?;
        Ok(())
    }

    fn validate_collateral_shape(amount: Amount, token: TokenAddress) -> Result<()> {
        if amount.is_zero() != token.is_zero() {
            return Err(LendingError::InvalidArgument(
                "collateral amount and token must be set together".to_string(),
            ));
        }
        Ok(())
    }

    fn require_balance(
        tokens: &dyn Tokens,
        token: TokenAddress,
        owner: Address,
        required: Amount,
    ) -> Result<()> {
        let available = tokens.balance_of(token, owner);
        if available < required {
            return Err(LendingError::Token(TokenError::InsufficientBalance {
                required,
                available,
            }));
        }
        Ok(())
    }
}
