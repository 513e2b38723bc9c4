//! Central reputation book coordinating scores, vouches, and slashing.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use mutuum_registry::UserRegistry;
use mutuum_token::Tokens;
use mutuum_types::{Address, AgreementId, Amount, ReentrancyGuard, TokenAddress};

use crate::deltas;
use crate::event::ReputationEvent;
use crate::outcome::{ModificationKind, PaymentOutcome};
use crate::profile::ReputationProfile;
use crate::vouch::{Vouch, VouchRecord};
use crate::{ReputationError, Result};

/// A snapshot row of an active vouch, consumed by the lending module
/// while handling a default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveVouch {
    /// The staking account.
    pub voucher: Address,
    /// The escrowed token.
    pub token: TokenAddress,
    /// Remaining stake.
    pub stake: Amount,
}

/// The reputation book.
///
/// Owns vouch escrow bookkeeping, per-account profiles, and the ordered
/// event log. Sensitive mutators are gated on the configured lending
/// authority address; the administrative owner may rotate that address
/// and nothing else.
#[derive(Clone, Debug)]
pub struct ReputationManager {
    owner: Address,
    custody: Address,
    lending_authority: Option<Address>,
    profiles: HashMap<Address, ReputationProfile>,
    // BTreeMap: default handling iterates active vouches and the event
    // order it produces is observable, so iteration must be deterministic.
    vouches: BTreeMap<(Address, Address), Vouch>,
    given_history: HashMap<Address, Vec<VouchRecord>>,
    received_history: HashMap<Address, Vec<VouchRecord>>,
    events: Vec<ReputationEvent>,
    guard: ReentrancyGuard,
}

impl ReputationManager {
    /// Create a reputation book.
    ///
    /// `owner` is the administrative account allowed to rotate the lending
    /// authority; `custody` is the book's own token account holding vouch
    /// escrow.
    #[must_use]
    pub fn new(owner: Address, custody: Address) -> Self {
        Self {
            owner,
            custody,
            lending_authority: None,
            profiles: HashMap::new(),
            vouches: BTreeMap::new(),
            given_history: HashMap::new(),
            received_history: HashMap::new(),
            events: Vec::new(),
            guard: ReentrancyGuard::new(),
        }
    }

    /// The administrative owner.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The book's escrow token account.
    #[must_use]
    pub fn custody_address(&self) -> Address {
        self.custody
    }

    /// The configured lending authority, if set.
    #[must_use]
    pub fn lending_authority(&self) -> Option<Address> {
        self.lending_authority
    }

    /// Transfer administrative ownership.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the current owner;
    /// `InvalidArgument` for the zero address.
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(ReputationError::InvalidArgument(
                "new owner must not be the zero address".to_string(),
            ));
        }
        self.owner = new_owner;
        Ok(())
    }

    /// Configure the lending authority address.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the owner; `InvalidArgument` for
    /// the zero address.
    pub fn set_lending_authority(&mut self, caller: Address, authority: Address) -> Result<()> {
        self.require_owner(caller)?;
        if authority.is_zero() {
            return Err(ReputationError::InvalidArgument(
                "authority must not be the zero address".to_string(),
            ));
        }
        self.lending_authority = Some(authority);
        Ok(())
    }

    /// Place a vouch: escrow `amount` of `token` attesting to `borrower`.
    ///
    /// # Errors
    ///
    /// - `NotRegistered` if caller or borrower is unregistered
    /// - `InvalidArgument` for self-vouching, zero amount, or zero token
    /// - `DoubleSpend` if the pair already has an active vouch
    /// - `Token` if the escrow pull fails
    #[allow(clippy::too_many_arguments)]
    pub fn add_vouch(
        &mut self,
        tokens: &mut dyn Tokens,
        registry: &UserRegistry,
        caller: Address,
        borrower: Address,
        amount: Amount,
        token: TokenAddress,
        now: u64,
    ) -> Result<()> {
        let _enter = self.guard.enter().ok_or(ReputationError::Reentrancy)?;
        if !registry.is_registered(caller) || !registry.is_registered(borrower) {
            return Err(ReputationError::NotRegistered);
        }
        if caller == borrower {
            return Err(ReputationError::InvalidArgument(
                "cannot vouch for yourself".to_string(),
            ));
        }
        if amount.is_zero() {
            return Err(ReputationError::InvalidArgument(
                "vouch amount must be positive".to_string(),
            ));
        }
        if token.is_zero() {
            return Err(ReputationError::InvalidArgument(
                "vouch token must not be the zero address".to_string(),
            ));
        }
        if self
            .vouches
            .get(&(caller, borrower))
            .is_some_and(|v| v.active)
        {
            return Err(ReputationError::DoubleSpend);
        }

        // Pull the stake into escrow before touching any state.
        tokens.transfer_from(token, self.custody, caller, self.custody, amount)?;

        self.vouches.insert(
            (caller, borrower),
            Vouch {
                voucher: caller,
                borrower,
                token,
                staked_amount: amount,
                active: true,
            },
        );
        let record = VouchRecord {
            voucher: caller,
            borrower,
            token,
            amount,
            time: now,
        };
        self.given_history.entry(caller).or_default().push(record.clone());
        self.received_history.entry(borrower).or_default().push(record);

        let profile = self.profiles.entry(caller).or_default();
        profile.vouching_stake_active = profile.vouching_stake_active.saturating_add(amount);
        profile.times_vouched += 1;

        debug!(voucher = %caller, borrower = %borrower, %amount, "vouch added");
        self.events.push(ReputationEvent::VouchAdded {
            voucher: caller,
            borrower,
            token,
            amount,
        });
        Ok(())
    }

    /// Voluntarily remove a vouch, returning the remaining stake.
    ///
    /// Removal is allowed even while the vouchee has active loans: the
    /// stake is protective, not a hold requirement.
    ///
    /// # Errors
    ///
    /// `NotFound` if the pair has no active vouch; `Token` if the refund
    /// push fails.
    pub fn remove_vouch(
        &mut self,
        tokens: &mut dyn Tokens,
        caller: Address,
        borrower: Address,
    ) -> Result<()> {
        let _enter = self.guard.enter().ok_or(ReputationError::Reentrancy)?;
        let vouch = self
            .vouches
            .get_mut(&(caller, borrower))
            .filter(|v| v.active)
            .ok_or(ReputationError::NotFound)?;

        let remaining = vouch.staked_amount;
        let token = vouch.token;
        vouch.staked_amount = Amount::zero();
        vouch.active = false;

        let profile = self.profiles.entry(caller).or_default();
        profile.vouching_stake_active = profile.vouching_stake_active.saturating_sub(remaining);

        // Push the refund only after the book is consistent.
        tokens.transfer(token, self.custody, caller, remaining)?;

        debug!(voucher = %caller, borrower = %borrower, %remaining, "vouch removed");
        self.events.push(ReputationEvent::VouchRemoved {
            voucher: caller,
            borrower,
            token,
            amount: remaining,
        });
        Ok(())
    }

    /// Slash part of a vouch stake and penalize the voucher's score.
    ///
    /// Only the configured lending authority may call this. Emits
    /// `VouchSlashed` and then, for the score penalty,
    /// `ReputationUpdated`, in that order.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless `caller` is the lending authority
    /// - `NotFound` if the pair has no active vouch
    /// - `InvalidArgument` if the slash is zero or exceeds the stake
    /// - `Token` if the payout push fails
    pub fn slash_vouch_and_reputation(
        &mut self,
        tokens: &mut dyn Tokens,
        caller: Address,
        voucher: Address,
        defaulting_borrower: Address,
        amount_to_slash: Amount,
        payee: Address,
    ) -> Result<()> {
        let _enter = self.guard.enter().ok_or(ReputationError::Reentrancy)?;
        self.require_authority(caller)?;
        let vouch = self
            .vouches
            .get_mut(&(voucher, defaulting_borrower))
            .filter(|v| v.active)
            .ok_or(ReputationError::NotFound)?;
        if amount_to_slash.is_zero() || amount_to_slash > vouch.staked_amount {
            return Err(ReputationError::InvalidArgument(
                "slash must be positive and within the remaining stake".to_string(),
            ));
        }

        vouch.staked_amount -= amount_to_slash;
        if vouch.staked_amount.is_zero() {
            vouch.active = false;
        }
        let token = vouch.token;

        let profile = self.profiles.entry(voucher).or_default();
        profile.vouching_stake_active =
            profile.vouching_stake_active.saturating_sub(amount_to_slash);
        profile.times_defaulted_as_voucher += 1;

        tokens.transfer(token, self.custody, payee, amount_to_slash)?;

        warn!(
            voucher = %voucher,
            borrower = %defaulting_borrower,
            amount = %amount_to_slash,
            "vouch slashed"
        );
        self.events.push(ReputationEvent::VouchSlashed {
            voucher,
            borrower: defaulting_borrower,
            token,
            amount: amount_to_slash,
            payee,
        });
        self.apply_delta(
            voucher,
            deltas::VOUCH_DEFAULTED_VOUCHER,
            "Vouched borrower defaulted",
        );
        Ok(())
    }

    /// Record the settled outcome of a repaid loan for both parties.
    ///
    /// Only the configured lending authority may call this. Always
    /// increments the volume tallies on both sides, then applies the
    /// outcome's score deltas. Emission order: the borrower's
    /// `ReputationUpdated` (skipped for a zero delta) and
    /// `LoanTermOutcomeRecorded`, then the lender's pair.
    #[allow(clippy::too_many_arguments)]
    pub fn record_loan_payment_outcome(
        &mut self,
        caller: Address,
        agreement_id: AgreementId,
        borrower: Address,
        lender: Address,
        principal: Amount,
        outcome: PaymentOutcome,
        modification: Option<ModificationKind>,
        lender_approved: bool,
    ) -> Result<()> {
        let _enter = self.guard.enter().ok_or(ReputationError::Reentrancy)?;
        self.require_authority(caller)?;

        let borrower_profile = self.profiles.entry(borrower).or_default();
        borrower_profile.loans_taken += 1;
        borrower_profile.total_value_borrowed =
            borrower_profile.total_value_borrowed.saturating_add(principal);

        let (borrower_delta, borrower_reason) = match outcome {
            PaymentOutcome::OnTimeOriginal => (
                deltas::REPAID_ON_TIME_ORIGINAL,
                "Loan repaid on time (original terms)",
            ),
            PaymentOutcome::LateGraceOriginal => {
                (deltas::REPAID_LATE_GRACE, "Loan repaid (late grace)")
            }
            PaymentOutcome::OnTimeExtended => (
                deltas::REPAID_ON_TIME_AFTER_EXTENSION,
                "Loan repaid (on time after extension)",
            ),
            PaymentOutcome::LateExtended => (
                deltas::REPAID_LATE_AFTER_EXTENSION,
                "Loan repaid (late after extension)",
            ),
            PaymentOutcome::PartialAgreementMetAndRepaid => (
                deltas::REPAID_WITH_PARTIAL_AGREEMENT_MET,
                "Loan repaid (after partial payment agreement)",
            ),
        };
        match outcome {
            PaymentOutcome::OnTimeOriginal
            | PaymentOutcome::OnTimeExtended
            | PaymentOutcome::PartialAgreementMetAndRepaid => {
                borrower_profile.loans_repaid_on_time += 1;
            }
            PaymentOutcome::LateGraceOriginal | PaymentOutcome::LateExtended => {
                borrower_profile.loans_repaid_late_grace += 1;
            }
        }

        let lender_profile = self.profiles.entry(lender).or_default();
        lender_profile.loans_given += 1;
        lender_profile.total_value_lent =
            lender_profile.total_value_lent.saturating_add(principal);

        let (lender_base, lender_base_reason) = match outcome {
            PaymentOutcome::OnTimeOriginal => (
                deltas::LENT_SUCCESSFULLY_ON_TIME_ORIGINAL,
                "Loan lent and repaid on time (original terms)",
            ),
            PaymentOutcome::LateGraceOriginal => (
                deltas::LENT_SUCCESSFULLY_AFTER_MODIFICATION,
                "Loan lent and repaid (late grace)",
            ),
            PaymentOutcome::OnTimeExtended => (
                deltas::LENT_SUCCESSFULLY_AFTER_MODIFICATION,
                "Loan lent and repaid (on time after extension)",
            ),
            PaymentOutcome::LateExtended => (
                deltas::LENT_SUCCESSFULLY_AFTER_MODIFICATION,
                "Loan lent and repaid (late after extension)",
            ),
            PaymentOutcome::PartialAgreementMetAndRepaid => (
                deltas::LENT_SUCCESSFULLY_AFTER_MODIFICATION,
                "Loan lent and repaid (after partial payment agreement)",
            ),
        };

        let add_on = match (lender_approved, modification) {
            (true, Some(ModificationKind::DueDateExtension)) => {
                lender_profile.modifications_approved_by_lender += 1;
                deltas::LENDER_APPROVED_EXTENSION
            }
            (true, Some(ModificationKind::PartialPaymentAgreement)) => {
                lender_profile.modifications_approved_by_lender += 1;
                deltas::LENDER_APPROVED_PARTIAL_AGREEMENT
            }
            (false, Some(_)) => {
                lender_profile.modifications_rejected_by_lender += 1;
                deltas::LENDER_REJECTED_MODIFICATION
            }
            (_, None) => 0,
        };
        let lender_total = lender_base + add_on;
        let lender_reason = if add_on != 0 {
            "Loan outcome and modification handling for lender"
        } else {
            lender_base_reason
        };

        debug!(
            agreement = %agreement_id,
            borrower = %borrower,
            lender = %lender,
            ?outcome,
            "loan outcome recorded"
        );

        self.apply_delta(borrower, borrower_delta, borrower_reason);
        self.events.push(ReputationEvent::LoanTermOutcomeRecorded {
            agreement_id,
            account: borrower,
            delta: borrower_delta,
            reason: borrower_reason.to_string(),
            outcome,
        });
        self.apply_delta(lender, lender_total, lender_reason);
        self.events.push(ReputationEvent::LoanTermOutcomeRecorded {
            agreement_id,
            account: lender,
            delta: lender_total,
            reason: lender_reason.to_string(),
            outcome,
        });
        Ok(())
    }

    /// Record a loan default for the borrower.
    ///
    /// Only the configured lending authority may call this. Vouch
    /// slashing is a separate step driven by the lending module.
    pub fn record_loan_default(
        &mut self,
        caller: Address,
        borrower: Address,
        lender: Address,
        principal: Amount,
    ) -> Result<()> {
        let _enter = self.guard.enter().ok_or(ReputationError::Reentrancy)?;
        self.require_authority(caller)?;

        let borrower_profile = self.profiles.entry(borrower).or_default();
        borrower_profile.loans_taken += 1;
        borrower_profile.loans_defaulted += 1;
        borrower_profile.total_value_borrowed =
            borrower_profile.total_value_borrowed.saturating_add(principal);

        let lender_profile = self.profiles.entry(lender).or_default();
        lender_profile.loans_given += 1;
        lender_profile.total_value_lent =
            lender_profile.total_value_lent.saturating_add(principal);

        warn!(borrower = %borrower, lender = %lender, %principal, "loan defaulted");
        self.apply_delta(borrower, deltas::DEFAULTED, "Loan defaulted");
        Ok(())
    }

    /// The profile for `addr`, if any activity has been recorded.
    #[must_use]
    pub fn profile(&self, addr: Address) -> Option<&ReputationProfile> {
        self.profiles.get(&addr)
    }

    /// Current score for `addr` (zero if no activity recorded).
    #[must_use]
    pub fn score(&self, addr: Address) -> i64 {
        self.profiles.get(&addr).map_or(0, |p| p.current_score)
    }

    /// The vouch record for a (voucher, borrower) pair, if one exists.
    #[must_use]
    pub fn vouch_details(&self, voucher: Address, borrower: Address) -> Option<&Vouch> {
        self.vouches.get(&(voucher, borrower))
    }

    /// Every vouch `voucher` has ever placed, in placement order.
    #[must_use]
    pub fn vouches_given(&self, voucher: Address) -> &[VouchRecord] {
        self.given_history.get(&voucher).map_or(&[], Vec::as_slice)
    }

    /// Every vouch `borrower` has ever received, in placement order.
    #[must_use]
    pub fn vouches_received(&self, borrower: Address) -> &[VouchRecord] {
        self.received_history
            .get(&borrower)
            .map_or(&[], Vec::as_slice)
    }

    /// Snapshot of the currently active vouches for `borrower`, ordered
    /// by voucher address.
    ///
    /// Consumed by the lending module within the same transaction while
    /// handling a default, so the snapshot cannot go stale.
    #[must_use]
    pub fn active_vouches_for_borrower(&self, borrower: Address) -> Vec<ActiveVouch> {
        self.vouches
            .values()
            .filter(|v| v.borrower == borrower && v.active)
            .map(|v| ActiveVouch {
                voucher: v.voucher,
                token: v.token,
                stake: v.staked_amount,
            })
            .collect()
    }

    /// The ordered event log.
    #[must_use]
    pub fn events(&self) -> &[ReputationEvent] {
        &self.events
    }

    /// Apply a score delta, emitting `ReputationUpdated` unless the delta
    /// is exactly zero.
    fn apply_delta(&mut self, account: Address, delta: i64, reason: &str) {
        if delta == 0 {
            return;
        }
        let profile = self.profiles.entry(account).or_default();
        profile.current_score += delta;
        let new_score = profile.current_score;
        self.events.push(ReputationEvent::ReputationUpdated {
            account,
            new_score,
            reason: reason.to_string(),
        });
    }

    fn require_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(ReputationError::Unauthorized(
                "caller is not the owner".to_string(),
            ));
        }
        Ok(())
    }

    fn require_authority(&self, caller: Address) -> Result<()> {
        if self.lending_authority != Some(caller) {
            return Err(ReputationError::Unauthorized(
                "caller is not the lending authority".to_string(),
            ));
        }
        Ok(())
    }
}
