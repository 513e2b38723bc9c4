//! The protocol facade.

use tracing::debug;

use mutuum_lending::LendingManager;
use mutuum_registry::UserRegistry;
use mutuum_reputation::{ModificationKind, ReputationManager};
use mutuum_token::{InMemoryTokens, Tokens};
use mutuum_types::{Address, AgreementId, Amount, OfferId, RequestId, TokenAddress};

use crate::clock::BlockClock;
use crate::Result;

/// Label the lending desk's module address derives from.
const LENDING_ADDRESS_LABEL: &[u8] = b"mutuum/lending";

/// Label the reputation book's escrow address derives from.
const REPUTATION_ADDRESS_LABEL: &[u8] = b"mutuum/reputation";

/// Label the platform wallet derives from.
const PLATFORM_WALLET_LABEL: &[u8] = b"mutuum/platform-wallet";

/// The wired protocol: one token ledger, one clock, three modules.
///
/// Construction registers the lending desk's module address as the
/// reputation book's lending authority, making the desk the only caller
/// able to record outcomes, record defaults, or slash vouches.
///
/// Every mutating operation runs in a transaction envelope: module and
/// ledger state is snapshotted up front and restored on error, so a
/// failed precondition leaves no partial state behind.
#[derive(Clone, Debug)]
pub struct Protocol {
    clock: BlockClock,
    tokens: InMemoryTokens,
    registry: UserRegistry,
    reputation: ReputationManager,
    lending: LendingManager,
}

impl Protocol {
    /// Create a wired protocol with `admin` owning the reputation book.
    pub fn new(admin: Address, start_time: u64) -> Result<Self> {
        let lending_address = Address::derive(LENDING_ADDRESS_LABEL);
        let mut reputation =
            ReputationManager::new(admin, Address::derive(REPUTATION_ADDRESS_LABEL));
        reputation.set_lending_authority(admin, lending_address)?;
        Ok(Self {
            clock: BlockClock::new(start_time),
            tokens: InMemoryTokens::new(),
            registry: UserRegistry::new(),
            reputation,
            lending: LendingManager::new(
                lending_address,
                Address::derive(PLATFORM_WALLET_LABEL),
            ),
        })
    }

    // === Clock ===

    /// The current block timestamp.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Move the clock to `timestamp` (non-decreasing).
    pub fn advance_time_to(&mut self, timestamp: u64) -> Result<()> {
        self.clock.advance_to(timestamp)
    }

    /// Move the clock forward by `seconds`.
    pub fn advance_time(&mut self, seconds: u64) {
        self.clock.advance(seconds);
    }

    // === Token ledger ===

    /// Mint `amount` of `token` to `owner` (genesis / test helper).
    pub fn mint(&mut self, token: TokenAddress, owner: Address, amount: Amount) {
        self.tokens.mint(token, owner, amount);
    }

    /// Set `spender`'s allowance over `caller`'s funds in `token`.
    pub fn approve(
        &mut self,
        caller: Address,
        token: TokenAddress,
        spender: Address,
        amount: Amount,
    ) -> Result<()> {
        Ok(self.tokens.approve(token, caller, spender, amount)?)
    }

    /// Balance of `owner` in `token`.
    #[must_use]
    pub fn balance_of(&self, token: TokenAddress, owner: Address) -> Amount {
        self.tokens.balance_of(token, owner)
    }

    /// The lending desk's module address (approve it to pull principal,
    /// collateral, and repayments).
    #[must_use]
    pub fn lending_address(&self) -> Address {
        self.lending.address()
    }

    /// The reputation book's escrow address (approve it to pull vouch
    /// stakes).
    #[must_use]
    pub fn reputation_address(&self) -> Address {
        self.reputation.custody_address()
    }

    // === Registry operations ===

    /// Register the caller with a display name.
    pub fn register(&mut self, caller: Address, name: &str) -> Result<()> {
        self.atomic(|p| {
            let now = p.clock.now();
            Ok(p.registry.register(caller, name, now)?)
        })
    }

    /// Update the caller's display name.
    pub fn update_name(&mut self, caller: Address, new_name: &str) -> Result<()> {
        self.atomic(|p| Ok(p.registry.update_name(caller, new_name)?))
    }

    // === Reputation operations ===

    /// Rotate the reputation book's administrative owner.
    pub fn transfer_reputation_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<()> {
        self.atomic(|p| Ok(p.reputation.transfer_ownership(caller, new_owner)?))
    }

    /// Rotate the lending authority registered with the reputation book.
    pub fn set_lending_authority(&mut self, caller: Address, authority: Address) -> Result<()> {
        self.atomic(|p| Ok(p.reputation.set_lending_authority(caller, authority)?))
    }

    /// Place a vouch for `borrower`, escrowing `amount` of `token`.
    pub fn add_vouch(
        &mut self,
        caller: Address,
        borrower: Address,
        amount: Amount,
        token: TokenAddress,
    ) -> Result<()> {
        self.atomic(|p| {
            let now = p.clock.now();
            let Self {
                tokens,
                registry,
                reputation,
                ..
            } = p;
            Ok(reputation.add_vouch(tokens, registry, caller, borrower, amount, token, now)?)
        })
    }

    /// Remove the caller's vouch for `borrower`, recovering the stake.
    pub fn remove_vouch(&mut self, caller: Address, borrower: Address) -> Result<()> {
        self.atomic(|p| {
            let Self {
                tokens, reputation, ..
            } = p;
            Ok(reputation.remove_vouch(tokens, caller, borrower)?)
        })
    }

    // === Lending operations ===

    /// Create a standing offer, escrowing the principal.
    #[allow(clippy::too_many_arguments)]
    pub fn create_offer(
        &mut self,
        caller: Address,
        amount: Amount,
        token: TokenAddress,
        interest_rate_bps: u16,
        duration_seconds: u64,
        required_collateral_amount: Amount,
        collateral_token: TokenAddress,
    ) -> Result<OfferId> {
        self.atomic(|p| {
            let now = p.clock.now();
            let Self {
                tokens,
                registry,
                lending,
                ..
            } = p;
            Ok(lending.create_offer(
                tokens,
                registry,
                caller,
                amount,
                token,
                interest_rate_bps,
                duration_seconds,
                required_collateral_amount,
                collateral_token,
                now,
            )?)
        })
    }

    /// Withdraw an unfulfilled offer.
    pub fn cancel_offer(&mut self, caller: Address, offer_id: OfferId) -> Result<()> {
        self.atomic(|p| {
            let Self {
                tokens, lending, ..
            } = p;
            Ok(lending.cancel_offer(tokens, caller, offer_id)?)
        })
    }

    /// Post a standing request.
    #[allow(clippy::too_many_arguments)]
    pub fn create_request(
        &mut self,
        caller: Address,
        amount: Amount,
        token: TokenAddress,
        proposed_interest_rate_bps: u16,
        proposed_duration_seconds: u64,
        offered_collateral_amount: Amount,
        collateral_token: TokenAddress,
    ) -> Result<RequestId> {
        self.atomic(|p| {
            let now = p.clock.now();
            let Self {
                tokens,
                registry,
                lending,
                ..
            } = p;
            Ok(lending.create_request(
                tokens,
                registry,
                caller,
                amount,
                token,
                proposed_interest_rate_bps,
                proposed_duration_seconds,
                offered_collateral_amount,
                collateral_token,
                now,
            )?)
        })
    }

    /// Withdraw an unfulfilled request.
    pub fn cancel_request(&mut self, caller: Address, request_id: RequestId) -> Result<()> {
        self.atomic(|p| Ok(p.lending.cancel_request(caller, request_id)?))
    }

    /// Accept a standing offer, forming an active agreement.
    pub fn accept_offer(
        &mut self,
        caller: Address,
        offer_id: OfferId,
        collateral_amount: Amount,
        collateral_token: TokenAddress,
    ) -> Result<AgreementId> {
        self.atomic(|p| {
            let now = p.clock.now();
            let Self {
                tokens,
                registry,
                lending,
                ..
            } = p;
            Ok(lending.accept_offer(
                tokens,
                registry,
                caller,
                offer_id,
                collateral_amount,
                collateral_token,
                now,
            )?)
        })
    }

    /// Fund a standing request, forming an active agreement.
    pub fn fund_request(&mut self, caller: Address, request_id: RequestId) -> Result<AgreementId> {
        self.atomic(|p| {
            let now = p.clock.now();
            let Self {
                tokens,
                registry,
                lending,
                ..
            } = p;
            Ok(lending.fund_request(tokens, registry, caller, request_id, now)?)
        })
    }

    /// Pay into an agreement.
    pub fn repay(
        &mut self,
        caller: Address,
        agreement_id: AgreementId,
        payment_amount: Amount,
    ) -> Result<()> {
        self.atomic(|p| {
            let now = p.clock.now();
            let Self {
                tokens,
                reputation,
                lending,
                ..
            } = p;
            Ok(lending.repay(tokens, reputation, caller, agreement_id, payment_amount, now)?)
        })
    }

    /// Request a term modification.
    pub fn request_modification(
        &mut self,
        caller: Address,
        agreement_id: AgreementId,
        kind: ModificationKind,
        value: Amount,
    ) -> Result<()> {
        self.atomic(|p| {
            let now = p.clock.now();
            Ok(p.lending
                .request_modification(caller, agreement_id, kind, value, now)?)
        })
    }

    /// Respond to a pending modification request.
    pub fn respond_to_modification(
        &mut self,
        caller: Address,
        agreement_id: AgreementId,
        approved: bool,
    ) -> Result<()> {
        self.atomic(|p| {
            let now = p.clock.now();
            Ok(p.lending
                .respond_to_modification(caller, agreement_id, approved, now)?)
        })
    }

    /// Declare a default on an overdue agreement. Anyone may call.
    pub fn handle_default(&mut self, agreement_id: AgreementId) -> Result<()> {
        self.atomic(|p| {
            let now = p.clock.now();
            let Self {
                tokens,
                reputation,
                lending,
                ..
            } = p;
            Ok(lending.handle_default(tokens, reputation, agreement_id, now)?)
        })
    }

    // === Queries ===

    /// The user registry.
    #[must_use]
    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    /// The reputation book.
    #[must_use]
    pub fn reputation(&self) -> &ReputationManager {
        &self.reputation
    }

    /// The lending desk.
    #[must_use]
    pub fn lending(&self) -> &LendingManager {
        &self.lending
    }

    /// Run one operation as a whole transaction: on error, restore every
    /// module and the token ledger to the pre-call snapshot.
    fn atomic<R>(&mut self, op: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let snapshot = (
            self.tokens.clone(),
            self.registry.clone(),
            self.reputation.clone(),
            self.lending.clone(),
        );
        match op(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!(%err, "transaction reverted");
                (self.tokens, self.registry, self.reputation, self.lending) = snapshot;
                Err(err)
            }
        }
    }
}
