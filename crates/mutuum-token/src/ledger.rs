//! The token directory trait and its in-memory implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use mutuum_types::{Address, Amount, TokenAddress};

use crate::{Result, TokenError};

/// Directory of fungible tokens the protocol moves value through.
///
/// Semantics mirror a pull-transfer token standard:
///
/// - `transfer` moves `from`'s own funds (the caller vouches that `from`
///   authorized the movement; inside the protocol, `from` is always the
///   calling module's custody account).
/// - `transfer_from` moves `owner`'s funds on the strength of an
///   allowance granted to `spender`; the allowance is debited unless it
///   is the maximum value, which is treated as infinite.
///
/// Every method rejects the zero token address; the "no token" sentinel
/// never reaches this interface.
pub trait Tokens {
    /// Balance of `owner` in `token`.
    fn balance_of(&self, token: TokenAddress, owner: Address) -> Amount;

    /// Remaining allowance `owner` has granted `spender` in `token`.
    fn allowance(&self, token: TokenAddress, owner: Address, spender: Address) -> Amount;

    /// Set `spender`'s allowance over `owner`'s funds in `token`.
    fn approve(
        &mut self,
        token: TokenAddress,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<()>;

    /// Push `amount` of `token` from `from` to `to`.
    fn transfer(
        &mut self,
        token: TokenAddress,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()>;

    /// Pull `amount` of `token` from `owner` to `to`, spending
    /// `spender`'s allowance.
    fn transfer_from(
        &mut self,
        token: TokenAddress,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()>;
}

/// In-memory multi-token balance and allowance book.
///
/// The reference [`Tokens`] implementation: used by the protocol facade as
/// the ledger of record and by tests as a mintable fixture.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InMemoryTokens {
    balances: HashMap<(TokenAddress, Address), Amount>,
    allowances: HashMap<(TokenAddress, Address, Address), Amount>,
}

impl InMemoryTokens {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `token` to `owner` out of thin air.
    ///
    /// Test and genesis helper; not part of the [`Tokens`] surface the
    /// protocol modules see.
    pub fn mint(&mut self, token: TokenAddress, owner: Address, amount: Amount) {
        let balance = self.balances.entry((token, owner)).or_insert(Amount::zero());
        *balance = balance.saturating_add(amount);
    }

    fn debit(&mut self, token: TokenAddress, owner: Address, amount: Amount) -> Result<()> {
        let available = self.balance_of(token, owner);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        self.balances.insert((token, owner), available - amount);
        Ok(())
    }

    fn credit(&mut self, token: TokenAddress, owner: Address, amount: Amount) {
        let balance = self.balances.entry((token, owner)).or_insert(Amount::zero());
        *balance = balance.saturating_add(amount);
    }

    fn require_token(token: TokenAddress) -> Result<()> {
        if token.is_zero() {
            return Err(TokenError::ZeroToken);
        }
        Ok(())
    }
}

impl Tokens for InMemoryTokens {
    fn balance_of(&self, token: TokenAddress, owner: Address) -> Amount {
        self.balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_else(Amount::zero)
    }

    fn allowance(&self, token: TokenAddress, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_else(Amount::zero)
    }

    fn approve(
        &mut self,
        token: TokenAddress,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<()> {
        Self::require_token(token)?;
        self.allowances.insert((token, owner, spender), amount);
        Ok(())
    }

    fn transfer(
        &mut self,
        token: TokenAddress,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        Self::require_token(token)?;
        self.debit(token, from, amount)?;
        self.credit(token, to, amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        token: TokenAddress,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        Self::require_token(token)?;
        let approved = self.allowance(token, owner, spender);
        if approved < amount {
            return Err(TokenError::InsufficientAllowance {
                required: amount,
                approved,
            });
        }
        self.debit(token, owner, amount)?;
        self.credit(token, to, amount);
        // Max allowance is treated as infinite and never debited.
        if approved != Amount::MAX {
            self.allowances.insert((token, owner, spender), approved - amount);
        }
        Ok(())
    }
}
