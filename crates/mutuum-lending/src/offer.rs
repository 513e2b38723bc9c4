//! Lender-originated standing loan offers.

use serde::{Deserialize, Serialize};

use mutuum_types::{Address, Amount, OfferId, TokenAddress};

/// A lender's standing commitment to lend on given terms.
///
/// While `active`, the lending desk holds exactly `amount` units of
/// `token` in custody on behalf of this offer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanOffer {
    /// Unique identifier.
    pub id: OfferId,
    /// The offering lender.
    pub lender: Address,
    /// Principal on offer.
    pub amount: Amount,
    /// Principal token.
    pub token: TokenAddress,
    /// Fixed premium on principal, in basis points.
    pub interest_rate_bps: u16,
    /// Term length in seconds.
    pub duration_seconds: u64,
    /// Collateral the borrower must post; zero when `collateral_token`
    /// is the zero sentinel.
    pub required_collateral_amount: Amount,
    /// Collateral token, or the zero sentinel for none.
    pub collateral_token: TokenAddress,
    /// True while the offer stands.
    pub active: bool,
    /// True once a borrower accepted it.
    pub fulfilled: bool,
}
