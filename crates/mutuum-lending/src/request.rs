//! Borrower-originated standing loan requests.

use serde::{Deserialize, Serialize};

use mutuum_types::{Address, Amount, RequestId, TokenAddress};

/// A borrower's standing solicitation for funds on proposed terms.
///
/// Unlike offers, requests escrow nothing up front: the offered
/// collateral is pulled from the borrower only when a lender funds the
/// request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Unique identifier.
    pub id: RequestId,
    /// The soliciting borrower.
    pub borrower: Address,
    /// Principal requested.
    pub amount: Amount,
    /// Principal token.
    pub token: TokenAddress,
    /// Proposed fixed premium on principal, in basis points.
    pub proposed_interest_rate_bps: u16,
    /// Proposed term length in seconds.
    pub proposed_duration_seconds: u64,
    /// Collateral the borrower offers to post at funding time; zero when
    /// `collateral_token` is the zero sentinel.
    pub offered_collateral_amount: Amount,
    /// Collateral token, or the zero sentinel for none.
    pub collateral_token: TokenAddress,
    /// True while the request stands.
    pub active: bool,
    /// True once a lender funded it.
    pub fulfilled: bool,
}
