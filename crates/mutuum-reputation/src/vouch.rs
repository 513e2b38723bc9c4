//! Vouch records: escrowed stakes attesting to a borrower.

use serde::{Deserialize, Serialize};

use mutuum_types::{Address, Amount, TokenAddress};

/// An active or spent vouch, keyed by (voucher, borrower).
///
/// At most one active vouch exists per pair. The staked amount decreases
/// as slashes land; when it reaches zero the vouch is marked inactive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vouch {
    /// The staking account.
    pub voucher: Address,
    /// The borrower being vouched for.
    pub borrower: Address,
    /// The escrowed token.
    pub token: TokenAddress,
    /// Remaining stake held in escrow.
    pub staked_amount: Amount,
    /// True while stake remains and the vouch was not removed.
    pub active: bool,
}

/// An immutable history entry appended on every vouch placement.
///
/// History lists exist for auditability; the (voucher, borrower) map is
/// the source of truth for active state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VouchRecord {
    /// The staking account.
    pub voucher: Address,
    /// The borrower vouched for.
    pub borrower: Address,
    /// The escrowed token.
    pub token: TokenAddress,
    /// Stake placed at the time of the vouch.
    pub amount: Amount,
    /// Block timestamp of the placement.
    pub time: u64,
}
