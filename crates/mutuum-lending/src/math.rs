//! Loan arithmetic: premiums and slash amounts.
//!
//! All products that can exceed 256 bits go through wide multiplication
//! (`full_mul` into a 512-bit intermediate); division truncates toward
//! zero.

use mutuum_types::{Amount, WideAmount, BPS_DENOMINATOR};

use crate::{LendingError, Result};

/// Share of a vouch stake slashed per default, in basis points (10%).
pub const SLASH_BPS: u64 = 1_000;

fn narrow(value: WideAmount) -> Option<Amount> {
    if value > WideAmount::from(Amount::MAX) {
        return None;
    }
    let bytes = value.to_big_endian();
    Some(Amount::from_big_endian(&bytes[32..]))
}

/// `principal + principal * rate_bps / 10_000`, truncating division.
///
/// # Errors
///
/// `InvalidArgument` if the total does not fit in 256 bits.
pub fn total_due(principal: Amount, rate_bps: u16) -> Result<Amount> {
    let interest =
        principal.full_mul(Amount::from(rate_bps)) / WideAmount::from(BPS_DENOMINATOR);
    let total = WideAmount::from(principal) + interest;
    narrow(total).ok_or_else(|| {
        LendingError::InvalidArgument("loan terms overflow the amount range".to_string())
    })
}

/// Slash for one vouch on default: 10% of the remaining stake, floored,
/// but at least 1 unit, and never more than the stake itself.
#[must_use]
pub fn slash_amount(stake: Amount) -> Amount {
    let raw = stake.full_mul(Amount::from(SLASH_BPS)) / WideAmount::from(BPS_DENOMINATOR);
    // 10% of a 256-bit value always fits back into 256 bits.
    let raw = narrow(raw).unwrap_or(stake);
    let floored = if raw.is_zero() { Amount::from(1u64) } else { raw };
    floored.min(stake)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wad(n: u64) -> Amount {
        Amount::from(n) * Amount::from(10u64).pow(Amount::from(18u64))
    }

    #[test]
    fn test_total_due_basic() {
        // 100e18 at 1000 bps -> 110e18.
        assert_eq!(total_due(wad(100), 1000).unwrap(), wad(110));
        // Zero rate charges nothing.
        assert_eq!(total_due(wad(100), 0).unwrap(), wad(100));
    }

    #[test]
    fn test_total_due_truncates() {
        // 33 * 1 / 10_000 truncates to 0.
        assert_eq!(total_due(Amount::from(33u64), 1).unwrap(), Amount::from(33u64));
        // 10_001 * 1 / 10_000 truncates to 1.
        assert_eq!(
            total_due(Amount::from(10_001u64), 1).unwrap(),
            Amount::from(10_002u64)
        );
    }

    #[test]
    fn test_total_due_wide_product() {
        // principal * rate exceeds 256 bits but the final total fits.
        let principal = Amount::MAX / Amount::from(2u64);
        let total = total_due(principal, 10_000).unwrap();
        assert_eq!(total, principal * Amount::from(2u64));
    }

    #[test]
    fn test_total_due_overflow_rejected() {
        assert!(total_due(Amount::MAX, 1).is_err());
    }

    #[test]
    fn test_slash_amount_is_ten_percent() {
        assert_eq!(slash_amount(wad(50)), wad(5));
        assert_eq!(slash_amount(Amount::from(100u64)), Amount::from(10u64));
    }

    #[test]
    fn test_slash_amount_floors_to_one() {
        // 10% of 9 floors to 0; the minimum slash of 1 applies.
        assert_eq!(slash_amount(Amount::from(9u64)), Amount::from(1u64));
        assert_eq!(slash_amount(Amount::from(1u64)), Amount::from(1u64));
    }

    #[test]
    fn test_slash_amount_capped_at_stake() {
        // The floor can never exceed the stake itself.
        assert_eq!(slash_amount(Amount::from(1u64)), Amount::from(1u64));
        assert!(slash_amount(Amount::from(3u64)) <= Amount::from(3u64));
    }
}
