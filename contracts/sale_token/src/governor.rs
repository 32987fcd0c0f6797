use crate::error::Error;
use crate::storage::CAP_MULTIPLIER;

/// Supply and allowance after a successful mint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MintOutcome {
    pub total_supply: i128,
    pub tap_remaining: i128,
}

/// Apply the cap and tap limits to a mint of `amount`.
///
/// `cap` is `None` until the owner fixes it; until then only the tap bounds
/// issuance. Nothing is written here, the caller persists the outcome.
pub fn check_mint(
    total_supply: i128,
    cap: Option<i128>,
    tap_remaining: i128,
    amount: i128,
) -> Result<MintOutcome, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let new_supply = total_supply
        .checked_add(amount)
        .ok_or(Error::InvalidAmount)?;

    if let Some(cap) = cap {
        if new_supply > cap {
            return Err(Error::CapExceeded);
        }
    }

    if amount > tap_remaining {
        return Err(Error::TapExhausted);
    }

    Ok(MintOutcome {
        total_supply: new_supply,
        tap_remaining: tap_remaining - amount,
    })
}

/// Ceiling fixed by `set_cap`: a multiple of the supply at the time of the call.
pub fn cap_for_supply(total_supply: i128) -> Option<i128> {
    total_supply.checked_mul(CAP_MULTIPLIER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_within_limits() {
        let outcome = check_mint(1000, Some(2000), 5000, 999).unwrap();
        assert_eq!(outcome.total_supply, 1999);
        assert_eq!(outcome.tap_remaining, 4001);
    }

    #[test]
    fn test_mint_up_to_cap() {
        let outcome = check_mint(1000, Some(2000), 5000, 1000).unwrap();
        assert_eq!(outcome.total_supply, 2000);

        assert_eq!(check_mint(2000, Some(2000), 5000, 1), Err(Error::CapExceeded));
    }

    #[test]
    fn test_mint_over_cap() {
        assert_eq!(check_mint(1000, Some(2000), 5000, 1001), Err(Error::CapExceeded));
    }

    #[test]
    fn test_uncapped_mint_bounded_by_tap() {
        let outcome = check_mint(0, None, 100, 100).unwrap();
        assert_eq!(outcome.tap_remaining, 0);

        assert_eq!(check_mint(100, None, 0, 1), Err(Error::TapExhausted));
    }

    #[test]
    fn test_non_positive_amount() {
        assert_eq!(check_mint(0, None, 100, 0), Err(Error::InvalidAmount));
        assert_eq!(check_mint(0, None, 100, -5), Err(Error::InvalidAmount));
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert_eq!(
            check_mint(i128::MAX, None, i128::MAX, 1),
            Err(Error::InvalidAmount)
        );
    }

    #[test]
    fn test_cap_for_supply() {
        assert_eq!(cap_for_supply(1000), Some(2000));
        assert_eq!(cap_for_supply(21427), Some(42854));
        assert_eq!(cap_for_supply(i128::MAX), None);
    }
}
