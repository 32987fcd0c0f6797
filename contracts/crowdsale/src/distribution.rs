use crate::error::Error;

/// How one payment is spread over the payout wallets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Split {
    /// Paid to every wallet but the last
    pub share: i128,
    /// Paid to the last wallet: `share` plus the division remainder
    pub last_share: i128,
}

/// Even split of `value` over `wallet_count` wallets with the remainder on
/// the last one, so `share × (n − 1) + last_share == value`.
pub fn split_payment(value: i128, wallet_count: u32) -> Result<Split, Error> {
    if wallet_count == 0 {
        return Err(Error::NoWallets);
    }
    if value <= 0 {
        return Err(Error::InvalidAmount);
    }

    let count = wallet_count as i128;
    let share = value / count;
    let remainder = value - share * count;

    Ok(Split {
        share,
        last_share: share + remainder,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(split: &Split, wallet_count: u32) -> i128 {
        split.share * (wallet_count as i128 - 1) + split.last_share
    }

    #[test]
    fn test_single_wallet_takes_everything() {
        let split = split_payment(10_000_000, 1).unwrap();
        assert_eq!(split.last_share, 10_000_000);
    }

    #[test]
    fn test_two_wallets_even() {
        let split = split_payment(10_000_000, 2).unwrap();
        assert_eq!(split.share, 5_000_000);
        assert_eq!(split.last_share, 5_000_000);
    }

    #[test]
    fn test_three_wallets_remainder_to_last() {
        let split = split_payment(10_000_000, 3).unwrap();
        assert_eq!(split.share, 3_333_333);
        assert_eq!(split.last_share, 3_333_334);
        assert_eq!(total(&split, 3), 10_000_000);
    }

    #[test]
    fn test_conservation() {
        for value in [1i128, 2, 7, 99, 1_000_003, 765_696] {
            for count in 1u32..=9 {
                let split = split_payment(value, count).unwrap();
                assert_eq!(total(&split, count), value);
                assert!(split.last_share >= split.share);
            }
        }
    }

    #[test]
    fn test_no_wallets() {
        assert_eq!(split_payment(10_000_000, 0), Err(Error::NoWallets));
    }
}
