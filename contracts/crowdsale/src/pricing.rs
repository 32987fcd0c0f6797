use crate::storage::{
    FINALIZE_RESERVE_PERCENT, PERCENT, RATE_DRIFT_PERCENT, USDC_PER_TOKEN_UNIT, VALUE_UNIT_SCALE,
};

/// USD cents worth of `amount` payment base units.
///
/// Formula: usdc = amount × price / VALUE_UNIT_SCALE, truncated
///
/// Example:
/// - amount: 1.0000000 (10,000,000 base units), price: 45,678 cents
/// - usdc: 45,678
pub fn calculate_usdc_value(amount: i128, price: i128) -> Option<i128> {
    amount.checked_mul(price)?.checked_div(VALUE_UNIT_SCALE)
}

/// Token base units bought with `usdc_value` cents during a `bonus_percent` phase.
///
/// Formula: tokens = usdc × (100 + bonus) / 100 / USDC_PER_TOKEN_UNIT, truncated
/// at every step so the sale never issues more than the recognized value.
///
/// Example:
/// - usdc: 30,788, bonus: 45%
/// - tokens: 30,788 × 145 / 100 = 44,642
pub fn calculate_token_amount(usdc_value: i128, bonus_percent: u32) -> Option<i128> {
    usdc_value
        .checked_mul(PERCENT + bonus_percent as i128)?
        .checked_div(PERCENT)?
        .checked_div(USDC_PER_TOKEN_UNIT)
}

/// `proposed` lies within ±RATE_DRIFT_PERCENT of `current`, bounds included.
pub fn rate_within_bounds(current: i128, proposed: i128) -> bool {
    if current <= 0 || proposed <= 0 {
        return false;
    }

    let scaled = match proposed.checked_mul(PERCENT) {
        Some(value) => value,
        None => return false,
    };
    let lower = current.checked_mul(PERCENT - RATE_DRIFT_PERCENT);
    let upper = current.checked_mul(PERCENT + RATE_DRIFT_PERCENT);

    match (lower, upper) {
        (Some(lower), Some(upper)) => lower <= scaled && scaled <= upper,
        _ => false,
    }
}

/// Tokens minted to the finalization recipient: about FINALIZE_RESERVE_PERCENT
/// of the resulting supply.
///
/// Formula: reserve = supply / (100 - 30) × 30, dividing first
///
/// Example:
/// - supply: 15,007
/// - reserve: 214 × 30 = 6,420, resulting supply 21,427
pub fn reserve_for_supply(total_supply: i128) -> Option<i128> {
    total_supply
        .checked_div(PERCENT - FINALIZE_RESERVE_PERCENT)?
        .checked_mul(FINALIZE_RESERVE_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: i128 = VALUE_UNIT_SCALE;

    #[test]
    fn test_usdc_value_one_unit() {
        assert_eq!(calculate_usdc_value(UNIT, 45_678), Some(45_678));
        assert_eq!(calculate_usdc_value(UNIT, 87_654), Some(87_654));
    }

    #[test]
    fn test_usdc_value_truncates() {
        // 0.2356151 units at 1,306.71 USD
        assert_eq!(calculate_usdc_value(2_356_151, 130_671), Some(30_788));
        // 0.0765696 units at 1,306.71 USD is 100.054 USD
        assert_eq!(calculate_usdc_value(765_696, 130_671), Some(10_005));
        assert_eq!(calculate_usdc_value(1, 130_671), Some(0));
    }

    #[test]
    fn test_token_amount_with_bonus() {
        assert_eq!(calculate_token_amount(30_788, 45), Some(44_642));
        assert_eq!(calculate_token_amount(10_005, 50), Some(15_007));
        assert_eq!(calculate_token_amount(45_678, 40), Some(63_949));
        assert_eq!(calculate_token_amount(45_678, 0), Some(45_678));
    }

    #[test]
    fn test_token_amount_overflow() {
        assert_eq!(calculate_token_amount(i128::MAX, 10), None);
    }

    #[test]
    fn test_rate_drift_band() {
        // +9% accepted
        assert!(rate_within_bounds(130_671, 142_431));
        // +11% rejected
        assert!(!rate_within_bounds(142_431, 158_098));
        // Exact edges are inclusive
        assert!(rate_within_bounds(100_000, 110_000));
        assert!(rate_within_bounds(100_000, 90_000));
        assert!(!rate_within_bounds(100_000, 110_001));
        assert!(!rate_within_bounds(100_000, 89_999));
        // 0.9 × 130,671 = 117,603.9
        assert!(rate_within_bounds(130_671, 117_604));
        assert!(!rate_within_bounds(130_671, 117_603));
    }

    #[test]
    fn test_rate_must_be_positive() {
        assert!(!rate_within_bounds(100_000, 0));
        assert!(!rate_within_bounds(0, 0));
        assert!(!rate_within_bounds(100_000, -100_000));
    }

    #[test]
    fn test_reserve_for_supply() {
        // 15,007 / 70 = 214, truncated before scaling
        assert_eq!(reserve_for_supply(15_007), Some(6_420));
        assert_eq!(reserve_for_supply(70), Some(30));
        assert_eq!(reserve_for_supply(69), Some(0));
        assert_eq!(reserve_for_supply(0), Some(0));
    }
}
