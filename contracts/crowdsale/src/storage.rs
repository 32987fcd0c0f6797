use soroban_sdk::{contracttype, Address};

// Constants
/// Base units per whole unit of the payment asset (7 decimals).
pub const VALUE_UNIT_SCALE: i128 = 10_000_000;
/// USD cents per token base unit: a 2-decimal token sold at 1 USD.
pub const USDC_PER_TOKEN_UNIT: i128 = 1;
/// Smallest accepted purchase, in USD cents (10 USD).
pub const MIN_PURCHASE_USDC: i128 = 1_000;
pub const PERCENT: i128 = 100;
/// Largest move of the manual rate in one update, both directions, inclusive.
pub const RATE_DRIFT_PERCENT: i128 = 10;
/// Share of the post-finalization supply minted to the finalization recipient.
pub const FINALIZE_RESERVE_PERCENT: i128 = 30;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Owner = 0,
    Cashier = 1,
    Bot = 2,
}

/// A bonus window. Both ends are inclusive.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Phase {
    pub start_time: u64,
    pub end_time: u64,
    pub bonus_percent: u32,
}

/// Where the USD-cent price of one payment unit comes from.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PriceSource {
    /// External feed exposing `current_price() -> i128`
    Oracle(Address),
    /// Locally held rate, moved by owners and bots within the drift band
    Rate(i128),
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Token,
    PaymentToken,
    PriceSource,
    Role(Role, Address),
    Phases,
    Wallets,
    WeiRaised,
    UsdcRaised,
    Finalized,
}
