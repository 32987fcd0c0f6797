use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PhaseAddedEvent {
    pub index: u32,
    pub start_time: u64,
    pub end_time: u64,
    pub bonus_percent: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PhaseRemovedEvent {
    pub index: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateUpdateEvent {
    pub old_rate: i128,
    pub new_rate: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleChangedEvent {
    pub oracle: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WalletChangedEvent {
    pub index: u32,
    pub wallet: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleChangedEvent {
    pub account: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenPurchaseEvent {
    pub purchaser: Address,
    pub beneficiary: Address,
    pub value: i128,
    pub amount: i128,
    pub discount_percent: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OffChainPurchaseEvent {
    pub beneficiary: Address,
    pub tokens_sold: i128,
    pub usdc_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FinalizedEvent {
    pub recipient: Address,
    pub reserve_minted: i128,
    pub cap: i128,
}
