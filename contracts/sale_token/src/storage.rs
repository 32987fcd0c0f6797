use soroban_sdk::{contracttype, Address};

pub const TOKEN_DECIMALS: u32 = 2;
/// `set_cap` fixes the ceiling at this multiple of the supply at call time.
pub const CAP_MULTIPLIER: i128 = 2;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Owner = 0,
    Minter = 1,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Name,
    Symbol,
    Role(Role, Address),
    Balance(Address),
    TotalSupply,
    Cap,
    TapRemaining,
    MintingFinished,
}
