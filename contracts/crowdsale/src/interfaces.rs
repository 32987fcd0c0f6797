use crate::error::Error;
use soroban_sdk::{contractclient, Address, Env};

/// The part of the sale token the crowdsale drives.
#[allow(dead_code)]
#[contractclient(name = "MintableTokenClient")]
pub trait MintableToken {
    fn mint(env: Env, minter: Address, to: Address, amount: i128) -> Result<(), Error>;
    fn set_cap(env: Env, owner: Address) -> Result<(), Error>;
    fn total_supply(env: Env) -> i128;
    fn cap(env: Env) -> Option<i128>;
}

/// External USD-cent price feed.
#[allow(dead_code)]
#[contractclient(name = "PriceOracleClient")]
pub trait PriceOracle {
    fn current_price(env: Env) -> i128;
}
