use soroban_sdk::contracterror;

/// Codes shared with the crowdsale contract keep the same numeric value so a
/// rejected mint can be reported unchanged by the caller.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialization errors
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Authorization errors
    Unauthorized = 10,

    // Mint governance errors
    CapExceeded = 30,
    TapExhausted = 31,
    MintingFinished = 32,
    CapAlreadySet = 33,

    // Balance errors
    InvalidAmount = 40,
    InsufficientBalance = 43,
}
