use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller does not hold the role the operation needs
    Unauthorized = 10,

    // ============================================
    // SCHEDULE ERRORS (20-29)
    // ============================================
    /// Phase start is not before its end, or it overlaps another phase
    InvalidInterval = 20,
    /// Phase or wallet index out of range
    InvalidIndex = 21,

    // ============================================
    // MINT GOVERNANCE ERRORS (30-39)
    // Same codes as the token contract, surfaced unchanged
    // ============================================
    /// Mint would push supply above the token cap
    CapExceeded = 30,
    /// Mint is larger than the remaining tap
    TapExhausted = 31,
    /// Token minting was closed
    MintingFinished = 32,
    /// Token cap was fixed before finalization
    CapAlreadySet = 33,

    // ============================================
    // PURCHASE ERRORS (40-49)
    // ============================================
    /// Amount must be positive (also reported on arithmetic overflow)
    InvalidAmount = 40,
    /// No phase covers the current ledger time
    NoActivePhase = 41,
    /// Payment is worth less than the minimum contribution
    BelowMinimumContribution = 42,

    // ============================================
    // DISTRIBUTION ERRORS (50-59)
    // ============================================
    /// No payout wallet registered
    NoWallets = 50,

    // ============================================
    // PRICE ERRORS (60-69)
    // ============================================
    /// New rate is more than 10% away from the current one
    RateOutOfBounds = 60,
    /// Manual rate updates are disabled while an oracle prices the sale
    OracleActive = 61,
    /// Price must be positive
    InvalidPrice = 62,

    // ============================================
    // OPERATIONAL ERRORS (70-89)
    // ============================================
    /// Sale was finalized
    SaleFinalized = 70,
    /// Token contract rejected the call with an unexpected error
    TokenCallFailed = 80,
}
