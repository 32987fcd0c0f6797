#![no_std]

mod error;
mod events;
mod governor;
mod roles;
mod storage;

pub use error::Error;
pub use storage::Role;

use events::{BurnEvent, CapSetEvent, MintEvent, MintTapSetEvent, RoleChangedEvent, TransferEvent};
use governor::{cap_for_supply, check_mint};
use roles::require_role;
use storage::{DataKey, TOKEN_DECIMALS};

use soroban_sdk::{contract, contractimpl, Address, Env, String, Symbol};

#[contract]
pub struct SaleToken;

#[contractimpl]
impl SaleToken {
    // ============================================
    // INITIALIZATION & ROLES
    // ============================================

    /// Initialize the token; `owner` becomes the first owner.
    ///
    /// Nobody is a minter and the tap is zero until an owner says otherwise.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, owner: Address, name: String, symbol: String) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Name, &name);
        env.storage().instance().set(&DataKey::Symbol, &symbol);
        env.storage().instance().set(&DataKey::TotalSupply, &0i128);
        env.storage().instance().set(&DataKey::TapRemaining, &0i128);
        env.storage().instance().set(&DataKey::MintingFinished, &false);
        roles::grant(&env, Role::Owner, &owner);

        Ok(())
    }

    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn add_owner(env: Env, owner: Address, account: Address) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;
        roles::grant(&env, Role::Owner, &account);
        Self::publish_role(&env, "owner_added", account);
        Ok(())
    }

    /// An owner may remove any owner, itself included, even the last one.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn del_owner(env: Env, owner: Address, account: Address) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;
        roles::revoke(&env, Role::Owner, &account);
        Self::publish_role(&env, "owner_removed", account);
        Ok(())
    }

    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn add_minter(env: Env, owner: Address, account: Address) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;
        roles::grant(&env, Role::Minter, &account);
        Self::publish_role(&env, "minter_added", account);
        Ok(())
    }

    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn del_minter(env: Env, owner: Address, account: Address) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;
        roles::revoke(&env, Role::Minter, &account);
        Self::publish_role(&env, "minter_removed", account);
        Ok(())
    }

    pub fn is_owner(env: Env, account: Address) -> bool {
        roles::has_role(&env, Role::Owner, &account)
    }

    pub fn is_minter(env: Env, account: Address) -> bool {
        roles::has_role(&env, Role::Minter, &account)
    }

    // ============================================
    // MINT GOVERNANCE
    // ============================================

    /// Reset the remaining mint allowance to `remaining` (not additive).
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    /// - `InvalidAmount`: Negative allowance
    pub fn set_mint_tap(env: Env, owner: Address, remaining: i128) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;

        if remaining < 0 {
            return Err(Error::InvalidAmount);
        }

        env.storage()
            .instance()
            .set(&DataKey::TapRemaining, &remaining);

        env.events().publish(
            (Symbol::new(&env, "mint_tap_set"),),
            MintTapSetEvent { remaining },
        );

        Ok(())
    }

    /// Fix the supply ceiling at twice the current supply. Only once.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    /// - `CapAlreadySet`: The cap was fixed by an earlier call
    pub fn set_cap(env: Env, owner: Address) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;

        if env.storage().instance().has(&DataKey::Cap) {
            return Err(Error::CapAlreadySet);
        }

        let cap = cap_for_supply(Self::total_supply(env.clone())).ok_or(Error::InvalidAmount)?;
        env.storage().instance().set(&DataKey::Cap, &cap);

        env.events()
            .publish((Symbol::new(&env, "cap_set"),), CapSetEvent { cap });

        Ok(())
    }

    /// Close minting for good.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    /// - `MintingFinished`: Already closed
    pub fn finish_minting(env: Env, owner: Address) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;

        if Self::minting_finished(env.clone()) {
            return Err(Error::MintingFinished);
        }

        env.storage()
            .instance()
            .set(&DataKey::MintingFinished, &true);

        env.events()
            .publish((Symbol::new(&env, "mint_finished"),), ());

        Ok(())
    }

    /// Mint tokens (only minters)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `MintingFinished`: Minting was closed
    /// - `Unauthorized`: Caller is not a minter
    /// - `InvalidAmount`: Amount <= 0
    /// - `CapExceeded`: Supply would pass the cap
    /// - `TapExhausted`: Amount is above the remaining allowance
    pub fn mint(env: Env, minter: Address, to: Address, amount: i128) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if Self::minting_finished(env.clone()) {
            return Err(Error::MintingFinished);
        }

        require_role(&env, Role::Minter, &minter)?;

        let outcome = check_mint(
            Self::total_supply(env.clone()),
            Self::cap(env.clone()),
            Self::get_tap_remaining(env.clone()),
            amount,
        )?;

        let new_balance = Self::balance_of(env.clone(), to.clone())
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        Self::write_balance(&env, &to, new_balance);
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &outcome.total_supply);
        env.storage()
            .instance()
            .set(&DataKey::TapRemaining, &outcome.tap_remaining);

        env.events().publish(
            (Symbol::new(&env, "mint"), to.clone()),
            MintEvent { minter, to, amount },
        );

        Ok(())
    }

    // ============================================
    // HOLDER OPERATIONS
    // ============================================

    /// Burn the caller's own tokens. No role required.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Not enough balance
    pub fn burn(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        from.require_auth();

        let balance = Self::balance_of(env.clone(), from.clone());
        if balance < amount {
            return Err(Error::InsufficientBalance);
        }

        Self::write_balance(&env, &from, balance - amount);

        let supply = Self::total_supply(env.clone()) - amount;
        env.storage().instance().set(&DataKey::TotalSupply, &supply);

        env.events().publish(
            (Symbol::new(&env, "burn"), from.clone()),
            BurnEvent { from, amount },
        );

        Ok(())
    }

    /// Transfer tokens between holders. No role required.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Not enough balance
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        from.require_auth();

        let from_balance = Self::balance_of(env.clone(), from.clone());
        if from_balance < amount {
            return Err(Error::InsufficientBalance);
        }

        Self::write_balance(&env, &from, from_balance - amount);

        let to_balance = Self::balance_of(env.clone(), to.clone())
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;
        Self::write_balance(&env, &to, to_balance);

        env.events().publish(
            (Symbol::new(&env, "transfer"), from.clone(), to.clone()),
            TransferEvent { from, to, amount },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn balance_of(env: Env, account: Address) -> i128 {
        env.storage()
            .instance()
            .get::<DataKey, i128>(&DataKey::Balance(account))
            .unwrap_or(0)
    }

    pub fn total_supply(env: Env) -> i128 {
        env.storage()
            .instance()
            .get::<DataKey, i128>(&DataKey::TotalSupply)
            .unwrap_or(0)
    }

    /// `None` until an owner fixes the ceiling with `set_cap`.
    pub fn cap(env: Env) -> Option<i128> {
        env.storage().instance().get::<DataKey, i128>(&DataKey::Cap)
    }

    pub fn get_tap_remaining(env: Env) -> i128 {
        env.storage()
            .instance()
            .get::<DataKey, i128>(&DataKey::TapRemaining)
            .unwrap_or(0)
    }

    pub fn minting_finished(env: Env) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::MintingFinished)
            .unwrap_or(false)
    }

    pub fn name(env: Env) -> Result<String, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Name)
            .ok_or(Error::NotInitialized)
    }

    pub fn symbol(env: Env) -> Result<String, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Symbol)
            .ok_or(Error::NotInitialized)
    }

    pub fn decimals(_env: Env) -> u32 {
        TOKEN_DECIMALS
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn write_balance(env: &Env, account: &Address, amount: i128) {
        let key = DataKey::Balance(account.clone());
        if amount == 0 {
            env.storage().instance().remove(&key);
        } else {
            env.storage().instance().set(&key, &amount);
        }
    }

    fn publish_role(env: &Env, topic: &str, account: Address) {
        env.events().publish(
            (Symbol::new(env, topic), account.clone()),
            RoleChangedEvent { account },
        );
    }
}
