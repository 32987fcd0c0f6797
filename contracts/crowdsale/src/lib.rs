#![no_std]

mod distribution;
mod error;
mod events;
mod interfaces;
mod phases;
mod pricing;
mod roles;
mod storage;


pub use error::Error;
pub use events::*;
pub use storage::{Phase, PriceSource, Role};

use distribution::{split_payment, Split};
use interfaces::{MintableTokenClient, PriceOracleClient};
use phases::{bonus_percent_at, find_phase, is_valid_interval};
use pricing::{calculate_token_amount, calculate_usdc_value, rate_within_bounds, reserve_for_supply};
use roles::{require_any_role, require_role};
use storage::{DataKey, MIN_PURCHASE_USDC};

use soroban_sdk::{contract, contractimpl, token, Address, Env, Symbol, Vec};

#[contract]
pub struct Crowdsale;

#[contractimpl]
impl Crowdsale {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// Initialize the sale
    ///
    /// `owner` becomes the first owner and the first payout wallet.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidPrice`: Manual rate must be positive
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        payment_token: Address,
        price_source: PriceSource,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        if let PriceSource::Rate(rate) = &price_source {
            if *rate <= 0 {
                return Err(Error::InvalidPrice);
            }
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage()
            .instance()
            .set(&DataKey::PaymentToken, &payment_token);
        env.storage()
            .instance()
            .set(&DataKey::PriceSource, &price_source);
        env.storage()
            .instance()
            .set(&DataKey::Phases, &Vec::<Phase>::new(&env));
        env.storage()
            .instance()
            .set(&DataKey::Wallets, &Vec::from_array(&env, [owner.clone()]));
        env.storage().instance().set(&DataKey::WeiRaised, &0i128);
        env.storage().instance().set(&DataKey::UsdcRaised, &0i128);
        env.storage().instance().set(&DataKey::Finalized, &false);
        roles::grant(&env, Role::Owner, &owner);

        Ok(())
    }

    // ============================================
    // ROLES
    // ============================================

    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn add_owner(env: Env, owner: Address, account: Address) -> Result<(), Error> {
        Self::change_role(&env, &owner, Role::Owner, account, true)
    }

    /// Any owner may be removed, the caller and the last owner included.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn del_owner(env: Env, owner: Address, account: Address) -> Result<(), Error> {
        Self::change_role(&env, &owner, Role::Owner, account, false)
    }

    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn add_cashier(env: Env, owner: Address, account: Address) -> Result<(), Error> {
        Self::change_role(&env, &owner, Role::Cashier, account, true)
    }

    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn del_cashier(env: Env, owner: Address, account: Address) -> Result<(), Error> {
        Self::change_role(&env, &owner, Role::Cashier, account, false)
    }

    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn add_bot(env: Env, owner: Address, account: Address) -> Result<(), Error> {
        Self::change_role(&env, &owner, Role::Bot, account, true)
    }

    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn del_bot(env: Env, owner: Address, account: Address) -> Result<(), Error> {
        Self::change_role(&env, &owner, Role::Bot, account, false)
    }

    pub fn is_owner(env: Env, account: Address) -> bool {
        roles::has_role(&env, Role::Owner, &account)
    }

    pub fn is_cashier(env: Env, account: Address) -> bool {
        roles::has_role(&env, Role::Cashier, &account)
    }

    pub fn is_bot(env: Env, account: Address) -> bool {
        roles::has_role(&env, Role::Bot, &account)
    }

    // ============================================
    // PHASE SCHEDULE
    // ============================================

    /// Append a bonus phase and return its index.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    /// - `InvalidInterval`: start >= end, or overlap with any existing phase
    pub fn add_phase(
        env: Env,
        owner: Address,
        start_time: u64,
        end_time: u64,
        bonus_percent: u32,
    ) -> Result<u32, Error> {
        require_role(&env, Role::Owner, &owner)?;

        let mut phases = Self::read_phases(&env);
        if !is_valid_interval(&phases, start_time, end_time) {
            return Err(Error::InvalidInterval);
        }

        phases.push_back(Phase {
            start_time,
            end_time,
            bonus_percent,
        });
        let index = phases.len() - 1;
        env.storage().instance().set(&DataKey::Phases, &phases);

        env.events().publish(
            (Symbol::new(&env, "phase_added"), index),
            PhaseAddedEvent {
                index,
                start_time,
                end_time,
                bonus_percent,
            },
        );

        Ok(index)
    }

    /// Remove the phase at `index`; later phases move down by one.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    /// - `InvalidIndex`: No phase at `index`
    pub fn del_phase(env: Env, owner: Address, index: u32) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;

        let mut phases = Self::read_phases(&env);
        if index >= phases.len() {
            return Err(Error::InvalidIndex);
        }

        phases.remove(index);
        env.storage().instance().set(&DataKey::Phases, &phases);

        env.events().publish(
            (Symbol::new(&env, "phase_removed"), index),
            PhaseRemovedEvent { index },
        );

        Ok(())
    }

    /// Whether `add_phase(start_time, end_time, _)` would be accepted now.
    pub fn validate_phase_dates(env: Env, start_time: u64, end_time: u64) -> bool {
        is_valid_interval(&Self::read_phases(&env), start_time, end_time)
    }

    pub fn get_phase(env: Env, index: u32) -> Result<Phase, Error> {
        Self::read_phases(&env).get(index).ok_or(Error::InvalidIndex)
    }

    pub fn get_phases(env: Env) -> Vec<Phase> {
        Self::read_phases(&env)
    }

    pub fn phases_count(env: Env) -> u32 {
        Self::read_phases(&env).len()
    }

    /// Bonus of the phase covering `timestamp`, 0 outside every phase.
    pub fn get_bonus_percent(env: Env, timestamp: u64) -> u32 {
        bonus_percent_at(&Self::read_phases(&env), timestamp)
    }

    pub fn get_current_bonus_percent(env: Env) -> u32 {
        let now = env.ledger().timestamp();
        Self::get_bonus_percent(env, now)
    }

    pub fn is_in_phase(env: Env, timestamp: u64) -> bool {
        find_phase(&Self::read_phases(&env), timestamp).is_some()
    }

    // ============================================
    // PRICE SOURCE
    // ============================================

    /// Price the sale from an external oracle from now on.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn set_oracle(env: Env, owner: Address, oracle: Address) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;

        env.storage()
            .instance()
            .set(&DataKey::PriceSource, &PriceSource::Oracle(oracle.clone()));

        env.events().publish(
            (Symbol::new(&env, "oracle_changed"),),
            OracleChangedEvent { oracle },
        );

        Ok(())
    }

    /// Move the manual rate by at most 10% either way.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is neither an owner nor a bot
    /// - `NotInitialized`: Contract not initialized
    /// - `OracleActive`: The sale is priced by an oracle
    /// - `RateOutOfBounds`: `rate` is outside the drift band
    pub fn set_rate(env: Env, caller: Address, rate: i128) -> Result<(), Error> {
        require_any_role(&env, &[Role::Owner, Role::Bot], &caller)?;

        let old_rate = match Self::price_source(env.clone())? {
            PriceSource::Rate(current) => current,
            PriceSource::Oracle(_) => return Err(Error::OracleActive),
        };

        if !rate_within_bounds(old_rate, rate) {
            return Err(Error::RateOutOfBounds);
        }

        env.storage()
            .instance()
            .set(&DataKey::PriceSource, &PriceSource::Rate(rate));

        env.events().publish(
            (Symbol::new(&env, "rate_update"),),
            RateUpdateEvent {
                old_rate,
                new_rate: rate,
            },
        );

        Ok(())
    }

    pub fn price_source(env: Env) -> Result<PriceSource, Error> {
        env.storage()
            .instance()
            .get(&DataKey::PriceSource)
            .ok_or(Error::NotInitialized)
    }

    /// USD cents per whole payment unit, read fresh on every call.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidPrice`: Oracle unreachable or quoting a non-positive price
    pub fn current_price(env: Env) -> Result<i128, Error> {
        match Self::price_source(env.clone())? {
            PriceSource::Rate(rate) => Ok(rate),
            PriceSource::Oracle(oracle) => {
                match PriceOracleClient::new(&env, &oracle).try_current_price() {
                    Ok(Ok(price)) if price > 0 => Ok(price),
                    _ => Err(Error::InvalidPrice),
                }
            }
        }
    }

    // ============================================
    // CONVERSION (VIEW)
    // ============================================

    /// USD cents worth of `amount` payment base units at the current price.
    pub fn calculate_usdc_value(env: Env, amount: i128) -> Result<i128, Error> {
        let price = Self::current_price(env)?;
        calculate_usdc_value(amount, price).ok_or(Error::InvalidAmount)
    }

    /// Token base units `amount` payment base units buy at `bonus_percent`.
    pub fn calculate_token_amount(env: Env, amount: i128, bonus_percent: u32) -> Result<i128, Error> {
        let usdc_value = Self::calculate_usdc_value(env, amount)?;
        calculate_token_amount(usdc_value, bonus_percent).ok_or(Error::InvalidAmount)
    }

    // ============================================
    // PAYOUT WALLETS
    // ============================================

    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    pub fn add_wallet(env: Env, owner: Address, wallet: Address) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;

        let mut wallets = Self::read_wallets(&env);
        wallets.push_back(wallet.clone());
        let index = wallets.len() - 1;
        env.storage().instance().set(&DataKey::Wallets, &wallets);

        env.events().publish(
            (Symbol::new(&env, "wallet_added"), index),
            WalletChangedEvent { index, wallet },
        );

        Ok(())
    }

    /// Remove the wallet at `index`; the others keep their relative order.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an owner
    /// - `InvalidIndex`: No wallet at `index`
    pub fn del_wallet(env: Env, owner: Address, index: u32) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;

        let mut wallets = Self::read_wallets(&env);
        let wallet = wallets.get(index).ok_or(Error::InvalidIndex)?;

        wallets.remove(index);
        env.storage().instance().set(&DataKey::Wallets, &wallets);

        env.events().publish(
            (Symbol::new(&env, "wallet_removed"), index),
            WalletChangedEvent { index, wallet },
        );

        Ok(())
    }

    pub fn get_wallet(env: Env, index: u32) -> Result<Address, Error> {
        Self::read_wallets(&env).get(index).ok_or(Error::InvalidIndex)
    }

    pub fn get_wallets(env: Env) -> Vec<Address> {
        Self::read_wallets(&env)
    }

    pub fn wallets_count(env: Env) -> u32 {
        Self::read_wallets(&env).len()
    }

    // ============================================
    // PURCHASES
    // ============================================

    /// Buy tokens for `beneficiary` with `value` payment base units from `payer`.
    ///
    /// Mints first, then pays the wallets and books the ledgers; any failure
    /// rolls the whole purchase back. Returns the tokens minted.
    ///
    /// # Errors
    /// - `SaleFinalized`: Sale is closed
    /// - `InvalidAmount`: value <= 0
    /// - `NoActivePhase`: No phase covers the ledger time
    /// - `InvalidPrice`: Price source unusable
    /// - `BelowMinimumContribution`: Worth less than 10 USD
    /// - `NoWallets`: Nowhere to send the payment
    /// - `Unauthorized` / `CapExceeded` / `TapExhausted` / `MintingFinished`:
    ///   Token refused the mint
    pub fn receive_payment(
        env: Env,
        payer: Address,
        beneficiary: Address,
        value: i128,
    ) -> Result<i128, Error> {
        Self::check_not_finalized(&env)?;

        if value <= 0 {
            return Err(Error::InvalidAmount);
        }

        payer.require_auth();

        // Validate
        let now = env.ledger().timestamp();
        let phase = find_phase(&Self::read_phases(&env), now).ok_or(Error::NoActivePhase)?;

        let price = Self::current_price(env.clone())?;
        let usdc_value = calculate_usdc_value(value, price).ok_or(Error::InvalidAmount)?;
        if usdc_value < MIN_PURCHASE_USDC {
            return Err(Error::BelowMinimumContribution);
        }

        // Compute
        let tokens =
            calculate_token_amount(usdc_value, phase.bonus_percent).ok_or(Error::InvalidAmount)?;
        let wallets = Self::read_wallets(&env);
        let split = split_payment(value, wallets.len())?;

        let wei_raised = Self::wei_raised(env.clone())
            .checked_add(value)
            .ok_or(Error::InvalidAmount)?;
        let usdc_raised = Self::usdc_raised(env.clone())
            .checked_add(usdc_value)
            .ok_or(Error::InvalidAmount)?;

        // Settle
        Self::mint_tokens(&env, &beneficiary, tokens)?;
        Self::distribute(&env, &payer, &wallets, split)?;

        env.storage().instance().set(&DataKey::WeiRaised, &wei_raised);
        env.storage()
            .instance()
            .set(&DataKey::UsdcRaised, &usdc_raised);

        env.events().publish(
            (Symbol::new(&env, "token_purchase"), beneficiary.clone()),
            TokenPurchaseEvent {
                purchaser: payer,
                beneficiary,
                value,
                amount: tokens,
                discount_percent: phase.bonus_percent,
            },
        );

        Ok(tokens)
    }

    /// `receive_payment` with the payer as beneficiary.
    pub fn buy_tokens(env: Env, payer: Address, value: i128) -> Result<i128, Error> {
        Self::receive_payment(env, payer.clone(), payer, value)
    }

    /// Record a purchase settled outside the chain.
    ///
    /// Mints `tokens_sold` and books `usdc_amount`; the phase schedule and the
    /// price are not consulted and `wei_raised` does not move.
    ///
    /// # Errors
    /// - `SaleFinalized`: Sale is closed
    /// - `Unauthorized`: Caller is not a cashier
    /// - `InvalidAmount`: tokens_sold <= 0 or usdc_amount < 0
    /// - `CapExceeded` / `TapExhausted` / `MintingFinished`: Token refused the mint
    pub fn off_chain_purchase(
        env: Env,
        cashier: Address,
        beneficiary: Address,
        tokens_sold: i128,
        usdc_amount: i128,
    ) -> Result<(), Error> {
        Self::check_not_finalized(&env)?;
        require_role(&env, Role::Cashier, &cashier)?;

        if tokens_sold <= 0 || usdc_amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let usdc_raised = Self::usdc_raised(env.clone())
            .checked_add(usdc_amount)
            .ok_or(Error::InvalidAmount)?;

        Self::mint_tokens(&env, &beneficiary, tokens_sold)?;
        env.storage()
            .instance()
            .set(&DataKey::UsdcRaised, &usdc_raised);

        env.events().publish(
            (Symbol::new(&env, "offchain_purchase"), beneficiary.clone()),
            OffChainPurchaseEvent {
                beneficiary,
                tokens_sold,
                usdc_amount,
            },
        );

        Ok(())
    }

    // ============================================
    // FINALIZATION
    // ============================================

    /// Close the sale.
    ///
    /// Mints the reserve to `recipient` (supply / 70 × 30), asks the
    /// token to fix its cap, and rejects every later purchase. The sale must be
    /// a minter and an owner of the token.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not an owner, or the sale lacks token roles
    /// - `SaleFinalized`: Already finalized
    /// - `CapAlreadySet` / `TapExhausted` / `MintingFinished`: Token refused
    pub fn finalize_crowdsale(env: Env, owner: Address, recipient: Address) -> Result<(), Error> {
        require_role(&env, Role::Owner, &owner)?;
        Self::check_not_finalized(&env)?;

        let token = Self::token_client(&env)?;
        let reserve = reserve_for_supply(token.total_supply()).ok_or(Error::InvalidAmount)?;
        if reserve > 0 {
            Self::mint_tokens(&env, &recipient, reserve)?;
        }

        match token.try_set_cap(&env.current_contract_address()) {
            Ok(Ok(())) => {}
            Err(Ok(err)) => return Err(err),
            _ => return Err(Error::TokenCallFailed),
        }
        let cap = token.cap().ok_or(Error::TokenCallFailed)?;

        env.storage().instance().set(&DataKey::Finalized, &true);

        env.events().publish(
            (Symbol::new(&env, "finalized"), recipient.clone()),
            FinalizedEvent {
                recipient,
                reserve_minted: reserve,
                cap,
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Payment base units received on chain.
    pub fn wei_raised(env: Env) -> i128 {
        env.storage()
            .instance()
            .get::<DataKey, i128>(&DataKey::WeiRaised)
            .unwrap_or(0)
    }

    /// USD cents recognized on and off chain.
    pub fn usdc_raised(env: Env) -> i128 {
        env.storage()
            .instance()
            .get::<DataKey, i128>(&DataKey::UsdcRaised)
            .unwrap_or(0)
    }

    pub fn is_finalized(env: Env) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Finalized)
            .unwrap_or(false)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn check_not_finalized(env: &Env) -> Result<(), Error> {
        if Self::is_finalized(env.clone()) {
            return Err(Error::SaleFinalized);
        }
        Ok(())
    }

    fn change_role(
        env: &Env,
        owner: &Address,
        role: Role,
        account: Address,
        granted: bool,
    ) -> Result<(), Error> {
        require_role(env, Role::Owner, owner)?;

        let topic = match (role, granted) {
            (Role::Owner, true) => "owner_added",
            (Role::Owner, false) => "owner_removed",
            (Role::Cashier, true) => "cashier_added",
            (Role::Cashier, false) => "cashier_removed",
            (Role::Bot, true) => "bot_added",
            (Role::Bot, false) => "bot_removed",
        };

        if granted {
            roles::grant(env, role, &account);
        } else {
            roles::revoke(env, role, &account);
        }

        env.events().publish(
            (Symbol::new(env, topic), account.clone()),
            RoleChangedEvent { account },
        );

        Ok(())
    }

    fn read_phases(env: &Env) -> Vec<Phase> {
        env.storage()
            .instance()
            .get::<DataKey, Vec<Phase>>(&DataKey::Phases)
            .unwrap_or(Vec::new(env))
    }

    fn read_wallets(env: &Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get::<DataKey, Vec<Address>>(&DataKey::Wallets)
            .unwrap_or(Vec::new(env))
    }

    fn token_client(env: &Env) -> Result<MintableTokenClient<'static>, Error> {
        let token = Self::token(env.clone())?;
        Ok(MintableTokenClient::new(env, &token))
    }

    /// Mint through the token, surfacing its governance error as ours.
    fn mint_tokens(env: &Env, to: &Address, amount: i128) -> Result<(), Error> {
        let token = Self::token_client(env)?;

        match token.try_mint(&env.current_contract_address(), to, &amount) {
            Ok(Ok(())) => Ok(()),
            Err(Ok(err)) => Err(err),
            _ => Err(Error::TokenCallFailed),
        }
    }

    /// Pay every wallet its share straight from the payer.
    fn distribute(env: &Env, payer: &Address, wallets: &Vec<Address>, split: Split) -> Result<(), Error> {
        let payment_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::PaymentToken)
            .ok_or(Error::NotInitialized)?;
        let payment_client = token::Client::new(env, &payment_token);

        let last = wallets.len() - 1;
        for (index, wallet) in wallets.iter().enumerate() {
            let amount = if index as u32 == last {
                split.last_share
            } else {
                split.share
            };

            if amount > 0 {
                payment_client.transfer(payer, &wallet, &amount);
            }
        }

        Ok(())
    }
}
