use crate::error::Error;
use crate::storage::{DataKey, Role};

use soroban_sdk::{Address, Env};

pub fn has_role(env: &Env, role: Role, account: &Address) -> bool {
    env.storage()
        .instance()
        .get::<DataKey, bool>(&DataKey::Role(role, account.clone()))
        .unwrap_or(false)
}

pub fn grant(env: &Env, role: Role, account: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::Role(role, account.clone()), &true);
}

pub fn revoke(env: &Env, role: Role, account: &Address) {
    env.storage()
        .instance()
        .remove(&DataKey::Role(role, account.clone()));
}

/// Caller must sign the invocation and hold `role`.
pub fn require_role(env: &Env, role: Role, caller: &Address) -> Result<(), Error> {
    caller.require_auth();

    if !has_role(env, role, caller) {
        return Err(Error::Unauthorized);
    }
    Ok(())
}
