use soroban_sdk::{token, Address, Env};

use crate::types::*;
use crate::{PERSISTENT_TTL_EXTEND, PERSISTENT_TTL_THRESHOLD};

/// Chips `player` holds at `table_id`, outside of any pot.
pub fn chips_of(env: &Env, player: &Address, table_id: u32) -> i128 {
    let key = DataKey::Chips(player.clone(), table_id);
    env.storage().persistent().get(&key).unwrap_or(0)
}

fn set_chips(env: &Env, player: &Address, table_id: u32, amount: i128) {
    let key = DataKey::Chips(player.clone(), table_id);
    env.storage().persistent().set(&key, &amount);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

pub fn credit(env: &Env, player: &Address, table_id: u32, amount: i128) -> i128 {
    let balance = chips_of(env, player, table_id) + amount;
    set_chips(env, player, table_id, balance);
    balance
}

pub fn debit(
    env: &Env,
    player: &Address,
    table_id: u32,
    amount: i128,
) -> Result<i128, PokerError> {
    let balance = chips_of(env, player, table_id);
    if amount > balance {
        return Err(PokerError::InsufficientChips);
    }
    set_chips(env, player, table_id, balance - amount);
    Ok(balance - amount)
}

/// Pull `amount` of the table token from `player` against their allowance.
pub fn pull_tokens(
    env: &Env,
    token: &Address,
    player: &Address,
    amount: i128,
) -> Result<(), PokerError> {
    let client = token::Client::new(env, token);
    let contract = env.current_contract_address();

    if client.allowance(player, &contract) < amount {
        return Err(PokerError::InsufficientAllowance);
    }
    if client.balance(player) < amount {
        return Err(PokerError::InsufficientTokenBalance);
    }

    client.transfer_from(&contract, player, &contract, &amount);
    Ok(())
}

pub fn push_tokens(env: &Env, token: &Address, player: &Address, amount: i128) {
    let client = token::Client::new(env, token);
    client.transfer(&env.current_contract_address(), player, &amount);
}
