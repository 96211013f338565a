#![no_std]

use soroban_sdk::{contract, contractimpl, log, Address, Bytes, Env, Vec};

mod betting;
mod cipher;
mod dealing;
mod events;
mod game;
mod ledger;
mod timeout;
mod types;

#[cfg(test)]
mod fixture;

use events::*;
use types::*;

/// TTL for persistent storage (30 days in ledgers, ~5 seconds per ledger)
const PERSISTENT_TTL_THRESHOLD: u32 = 17_280; // ~1 day, extend once below this
const PERSISTENT_TTL_EXTEND: u32 = 518_400; // ~30 days

/// Seats per table; 2n hole cards plus the board must fit in one deck.
pub const MAX_SEATS: u32 = 10;
/// ~1 hour at ~5 seconds per ledger.
pub const DEFAULT_TURN_TIMEOUT_LEDGERS: u32 = 720;

#[contract]
pub struct PokerContract;

fn load_table(env: &Env, table_id: u32) -> Result<TableState, PokerError> {
    let key = DataKey::Table(table_id);
    let table: TableState = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(PokerError::TableNotFound)?;
    // Extend TTL on every read to keep active tables alive
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
    Ok(table)
}

fn save_table(env: &Env, table: &TableState) {
    let key = DataKey::Table(table.id);
    env.storage().persistent().set(&key, table);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
    // Keep instance storage alive too
    env.storage()
        .instance()
        .extend_ttl(PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

fn load_round(env: &Env, table_id: u32, hand_number: u32) -> Result<Round, PokerError> {
    let key = DataKey::Round(table_id, hand_number);
    let round: Round = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(PokerError::RoundNotFound)?;
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
    Ok(round)
}

fn save_round(env: &Env, table_id: u32, round: &Round) {
    let key = DataKey::Round(table_id, round.hand_number);
    env.storage().persistent().set(&key, round);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

/// The latest hand dealt at `table`.
fn current_round(env: &Env, table: &TableState) -> Result<Round, PokerError> {
    if table.total_hands == 0 {
        return Err(PokerError::RoundNotFound);
    }
    load_round(env, table.id, table.total_hands)
}

/// Whether `player` still holds cards in the table's current hand.
fn in_unsettled_hand(env: &Env, table: &TableState, player: &Address) -> Result<bool, PokerError> {
    if table.total_hands == 0 {
        return Ok(false);
    }
    let round = load_round(env, table.id, table.total_hands)?;
    if round.phase == HandPhase::Settled {
        return Ok(false);
    }
    Ok(match betting::find_player_seat(&round, player) {
        Some(seat) => !round.folded.get(seat).unwrap_or(true),
        None => false,
    })
}

fn require_admin(env: &Env, caller: &Address) -> Result<(), PokerError> {
    caller.require_auth();
    let admin: Address = env
        .storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(PokerError::NotInitialized)?;
    if *caller != admin {
        return Err(PokerError::NotAuthorized);
    }
    Ok(())
}

fn cipher_runtime(env: &Env) -> Result<Address, PokerError> {
    env.storage()
        .instance()
        .get(&DataKey::CipherRuntime)
        .ok_or(PokerError::NotInitialized)
}

#[contractimpl]
impl PokerContract {
    /// Fix the admin, the native asset's token contract and the cipher runtime.
    pub fn __constructor(env: Env, admin: Address, native_token: Address, cipher_runtime: Address) {
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::NativeToken, &native_token);
        env.storage()
            .instance()
            .set(&DataKey::CipherRuntime, &cipher_runtime);
    }

    pub fn get_admin(env: Env) -> Result<Address, PokerError> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(PokerError::NotInitialized)
    }

    // ========================================================================
    // Table registry
    // ========================================================================

    /// Create a table (admin only). `token` of `None` plays for the native asset.
    pub fn initialize_table(
        env: Env,
        caller: Address,
        buy_in_amount: i128,
        max_players: u32,
        big_blind: i128,
        token: Option<Address>,
    ) -> Result<u32, PokerError> {
        require_admin(&env, &caller)?;

        if buy_in_amount <= 0
            || big_blind <= 0
            || big_blind > buy_in_amount
            || max_players < 2
            || max_players > MAX_SEATS
        {
            return Err(PokerError::InvalidTableConfig);
        }

        let token = match token {
            Some(token) => token,
            None => env
                .storage()
                .instance()
                .get(&DataKey::NativeToken)
                .ok_or(PokerError::NotInitialized)?,
        };

        let table_id: u32 = env
            .storage()
            .instance()
            .get(&DataKey::NextTableId)
            .unwrap_or(0);

        let table = TableState {
            id: table_id,
            config: TableConfig {
                buy_in_amount,
                max_players,
                small_blind: big_blind / 2,
                big_blind,
                token: token.clone(),
                turn_timeout_ledgers: DEFAULT_TURN_TIMEOUT_LEDGERS,
            },
            seats: Vec::new(&env),
            total_hands: 0,
        };

        save_table(&env, &table);
        env.storage()
            .instance()
            .set(&DataKey::NextTableId, &(table_id + 1));

        TableInitialized {
            table_id,
            buy_in_amount,
            max_players,
            big_blind,
            token,
        }
        .publish(&env);

        Ok(table_id)
    }

    /// Read a table's configuration and counters.
    pub fn tables(env: Env, table_id: u32) -> Result<TableState, PokerError> {
        load_table(&env, table_id)
    }

    /// Change how long a turn may stall before anyone can fold it (admin only).
    pub fn set_turn_timeout(
        env: Env,
        caller: Address,
        table_id: u32,
        ledgers: u32,
    ) -> Result<(), PokerError> {
        require_admin(&env, &caller)?;
        if ledgers == 0 {
            return Err(PokerError::InvalidTableConfig);
        }
        let mut table = load_table(&env, table_id)?;
        table.config.turn_timeout_ledgers = ledgers;
        save_table(&env, &table);
        Ok(())
    }

    // ========================================================================
    // Chip ledger
    // ========================================================================

    /// Convert approved tokens into chips at a table. The first buy-in takes
    /// a seat and must cover the table's buy-in amount.
    pub fn buy_in(
        env: Env,
        player: Address,
        table_id: u32,
        amount: i128,
    ) -> Result<i128, PokerError> {
        player.require_auth();

        if amount <= 0 {
            return Err(PokerError::InvalidAmount);
        }

        let mut table = load_table(&env, table_id)?;

        if !table.seats.contains(&player) {
            if table.seats.len() >= table.config.max_players {
                return Err(PokerError::TableFull);
            }
            if amount < table.config.buy_in_amount {
                return Err(PokerError::BelowBuyIn);
            }
            table.seats.push_back(player.clone());
            save_table(&env, &table);
        }

        ledger::pull_tokens(&env, &table.config.token, &player, amount)?;
        let balance = ledger::credit(&env, &player, table_id, amount);

        ChipsBoughtIn {
            table_id,
            player,
            amount,
            balance,
        }
        .publish(&env);

        Ok(balance)
    }

    /// Turn chips back into tokens. Withdrawing everything gives up the seat.
    pub fn withdraw_chips(
        env: Env,
        player: Address,
        table_id: u32,
        amount: i128,
    ) -> Result<i128, PokerError> {
        player.require_auth();

        if amount <= 0 {
            return Err(PokerError::InvalidAmount);
        }

        let mut table = load_table(&env, table_id)?;
        let balance = ledger::debit(&env, &player, table_id, amount)?;
        ledger::push_tokens(&env, &table.config.token, &player, amount);

        // A live player keeps their seat until the hand settles; the next
        // deal releases it if they are still empty.
        if balance == 0
            && !in_unsettled_hand(&env, &table, &player)?
            && game::release_seat(&env, &mut table, &player)
        {
            save_table(&env, &table);
        }

        ChipsWithdrawn {
            table_id,
            player,
            amount,
            balance,
        }
        .publish(&env);

        Ok(balance)
    }

    /// Chips `player` can still bet at `table_id`; 0 if they never bought in.
    pub fn player_chips_remaining(env: Env, player: Address, table_id: u32) -> i128 {
        ledger::chips_of(&env, &player, table_id)
    }

    // ========================================================================
    // Dealing
    // ========================================================================

    /// Start the next hand (admin only). Returns the new hand number.
    pub fn deal_cards(env: Env, caller: Address, table_id: u32) -> Result<u32, PokerError> {
        require_admin(&env, &caller)?;

        let mut table = load_table(&env, table_id)?;
        if table.total_hands > 0 {
            let previous = load_round(&env, table_id, table.total_hands)?;
            if previous.phase != HandPhase::Settled {
                return Err(PokerError::HandInProgress);
            }
        }

        let runtime = cipher_runtime(&env)?;
        let round = game::start_new_hand(&env, &mut table, &runtime)?;

        save_round(&env, table_id, &round);
        save_table(&env, &table);

        Ok(round.hand_number)
    }

    /// Ciphertexts of a player's hole cards. Both are empty when the player
    /// was not dealt into that hand.
    pub fn player_cards_encrypted(
        env: Env,
        player: Address,
        table_id: u32,
        hand_number: u32,
    ) -> EncryptedHand {
        dealing::load_hand(&env, &player, table_id, hand_number).unwrap_or(EncryptedHand {
            card1_encrypted: Bytes::new(&env),
            card2_encrypted: Bytes::new(&env),
        })
    }

    /// Reveal the flop, turn or river once the previous street closed
    /// (admin only).
    pub fn deal_community_cards(
        env: Env,
        caller: Address,
        table_id: u32,
    ) -> Result<Vec<u32>, PokerError> {
        require_admin(&env, &caller)?;

        let table = load_table(&env, table_id)?;
        let mut round = current_round(&env, &table)?;

        let (count, next_phase) = match round.phase {
            HandPhase::DealingFlop => (3, HandPhase::Flop),
            HandPhase::DealingTurn => (1, HandPhase::Turn),
            HandPhase::DealingRiver => (1, HandPhase::River),
            _ => return Err(PokerError::NotDealingPhase),
        };

        let runtime = cipher_runtime(&env)?;
        let cards = dealing::reveal_board(&env, &mut round, &runtime, count)?;
        round.phase = next_phase;
        betting::reset_round(&env, &mut round, table.config.big_blind)?;

        save_round(&env, table_id, &round);

        CommunityCardsDealt {
            table_id,
            hand_number: round.hand_number,
            cards: cards.clone(),
        }
        .publish(&env);

        Ok(cards)
    }

    // ========================================================================
    // Betting
    // ========================================================================

    /// Act on the current street: call, raise by `amount`, check or fold.
    /// `amount` is ignored for everything but a raise.
    pub fn play_hand(
        env: Env,
        player: Address,
        table_id: u32,
        action: PlayerAction,
        amount: i128,
    ) -> Result<(), PokerError> {
        player.require_auth();

        let table = load_table(&env, table_id)?;
        let mut round = current_round(&env, &table)?;

        betting::process_action(&env, &table, &mut round, &player, action, amount)?;

        save_round(&env, table_id, &round);
        Ok(())
    }

    /// Fold a player who let the turn clock run out.
    pub fn claim_timeout(env: Env, claimer: Address, table_id: u32) -> Result<(), PokerError> {
        claimer.require_auth();

        let table = load_table(&env, table_id)?;
        let mut round = current_round(&env, &table)?;

        timeout::process_timeout(&env, &table, &mut round, &claimer)?;

        save_round(&env, table_id, &round);
        Ok(())
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Open the remaining hands after the river and pay the winners
    /// (admin only).
    pub fn showdown(env: Env, caller: Address, table_id: u32) -> Result<Vec<Address>, PokerError> {
        require_admin(&env, &caller)?;

        let table = load_table(&env, table_id)?;
        let mut round = current_round(&env, &table)?;
        if round.phase != HandPhase::Showdown {
            return Err(PokerError::NotShowdownPhase);
        }

        let runtime = cipher_runtime(&env)?;
        let winners = game::settle_showdown(&env, table_id, &mut round, &runtime)?;

        save_round(&env, table_id, &round);
        log!(&env, "showdown settled", table_id, round.hand_number);

        Ok(winners)
    }

    // ========================================================================
    // Round views
    // ========================================================================

    pub fn rounds(env: Env, table_id: u32, hand_number: u32) -> Result<Round, PokerError> {
        load_round(&env, table_id, hand_number)
    }

    /// Players who have not folded, in seat order.
    pub fn get_round_players_in_round(
        env: Env,
        table_id: u32,
        hand_number: u32,
    ) -> Result<Vec<Address>, PokerError> {
        let round = load_round(&env, table_id, hand_number)?;
        let mut live = Vec::new(&env);
        for (player, folded) in round.players.iter().zip(round.folded.iter()) {
            if !folded {
                live.push_back(player);
            }
        }
        Ok(live)
    }

    /// Chips each dealt player has put in on the current street, in seat order.
    pub fn get_chips_bet_array(
        env: Env,
        table_id: u32,
        hand_number: u32,
    ) -> Result<Vec<i128>, PokerError> {
        Ok(load_round(&env, table_id, hand_number)?.chips_bet)
    }
}
