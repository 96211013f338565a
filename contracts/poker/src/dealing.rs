use soroban_sdk::{Address, Bytes, Env, Vec};

use crate::cipher;
use crate::events::PlayerCardsDealt;
use crate::types::*;
use crate::{PERSISTENT_TTL_EXTEND, PERSISTENT_TTL_THRESHOLD};

#[cfg(feature = "debug-events")]
use crate::events::DebugPlayerCards;

/// Community cards sealed away at deal time: flop, turn, river.
pub const BOARD_CARDS: u32 = 5;

/// Shuffle a fresh deck, seal two hole cards to every player and store them
/// under (player, table, hand). Cards go out round-robin starting at seat 0.
///
/// Returns the next `BOARD_CARDS` cards sealed to this contract.
pub fn deal_hole_cards(
    env: &Env,
    table_id: u32,
    hand_number: u32,
    players: &Vec<Address>,
    runtime: &Address,
) -> Result<Vec<Bytes>, PokerError> {
    let deck = poker_cards::shuffled_deck(env);
    let num_players = players.len();
    if num_players * 2 + BOARD_CARDS > deck.len() {
        return Err(PokerError::DeckExhausted);
    }

    for seat in 0..num_players {
        let player = players.get(seat).ok_or(PokerError::InvalidSeat)?;
        let card1 = deck.get(seat).ok_or(PokerError::DeckExhausted)?;
        let card2 = deck
            .get(num_players + seat)
            .ok_or(PokerError::DeckExhausted)?;

        let hand = EncryptedHand {
            card1_encrypted: cipher::seal_card(env, runtime, &player, card1),
            card2_encrypted: cipher::seal_card(env, runtime, &player, card2),
        };
        save_hand(env, &player, table_id, hand_number, &hand);

        PlayerCardsDealt {
            table_id,
            player: player.clone(),
            hand_number,
            card1_encrypted: hand.card1_encrypted,
            card2_encrypted: hand.card2_encrypted,
        }
        .publish(env);

        #[cfg(feature = "debug-events")]
        DebugPlayerCards {
            table_id,
            player,
            hand_number,
            card1,
            card2,
        }
        .publish(env);
    }

    let contract = env.current_contract_address();
    let mut board_sealed = Vec::new(env);
    for i in 0..BOARD_CARDS {
        let card = deck
            .get(num_players * 2 + i)
            .ok_or(PokerError::DeckExhausted)?;
        board_sealed.push_back(cipher::seal_card(env, runtime, &contract, card));
    }
    Ok(board_sealed)
}

/// Open the next `count` sealed community cards and append them to the board.
pub fn reveal_board(
    env: &Env,
    round: &mut Round,
    runtime: &Address,
    count: u32,
) -> Result<Vec<u32>, PokerError> {
    let mut cards = Vec::new(env);
    for _ in 0..count {
        let sealed = round
            .board_sealed
            .get(round.board.len())
            .ok_or(PokerError::DeckExhausted)?;
        let card = cipher::reveal_card(env, runtime, &sealed);
        round.board.push_back(card);
        cards.push_back(card);
    }
    Ok(cards)
}

/// Open a player's hole cards for showdown.
pub fn reveal_hole_cards(
    env: &Env,
    player: &Address,
    table_id: u32,
    hand_number: u32,
    runtime: &Address,
) -> Result<(u32, u32), PokerError> {
    let hand = load_hand(env, player, table_id, hand_number).ok_or(PokerError::HandNotFound)?;
    Ok((
        cipher::reveal_card(env, runtime, &hand.card1_encrypted),
        cipher::reveal_card(env, runtime, &hand.card2_encrypted),
    ))
}

pub fn load_hand(
    env: &Env,
    player: &Address,
    table_id: u32,
    hand_number: u32,
) -> Option<EncryptedHand> {
    let key = DataKey::Hand(player.clone(), table_id, hand_number);
    let hand: EncryptedHand = env.storage().persistent().get(&key)?;
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
    Some(hand)
}

pub fn save_hand(env: &Env, player: &Address, table_id: u32, hand_number: u32, hand: &EncryptedHand) {
    let key = DataKey::Hand(player.clone(), table_id, hand_number);
    env.storage().persistent().set(&key, hand);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}
