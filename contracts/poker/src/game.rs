use soroban_sdk::{log, Address, Env, Vec};

use crate::dealing;
use crate::events::{HandSettled, SeatReleased};
use crate::ledger;
use crate::types::*;

/// Deal a new hand at `table`: release empty seats, pick the funded ones,
/// shuffle and seal the cards, and post the blinds.
pub fn start_new_hand(
    env: &Env,
    table: &mut TableState,
    runtime: &Address,
) -> Result<Round, PokerError> {
    let big_blind = table.config.big_blind;

    let mut players: Vec<Address> = Vec::new(env);
    for p in table.seats.clone().iter() {
        let chips = ledger::chips_of(env, &p, table.id);
        if chips == 0 {
            release_seat(env, table, &p);
        } else if chips >= big_blind {
            players.push_back(p);
        }
    }
    if players.len() < 2 {
        return Err(PokerError::NotEnoughPlayers);
    }

    table.total_hands += 1;
    let hand_number = table.total_hands;

    // Rotate dealer button with the hand counter
    let num_players = players.len();
    let dealer = (hand_number - 1) % num_players;
    let sb_seat = (dealer + 1) % num_players;
    let bb_seat = (dealer + 2) % num_players;
    let first_to_act = (dealer + 3) % num_players;

    let board_sealed =
        dealing::deal_hole_cards(env, table.id, hand_number, &players, runtime)?;

    let mut folded = Vec::new(env);
    let mut acted = Vec::new(env);
    let mut chips_bet = Vec::new(env);
    for _ in 0..num_players {
        folded.push_back(false);
        acted.push_back(false);
        chips_bet.push_back(0i128);
    }

    let turn = players
        .get(first_to_act)
        .ok_or(PokerError::InvalidSeat)?;

    let mut round = Round {
        hand_number,
        phase: HandPhase::Preflop,
        players,
        folded,
        acted,
        chips_bet,
        highest_bet: 0,
        min_raise: big_blind,
        pot: 0,
        dealer,
        turn,
        board: Vec::new(env),
        board_sealed,
        last_action_ledger: env.ledger().sequence(),
    };

    post_blind(env, table.id, &mut round, sb_seat, table.config.small_blind)?;
    post_blind(env, table.id, &mut round, bb_seat, big_blind)?;
    round.highest_bet = big_blind;

    log!(env, "hand dealt", table.id, hand_number, num_players);
    Ok(round)
}

/// Give up `player`'s seat so someone else can take it. Returns false when
/// they were not seated.
pub fn release_seat(env: &Env, table: &mut TableState, player: &Address) -> bool {
    let Some(seat) = table.seats.first_index_of(player) else {
        return false;
    };
    table.seats.remove(seat);

    log!(env, "seat released", table.id, seat);
    SeatReleased {
        table_id: table.id,
        player: player.clone(),
    }
    .publish(env);
    true
}

/// Blinds count toward the street's bet but not as the player's action.
fn post_blind(
    env: &Env,
    table_id: u32,
    round: &mut Round,
    seat: u32,
    amount: i128,
) -> Result<(), PokerError> {
    let player = round.players.get(seat).ok_or(PokerError::InvalidSeat)?;
    ledger::debit(env, &player, table_id, amount)?;
    round.chips_bet.set(seat, amount);
    round.pot += amount;
    Ok(())
}

/// Count players still in the hand (not folded).
pub fn live_player_count(round: &Round) -> u32 {
    round.folded.iter().filter(|folded| !folded).count() as u32
}

/// Find the single remaining player (when all others folded).
pub fn last_player_standing(round: &Round) -> Option<Address> {
    if live_player_count(round) != 1 {
        return None;
    }
    let seat = round.folded.iter().position(|folded| !folded)? as u32;
    round.players.get(seat)
}

/// Award pot to last player standing (all others folded).
pub fn settle_fold_win(env: &Env, table_id: u32, round: &mut Round) -> Result<(), PokerError> {
    let winner = last_player_standing(round).ok_or(PokerError::InvalidSeat)?;
    let mut winners = Vec::new(env);
    winners.push_back(winner);
    award_pot(env, table_id, round, &winners);
    Ok(())
}

/// Open every live player's hole cards, rank them against the board and pay
/// the best hand(s).
pub fn settle_showdown(
    env: &Env,
    table_id: u32,
    round: &mut Round,
    runtime: &Address,
) -> Result<Vec<Address>, PokerError> {
    let mut cards = [0u32; 7];
    let board_len = round.board.len() as usize;
    for (i, card) in round.board.iter().enumerate() {
        cards[2 + i] = card;
    }
    let used = 2 + board_len;

    let mut best_score: u32 = 0;
    let mut winners: Vec<Address> = Vec::new(env);

    for seat in 0..round.players.len() {
        if round.folded.get(seat).ok_or(PokerError::InvalidSeat)? {
            continue;
        }
        let player = round.players.get(seat).ok_or(PokerError::InvalidSeat)?;
        let (card1, card2) =
            dealing::reveal_hole_cards(env, &player, table_id, round.hand_number, runtime)?;
        cards[0] = card1;
        cards[1] = card2;

        let rank = poker_cards::evaluate_hand(&cards[..used]);
        if winners.is_empty() || rank.score > best_score {
            best_score = rank.score;
            winners = Vec::new(env);
            winners.push_back(player);
        } else if rank.score == best_score {
            winners.push_back(player);
        }
    }

    award_pot(env, table_id, round, &winners);
    Ok(winners)
}

/// Split the pot evenly; odd chips go to the first winner in seat order.
fn award_pot(env: &Env, table_id: u32, round: &mut Round, winners: &Vec<Address>) {
    let pot = round.pot;
    let count = winners.len() as i128;
    let share = if count > 0 { pot / count } else { 0 };
    let remainder = pot - share * count;

    for (i, winner) in winners.iter().enumerate() {
        let amount = if i == 0 { share + remainder } else { share };
        ledger::credit(env, &winner, table_id, amount);
    }

    round.pot = 0;
    round.phase = HandPhase::Settled;
    round.last_action_ledger = env.ledger().sequence();

    HandSettled {
        table_id,
        hand_number: round.hand_number,
        winners: winners.clone(),
        share,
        pot,
    }
    .publish(env);
}
