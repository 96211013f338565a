use soroban_sdk::{log, Address, Env};

use crate::events::{ActionPlayed, StreetClosed};
use crate::game;
use crate::ledger;
use crate::types::*;

/// Process a player's betting action.
pub fn process_action(
    env: &Env,
    table: &TableState,
    round: &mut Round,
    player: &Address,
    action: PlayerAction,
    amount: i128,
) -> Result<(), PokerError> {
    if !round.phase.is_betting() {
        return Err(PokerError::BettingClosed);
    }
    let seat = find_player_seat(round, player).ok_or(PokerError::PlayerNotInRound)?;
    if round.turn != *player {
        return Err(PokerError::NotYourTurn);
    }

    let bet = round.chips_bet.get(seat).ok_or(PokerError::InvalidSeat)?;

    match action {
        PlayerAction::Call => {
            let to_call = round.highest_bet - bet;
            if to_call <= 0 {
                return Err(PokerError::NothingToCall);
            }
            commit_chips(env, table.id, round, seat, to_call)?;
        }
        PlayerAction::Raise => {
            if amount < round.min_raise {
                return Err(PokerError::RaiseTooSmall);
            }
            let target = round
                .highest_bet
                .checked_add(amount)
                .ok_or(PokerError::InsufficientChips)?;
            commit_chips(env, table.id, round, seat, target - bet)?;
            round.highest_bet = target;
            round.min_raise = amount;
            reopen_action(round, seat);
        }
        PlayerAction::Check => {
            if bet != round.highest_bet {
                return Err(PokerError::CheckNotAllowed);
            }
        }
        PlayerAction::Fold => {}
    }

    ActionPlayed {
        table_id: table.id,
        player: player.clone(),
        hand_number: round.hand_number,
        action,
        chips_bet: round.chips_bet.get(seat).ok_or(PokerError::InvalidSeat)?,
        pot: round.pot,
    }
    .publish(env);

    if action == PlayerAction::Fold {
        return fold_seat(env, table.id, round, seat);
    }

    round.acted.set(seat, true);
    round.last_action_ledger = env.ledger().sequence();
    advance_turn(env, table.id, round, seat)
}

/// Take `seat` out of the hand. Settles the pot when one player is left.
pub fn fold_seat(env: &Env, table_id: u32, round: &mut Round, seat: u32) -> Result<(), PokerError> {
    round.folded.set(seat, true);
    round.acted.set(seat, true);
    round.last_action_ledger = env.ledger().sequence();

    if game::live_player_count(round) == 1 {
        return game::settle_fold_win(env, table_id, round);
    }
    advance_turn(env, table_id, round, seat)
}

/// Reset betting state for a new street. First live player after the
/// button acts first.
pub fn reset_round(env: &Env, round: &mut Round, big_blind: i128) -> Result<(), PokerError> {
    for i in 0..round.players.len() {
        round.chips_bet.set(i, 0);
        round.acted.set(i, false);
    }
    round.highest_bet = 0;
    round.min_raise = big_blind;
    round.last_action_ledger = env.ledger().sequence();

    let first = next_live_seat(round, round.dealer)?;
    round.turn = round.players.get(first).ok_or(PokerError::InvalidSeat)?;
    Ok(())
}

fn commit_chips(
    env: &Env,
    table_id: u32,
    round: &mut Round,
    seat: u32,
    amount: i128,
) -> Result<(), PokerError> {
    let player = round.players.get(seat).ok_or(PokerError::InvalidSeat)?;
    ledger::debit(env, &player, table_id, amount)?;
    let bet = round.chips_bet.get(seat).ok_or(PokerError::InvalidSeat)?;
    round.chips_bet.set(seat, bet + amount);
    round.pot += amount;
    Ok(())
}

/// A raise gives every other live player a new decision.
fn reopen_action(round: &mut Round, raiser: u32) {
    for i in 0..round.acted.len() {
        if i != raiser {
            round.acted.set(i, false);
        }
    }
}

/// Advance to the next player's turn, or end the betting street.
fn advance_turn(env: &Env, table_id: u32, round: &mut Round, from: u32) -> Result<(), PokerError> {
    if is_street_complete(round) {
        advance_to_next_phase(env, table_id, round);
        return Ok(());
    }
    let next = next_live_seat(round, from)?;
    round.turn = round.players.get(next).ok_or(PokerError::InvalidSeat)?;
    Ok(())
}

/// Every live player has acted since the last raise and matched it.
fn is_street_complete(round: &Round) -> bool {
    for i in 0..round.players.len() {
        if round.folded.get(i).unwrap_or(true) {
            continue;
        }
        let acted = round.acted.get(i).unwrap_or(false);
        let bet = round.chips_bet.get(i).unwrap_or(0);
        if !acted || bet != round.highest_bet {
            return false;
        }
    }
    true
}

fn advance_to_next_phase(env: &Env, table_id: u32, round: &mut Round) {
    round.phase = match round.phase {
        HandPhase::Preflop => HandPhase::DealingFlop,
        HandPhase::Flop => HandPhase::DealingTurn,
        HandPhase::Turn => HandPhase::DealingRiver,
        HandPhase::River => HandPhase::Showdown,
        _ => return,
    };
    round.last_action_ledger = env.ledger().sequence();

    log!(env, "street closed", table_id, round.hand_number);
    StreetClosed {
        table_id,
        hand_number: round.hand_number,
        next_phase: round.phase.clone(),
    }
    .publish(env);
}

/// First non-folded seat after `from`, wrapping.
fn next_live_seat(round: &Round, from: u32) -> Result<u32, PokerError> {
    let num_players = round.players.len();
    for step in 1..=num_players {
        let seat = (from + step) % num_players;
        if !round.folded.get(seat).unwrap_or(true) {
            return Ok(seat);
        }
    }
    Err(PokerError::InvalidSeat)
}

pub fn find_player_seat(round: &Round, player: &Address) -> Option<u32> {
    round.players.first_index_of(player)
}
