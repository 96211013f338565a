use soroban_sdk::{log, Address, Env};

use crate::betting;
use crate::events::TurnTimedOut;
use crate::types::*;

/// Process a timeout claim.
/// Anyone can call this once the turn holder has stalled for the table's
/// `turn_timeout_ledgers`; the stalling player is folded.
pub fn process_timeout(
    env: &Env,
    table: &TableState,
    round: &mut Round,
    claimer: &Address,
) -> Result<(), PokerError> {
    if !round.phase.is_betting() {
        return Err(PokerError::BettingClosed);
    }

    let current_ledger = env.ledger().sequence();
    let elapsed = current_ledger.saturating_sub(round.last_action_ledger);
    if elapsed < table.config.turn_timeout_ledgers {
        return Err(PokerError::TimeoutNotReached);
    }

    let stalled = round.turn.clone();
    let seat = betting::find_player_seat(round, &stalled).ok_or(PokerError::InvalidSeat)?;

    log!(env, "turn timed out", table.id, round.hand_number, claimer.clone());
    TurnTimedOut {
        table_id: table.id,
        player: stalled,
        hand_number: round.hand_number,
    }
    .publish(env);

    betting::fold_seat(env, table.id, round, seat)
}
