use soroban_sdk::{contractevent, Address, Bytes, Vec};

use crate::types::{HandPhase, PlayerAction};

#[contractevent]
pub struct TableInitialized {
    #[topic]
    pub table_id: u32,
    pub buy_in_amount: i128,
    pub max_players: u32,
    pub big_blind: i128,
    pub token: Address,
}

#[contractevent]
pub struct ChipsBoughtIn {
    #[topic]
    pub table_id: u32,
    #[topic]
    pub player: Address,
    pub amount: i128,
    pub balance: i128,
}

#[contractevent]
pub struct ChipsWithdrawn {
    #[topic]
    pub table_id: u32,
    #[topic]
    pub player: Address,
    pub amount: i128,
    pub balance: i128,
}

#[contractevent]
pub struct SeatReleased {
    #[topic]
    pub table_id: u32,
    #[topic]
    pub player: Address,
}

/// One per dealt player. Ciphertexts open only with the owner's credential.
#[contractevent]
pub struct PlayerCardsDealt {
    #[topic]
    pub table_id: u32,
    #[topic]
    pub player: Address,
    pub hand_number: u32,
    pub card1_encrypted: Bytes,
    pub card2_encrypted: Bytes,
}

/// Plaintext hole cards. Only compiled with the `debug-events` feature.
#[cfg(feature = "debug-events")]
#[contractevent]
pub struct DebugPlayerCards {
    #[topic]
    pub table_id: u32,
    #[topic]
    pub player: Address,
    pub hand_number: u32,
    pub card1: u32,
    pub card2: u32,
}

#[contractevent]
pub struct ActionPlayed {
    #[topic]
    pub table_id: u32,
    #[topic]
    pub player: Address,
    pub hand_number: u32,
    pub action: PlayerAction,
    pub chips_bet: i128,
    pub pot: i128,
}

#[contractevent]
pub struct StreetClosed {
    #[topic]
    pub table_id: u32,
    pub hand_number: u32,
    pub next_phase: HandPhase,
}

#[contractevent]
pub struct CommunityCardsDealt {
    #[topic]
    pub table_id: u32,
    pub hand_number: u32,
    pub cards: Vec<u32>,
}

#[contractevent]
pub struct TurnTimedOut {
    #[topic]
    pub table_id: u32,
    #[topic]
    pub player: Address,
    pub hand_number: u32,
}

#[contractevent]
pub struct HandSettled {
    #[topic]
    pub table_id: u32,
    pub hand_number: u32,
    pub winners: Vec<Address>,
    pub share: i128,
    pub pot: i128,
}
