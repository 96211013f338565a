use soroban_sdk::{contracterror, contracttype, Address, Bytes, Vec};

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct TableConfig {
    pub buy_in_amount: i128,       // Minimum chips to take a seat
    pub max_players: u32,          // 2-10
    pub small_blind: i128,         // big_blind / 2
    pub big_blind: i128,
    pub token: Address,            // Chip token (native asset when none was given)
    pub turn_timeout_ledgers: u32, // Ledgers before a stalled turn can be folded
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TableState {
    pub id: u32,
    pub config: TableConfig,
    pub seats: Vec<Address>, // Seat order, fixed on first buy-in
    pub total_hands: u32,    // Also the number of the latest hand
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub enum HandPhase {
    Preflop,      // Betting round: preflop
    DealingFlop,  // Waiting for the flop
    Flop,         // Betting round: flop
    DealingTurn,  // Waiting for the turn card
    Turn,         // Betting round: turn
    DealingRiver, // Waiting for the river card
    River,        // Betting round: river
    Showdown,     // Waiting for hands to be revealed
    Settled,      // Pot distributed
}

impl HandPhase {
    pub fn is_betting(&self) -> bool {
        matches!(
            self,
            HandPhase::Preflop | HandPhase::Flop | HandPhase::Turn | HandPhase::River
        )
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum PlayerAction {
    Call = 0,
    Raise = 1,
    Check = 2,
    Fold = 3,
}

/// Betting state for one hand. Per-player vectors are indexed by position in
/// `players`, which is seat order at deal time.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Round {
    pub hand_number: u32,
    pub phase: HandPhase,
    pub players: Vec<Address>,
    pub folded: Vec<bool>,
    pub acted: Vec<bool>,
    pub chips_bet: Vec<i128>, // This street only
    pub highest_bet: i128,
    pub min_raise: i128,
    pub pot: i128,
    pub dealer: u32,
    pub turn: Address,
    pub board: Vec<u32>,          // Revealed community cards
    pub board_sealed: Vec<Bytes>, // Upcoming community cards, sealed to the contract
    pub last_action_ledger: u32,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct EncryptedHand {
    pub card1_encrypted: Bytes,
    pub card2_encrypted: Bytes,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // instance()
    Admin,
    NativeToken,
    CipherRuntime,
    NextTableId,
    // persistent()
    Table(u32),
    Round(u32, u32),         // (table_id, hand_number)
    Chips(Address, u32),     // (player, table_id)
    Hand(Address, u32, u32), // (player, table_id, hand_number)
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PokerError {
    NotAuthorized = 1,
    TableNotFound = 2,
    RoundNotFound = 3,
    HandNotFound = 4,
    InvalidTableConfig = 5,
    InvalidAmount = 6,
    TableFull = 7,
    BelowBuyIn = 8,
    InsufficientAllowance = 9,
    InsufficientTokenBalance = 10,
    InsufficientChips = 11,
    NotEnoughPlayers = 12,
    HandInProgress = 13,
    PlayerNotInRound = 14,
    NotYourTurn = 15,
    BettingClosed = 16,
    NothingToCall = 17,
    CheckNotAllowed = 18,
    RaiseTooSmall = 19,
    NotDealingPhase = 20,
    NotShowdownPhase = 21,
    TimeoutNotReached = 22,
    InvalidSeat = 23,
    DeckExhausted = 24,
    NotInitialized = 25,
}
