#![no_std]

use soroban_sdk::{contracttype, Env, Vec};

/// Card encoding: suit * 13 + rank
/// suit: 0=Clubs, 1=Diamonds, 2=Hearts, 3=Spades
/// rank: 0=2, 1=3, ..., 8=10, 9=J, 10=Q, 11=K, 12=A
pub const DECK_SIZE: u32 = 52;
pub const NUM_SUITS: u32 = 4;
pub const NUM_RANKS: u32 = 13;

const ACE: u32 = 12;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Card {
    pub value: u32, // 0-51
}

impl Card {
    pub fn new(suit: u32, rank: u32) -> Option<Self> {
        if suit >= NUM_SUITS || rank >= NUM_RANKS {
            return None;
        }
        Some(Card {
            value: suit * NUM_RANKS + rank,
        })
    }

    pub fn suit(&self) -> u32 {
        self.value / NUM_RANKS
    }

    pub fn rank(&self) -> u32 {
        self.value % NUM_RANKS
    }

    pub fn is_valid(&self) -> bool {
        self.value < DECK_SIZE
    }
}

/// Hand categories, weakest first.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

/// Comparable hand strength.
/// Format: category (top 4 bits) | up to five 4-bit ranks, most significant first.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HandRank {
    pub score: u32,
}

impl HandRank {
    fn new(category: HandCategory, ranks: &[u32]) -> Self {
        let tiebreaker = ranks.iter().fold(0u32, |acc, &r| (acc << 4) | r);
        HandRank {
            score: ((category as u32) << 28) | (tiebreaker & 0x0FFF_FFFF),
        }
    }

    pub fn category(&self) -> u32 {
        self.score >> 28
    }

    pub fn beats(&self, other: &HandRank) -> bool {
        self.score > other.score
    }
}

/// Best five-card rank out of five to seven cards.
///
/// Works from rank counts and per-suit rank masks instead of enumerating
/// every five-card subset, so the cost stays flat as the board grows.
/// Invalid card values (>= 52) are ignored.
pub fn evaluate_hand(cards: &[u32]) -> HandRank {
    let mut counts = [0u32; NUM_RANKS as usize];
    let mut suit_masks = [0u16; NUM_SUITS as usize];
    let mut rank_mask: u16 = 0;

    for &c in cards.iter().filter(|&&c| c < DECK_SIZE) {
        let rank = c % NUM_RANKS;
        let suit = c / NUM_RANKS;
        counts[rank as usize] += 1;
        suit_masks[suit as usize] |= 1 << rank;
        rank_mask |= 1 << rank;
    }

    if let Some(mask) = suit_masks.iter().copied().find(|m| m.count_ones() >= 5) {
        if let Some(high) = straight_high(mask) {
            return HandRank::new(HandCategory::StraightFlush, &[high]);
        }
    }

    if let Some(quad) = highest_with_count(&counts, 4, None) {
        let kicker = top_ranks::<1>(rank_mask & !(1 << quad));
        return HandRank::new(HandCategory::FourOfAKind, &[quad, kicker[0]]);
    }

    if let Some(trips) = highest_with_count(&counts, 3, None) {
        if let Some(pair) = highest_with_count(&counts, 2, Some(trips)) {
            return HandRank::new(HandCategory::FullHouse, &[trips, pair]);
        }
    }

    if let Some(mask) = suit_masks.iter().copied().find(|m| m.count_ones() >= 5) {
        return HandRank::new(HandCategory::Flush, &top_ranks::<5>(mask));
    }

    if let Some(high) = straight_high(rank_mask) {
        return HandRank::new(HandCategory::Straight, &[high]);
    }

    if let Some(trips) = highest_with_count(&counts, 3, None) {
        let k = top_ranks::<2>(rank_mask & !(1 << trips));
        return HandRank::new(HandCategory::ThreeOfAKind, &[trips, k[0], k[1]]);
    }

    if let Some(high_pair) = highest_with_count(&counts, 2, None) {
        if let Some(low_pair) = highest_with_count(&counts, 2, Some(high_pair)) {
            let k = top_ranks::<1>(rank_mask & !(1 << high_pair) & !(1 << low_pair));
            return HandRank::new(HandCategory::TwoPair, &[high_pair, low_pair, k[0]]);
        }
        let k = top_ranks::<3>(rank_mask & !(1 << high_pair));
        return HandRank::new(HandCategory::OnePair, &[high_pair, k[0], k[1], k[2]]);
    }

    HandRank::new(HandCategory::HighCard, &top_ranks::<5>(rank_mask))
}

/// Highest rank held at least `min` times, skipping `except`.
fn highest_with_count(counts: &[u32; NUM_RANKS as usize], min: u32, except: Option<u32>) -> Option<u32> {
    (0..NUM_RANKS)
        .rev()
        .find(|&r| Some(r) != except && counts[r as usize] >= min)
}

/// The N highest distinct ranks in `mask`, padded with zeros.
fn top_ranks<const N: usize>(mask: u16) -> [u32; N] {
    let mut out = [0u32; N];
    let mut i = 0;
    for r in (0..NUM_RANKS).rev() {
        if i == N {
            break;
        }
        if mask & (1 << r) != 0 {
            out[i] = r;
            i += 1;
        }
    }
    out
}

/// Top rank of the best straight in `mask`; the wheel (A-2-3-4-5) is 5-high.
fn straight_high(mask: u16) -> Option<u32> {
    for high in (4..NUM_RANKS).rev() {
        let window: u16 = 0b1_1111 << (high - 4);
        if mask & window == window {
            return Some(high);
        }
    }
    let wheel: u16 = (1 << ACE) | 0b1111;
    if mask & wheel == wheel {
        return Some(3);
    }
    None
}

/// A freshly shuffled 52-card deck drawn from the ledger PRNG (Fisher-Yates).
///
/// Must run inside a contract invocation.
pub fn shuffled_deck(env: &Env) -> Vec<u32> {
    let mut deck = [0u32; DECK_SIZE as usize];
    for (i, slot) in deck.iter_mut().enumerate() {
        *slot = i as u32;
    }

    let mut idx = DECK_SIZE as usize;
    while idx > 1 {
        idx -= 1;
        let j = env.prng().gen_range::<u64>(0..=(idx as u64)) as usize;
        deck.swap(idx, j);
    }

    Vec::from_slice(env, &deck)
}

#[cfg(test)]
mod test {
    use super::*;

    fn card(suit: u32, rank: u32) -> u32 {
        Card::new(suit, rank).unwrap().value
    }

    #[test]
    fn test_card_encoding() {
        let two_clubs = Card::new(0, 0).unwrap();
        assert_eq!(two_clubs.value, 0);
        assert_eq!(two_clubs.suit(), 0);
        assert_eq!(two_clubs.rank(), 0);

        let ace_spades = Card::new(3, 12).unwrap();
        assert_eq!(ace_spades.value, 51);
        assert_eq!(ace_spades.suit(), 3);
        assert_eq!(ace_spades.rank(), 12);

        assert!(Card::new(4, 0).is_none());
        assert!(Card::new(0, 13).is_none());
        assert!(!Card { value: 52 }.is_valid());
    }

    #[test]
    fn test_category_ladder() {
        // T-J-Q-K-A of clubs
        let straight_flush = evaluate_hand(&[8, 9, 10, 11, 12, 13, 14]);
        // four deuces + K Q J
        let quads = evaluate_hand(&[0, 13, 26, 39, 11, 10, 9]);
        // three treys + two kings
        let full_house = evaluate_hand(&[1, 14, 27, 11, 24, 10, 9]);
        // five clubs, no straight
        let flush = evaluate_hand(&[0, 2, 4, 6, 11, 13, 14]);
        // 5-6-7-8-9 offsuit
        let straight = evaluate_hand(&[3, 17, 31, 45, 7, 13, 27]);
        let trips = evaluate_hand(&[card(0, 5), card(1, 5), card(2, 5), card(0, 0), card(1, 9)]);
        let two_pair = evaluate_hand(&[card(0, 5), card(1, 5), card(2, 7), card(3, 7), card(1, 9)]);
        let pair = evaluate_hand(&[card(0, 5), card(1, 5), card(2, 7), card(3, 2), card(1, 9)]);
        let high = evaluate_hand(&[12, 24, 36, 48, 7, 13, 15]);

        assert_eq!(straight_flush.category(), HandCategory::StraightFlush as u32);
        assert_eq!(quads.category(), HandCategory::FourOfAKind as u32);
        assert_eq!(full_house.category(), HandCategory::FullHouse as u32);
        assert_eq!(flush.category(), HandCategory::Flush as u32);
        assert_eq!(straight.category(), HandCategory::Straight as u32);
        assert_eq!(trips.category(), HandCategory::ThreeOfAKind as u32);
        assert_eq!(two_pair.category(), HandCategory::TwoPair as u32);
        assert_eq!(pair.category(), HandCategory::OnePair as u32);
        assert_eq!(high.category(), HandCategory::HighCard as u32);

        assert!(straight_flush.beats(&quads));
        assert!(quads.beats(&full_house));
        assert!(full_house.beats(&flush));
        assert!(flush.beats(&straight));
        assert!(straight.beats(&trips));
        assert!(trips.beats(&two_pair));
        assert!(two_pair.beats(&pair));
        assert!(pair.beats(&high));
    }

    #[test]
    fn test_wheel_is_five_high() {
        // A-2-3-4-5 with K Q on the side
        let wheel = evaluate_hand(&[12, 13, 27, 41, 3, 24, 23]);
        assert_eq!(wheel.category(), HandCategory::Straight as u32);

        let six_high = evaluate_hand(&[card(0, 0), card(1, 1), card(2, 2), card(3, 3), card(0, 4)]);
        assert!(six_high.beats(&wheel));
    }

    #[test]
    fn test_kickers_break_ties() {
        let board = [card(0, 12), card(1, 12), card(2, 7), card(3, 4), card(0, 2)];
        let mut with_king = [0u32; 7];
        let mut with_queen = [0u32; 7];
        with_king[..5].copy_from_slice(&board);
        with_queen[..5].copy_from_slice(&board);
        with_king[5] = card(1, 11);
        with_king[6] = card(2, 0);
        with_queen[5] = card(1, 10);
        with_queen[6] = card(2, 1);

        assert!(evaluate_hand(&with_king).beats(&evaluate_hand(&with_queen)));
    }

    #[test]
    fn test_board_plays_is_a_tie() {
        // Royal straight on board; hole cards can't improve it.
        let board = [card(0, 8), card(1, 9), card(2, 10), card(3, 11), card(0, 12)];
        let a = [board[0], board[1], board[2], board[3], board[4], card(1, 0), card(2, 1)];
        let b = [board[0], board[1], board[2], board[3], board[4], card(3, 2), card(2, 3)];
        assert_eq!(evaluate_hand(&a), evaluate_hand(&b));
    }

    #[test]
    fn test_two_trips_make_a_full_house() {
        let hand = evaluate_hand(&[
            card(0, 9),
            card(1, 9),
            card(2, 9),
            card(0, 4),
            card(1, 4),
            card(2, 4),
            card(3, 0),
        ]);
        assert_eq!(hand.category(), HandCategory::FullHouse as u32);
        let lower = evaluate_hand(&[
            card(0, 8),
            card(1, 8),
            card(2, 8),
            card(0, 12),
            card(1, 12),
            card(3, 1),
            card(3, 0),
        ]);
        assert!(hand.beats(&lower));
    }
}
