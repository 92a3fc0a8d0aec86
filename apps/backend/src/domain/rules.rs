use serde::Serialize;

use super::cards_types::{Card, Face, Rank};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;
pub const MAX_ROUNDS: u8 = 7;
pub const SET_MIN: usize = 3;
pub const RUN_MIN: usize = 4;
pub const JOKERS_PER_DECK: usize = 2;
pub const CARDS_PER_DECK: usize = 52 + JOKERS_PER_DECK;

/// Lay-down objective for a round. `sets`/`runs` list the minimum size of
/// each required meld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundRequirement {
    pub cards: u8,
    pub sets: &'static [u8],
    pub runs: &'static [u8],
    /// Round 7: the whole hand goes down in one turn.
    pub whole_hand: bool,
}

const REQUIREMENTS: [RoundRequirement; MAX_ROUNDS as usize] = [
    RoundRequirement {
        cards: 7,
        sets: &[3, 3],
        runs: &[],
        whole_hand: false,
    },
    RoundRequirement {
        cards: 8,
        sets: &[3],
        runs: &[4],
        whole_hand: false,
    },
    RoundRequirement {
        cards: 9,
        sets: &[],
        runs: &[4, 4],
        whole_hand: false,
    },
    RoundRequirement {
        cards: 10,
        sets: &[3, 3, 3],
        runs: &[],
        whole_hand: false,
    },
    RoundRequirement {
        cards: 11,
        sets: &[3, 3],
        runs: &[4],
        whole_hand: false,
    },
    RoundRequirement {
        cards: 12,
        sets: &[3],
        runs: &[4, 4],
        whole_hand: false,
    },
    RoundRequirement {
        cards: 13,
        sets: &[],
        runs: &[4, 4, 4],
        whole_hand: true,
    },
];

pub fn requirement_for_round(round_no: u8) -> Option<&'static RoundRequirement> {
    if round_no == 0 || round_no > MAX_ROUNDS {
        return None;
    }
    REQUIREMENTS.get(usize::from(round_no - 1))
}

pub fn cards_for_round(round_no: u8) -> Option<u8> {
    requirement_for_round(round_no).map(|r| r.cards)
}

/// Standard decks shuffled together for a table of `player_count`.
pub fn decks_for_players(player_count: usize) -> usize {
    match player_count {
        0..=4 => 2,
        5..=7 => 3,
        _ => 4,
    }
}

/// Deadwood value of a card left in hand at round end.
pub fn card_points(card: &Card) -> i32 {
    match card.face {
        Face::Joker => 15,
        Face::Natural { rank, .. } => match rank {
            Rank::Ace => 11,
            Rank::Jack | Rank::Queen | Rank::King => 10,
            other => i32::from(other.value()),
        },
    }
}
