//! Meld validation: sets, runs, lay-off placement and joker replacement.
//!
//! A lay-down submits cards in any order; runs are then arranged into
//! ascending order with each joker standing in the slot it fills. Every later
//! mutation (lay-off, joker replacement) is checked against that stored order.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Rank, Suit};
use super::rules::{RUN_MIN, SET_MIN};

const ACE_HIGH: u8 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeldKind {
    Set,
    Run,
}

impl MeldKind {
    pub fn min_len(self) -> usize {
        match self {
            MeldKind::Set => SET_MIN,
            MeldKind::Run => RUN_MIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeldError {
    SizeTooSmall { kind: MeldKind, min: usize },
    WrongRank,
    WrongSuit,
    DuplicateSuit,
    NonConsecutive,
    InvalidJokerSlot,
    InvalidPosition,
}

impl fmt::Display for MeldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeldError::SizeTooSmall { kind, min } => {
                write!(f, "a {kind:?} needs at least {min} cards")
            }
            MeldError::WrongRank => write!(f, "all cards in a set must share one rank"),
            MeldError::WrongSuit => write!(f, "all cards in a run must share one suit"),
            MeldError::DuplicateSuit => write!(f, "a set cannot repeat a suit"),
            MeldError::NonConsecutive => write!(f, "run ranks must be consecutive"),
            MeldError::InvalidJokerSlot => write!(
                f,
                "jokers must be fewer than natural cards and never adjacent in a run"
            ),
            MeldError::InvalidPosition => write!(f, "a run can only be extended at either end"),
        }
    }
}

/// A validated meld on the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meld {
    #[serde(rename = "type")]
    kind: MeldKind,
    cards: Vec<Card>,
}

impl Meld {
    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

/// Validate a freshly submitted group. Runs come back arranged.
pub fn validate(kind: MeldKind, cards: Vec<Card>) -> Result<Meld, MeldError> {
    match kind {
        MeldKind::Set => {
            check_set(&cards)?;
            Ok(Meld { kind, cards })
        }
        MeldKind::Run => {
            let cards = arrange_run(&cards)?;
            Ok(Meld { kind, cards })
        }
    }
}

/// Validate `cards` exactly as ordered.
pub fn validate_in_place(kind: MeldKind, cards: &[Card]) -> Result<(), MeldError> {
    match kind {
        MeldKind::Set => check_set(cards),
        MeldKind::Run => {
            check_run_basics(cards)?;
            check_run_order(cards)
        }
    }
}

/// Lay off `card` at `position`. Runs only grow at either end.
pub fn place_in_meld(meld: &Meld, card: Card, position: usize) -> Result<Meld, MeldError> {
    let cards = insert_at(meld, card, position)?;
    validate_in_place(meld.kind, &cards)?;
    Ok(Meld {
        kind: meld.kind,
        cards,
    })
}

/// Swap the joker at `joker_slot` for the natural `card`, then put the freed
/// joker back at `new_joker_slot`. Either step failing rejects the whole swap.
pub fn replace_joker(
    meld: &Meld,
    joker_slot: usize,
    card: Card,
    new_joker_slot: usize,
) -> Result<Meld, MeldError> {
    let joker = match meld.cards.get(joker_slot) {
        Some(c) if c.is_joker() => *c,
        _ => return Err(MeldError::InvalidJokerSlot),
    };
    if card.is_joker() {
        return Err(MeldError::InvalidJokerSlot);
    }

    let mut swapped = meld.clone();
    swapped.cards[joker_slot] = card;
    validate_in_place(swapped.kind, &swapped.cards)?;

    place_in_meld(&swapped, joker, new_joker_slot)
}

fn insert_at(meld: &Meld, card: Card, position: usize) -> Result<Vec<Card>, MeldError> {
    let len = meld.cards.len();
    let allowed = match meld.kind {
        MeldKind::Run => position == 0 || position == len,
        MeldKind::Set => position <= len,
    };
    if !allowed {
        return Err(MeldError::InvalidPosition);
    }
    let mut cards = meld.cards.clone();
    cards.insert(position, card);
    Ok(cards)
}

fn check_joker_ratio(cards: &[Card]) -> Result<(), MeldError> {
    let jokers = cards.iter().filter(|c| c.is_joker()).count();
    let naturals = cards.len() - jokers;
    if naturals == 0 || jokers >= naturals {
        return Err(MeldError::InvalidJokerSlot);
    }
    Ok(())
}

fn check_set(cards: &[Card]) -> Result<(), MeldError> {
    if cards.len() < SET_MIN {
        return Err(MeldError::SizeTooSmall {
            kind: MeldKind::Set,
            min: SET_MIN,
        });
    }
    let mut rank: Option<Rank> = None;
    let mut seen: Vec<Suit> = Vec::with_capacity(4);
    for card in cards {
        let (Some(r), Some(s)) = (card.rank(), card.suit()) else {
            continue;
        };
        match rank {
            Some(expected) if expected != r => return Err(MeldError::WrongRank),
            _ => rank = Some(r),
        }
        if seen.contains(&s) {
            return Err(MeldError::DuplicateSuit);
        }
        seen.push(s);
    }
    check_joker_ratio(cards)
}

fn check_run_basics(cards: &[Card]) -> Result<(), MeldError> {
    if cards.len() < RUN_MIN {
        return Err(MeldError::SizeTooSmall {
            kind: MeldKind::Run,
            min: RUN_MIN,
        });
    }
    let mut suits = cards.iter().filter_map(Card::suit);
    if let Some(first) = suits.next() {
        if suits.any(|s| s != first) {
            return Err(MeldError::WrongSuit);
        }
    }
    check_joker_ratio(cards)
}

fn run_value(card: &Card, ace_high: bool) -> Option<u8> {
    card.rank().map(|r| match r {
        Rank::Ace if ace_high => ACE_HIGH,
        other => other.value(),
    })
}

fn check_run_order(cards: &[Card]) -> Result<(), MeldError> {
    if cards.windows(2).any(|w| w[0].is_joker() && w[1].is_joker()) {
        return Err(MeldError::InvalidJokerSlot);
    }
    if fits_positions(cards, false) || fits_positions(cards, true) {
        Ok(())
    } else {
        Err(MeldError::NonConsecutive)
    }
}

/// Every natural sits exactly where the run's implied start puts it and the
/// run stays within Ace-low..=Ace-high.
fn fits_positions(cards: &[Card], ace_high: bool) -> bool {
    let Some((idx, value)) = cards
        .iter()
        .enumerate()
        .find_map(|(i, c)| run_value(c, ace_high).map(|v| (i, v)))
    else {
        return false;
    };
    let start = i32::from(value) - idx as i32;
    let end = start + cards.len() as i32 - 1;
    if start < 1 || end > i32::from(ACE_HIGH) {
        return false;
    }
    cards.iter().enumerate().all(|(i, c)| match run_value(c, ace_high) {
        Some(v) => i32::from(v) == start + i as i32,
        None => true,
    })
}

fn arrange_run(cards: &[Card]) -> Result<Vec<Card>, MeldError> {
    check_run_basics(cards)?;
    let has_ace = cards.iter().any(|c| c.rank() == Some(Rank::Ace));
    let low = arrange_with(cards, false);
    if low.is_ok() || !has_ace {
        return low;
    }
    arrange_with(cards, true).or(low)
}

fn arrange_with(cards: &[Card], ace_high: bool) -> Result<Vec<Card>, MeldError> {
    let mut naturals: Vec<(u8, Card)> = cards
        .iter()
        .filter_map(|c| run_value(c, ace_high).map(|v| (v, *c)))
        .collect();
    naturals.sort_by_key(|(v, _)| *v);
    let mut jokers: Vec<Card> = cards.iter().filter(|c| c.is_joker()).copied().collect();

    if naturals.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(MeldError::NonConsecutive);
    }
    let (Some(&(lo, _)), Some(&(hi, _))) = (naturals.first(), naturals.last()) else {
        return Err(MeldError::InvalidJokerSlot);
    };
    let gaps = usize::from(hi - lo + 1) - naturals.len();
    if gaps > jokers.len() {
        return Err(MeldError::NonConsecutive);
    }

    let mut run: VecDeque<Card> = VecDeque::with_capacity(cards.len());
    let mut next = naturals.iter().peekable();
    for value in lo..=hi {
        match next.peek() {
            Some(&&(v, card)) if v == value => {
                run.push_back(card);
                next.next();
            }
            _ => run.push_back(jokers.pop().ok_or(MeldError::NonConsecutive)?),
        }
    }

    // Leftover jokers extend the ends, high first, alternating so two never touch.
    let (mut low, mut high) = (lo, hi);
    let mut prefer_high = true;
    while let Some(joker) = jokers.pop() {
        if (prefer_high || low <= 1) && high < ACE_HIGH {
            run.push_back(joker);
            high += 1;
        } else if low > 1 {
            run.push_front(joker);
            low -= 1;
        } else {
            return Err(MeldError::NonConsecutive);
        }
        prefer_high = !prefer_high;
    }

    let run: Vec<Card> = run.into();
    check_run_order(&run)?;
    Ok(run)
}
