//! Card pool construction, piles and deterministic dealing.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use super::cards_types::{Card, Rank, Suit};
use super::rules::JOKERS_PER_DECK;
use crate::errors::domain::{DomainError, ValidationKind};

/// Build the game's card pool: `decks` standard decks plus two jokers each.
/// Ids are assigned sequentially and never change for the rest of the game.
pub fn build_pool(decks: usize) -> Vec<Card> {
    let mut pool = Vec::with_capacity(decks * (52 + JOKERS_PER_DECK));
    let mut next_id: u16 = 0;
    for _ in 0..decks {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                pool.push(Card::natural(next_id, rank, suit));
                next_id += 1;
            }
        }
        for _ in 0..JOKERS_PER_DECK {
            pool.push(Card::joker(next_id));
            next_id += 1;
        }
    }
    pool
}

/// Fisher-Yates shuffle driven by a seeded ChaCha stream.
pub fn shuffle_with_seed(cards: &mut [Card], seed: u64) {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    cards.shuffle(&mut rng);
}

/// Face-down stock. The top of the pile is the end of the vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawPile {
    cards: Vec<Card>,
}

impl DrawPile {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }
}

/// Face-up pile. Only the top card is ever shown to clients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscardPile {
    cards: Vec<Card>,
}

impl DiscardPile {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn take_top(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    /// Remove every card except the visible top.
    fn take_buried(&mut self) -> Vec<Card> {
        let keep_from = self.cards.len().saturating_sub(1);
        let top = self.cards.split_off(keep_from);
        std::mem::replace(&mut self.cards, top)
    }
}

/// Turn every buried discard into a fresh shuffled draw pile, keeping the
/// visible top. Returns how many cards moved.
pub fn refill_from_discard(draw: &mut DrawPile, discard: &mut DiscardPile, seed: u64) -> usize {
    let mut buried = discard.take_buried();
    shuffle_with_seed(&mut buried, seed);
    let moved = buried.len();
    draw.cards.extend(buried);
    moved
}

/// Result of dealing one round from the full pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: Vec<Vec<Card>>,
    pub draw_pile: DrawPile,
    pub discard_pile: DiscardPile,
}

/// Shuffle `pool`, deal `hand_size` cards to each of `player_count` hands and
/// flip one card onto the discard pile; the rest becomes the draw pile.
///
/// The pool is sorted by id before shuffling so the deal depends only on the
/// seed, not on where the cards were collected from.
pub fn deal_round(
    mut pool: Vec<Card>,
    player_count: usize,
    hand_size: u8,
    seed: u64,
) -> Result<Deal, DomainError> {
    if player_count == 0 {
        return Err(DomainError::validation(
            ValidationKind::NotEnoughPlayers,
            "Cannot deal to an empty table",
        ));
    }
    let needed = player_count * usize::from(hand_size) + 1;
    if needed > pool.len() {
        return Err(DomainError::validation(
            ValidationKind::Other("pool_too_small".into()),
            format!("Deal needs {needed} cards but pool has {}", pool.len()),
        ));
    }

    pool.sort();
    shuffle_with_seed(&mut pool, seed);

    let mut hands = Vec::with_capacity(player_count);
    for _ in 0..player_count {
        let rest = pool.split_off(usize::from(hand_size));
        hands.push(std::mem::replace(&mut pool, rest));
    }
    let mut discard_pile = DiscardPile::default();
    if let Some(flipped) = pool.pop() {
        discard_pile.push(flipped);
    }

    Ok(Deal {
        hands,
        draw_pile: DrawPile::new(pool),
        discard_pile,
    })
}
