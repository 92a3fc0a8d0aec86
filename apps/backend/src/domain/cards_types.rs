//! Core card-related types: CardId, Suit, Rank, Face, Card

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];
}

/// Natural ranks in low-ace order. `value()` gives 1 (Ace) ..= 13 (King);
/// a high Ace is handled by the meld validator, not here.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    pub fn value(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`Rank::value`]; 14 maps back to Ace.
    pub fn from_value(value: u8) -> Option<Rank> {
        match value {
            1..=13 => Some(Self::ALL[usize::from(value - 1)]),
            14 => Some(Rank::Ace),
            _ => None,
        }
    }
}

/// Stable identity of a physical card for the whole game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CardId(pub u16);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Face {
    Natural { rank: Rank, suit: Suit },
    Joker,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub id: CardId,
    pub face: Face,
}

impl Card {
    pub fn natural(id: u16, rank: Rank, suit: Suit) -> Self {
        Self {
            id: CardId(id),
            face: Face::Natural { rank, suit },
        }
    }

    pub fn joker(id: u16) -> Self {
        Self {
            id: CardId(id),
            face: Face::Joker,
        }
    }

    pub fn is_joker(&self) -> bool {
        matches!(self.face, Face::Joker)
    }

    pub fn rank(&self) -> Option<Rank> {
        match self.face {
            Face::Natural { rank, .. } => Some(rank),
            Face::Joker => None,
        }
    }

    pub fn suit(&self) -> Option<Suit> {
        match self.face {
            Face::Natural { suit, .. } => Some(suit),
            Face::Joker => None,
        }
    }
}

// Ordering by id only; used to canonicalize the pool before shuffling.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
