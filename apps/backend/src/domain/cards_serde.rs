//! Serialization and deserialization for card types
//!
//! Wire shape of a card: `{"id": 17, "rank": "10", "suit": "♥", "is_joker": false}`.
//! Jokers carry `"JOKER"` as both rank and suit.

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cards_types::{Card, CardId, Face, Rank, Suit};

const JOKER: &str = "JOKER";

impl Suit {
    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "♠",
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Suit> {
        match s {
            "♠" => Some(Suit::Spades),
            "♥" => Some(Suit::Hearts),
            "♦" => Some(Suit::Diamonds),
            "♣" => Some(Suit::Clubs),
            _ => None,
        }
    }
}

impl Rank {
    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    pub fn from_label(s: &str) -> Option<Rank> {
        Rank::ALL.into_iter().find(|r| r.label() == s)
    }
}

impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Suit::from_symbol(&s).ok_or_else(|| D::Error::custom(format!("Invalid suit: {s}")))
    }
}

impl Serialize for Rank {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Rank::from_label(&s).ok_or_else(|| D::Error::custom(format!("Invalid rank: {s}")))
    }
}

impl Serialize for CardId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u16::deserialize(deserializer).map(CardId)
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let (rank, suit) = match self.face {
            Face::Natural { rank, suit } => (rank.label(), suit.symbol()),
            Face::Joker => (JOKER, JOKER),
        };
        let mut st = serializer.serialize_struct("Card", 4)?;
        st.serialize_field("id", &self.id)?;
        st.serialize_field("rank", rank)?;
        st.serialize_field("suit", suit)?;
        st.serialize_field("is_joker", &self.is_joker())?;
        st.end()
    }
}

#[derive(Deserialize)]
struct WireCard {
    id: CardId,
    rank: String,
    suit: String,
    #[serde(default)]
    is_joker: bool,
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = WireCard::deserialize(deserializer)?;
        if wire.is_joker || wire.suit == JOKER || wire.rank == JOKER {
            return Ok(Card {
                id: wire.id,
                face: Face::Joker,
            });
        }
        let rank = Rank::from_label(&wire.rank)
            .ok_or_else(|| D::Error::custom(format!("Invalid rank: {}", wire.rank)))?;
        let suit = Suit::from_symbol(&wire.suit)
            .ok_or_else(|| D::Error::custom(format!("Invalid suit: {}", wire.suit)))?;
        Ok(Card {
            id: wire.id,
            face: Face::Natural { rank, suit },
        })
    }
}
