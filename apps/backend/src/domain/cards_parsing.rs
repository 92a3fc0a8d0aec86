//! Card face parsing from short tokens (e.g., "AS", "TC", "10H", "JK")

use std::str::FromStr;

use super::cards_types::{Card, Face, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

fn parse_error(s: &str) -> DomainError {
    DomainError::validation(ValidationKind::ParseCard, format!("Parse card: {s}"))
}

impl FromStr for Face {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "JK" || s == "*" {
            return Ok(Face::Joker);
        }
        if !s.is_ascii() || !(2..=3).contains(&s.len()) {
            return Err(parse_error(s));
        }
        let (rank_part, suit_part) = s.split_at(s.len() - 1);
        let rank = match rank_part {
            "A" => Rank::Ace,
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "T" | "10" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            _ => return Err(parse_error(s)),
        };
        let suit = match suit_part {
            "S" => Suit::Spades,
            "H" => Suit::Hearts,
            "D" => Suit::Diamonds,
            "C" => Suit::Clubs,
            _ => return Err(parse_error(s)),
        };
        Ok(Face::Natural { rank, suit })
    }
}

/// Parse whitespace-separated tokens into cards with ids `first_id..`.
pub fn try_parse_cards(tokens: &str, first_id: u16) -> Result<Vec<Card>, DomainError> {
    tokens
        .split_whitespace()
        .zip(first_id..)
        .map(|(tok, id)| {
            tok.parse::<Face>().map(|face| Card {
                id: super::cards_types::CardId(id),
                face,
            })
        })
        .collect()
}
