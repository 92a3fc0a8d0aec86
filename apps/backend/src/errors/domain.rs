//! Domain-level error type used across the game engine and room actors.
//!
//! This error type is HTTP- and transport-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.
//! WebSocket sessions render it as an `error` frame via [`DomainError::code`].

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::melds::MeldError;

/// Rule violations raised by turn, lobby and host operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    NotYourTurn,
    AlreadyDrawn,
    WrongPhase,
    MustDrawFirst,
    DiscardPileFrozen,
    EmptyPile,
    AlreadyLaidDown,
    MustLayDownFirst,
    TargetNotLaidDown,
    InvalidMeld(MeldError),
    ObjectiveNotMet,
    CardNotInHand,
    InvalidHandOrder,
    CannotClaimOwnDiscard,
    CurrentPlayerMustDraw,
    NotHost,
    InvalidRound,
    InvalidScore,
    RoundNotOver,
    GameOver,
    GameNotStarted,
    GameAlreadyStarted,
    NotEnoughPlayers,
    RoomFull,
    InvalidPlayerName,
    CannotKickSelf,
    ParseCard,
    Other(String),
}

impl ValidationKind {
    /// Stable snake_case code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotYourTurn => "not_your_turn",
            Self::AlreadyDrawn => "already_drawn",
            Self::WrongPhase => "wrong_phase",
            Self::MustDrawFirst => "must_draw_first",
            Self::DiscardPileFrozen => "discard_pile_frozen",
            Self::EmptyPile => "empty_pile",
            Self::AlreadyLaidDown => "already_laid_down",
            Self::MustLayDownFirst => "must_lay_down_first",
            Self::TargetNotLaidDown => "target_not_laid_down",
            Self::InvalidMeld(_) => "invalid_meld",
            Self::ObjectiveNotMet => "objective_not_met",
            Self::CardNotInHand => "card_not_in_hand",
            Self::InvalidHandOrder => "invalid_hand_order",
            Self::CannotClaimOwnDiscard => "cannot_claim_own_discard",
            Self::CurrentPlayerMustDraw => "current_player_must_draw",
            Self::NotHost => "not_host",
            Self::InvalidRound => "invalid_round",
            Self::InvalidScore => "invalid_score",
            Self::RoundNotOver => "round_not_over",
            Self::GameOver => "game_over",
            Self::GameNotStarted => "game_not_started",
            Self::GameAlreadyStarted => "game_already_started",
            Self::NotEnoughPlayers => "not_enough_players",
            Self::RoomFull => "room_full",
            Self::InvalidPlayerName => "invalid_player_name",
            Self::CannotKickSelf => "cannot_kick_self",
            Self::ParseCard => "parse_card",
            Self::Other(_) => "validation_error",
        }
    }
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Player,
    Meld,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or game rule violation
    Validation(ValidationKind, String),
    /// A concurrent claim already won the race (discard requests)
    RaceLost(String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::RaceLost(d) => write!(f, "request too late: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn race_lost(detail: impl Into<String>) -> Self {
        Self::RaceLost(detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    /// Wire code for `error` frames.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(kind, _) => kind.code(),
            DomainError::RaceLost(_) => "request_too_late",
            DomainError::NotFound(NotFoundKind::Room, _) => "room_not_found",
            DomainError::NotFound(NotFoundKind::Player, _) => "player_not_found",
            DomainError::NotFound(NotFoundKind::Meld, _) => "meld_not_found",
            DomainError::NotFound(_, _) => "not_found",
        }
    }

    /// Human-readable message without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d) | DomainError::RaceLost(d) | DomainError::NotFound(_, d) => d,
        }
    }

    pub fn kind(&self) -> Option<&ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(kind),
            _ => None,
        }
    }
}

impl From<MeldError> for DomainError {
    fn from(err: MeldError) -> Self {
        DomainError::validation(ValidationKind::InvalidMeld(err), err.to_string())
    }
}
