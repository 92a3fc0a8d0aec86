//! Error codes for the Continental HTTP API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in problem+json responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Player name missing or too long
    InvalidPlayerName,
    /// Room code malformed
    InvalidRoomCode,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    RoomNotFound,
    PlayerNotFound,
    NotFound,

    // Lobby Conflicts
    /// Room already holds the maximum number of players
    RoomFull,
    /// Room no longer accepts joins
    GameAlreadyStarted,
    /// Request arrived after another claim won
    RequestTooLate,

    // System Errors
    Internal,
    ConfigError,
    /// Room actor is gone or did not answer
    RoomUnavailable,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPlayerName => "INVALID_PLAYER_NAME",
            Self::InvalidRoomCode => "INVALID_ROOM_CODE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::RoomFull => "ROOM_FULL",
            Self::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            Self::RequestTooLate => "REQUEST_TOO_LATE",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::RoomUnavailable => "ROOM_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
