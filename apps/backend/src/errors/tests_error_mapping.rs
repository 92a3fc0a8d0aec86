// Unit tests for error mapping - pure domain logic without HTTP handlers
use crate::domain::melds::MeldError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::AppError;

#[test]
fn maps_validation_to_422() {
    let de = DomainError::validation(ValidationKind::NotYourTurn, "wait");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 422);
}

#[test]
fn maps_lobby_rejections_to_400() {
    let full = DomainError::validation(ValidationKind::RoomFull, "room is full");
    let app: AppError = full.into();
    assert_eq!(app.code(), ErrorCode::RoomFull);
    assert_eq!(app.status().as_u16(), 400);

    let started = DomainError::validation(ValidationKind::GameAlreadyStarted, "too late");
    let app: AppError = started.into();
    assert_eq!(app.code().as_str(), "GAME_ALREADY_STARTED");
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_not_found() {
    let nf = DomainError::not_found(NotFoundKind::Room, "no room");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "ROOM_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);

    let nf = DomainError::not_found(NotFoundKind::Meld, "no meld");
    let app: AppError = nf.into();
    assert_eq!(app.code(), ErrorCode::NotFound);
}

#[test]
fn race_lost_is_conflict() {
    let app: AppError = DomainError::race_lost("claimed").into();
    assert_eq!(app.code(), ErrorCode::RequestTooLate);
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn wire_codes_are_snake_case() {
    assert_eq!(
        DomainError::validation(ValidationKind::DiscardPileFrozen, "x").code(),
        "discard_pile_frozen"
    );
    assert_eq!(DomainError::race_lost("x").code(), "request_too_late");
    assert_eq!(
        DomainError::not_found(NotFoundKind::Player, "x").code(),
        "player_not_found"
    );
}

#[test]
fn meld_errors_convert_to_invalid_meld() {
    let de: DomainError = MeldError::DuplicateSuit.into();
    assert!(matches!(
        de,
        DomainError::Validation(ValidationKind::InvalidMeld(MeldError::DuplicateSuit), _)
    ));
    assert_eq!(de.code(), "invalid_meld");
}
