//! Host-only administrative overrides.

use time::OffsetDateTime;

use crate::domain::game_transition::GameTransition;
use crate::domain::rounds::{deal, end_round};
use crate::domain::rules::MAX_ROUNDS;
use crate::domain::scoring::score_round;
use crate::domain::state::{GameState, Phase, PlayerId};
use crate::errors::domain::{DomainError, ValidationKind};

/// End the round in progress with no winner.
pub fn host_end_round(
    state: &mut GameState,
    actor: PlayerId,
    count_points: bool,
) -> Result<Vec<GameTransition>, DomainError> {
    state.require_host(actor)?;
    state.require_round_in_progress()?;
    Ok(end_round(state, None, count_points))
}

/// Finish the game now. Hands are scored only if a round is in progress.
pub fn host_end_game(
    state: &mut GameState,
    actor: PlayerId,
    count_points: bool,
) -> Result<Vec<GameTransition>, DomainError> {
    state.require_host(actor)?;
    if state.game_over() {
        return Err(DomainError::validation(
            ValidationKind::GameOver,
            "The game is already over",
        ));
    }
    let events = if count_points && state.round_in_progress() {
        score_round(state, None)
    } else {
        Vec::new()
    };
    state.round.window = None;
    state.round.phase = Phase::GameOver;
    Ok(events)
}

/// Re-deal at `target_round`, optionally scoring the current hands first.
pub fn host_jump_to_round(
    state: &mut GameState,
    actor: PlayerId,
    target_round: u8,
    count_points: bool,
    now: OffsetDateTime,
) -> Result<Vec<GameTransition>, DomainError> {
    state.require_host(actor)?;
    if !(1..=MAX_ROUNDS).contains(&target_round) {
        return Err(DomainError::validation(
            ValidationKind::InvalidRound,
            format!("Round must be between 1 and {MAX_ROUNDS}"),
        ));
    }
    let events = if count_points && state.round_in_progress() {
        score_round(state, None)
    } else {
        Vec::new()
    };
    deal(state, target_round, now)?;
    Ok(events)
}

pub fn host_change_player_score(
    state: &mut GameState,
    actor: PlayerId,
    target_player_id: PlayerId,
    new_score: i32,
) -> Result<Vec<GameTransition>, DomainError> {
    state.require_host(actor)?;
    if new_score < 0 {
        return Err(DomainError::validation(
            ValidationKind::InvalidScore,
            "Score cannot be negative",
        ));
    }
    let seat = state.seat_of(target_player_id)?;
    state.players[seat].score = new_score;
    Ok(vec![GameTransition::ScoreChanged {
        player_id: target_player_id,
        score: new_score,
    }])
}
