//! Player view of game state - what information is visible to one player.
//!
//! The canonical `GameState` holds every hand. A snapshot is projected per
//! recipient at broadcast time: the viewer sees their own hand in full and
//! only card counts for everyone else. The draw pile is reduced to a count
//! and the discard pile to its top card.

use serde::Serialize;

use crate::domain::cards_types::Card;
use crate::domain::melds::Meld;
use crate::domain::rules::{requirement_for_round, RoundRequirement};
use crate::domain::scoring::{standings, Standing};
use crate::domain::state::{GameState, Phase, PlayerId, WindowKind};
use crate::errors::domain::DomainError;

/// Public information about one seat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicPlayer {
    pub id: PlayerId,
    pub name: String,
    pub score: i32,
    pub hand_count: usize,
    pub melds: Vec<Meld>,
    pub has_laid_down: bool,
    pub warnings: u8,
    pub connected: bool,
    pub left: bool,
    pub is_host: bool,
}

/// Personalized `game_state` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub round: u8,
    pub round_requirements: Option<RoundRequirement>,
    pub current_player_id: PlayerId,
    pub turn_phase: Phase,
    pub has_drawn: bool,
    pub deck_count: usize,
    pub discard_pile_top: Option<Card>,
    pub waiting_for_requests: bool,
    /// Unix seconds.
    pub wait_end_time: Option<f64>,
    pub first_draw_of_round: bool,
    pub my_player_id: PlayerId,
    pub my_hand: Vec<Card>,
    pub has_laid_down: bool,
    pub host_id: PlayerId,
    pub players: Vec<PublicPlayer>,
    pub round_ended: bool,
    pub round_winner_name: Option<String>,
    pub game_over: bool,
    pub standings: Option<Vec<Standing>>,
}

/// Project `state` for `viewer`.
pub fn project(state: &GameState, viewer: PlayerId) -> Result<PlayerSnapshot, DomainError> {
    let seat = state.seat_of(viewer)?;
    let me = &state.players[seat];
    let window = state.round.window;
    let phase = state.round.phase;
    let finished = matches!(phase, Phase::RoundEnded | Phase::GameOver);

    Ok(PlayerSnapshot {
        round: state.round.round_no,
        round_requirements: requirement_for_round(state.round.round_no).copied(),
        current_player_id: state.current_player_id(),
        turn_phase: phase,
        has_drawn: state.round.has_drawn,
        deck_count: state.draw_pile.len(),
        discard_pile_top: state.discard_pile.top().copied(),
        waiting_for_requests: matches!(window, Some(w) if w.kind == WindowKind::PostDiscard),
        wait_end_time: window.map(|w| w.ends_at.unix_timestamp_nanos() as f64 / 1e9),
        first_draw_of_round: matches!(window, Some(w) if w.kind == WindowKind::FirstDraw),
        my_player_id: me.id,
        my_hand: me.hand.clone(),
        has_laid_down: me.has_laid_down,
        host_id: state.host,
        players: state
            .players
            .iter()
            .map(|p| PublicPlayer {
                id: p.id,
                name: p.name.clone(),
                score: p.score,
                hand_count: p.hand.len(),
                melds: p.melds.clone(),
                has_laid_down: p.has_laid_down,
                warnings: p.warnings,
                connected: p.connected,
                left: p.left,
                is_host: p.id == state.host,
            })
            .collect(),
        round_ended: finished,
        round_winner_name: state
            .round
            .winner
            .filter(|_| finished)
            .map(|s| state.players[s].name.clone()),
        game_over: phase == Phase::GameOver,
        standings: finished.then(|| standings(&state.players)),
    })
}
