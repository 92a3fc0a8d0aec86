//! Single entry point for game actions.
//!
//! `apply` first closes a request window whose deadline has passed at `now`,
//! so that claims are judged against the current window. It then either
//! rejects the action with a `DomainError`, leaving the rest of the state
//! untouched, or applies it and returns the transitions it produced:
//! explicit ones from the operation followed by edge-triggered ones derived
//! from the before/after lifecycle views.

use time::OffsetDateTime;

use crate::domain::cards_types::CardId;
use crate::domain::discard_requests::{expire_window, request_discard_card};
use crate::domain::game_transition::{derive_game_transitions, GameTransition, Pile};
use crate::domain::host;
use crate::domain::rounds::{continue_to_next_round, player_left};
use crate::domain::state::{GameState, PlayerId};
use crate::domain::turns::{self, MeldSpec};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    DrawCard {
        from_pile: Pile,
    },
    DiscardCard {
        card_id: CardId,
    },
    LayDownMelds {
        melds: Vec<MeldSpec>,
    },
    LayOffCard {
        card_id: CardId,
        target_player_id: PlayerId,
        meld_index: usize,
        position: Option<usize>,
    },
    ReplaceJoker {
        card_id: CardId,
        target_player_id: PlayerId,
        meld_index: usize,
        joker_index: usize,
        new_joker_position: usize,
    },
    RequestDiscardCard,
    ReorderHand {
        card_order: Vec<CardId>,
    },
    ContinueToNextRound,
    LeaveGame,
    HostEndRound {
        count_points: bool,
    },
    HostEndGame {
        count_points: bool,
    },
    HostJumpToRound {
        target_round: u8,
        count_points: bool,
    },
    HostChangePlayerScore {
        target_player_id: PlayerId,
        new_score: i32,
    },
}

impl Action {
    /// Rejections of these actions for a bad meld earn a warning.
    pub fn is_meld_submission(&self) -> bool {
        matches!(self, Action::LayDownMelds { .. } | Action::LayOffCard { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::DrawCard { .. } => "draw_card",
            Action::DiscardCard { .. } => "discard_card",
            Action::LayDownMelds { .. } => "lay_down_melds",
            Action::LayOffCard { .. } => "lay_off_card",
            Action::ReplaceJoker { .. } => "replace_joker",
            Action::RequestDiscardCard => "request_discard_card",
            Action::ReorderHand { .. } => "reorder_hand",
            Action::ContinueToNextRound => "continue_to_next_round",
            Action::LeaveGame => "leave_game",
            Action::HostEndRound { .. } => "host_end_round",
            Action::HostEndGame { .. } => "host_end_game",
            Action::HostJumpToRound { .. } => "host_jump_to_round",
            Action::HostChangePlayerScore { .. } => "host_change_player_score",
        }
    }
}

/// Apply `action` on behalf of `actor` at time `now`.
pub fn apply(
    state: &mut GameState,
    actor: PlayerId,
    action: Action,
    now: OffsetDateTime,
) -> Result<Vec<GameTransition>, DomainError> {
    let seat = state.seat_of(actor)?;
    if state.players[seat].left {
        return Err(DomainError::validation(
            ValidationKind::WrongPhase,
            "You left this game",
        ));
    }
    let before = state.lifecycle_view();
    let mut events: Vec<GameTransition> = expire_window(state, now).into_iter().collect();

    let explicit = match action {
        Action::DrawCard { from_pile } => turns::draw_card(state, seat, from_pile),
        Action::DiscardCard { card_id } => turns::discard_card(state, seat, card_id, now),
        Action::LayDownMelds { melds } => turns::lay_down_melds(state, seat, melds),
        Action::LayOffCard {
            card_id,
            target_player_id,
            meld_index,
            position,
        } => turns::lay_off_card(state, seat, card_id, target_player_id, meld_index, position),
        Action::ReplaceJoker {
            card_id,
            target_player_id,
            meld_index,
            joker_index,
            new_joker_position,
        } => turns::replace_joker(
            state,
            seat,
            card_id,
            target_player_id,
            meld_index,
            joker_index,
            new_joker_position,
        ),
        Action::RequestDiscardCard => request_discard_card(state, seat),
        Action::ReorderHand { card_order } => turns::reorder_hand(state, seat, card_order),
        Action::ContinueToNextRound => continue_to_next_round(state, actor, now),
        Action::LeaveGame => {
            player_left(state, seat);
            Ok(Vec::new())
        }
        Action::HostEndRound { count_points } => host::host_end_round(state, actor, count_points),
        Action::HostEndGame { count_points } => host::host_end_game(state, actor, count_points),
        Action::HostJumpToRound {
            target_round,
            count_points,
        } => host::host_jump_to_round(state, actor, target_round, count_points, now),
        Action::HostChangePlayerScore {
            target_player_id,
            new_score,
        } => host::host_change_player_score(state, actor, target_player_id, new_score),
    }?;
    events.extend(explicit);

    let after = state.lifecycle_view();
    events.extend(derive_game_transitions(&before, &after));
    Ok(events)
}

/// Warning bookkeeping after a rejected meld submission. Returns the
/// transitions to broadcast, or nothing when the rejection does not count.
pub fn warn_for(
    state: &mut GameState,
    actor: PlayerId,
    action: &Action,
    err: &DomainError,
) -> Vec<GameTransition> {
    let counts = matches!(
        err.kind(),
        Some(ValidationKind::InvalidMeld(_) | ValidationKind::ObjectiveNotMet)
    );
    if !action.is_meld_submission() || !counts {
        return Vec::new();
    }
    match state.seat_of(actor) {
        Ok(seat) => turns::issue_warning(state, seat),
        Err(_) => Vec::new(),
    }
}
