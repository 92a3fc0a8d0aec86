//! Out-of-turn claims on the top discard.
//!
//! A window opens at round start (over the flipped card) and after every
//! discard that keeps the round going. While it is open, any eligible player
//! may claim the top discard; the first accepted claim wins and closes it.
//! Requests are serialized by the room mailbox, so "first" is arrival order.

use time::{Duration, OffsetDateTime};

use crate::domain::game_transition::GameTransition;
use crate::domain::state::{GameState, RequestWindow, Seat, WindowKind};
use crate::domain::turns::draw_from_stock;
use crate::errors::domain::{DomainError, ValidationKind};

/// Open a window over the current discard top. A non-positive duration
/// disables the window.
pub fn open_window(
    state: &mut GameState,
    kind: WindowKind,
    discarder: Option<Seat>,
    now: OffsetDateTime,
) {
    let duration = match kind {
        WindowKind::FirstDraw => state.rules.first_draw_window,
        WindowKind::PostDiscard => state.rules.discard_window,
    };
    let top = state.discard_pile.top().map(|c| c.id);
    state.round.window = match top {
        Some(card) if duration > Duration::ZERO => Some(RequestWindow {
            id: state.allocate_window_id(),
            kind,
            card,
            discarder,
            ends_at: now + duration,
        }),
        _ => None,
    };
}

/// Close the open window if its deadline has passed.
pub fn expire_window(state: &mut GameState, now: OffsetDateTime) -> Option<GameTransition> {
    match state.round.window {
        Some(w) if now >= w.ends_at => {
            state.round.window = None;
            Some(GameTransition::RequestWindowClosed)
        }
        _ => None,
    }
}

/// Timer path: close window `window_id` if it is still the open one.
pub fn close_window(state: &mut GameState, window_id: u64) -> Option<GameTransition> {
    match state.round.window {
        Some(w) if w.id == window_id => {
            state.round.window = None;
            Some(GameTransition::RequestWindowClosed)
        }
        _ => None,
    }
}

/// Grant `seat` the top discard plus one penalty card from the stock.
pub fn request_discard_card(
    state: &mut GameState,
    seat: Seat,
) -> Result<Vec<GameTransition>, DomainError> {
    state.require_round_in_progress()?;
    let window = state
        .round
        .window
        .ok_or_else(|| DomainError::race_lost("The discard is no longer available"))?;

    if seat == state.round.turn {
        let detail = match window.kind {
            WindowKind::FirstDraw => "It is your turn: draw the card directly",
            WindowKind::PostDiscard => "It is your turn: draw from the deck",
        };
        return Err(DomainError::validation(
            ValidationKind::CurrentPlayerMustDraw,
            detail,
        ));
    }
    if window.discarder == Some(seat) {
        return Err(DomainError::validation(
            ValidationKind::CannotClaimOwnDiscard,
            "You cannot claim your own discard",
        ));
    }
    if state.discard_pile.top().map(|c| c.id) != Some(window.card) {
        return Err(DomainError::race_lost("The discard is no longer available"));
    }

    let Some(claimed) = state.discard_pile.take_top() else {
        return Err(DomainError::race_lost("The discard is no longer available"));
    };
    state.round.window = None;
    state.players[seat].hand.push(claimed);
    let penalty = draw_from_stock(state);
    let penalty_drawn = penalty.is_some();
    if let Some(card) = penalty {
        state.players[seat].hand.push(card);
    }

    Ok(vec![GameTransition::DiscardClaimed {
        player_id: state.players[seat].id,
        penalty_drawn,
    }])
}
