//! In-turn actions: draw, lay down, lay off, replace a joker, discard.
//!
//! Every operation checks all of its preconditions before touching state,
//! so a rejected action leaves the game exactly as it was.

use std::collections::HashSet;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::domain::cards_types::{Card, CardId};
use crate::domain::dealing::refill_from_discard;
use crate::domain::discard_requests::open_window;
use crate::domain::game_transition::{GameTransition, Pile};
use crate::domain::melds::{self, Meld, MeldKind};
use crate::domain::rounds::end_round;
use crate::domain::rules::{requirement_for_round, RoundRequirement};
use crate::domain::seed_derivation::derive_refill_seed;
use crate::domain::state::{GameState, Phase, PlayerId, Seat, WindowKind};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

/// One group in a lay-down batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MeldSpec {
    #[serde(rename = "type")]
    pub kind: MeldKind,
    pub card_ids: Vec<CardId>,
}

/// Whether a draw from the stock can succeed (possibly after a refill).
pub(crate) fn stock_available(state: &GameState) -> bool {
    !state.draw_pile.is_empty() || state.discard_pile.len() > 1
}

/// Draw from the stock, rebuilding it from the buried discards when empty.
pub(crate) fn draw_from_stock(state: &mut GameState) -> Option<Card> {
    if !stock_available(state) {
        return None;
    }
    if state.draw_pile.is_empty() {
        state.refills += 1;
        let seed = derive_refill_seed(state.seed, state.deals, state.refills);
        let moved = refill_from_discard(&mut state.draw_pile, &mut state.discard_pile, seed);
        tracing::debug!(moved, refills = state.refills, "draw pile rebuilt from discards");
    }
    state.draw_pile.draw()
}

/// End the round if `seat` just emptied their hand.
fn finish_if_out(state: &mut GameState, seat: Seat, events: &mut Vec<GameTransition>) {
    if state.players[seat].hand.is_empty() {
        events.extend(end_round(state, Some(seat), true));
    }
}

fn card_not_in_hand(card_id: CardId) -> DomainError {
    DomainError::validation(
        ValidationKind::CardNotInHand,
        format!("Card {} is not in your hand", card_id.0),
    )
}

fn require_action_step(state: &GameState, seat: Seat) -> Result<(), DomainError> {
    state.require_turn(seat)?;
    state.require_drawn()
}

fn require_laid_down(state: &GameState, seat: Seat, target: Seat) -> Result<(), DomainError> {
    if !state.players[seat].has_laid_down {
        return Err(DomainError::validation(
            ValidationKind::MustLayDownFirst,
            "You must lay down your melds first",
        ));
    }
    if !state.players[target].has_laid_down {
        return Err(DomainError::validation(
            ValidationKind::TargetNotLaidDown,
            "That player has not laid down yet",
        ));
    }
    Ok(())
}

fn target_meld(state: &GameState, target: Seat, meld_index: usize) -> Result<&Meld, DomainError> {
    state.players[target].melds.get(meld_index).ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Meld, format!("meld {meld_index}"))
    })
}

pub fn draw_card(
    state: &mut GameState,
    seat: Seat,
    pile: Pile,
) -> Result<Vec<GameTransition>, DomainError> {
    state.require_turn(seat)?;
    if state.round.has_drawn {
        return Err(DomainError::validation(
            ValidationKind::AlreadyDrawn,
            "You already drew this turn",
        ));
    }
    if state.round.phase != Phase::Draw {
        return Err(DomainError::validation(
            ValidationKind::WrongPhase,
            "You cannot draw now",
        ));
    }

    let window = state.round.window;
    let card = match pile {
        Pile::Deck => draw_from_stock(state),
        Pile::Discard => {
            if matches!(window, Some(w) if w.kind == WindowKind::PostDiscard) {
                return Err(DomainError::validation(
                    ValidationKind::DiscardPileFrozen,
                    "The discard is open for requests; draw from the deck",
                ));
            }
            state.discard_pile.take_top()
        }
    }
    .ok_or_else(|| DomainError::validation(ValidationKind::EmptyPile, "That pile is empty"))?;

    state.players[seat].hand.push(card);
    state.round.has_drawn = true;
    state.round.phase = Phase::Action;

    let mut events = vec![GameTransition::CardDrawn {
        player_id: state.players[seat].id,
        pile,
    }];
    if matches!(window, Some(w) if w.kind == WindowKind::FirstDraw) {
        state.round.window = None;
        events.push(GameTransition::RequestWindowClosed);
    }
    Ok(events)
}

/// Required sizes of one meld kind are all covered by distinct melds.
fn covers(required: &[u8], melds: &[&Meld]) -> bool {
    let mut need: Vec<usize> = required.iter().map(|&n| usize::from(n)).collect();
    let mut have: Vec<usize> = melds.iter().map(|m| m.len()).collect();
    need.sort_unstable_by(|a, b| b.cmp(a));
    have.sort_unstable_by(|a, b| b.cmp(a));
    have.len() >= need.len() && need.iter().zip(&have).all(|(n, h)| h >= n)
}

fn objective_met(req: &RoundRequirement, melds: &[Meld]) -> bool {
    let sets: Vec<&Meld> = melds.iter().filter(|m| m.kind() == MeldKind::Set).collect();
    let runs: Vec<&Meld> = melds.iter().filter(|m| m.kind() == MeldKind::Run).collect();
    covers(req.sets, &sets) && covers(req.runs, &runs)
}

pub fn lay_down_melds(
    state: &mut GameState,
    seat: Seat,
    specs: Vec<MeldSpec>,
) -> Result<Vec<GameTransition>, DomainError> {
    require_action_step(state, seat)?;
    let player = &state.players[seat];
    if player.has_laid_down {
        return Err(DomainError::validation(
            ValidationKind::AlreadyLaidDown,
            "You already laid down this round",
        ));
    }
    let req = requirement_for_round(state.round.round_no).ok_or_else(|| {
        DomainError::validation(ValidationKind::InvalidRound, "No objective for this round")
    })?;

    let mut used: HashSet<CardId> = HashSet::new();
    let mut laid = Vec::with_capacity(specs.len());
    for (index, spec) in specs.into_iter().enumerate() {
        let mut cards = Vec::with_capacity(spec.card_ids.len());
        for id in spec.card_ids {
            if !used.insert(id) {
                return Err(DomainError::validation(
                    ValidationKind::CardNotInHand,
                    format!("Card {} is used twice", id.0),
                ));
            }
            let card = player
                .hand
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| card_not_in_hand(id))?;
            cards.push(*card);
        }
        let meld = melds::validate(spec.kind, cards).map_err(|e| {
            DomainError::validation(
                ValidationKind::InvalidMeld(e),
                format!("Meld {}: {e}", index + 1),
            )
        })?;
        laid.push(meld);
    }

    if !objective_met(req, &laid) {
        return Err(DomainError::validation(
            ValidationKind::ObjectiveNotMet,
            "Your melds do not meet this round's objective",
        ));
    }
    if req.whole_hand && player.hand.len() - used.len() > 1 {
        return Err(DomainError::validation(
            ValidationKind::ObjectiveNotMet,
            "This round you must lay down your whole hand at once",
        ));
    }

    let player = &mut state.players[seat];
    player.hand.retain(|c| !used.contains(&c.id));
    player.melds = laid;
    player.has_laid_down = true;
    player.laid_down_this_turn = true;

    let mut events = vec![GameTransition::MeldsLaidDown {
        player_id: player.id,
    }];
    finish_if_out(state, seat, &mut events);
    Ok(events)
}

pub fn lay_off_card(
    state: &mut GameState,
    seat: Seat,
    card_id: CardId,
    target_player_id: PlayerId,
    meld_index: usize,
    position: Option<usize>,
) -> Result<Vec<GameTransition>, DomainError> {
    require_action_step(state, seat)?;
    let target = state.seat_of(target_player_id)?;
    require_laid_down(state, seat, target)?;
    let hand_pos = state.players[seat]
        .hand_position(card_id)
        .ok_or_else(|| card_not_in_hand(card_id))?;
    let card = state.players[seat].hand[hand_pos];
    let meld = target_meld(state, target, meld_index)?;
    let extended = melds::place_in_meld(meld, card, position.unwrap_or(meld.len()))?;

    state.players[seat].hand.remove(hand_pos);
    state.players[target].melds[meld_index] = extended;

    let mut events = vec![GameTransition::CardLaidOff {
        player_id: state.players[seat].id,
        target_player_id,
    }];
    finish_if_out(state, seat, &mut events);
    Ok(events)
}

#[allow(clippy::too_many_arguments)]
pub fn replace_joker(
    state: &mut GameState,
    seat: Seat,
    card_id: CardId,
    target_player_id: PlayerId,
    meld_index: usize,
    joker_index: usize,
    new_joker_position: usize,
) -> Result<Vec<GameTransition>, DomainError> {
    require_action_step(state, seat)?;
    let target = state.seat_of(target_player_id)?;
    require_laid_down(state, seat, target)?;
    let hand_pos = state.players[seat]
        .hand_position(card_id)
        .ok_or_else(|| card_not_in_hand(card_id))?;
    let card = state.players[seat].hand[hand_pos];
    let meld = target_meld(state, target, meld_index)?;
    let swapped = melds::replace_joker(meld, joker_index, card, new_joker_position)?;

    state.players[seat].hand.remove(hand_pos);
    state.players[target].melds[meld_index] = swapped;

    let mut events = vec![GameTransition::JokerReplaced {
        player_id: state.players[seat].id,
        target_player_id,
    }];
    finish_if_out(state, seat, &mut events);
    Ok(events)
}

pub fn discard_card(
    state: &mut GameState,
    seat: Seat,
    card_id: CardId,
    now: OffsetDateTime,
) -> Result<Vec<GameTransition>, DomainError> {
    require_action_step(state, seat)?;
    let hand_pos = state.players[seat]
        .hand_position(card_id)
        .ok_or_else(|| card_not_in_hand(card_id))?;

    let card = state.players[seat].hand.remove(hand_pos);
    state.discard_pile.push(card);
    let mut events = vec![GameTransition::CardDiscarded {
        player_id: state.players[seat].id,
    }];

    if state.players[seat].hand.is_empty() {
        finish_if_out(state, seat, &mut events);
        return Ok(events);
    }

    state.players[seat].laid_down_this_turn = false;
    state.round.turn = state.next_active_seat(seat);
    state.round.has_drawn = false;
    state.round.phase = Phase::Draw;
    open_window(state, WindowKind::PostDiscard, Some(seat), now);
    Ok(events)
}

/// Replace the hand's order with `card_order`, which must be a permutation.
pub fn reorder_hand(
    state: &mut GameState,
    seat: Seat,
    card_order: Vec<CardId>,
) -> Result<Vec<GameTransition>, DomainError> {
    let hand = &state.players[seat].hand;
    let invalid = || {
        DomainError::validation(
            ValidationKind::InvalidHandOrder,
            "The new order must contain exactly the cards in your hand",
        )
    };
    if card_order.len() != hand.len() {
        return Err(invalid());
    }
    let mut seen = HashSet::with_capacity(card_order.len());
    let mut reordered = Vec::with_capacity(hand.len());
    for id in card_order {
        if !seen.insert(id) {
            return Err(invalid());
        }
        let card = hand.iter().find(|c| c.id == id).ok_or_else(invalid)?;
        reordered.push(*card);
    }
    state.players[seat].hand = reordered;
    Ok(Vec::new())
}

/// Record a warning for an invalid meld submission. Reaching the limit
/// costs one penalty card and resets the count.
pub fn issue_warning(state: &mut GameState, seat: Seat) -> Vec<GameTransition> {
    let limit = state.rules.warning_limit.max(1);
    state.players[seat].warnings += 1;
    let mut penalty_drawn = false;
    if state.players[seat].warnings >= limit {
        state.players[seat].warnings = 0;
        if let Some(card) = draw_from_stock(state) {
            state.players[seat].hand.push(card);
            penalty_drawn = true;
        }
    }
    vec![GameTransition::WarningIssued {
        player_id: state.players[seat].id,
        warnings: state.players[seat].warnings,
        penalty_drawn,
    }]
}
