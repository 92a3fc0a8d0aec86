//! Game and round lifecycle: start, deal, end, advance, leave.

use time::OffsetDateTime;

use crate::domain::dealing::{build_pool, deal_round, DiscardPile, DrawPile};
use crate::domain::discard_requests::open_window;
use crate::domain::game_transition::GameTransition;
use crate::domain::rules::{cards_for_round, decks_for_players, MAX_PLAYERS, MAX_ROUNDS, MIN_PLAYERS};
use crate::domain::scoring::score_round;
use crate::domain::seed_derivation::derive_dealing_seed;
use crate::domain::state::{
    round_start_seat, GameState, Phase, PlayerId, PlayerState, RoundState, RulesConfig, Seat,
    WindowKind,
};
use crate::errors::domain::{DomainError, ValidationKind};

/// Build the pool for `roster` and deal round 1.
pub fn start_game(
    roster: Vec<(PlayerId, String)>,
    host: PlayerId,
    rules: RulesConfig,
    seed: u64,
    now: OffsetDateTime,
) -> Result<GameState, DomainError> {
    if roster.len() < MIN_PLAYERS {
        return Err(DomainError::validation(
            ValidationKind::NotEnoughPlayers,
            format!("At least {MIN_PLAYERS} players are needed"),
        ));
    }
    if roster.len() > MAX_PLAYERS {
        return Err(DomainError::validation(
            ValidationKind::RoomFull,
            format!("At most {MAX_PLAYERS} players can play"),
        ));
    }

    let pool = build_pool(decks_for_players(roster.len()));
    let mut state = GameState {
        players: roster
            .into_iter()
            .map(|(id, name)| PlayerState::new(id, name))
            .collect(),
        host,
        pool_size: pool.len(),
        draw_pile: DrawPile::new(pool),
        discard_pile: DiscardPile::default(),
        round: RoundState {
            round_no: 0,
            turn: 0,
            phase: Phase::RoundEnded,
            has_drawn: false,
            window: None,
            winner: None,
        },
        rules,
        seed,
        deals: 0,
        refills: 0,
        next_window_id: 0,
    };
    deal(&mut state, 1, now)?;
    Ok(state)
}

/// Re-collect every card, reshuffle and deal `round_no`. Scores are kept.
pub fn deal(state: &mut GameState, round_no: u8, now: OffsetDateTime) -> Result<(), DomainError> {
    let hand_size = cards_for_round(round_no).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::InvalidRound,
            format!("Round must be between 1 and {MAX_ROUNDS}"),
        )
    })?;
    let n = state.players.len();
    if n * usize::from(hand_size) + 1 > state.pool_size {
        return Err(DomainError::validation(
            ValidationKind::Other("pool_too_small".into()),
            "Not enough cards for this deal",
        ));
    }

    let pool = state.collect_pool();
    let deal_no = state.deals + 1;
    let seed = derive_dealing_seed(state.seed, round_no, deal_no);
    let dealt = deal_round(pool, n, hand_size, seed)?;

    state.deals = deal_no;
    state.refills = 0;
    for (player, hand) in state.players.iter_mut().zip(dealt.hands) {
        player.hand = hand;
        player.has_laid_down = false;
        player.laid_down_this_turn = false;
        player.warnings = 0;
    }
    state.draw_pile = dealt.draw_pile;
    state.discard_pile = dealt.discard_pile;
    state.round = RoundState {
        round_no,
        turn: state.active_seat_from(round_start_seat(round_no, n)),
        phase: Phase::Draw,
        has_drawn: false,
        window: None,
        winner: None,
    };
    open_window(state, WindowKind::FirstDraw, None, now);

    tracing::info!(round_no, deal_no, players = n, "round dealt");
    Ok(())
}

/// Stop the round in progress, optionally scoring hands. After the last
/// round the game is over.
pub fn end_round(
    state: &mut GameState,
    winner: Option<Seat>,
    count_points: bool,
) -> Vec<GameTransition> {
    let events = if count_points {
        score_round(state, winner)
    } else {
        Vec::new()
    };
    state.round.window = None;
    state.round.winner = winner;
    state.round.phase = if state.round.round_no >= MAX_ROUNDS {
        Phase::GameOver
    } else {
        Phase::RoundEnded
    };
    events
}

pub fn continue_to_next_round(
    state: &mut GameState,
    actor: PlayerId,
    now: OffsetDateTime,
) -> Result<Vec<GameTransition>, DomainError> {
    state.require_host(actor)?;
    match state.round.phase {
        Phase::RoundEnded => {}
        Phase::GameOver => {
            return Err(DomainError::validation(
                ValidationKind::GameOver,
                "The game is over",
            ))
        }
        Phase::Draw | Phase::Action => {
            return Err(DomainError::validation(
                ValidationKind::RoundNotOver,
                "The round is still being played",
            ))
        }
    }
    deal(state, state.round.round_no + 1, now)?;
    Ok(Vec::new())
}

/// Mark `seat` as gone for good. Host passes to the next remaining player,
/// the turn moves on if it was theirs, and the game ends when fewer than two
/// players remain.
pub fn player_left(state: &mut GameState, seat: Seat) {
    let n = state.players.len();
    state.players[seat].left = true;
    state.players[seat].connected = false;

    if state.host == state.players[seat].id {
        let next_host = (1..n)
            .map(|k| &state.players[(seat + k) % n])
            .find(|p| !p.left)
            .map(|p| p.id);
        if let Some(id) = next_host {
            state.host = id;
        }
    }

    let remaining = state.players.iter().filter(|p| !p.left).count();
    if remaining < MIN_PLAYERS {
        if state.round_in_progress() {
            state.round.window = None;
        }
        state.round.phase = Phase::GameOver;
        return;
    }

    if state.round_in_progress() && state.round.turn == seat {
        state.round.turn = state.next_active_seat(seat);
        state.round.has_drawn = false;
        state.round.phase = Phase::Draw;
    }
}
