use serde::Serialize;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::domain::cards_types::{Card, CardId};
use crate::domain::dealing::{DiscardPile, DrawPile};
use crate::domain::melds::Meld;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

pub type PlayerId = Uuid;
/// Index into `GameState::players`; seats never change once the game starts.
pub type Seat = usize;

/// Turn phase as seen by clients.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Current player must draw.
    Draw,
    /// Current player has drawn and may meld, lay off and discard.
    Action,
    /// Round scored; waiting for the host to deal the next one.
    RoundEnded,
    /// All rounds complete (or ended by the host).
    GameOver,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum WindowKind {
    /// Opened at round start over the flipped card.
    FirstDraw,
    /// Opened after every discard that does not end the round.
    PostDiscard,
}

/// Timed period in which players other than the current one may claim the
/// top discard.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RequestWindow {
    pub id: u64,
    pub kind: WindowKind,
    /// Discard top the window was opened over.
    pub card: CardId,
    pub discarder: Option<Seat>,
    pub ends_at: OffsetDateTime,
}

/// Table rules that vary by deployment.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RulesConfig {
    pub discard_window: Duration,
    pub first_draw_window: Duration,
    pub warning_limit: u8,
    pub one_turn_bonus: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            discard_window: Duration::seconds(5),
            first_draw_window: Duration::seconds(5),
            warning_limit: 2,
            one_turn_bonus: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub score: i32,
    pub hand: Vec<Card>,
    pub melds: Vec<Meld>,
    pub has_laid_down: bool,
    /// Laid down during the turn in progress (one-turn bonus).
    pub laid_down_this_turn: bool,
    pub warnings: u8,
    pub connected: bool,
    /// Left the game voluntarily; the seat is skipped from then on.
    pub left: bool,
}

impl PlayerState {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
            hand: Vec::new(),
            melds: Vec::new(),
            has_laid_down: false,
            laid_down_this_turn: false,
            warnings: 0,
            connected: true,
            left: false,
        }
    }

    /// Eligible to receive the turn.
    pub fn is_active(&self) -> bool {
        self.connected && !self.left
    }

    pub fn hand_position(&self, card_id: CardId) -> Option<usize> {
        self.hand.iter().position(|c| c.id == card_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    /// 1..=7
    pub round_no: u8,
    pub turn: Seat,
    pub phase: Phase,
    pub has_drawn: bool,
    pub window: Option<RequestWindow>,
    pub winner: Option<Seat>,
}

/// Entire game container, sufficient for pure domain operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub players: Vec<PlayerState>,
    pub host: PlayerId,
    pub draw_pile: DrawPile,
    pub discard_pile: DiscardPile,
    pub round: RoundState,
    pub rules: RulesConfig,
    /// Base seed every shuffle is derived from.
    pub seed: u64,
    /// Deals so far, including host re-deals.
    pub deals: u32,
    /// Draw-pile rebuilds in the current deal.
    pub refills: u32,
    /// Total cards in play; constant for the whole game.
    pub pool_size: usize,
    pub(crate) next_window_id: u64,
}

/// Returns the seat `delta` steps after `seat` around a table of `n`.
#[inline]
pub fn seat_offset(seat: Seat, delta: usize, n: usize) -> Seat {
    (seat + delta) % n
}

/// Round `r` opens at seat `(r - 1) mod n`.
#[inline]
pub fn round_start_seat(round_no: u8, n: usize) -> Seat {
    debug_assert!(round_no >= 1, "round_no is 1-based and must be >= 1");
    usize::from(round_no.saturating_sub(1)) % n
}

impl GameState {
    pub fn seat_of(&self, id: PlayerId) -> Result<Seat, DomainError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("player {id}")))
    }

    pub fn current_player(&self) -> &PlayerState {
        &self.players[self.round.turn]
    }

    pub fn current_player_id(&self) -> PlayerId {
        self.current_player().id
    }

    pub fn round_in_progress(&self) -> bool {
        matches!(self.round.phase, Phase::Draw | Phase::Action)
    }

    pub fn game_over(&self) -> bool {
        self.round.phase == Phase::GameOver
    }

    /// First active seat after `from`, wrapping. When nobody else is
    /// connected, the first seat after `from` that is still in the game.
    pub fn next_active_seat(&self, from: Seat) -> Seat {
        let n = self.players.len();
        let after = || (1..=n).map(move |k| seat_offset(from, k, n));
        after()
            .find(|&s| self.players[s].is_active())
            .or_else(|| after().find(|&s| !self.players[s].left))
            .unwrap_or_else(|| seat_offset(from, 1, n))
    }

    /// `seat` itself when active, otherwise the next active seat.
    pub fn active_seat_from(&self, seat: Seat) -> Seat {
        if self.players[seat].is_active() {
            seat
        } else {
            self.next_active_seat(seat)
        }
    }

    pub fn require_round_in_progress(&self) -> Result<(), DomainError> {
        if self.round_in_progress() {
            Ok(())
        } else {
            Err(DomainError::validation(
                ValidationKind::WrongPhase,
                "The round is not in progress",
            ))
        }
    }

    pub fn require_turn(&self, seat: Seat) -> Result<(), DomainError> {
        self.require_round_in_progress()?;
        if self.round.turn != seat {
            return Err(DomainError::validation(
                ValidationKind::NotYourTurn,
                "It is not your turn",
            ));
        }
        Ok(())
    }

    pub fn require_drawn(&self) -> Result<(), DomainError> {
        if !self.round.has_drawn {
            return Err(DomainError::validation(
                ValidationKind::MustDrawFirst,
                "You must draw a card first",
            ));
        }
        Ok(())
    }

    pub fn require_host(&self, actor: PlayerId) -> Result<(), DomainError> {
        if actor != self.host {
            return Err(DomainError::validation(
                ValidationKind::NotHost,
                "Only the host can do that",
            ));
        }
        Ok(())
    }

    pub fn set_connected(&mut self, id: PlayerId, connected: bool) -> Result<(), DomainError> {
        let seat = self.seat_of(id)?;
        self.players[seat].connected = connected;
        Ok(())
    }

    pub(crate) fn allocate_window_id(&mut self) -> u64 {
        self.next_window_id += 1;
        self.next_window_id
    }

    /// Every card in every container, for conservation checks.
    pub fn all_card_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .players
            .iter()
            .flat_map(|p| {
                p.hand
                    .iter()
                    .chain(p.melds.iter().flat_map(|m| m.cards().iter()))
            })
            .chain(self.draw_pile.cards())
            .chain(self.discard_pile.cards())
            .map(|c| c.id)
            .collect();
        ids.sort();
        ids
    }

    /// Remove every card from hands, melds and piles.
    pub(crate) fn collect_pool(&mut self) -> Vec<Card> {
        let mut pool = Vec::with_capacity(self.pool_size);
        for player in &mut self.players {
            pool.append(&mut player.hand);
            for meld in player.melds.drain(..) {
                pool.extend(meld.into_cards());
            }
        }
        pool.extend(self.draw_pile.take_all());
        pool.extend(self.discard_pile.take_all());
        pool
    }
}
