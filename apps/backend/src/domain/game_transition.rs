// apps/backend/src/domain/game_transition.rs

use serde::{Deserialize, Serialize};

use crate::domain::state::{GameState, Phase, PlayerId};

/// Pile a player draws from.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pile {
    Deck,
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLifecycleView {
    pub round_no: u8,
    pub deals: u32,
    pub phase: Phase,
    /// Only set while a round is in progress.
    pub turn: Option<PlayerId>,
    pub winner: Option<PlayerId>,
}

impl GameState {
    pub fn lifecycle_view(&self) -> GameLifecycleView {
        GameLifecycleView {
            round_no: self.round.round_no,
            deals: self.deals,
            phase: self.round.phase,
            turn: self
                .round_in_progress()
                .then(|| self.current_player_id()),
            winner: self.round.winner.map(|s| self.players[s].id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameTransition {
    /// Edge-triggered: the turn became a specific player.
    TurnBecame { player_id: PlayerId },

    /// Edge-triggered: a fresh deal went out.
    RoundStarted { round_no: u8 },

    /// Edge-triggered: the round in progress stopped.
    RoundEnded {
        round_no: u8,
        winner: Option<PlayerId>,
    },

    /// Edge-triggered: the game reached GameOver.
    GameEnded,

    /// Explicit: a card was drawn in turn
    CardDrawn { player_id: PlayerId, pile: Pile },

    /// Explicit: the current player discarded
    CardDiscarded { player_id: PlayerId },

    /// Explicit: first lay-down of the round
    MeldsLaidDown { player_id: PlayerId },

    /// Explicit: a card was added to someone's meld
    CardLaidOff {
        player_id: PlayerId,
        target_player_id: PlayerId,
    },

    /// Explicit: a joker was swapped out of a meld
    JokerReplaced {
        player_id: PlayerId,
        target_player_id: PlayerId,
    },

    /// Explicit: an out-of-turn claim on the discard top was granted
    DiscardClaimed {
        player_id: PlayerId,
        penalty_drawn: bool,
    },

    /// Explicit: the request window closed with no claim
    RequestWindowClosed,

    /// Explicit: an invalid meld submission earned a warning
    WarningIssued {
        player_id: PlayerId,
        warnings: u8,
        penalty_drawn: bool,
    },

    /// Explicit: the host overwrote a score
    ScoreChanged { player_id: PlayerId, score: i32 },

    /// Explicit: winner went down and out in one turn
    OneTurnBonus { player_id: PlayerId, points: i32 },
}

/// Derive edge-triggered transitions from before/after lifecycle state.
pub fn derive_game_transitions(
    before: &GameLifecycleView,
    after: &GameLifecycleView,
) -> Vec<GameTransition> {
    let mut transitions = Vec::new();
    let was_live = matches!(before.phase, Phase::Draw | Phase::Action);
    let is_over = matches!(after.phase, Phase::RoundEnded | Phase::GameOver);

    // 1. Round ended (the winner, if any, is stamped on the after view)
    if was_live && (is_over || after.deals != before.deals) {
        transitions.push(GameTransition::RoundEnded {
            round_no: before.round_no,
            winner: if is_over { after.winner } else { None },
        });
    }

    // 2. Game over
    if before.phase != Phase::GameOver && after.phase == Phase::GameOver {
        transitions.push(GameTransition::GameEnded);
    }

    // 3. Fresh deal
    if after.deals != before.deals {
        transitions.push(GameTransition::RoundStarted {
            round_no: after.round_no,
        });
    }

    // 4. Turn change
    if let Some(player_id) = after.turn {
        if before.turn != Some(player_id) || after.deals != before.deals {
            transitions.push(GameTransition::TurnBecame { player_id });
        }
    }

    transitions
}
