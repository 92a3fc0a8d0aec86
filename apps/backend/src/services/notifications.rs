//! Human-readable room messages derived from engine transitions.

use crate::domain::game_transition::{GameTransition, Pile};
use crate::domain::scoring::standings;
use crate::domain::state::{GameState, PlayerId};
use crate::ws::protocol::ServerMsg;

fn name_of(state: &GameState, id: PlayerId) -> &str {
    state
        .players
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.as_str())
        .unwrap_or("A player")
}

/// Frame to broadcast for `event`, if it is worth announcing. Turn changes
/// and plain discards are visible in the next snapshot and stay silent.
pub fn describe(state: &GameState, event: &GameTransition) -> Option<ServerMsg> {
    let msg = match event {
        GameTransition::TurnBecame { .. }
        | GameTransition::CardDiscarded { .. }
        | GameTransition::RequestWindowClosed => return None,
        GameTransition::CardDrawn { pile, .. } if *pile == Pile::Deck => return None,

        GameTransition::RoundStarted { round_no } => {
            ServerMsg::notification(format!("Round {round_no} started!"))
        }
        GameTransition::RoundEnded { round_no, winner } => {
            let winner = winner.map(|id| name_of(state, id).to_string());
            let message = match &winner {
                Some(name) => format!("Round {round_no} over. {name} went out!"),
                None => format!("Round {round_no} ended"),
            };
            ServerMsg::RoundEnded { winner, message }
        }
        GameTransition::GameEnded => match standings(&state.players).first() {
            Some(leader) => ServerMsg::notification(format!(
                "Game over! Winner: {} with {} points",
                leader.name, leader.score
            )),
            None => ServerMsg::notification("Game over!"),
        },
        GameTransition::CardDrawn { player_id, .. } => ServerMsg::notification(format!(
            "{} took the discard",
            name_of(state, *player_id)
        )),
        GameTransition::MeldsLaidDown { player_id } => {
            ServerMsg::notification(format!("{} laid down", name_of(state, *player_id)))
        }
        GameTransition::CardLaidOff {
            player_id,
            target_player_id,
        } => ServerMsg::notification(format!(
            "{} laid off a card on {}'s meld",
            name_of(state, *player_id),
            name_of(state, *target_player_id)
        )),
        GameTransition::JokerReplaced {
            player_id,
            target_player_id,
        } => ServerMsg::notification(format!(
            "{} swapped a joker out of {}'s meld",
            name_of(state, *player_id),
            name_of(state, *target_player_id)
        )),
        GameTransition::DiscardClaimed {
            player_id,
            penalty_drawn,
        } => {
            let name = name_of(state, *player_id);
            if *penalty_drawn {
                ServerMsg::notification(format!(
                    "{name} claimed the discard and drew a penalty card"
                ))
            } else {
                ServerMsg::notification(format!("{name} claimed the discard"))
            }
        }
        GameTransition::WarningIssued {
            player_id,
            warnings,
            penalty_drawn,
        } => {
            let name = name_of(state, *player_id);
            if *penalty_drawn {
                ServerMsg::notification(format!(
                    "{name} reached the warning limit and drew a penalty card"
                ))
            } else if *warnings == 0 {
                ServerMsg::notification(format!("{name} reached the warning limit"))
            } else {
                ServerMsg::notification(format!("{name} received warning {warnings}"))
            }
        }
        GameTransition::ScoreChanged { player_id, score } => ServerMsg::notification(format!(
            "The host set {}'s score to {score}",
            name_of(state, *player_id)
        )),
        GameTransition::OneTurnBonus { player_id, points } => ServerMsg::notification(format!(
            "{} went down in one turn! {points} points",
            name_of(state, *player_id)
        )),
    };
    Some(msg)
}
