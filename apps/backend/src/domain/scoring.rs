use serde::Serialize;

use crate::domain::cards_types::Card;
use crate::domain::game_transition::GameTransition;
use crate::domain::rules::card_points;
use crate::domain::state::{GameState, PlayerId, PlayerState, Seat};

/// Points a losing hand adds to its owner's score.
pub fn deadwood(hand: &[Card]) -> i32 {
    hand.iter().map(card_points).sum()
}

/// Reward for laying down and going out in the same turn.
pub fn one_turn_bonus(round_no: u8) -> i32 {
    -10 * i32::from(round_no)
}

/// Add every hand's deadwood to its owner's score. The winner (if any)
/// scores zero, or the one-turn bonus when they went down and out at once.
pub fn score_round(state: &mut GameState, winner: Option<Seat>) -> Vec<GameTransition> {
    let mut events = Vec::new();
    let round_no = state.round.round_no;
    let bonus_enabled = state.rules.one_turn_bonus;
    for (seat, player) in state.players.iter_mut().enumerate() {
        if Some(seat) == winner {
            if bonus_enabled && player.laid_down_this_turn {
                let points = one_turn_bonus(round_no);
                player.score += points;
                events.push(GameTransition::OneTurnBonus {
                    player_id: player.id,
                    points,
                });
            }
        } else {
            player.score += deadwood(&player.hand);
        }
    }
    events
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub position: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub score: i32,
}

/// Ascending score, ties broken by name.
pub fn standings(players: &[PlayerState]) -> Vec<Standing> {
    let mut ordered: Vec<&PlayerState> = players.iter().collect();
    ordered.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| a.name.cmp(&b.name)));
    ordered
        .into_iter()
        .enumerate()
        .map(|(i, p)| Standing {
            position: i + 1,
            player_id: p.id,
            name: p.name.clone(),
            score: p.score,
        })
        .collect()
}
