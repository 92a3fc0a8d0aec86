//! Domain layer: pure game logic types and helpers.

pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod discard_requests;
pub mod engine;
pub mod game_transition;
pub mod host;
pub mod melds;
pub mod player_view;
pub mod rounds;
pub mod rules;
pub mod scoring;
pub mod seed_derivation;
pub mod state;
pub mod turns;

#[cfg(test)]
mod tests_snapshot;
#[cfg(test)]
mod tests_turns;

// Re-exports for ergonomics
pub use cards_types::{Card, CardId, Face, Rank, Suit};
pub use engine::{apply, warn_for, Action};
pub use game_transition::{GameTransition, Pile};
pub use melds::{Meld, MeldError, MeldKind};
pub use player_view::{project, PlayerSnapshot};
pub use rules::{cards_for_round, requirement_for_round, RoundRequirement};
pub use state::{GameState, Phase, PlayerId, RulesConfig, Seat};
pub use turns::MeldSpec;
