use std::sync::Arc;

use crate::config::GameConfig;
use crate::ws::hub::RoomRegistry;

/// Application state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    /// Live rooms by code
    pub rooms: Arc<RoomRegistry>,
    /// Table rules applied to new games
    pub game: GameConfig,
}

impl AppState {
    pub fn new(game: GameConfig) -> Self {
        Self {
            rooms: Arc::new(RoomRegistry::new()),
            game,
        }
    }
}
