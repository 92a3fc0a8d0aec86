//! Wire messages exchanged over a room socket.
//!
//! Clients send objects tagged by `action`; the server answers with objects
//! tagged by `type`. Unknown actions and malformed payloads fail to parse and
//! are answered with an `error` frame by the session.

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::CardId;
use crate::domain::engine::Action;
use crate::domain::game_transition::Pile;
use crate::domain::player_view::PlayerSnapshot;
use crate::domain::state::PlayerId;
use crate::domain::turns::MeldSpec;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMsg {
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
        #[serde(default)]
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
    GetState,
    LeaveGame,
    StartGame,
    KickPlayer {
        target_player_id: PlayerId,
    },
    HostEndRound {
        #[serde(default)]
        count_points: bool,
    },
    HostEndGame {
        #[serde(default)]
        count_points: bool,
    },
    HostJumpToRound {
        target_round: u8,
        #[serde(default)]
        count_points: bool,
    },
    HostChangePlayerScore {
        target_player_id: PlayerId,
        new_score: i32,
    },
}

/// What the room does with an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomCommand {
    /// Goes through the game engine.
    Game(Action),
    GetState,
    Leave,
    StartGame,
    KickPlayer(PlayerId),
}

impl ClientMsg {
    pub fn into_command(self) -> RoomCommand {
        use RoomCommand::Game;
        match self {
            ClientMsg::DrawCard { from_pile } => Game(Action::DrawCard { from_pile }),
            ClientMsg::DiscardCard { card_id } => Game(Action::DiscardCard { card_id }),
            ClientMsg::LayDownMelds { melds } => Game(Action::LayDownMelds { melds }),
            ClientMsg::LayOffCard {
                card_id,
                target_player_id,
                meld_index,
                position,
            } => Game(Action::LayOffCard {
                card_id,
                target_player_id,
                meld_index,
                position,
            }),
            ClientMsg::ReplaceJoker {
                card_id,
                target_player_id,
                meld_index,
                joker_index,
                new_joker_position,
            } => Game(Action::ReplaceJoker {
                card_id,
                target_player_id,
                meld_index,
                joker_index,
                new_joker_position,
            }),
            ClientMsg::RequestDiscardCard => Game(Action::RequestDiscardCard),
            ClientMsg::ReorderHand { card_order } => Game(Action::ReorderHand { card_order }),
            ClientMsg::ContinueToNextRound => Game(Action::ContinueToNextRound),
            ClientMsg::HostEndRound { count_points } => Game(Action::HostEndRound { count_points }),
            ClientMsg::HostEndGame { count_points } => Game(Action::HostEndGame { count_points }),
            ClientMsg::HostJumpToRound {
                target_round,
                count_points,
            } => Game(Action::HostJumpToRound {
                target_round,
                count_points,
            }),
            ClientMsg::HostChangePlayerScore {
                target_player_id,
                new_score,
            } => Game(Action::HostChangePlayerScore {
                target_player_id,
                new_score,
            }),
            ClientMsg::GetState => RoomCommand::GetState,
            ClientMsg::LeaveGame => RoomCommand::Leave,
            ClientMsg::StartGame => RoomCommand::StartGame,
            ClientMsg::KickPlayer { target_player_id } => {
                RoomCommand::KickPlayer(target_player_id)
            }
        }
    }
}

/// One seat in the lobby roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LobbyMember {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    pub connected: bool,
}

/// Public description of a room, shared by `GET /api/room/{code}` and
/// `lobby_state` frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomView {
    pub code: String,
    pub players: Vec<LobbyMember>,
    pub host_id: PlayerId,
    pub game_started: bool,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    Connected {
        player_id: PlayerId,
    },
    GameState(PlayerSnapshot),
    LobbyState {
        room: RoomView,
    },
    Error {
        code: &'static str,
        message: String,
    },
    Notification {
        message: String,
    },
    GameStarted {
        message: String,
    },
    RoundEnded {
        winner: Option<String>,
        message: String,
    },
    PlayerJoined {
        player: LobbyMember,
    },
    PlayerLeft {
        player_id: PlayerId,
    },
    PlayerDisconnected {
        player_id: PlayerId,
    },
    PlayerKicked {
        player_id: PlayerId,
    },
}

impl ServerMsg {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        ServerMsg::Error {
            code,
            message: message.into(),
        }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        ServerMsg::Notification {
            message: message.into(),
        }
    }
}

/// Code sent when an inbound frame cannot be parsed.
pub const BAD_REQUEST: &str = "bad_request";
