//! Room lobby: create, join and inspect rooms held by the registry.

use std::sync::Arc;

use actix::{Actor, Addr};
use serde::Serialize;
use tracing::info;

use crate::config::GameConfig;
use crate::domain::state::PlayerId;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::errors::ErrorCode;
use crate::services::room::{Info, Join, Member, RoomActor};
use crate::utils::join_code::generate_room_code;
use crate::ws::hub::{normalize_code, RoomRegistry};
use crate::ws::protocol::{LobbyMember, RoomView};

pub const MAX_NAME_CHARS: usize = 24;

/// Response body of create and join.
#[derive(Debug, Clone, Serialize)]
pub struct JoinedRoom {
    pub room_code: String,
    pub player_id: PlayerId,
    pub player: LobbyMember,
}

/// Trimmed display name, 1 to `MAX_NAME_CHARS` characters.
pub fn validate_player_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerName,
            "Player name is required",
        ));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerName,
            format!("Player name must be at most {MAX_NAME_CHARS} characters"),
        ));
    }
    Ok(name.to_string())
}

/// Open a new room with `player_name` as host.
pub fn create_room(
    registry: &Arc<RoomRegistry>,
    config: &GameConfig,
    player_name: &str,
) -> Result<JoinedRoom, AppError> {
    let name = validate_player_name(player_name)?;
    let host = Member::new(name);
    let player = LobbyMember {
        id: host.id,
        name: host.name.clone(),
        is_host: true,
        connected: false,
    };

    let (room_code, _addr) = registry.insert_new(generate_room_code, |code| {
        RoomActor::new(code, host, config.clone(), Arc::clone(registry)).start()
    });
    info!(room_code = %room_code, player_id = %player.id, "Room created");

    Ok(JoinedRoom {
        room_code,
        player_id: player.id,
        player,
    })
}

/// Resolve `room_code` to a live room, or 404.
pub fn find_room(
    registry: &RoomRegistry,
    room_code: &str,
) -> Result<(String, Addr<RoomActor>), AppError> {
    let code = normalize_code(room_code);
    registry
        .get(&code)
        .map(|addr| (code.clone(), addr))
        .ok_or_else(|| AppError::not_found(ErrorCode::RoomNotFound, format!("Room {code} not found")))
}

pub async fn join_room(
    registry: &RoomRegistry,
    room_code: &str,
    player_name: &str,
) -> Result<JoinedRoom, AppError> {
    let (room_code, room) = find_room(registry, room_code)?;
    let player = room
        .send(Join {
            name: player_name.to_string(),
        })
        .await??;
    info!(room_code = %room_code, player_id = %player.id, "Player joined room");

    Ok(JoinedRoom {
        room_code,
        player_id: player.id,
        player,
    })
}

pub async fn get_room(registry: &RoomRegistry, room_code: &str) -> Result<RoomView, AppError> {
    let (_, room) = find_room(registry, room_code)?;
    Ok(room.send(Info).await??)
}

/// 404 unless `player_id` holds a seat in `room`.
pub async fn require_member(room: &Addr<RoomActor>, player_id: PlayerId) -> Result<(), AppError> {
    let view = room.send(Info).await??;
    if view.players.iter().any(|p| p.id == player_id) {
        Ok(())
    } else {
        Err(AppError::not_found(
            ErrorCode::PlayerNotFound,
            format!("Player {player_id} is not in room {}", view.code),
        ))
    }
}
