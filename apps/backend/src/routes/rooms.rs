//! Lobby HTTP routes.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::validated_json::ValidatedJson;
use crate::services::lobby;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
struct CreateRoomRequest {
    player_name: String,
}

#[derive(Debug, Deserialize)]
struct JoinRoomRequest {
    room_code: String,
    player_name: String,
}

/// POST /api/room/create
///
/// Opens a room with the caller as host and returns the room code and the
/// caller's player id, which is the key for the room socket.
async fn create_room(
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    let joined = lobby::create_room(&app_state.rooms, &app_state.game, &body.player_name)?;
    Ok(HttpResponse::Ok().json(joined))
}

/// POST /api/room/join
async fn join_room(
    app_state: web::Data<AppState>,
    body: ValidatedJson<JoinRoomRequest>,
) -> Result<HttpResponse, AppError> {
    let joined = lobby::join_room(&app_state.rooms, &body.room_code, &body.player_name).await?;
    Ok(HttpResponse::Ok().json(joined))
}

/// GET /api/room/{code}
async fn get_room(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let room = lobby::get_room(&app_state.rooms, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(room))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/create").route(web::post().to(create_room)));
    cfg.service(web::resource("/join").route(web::post().to(join_room)));
    cfg.service(web::resource("/{code}").route(web::get().to(get_room)));
}
