use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::state::PlayerId;
use crate::services::lobby;
use crate::services::room::{Connect, Disconnect, Inbound, RoomActor};
use crate::state::app_state::AppState;
use crate::ws::protocol::{ClientMsg, ServerMsg, BAD_REQUEST};
use crate::AppError;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// Room to session traffic.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub enum SessionEvent {
    Send(ServerMsg),
    /// The room dropped this connection (kicked, replaced, left, closed).
    Close,
}

/// `GET /api/ws/{room_code}/{player_id}`. The room and the seat must exist.
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<(String, String)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (room_code, raw_player_id) = path.into_inner();
    let player_id = Uuid::parse_str(&raw_player_id).map_err(|_| {
        AppError::not_found(
            crate::errors::ErrorCode::PlayerNotFound,
            format!("Player {raw_player_id} not found"),
        )
    })?;
    let (room_code, room) = lobby::find_room(&app_state.rooms, &room_code)?;
    lobby::require_member(&room, player_id).await?;

    let conn_id = Uuid::new_v4();
    let session = WsSession::new(conn_id, room_code, player_id, room);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    room_code: String,
    player_id: PlayerId,
    room: Addr<RoomActor>,

    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,
}

impl WsSession {
    fn new(conn_id: Uuid, room_code: String, player_id: PlayerId, room: Addr<RoomActor>) -> Self {
        Self {
            conn_id,
            room_code,
            player_id,
            room,
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    /// Reject one frame; the socket stays open.
    fn send_bad_request(&self, ctx: &mut ws::WebsocketContext<Self>, message: impl Into<String>) {
        let message = message.into();
        debug!(
            conn_id = %self.conn_id,
            room_code = %self.room_code,
            player_id = %self.player_id,
            %message,
            "[WS SESSION] rejected frame"
        );
        Self::send_json(ctx, &ServerMsg::error(BAD_REQUEST, message));
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    room_code = %actor.room_code,
                    player_id = %actor.player_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }
}

fn describe_parse_error(err: &serde_json::Error) -> String {
    match err.classify() {
        serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
            "Malformed JSON".to_string()
        }
        _ => format!("Invalid action: {err}"),
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            room_code = %self.room_code,
            player_id = %self.player_id,
            "[WS SESSION] started"
        );

        self.room.do_send(Connect {
            player_id: self.player_id,
            conn_id: self.conn_id,
            addr: ctx.address().recipient(),
        });

        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.room.do_send(Disconnect {
            player_id: self.player_id,
            conn_id: self.conn_id,
        });
        info!(
            conn_id = %self.conn_id,
            room_code = %self.room_code,
            player_id = %self.player_id,
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(msg) => self.room.do_send(Inbound {
                        player_id: self.player_id,
                        conn_id: self.conn_id,
                        msg,
                    }),
                    Err(err) => self.send_bad_request(ctx, describe_parse_error(&err)),
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_bad_request(ctx, "Binary frames are not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    room_code = %self.room_code,
                    player_id = %self.player_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<SessionEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: SessionEvent, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            SessionEvent::Send(msg) => Self::send_json(ctx, &msg),
            SessionEvent::Close => {
                if let Some(handle) = self.heartbeat_handle.take() {
                    ctx.cancel_future(handle);
                }
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
            }
        }
    }
}
