//! One actor per room. Its mailbox is the only path that changes a room's
//! roster or game, so inbound actions, timer expiry and connection changes
//! are applied strictly in arrival order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use actix::prelude::*;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::domain::discard_requests::{close_window, expire_window};
use crate::domain::engine::{apply, warn_for, Action};
use crate::domain::game_transition::GameTransition;
use crate::domain::player_view::project;
use crate::domain::rounds;
use crate::domain::state::{GameState, PlayerId};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::services::lobby::validate_player_name;
use crate::services::notifications::describe;
use crate::ws::hub::RoomRegistry;
use crate::ws::protocol::{ClientMsg, LobbyMember, RoomCommand, RoomView, ServerMsg};
use crate::ws::session::SessionEvent;

/// A room with nobody connected is closed after this long.
const ROOM_IDLE_TIMEOUT: StdDuration = StdDuration::from_secs(30 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: PlayerId,
    pub name: String,
}

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

struct SessionLink {
    conn_id: Uuid,
    addr: Recipient<SessionEvent>,
}

/// Lobby join. Answers with the new seat.
#[derive(Message)]
#[rtype(result = "Result<LobbyMember, DomainError>")]
pub struct Join {
    pub name: String,
}

#[derive(Message)]
#[rtype(result = "Result<RoomView, DomainError>")]
pub struct Info;

/// A socket opened for `player_id`. Replaces any earlier socket of that seat.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub player_id: PlayerId,
    pub conn_id: Uuid,
    pub addr: Recipient<SessionEvent>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub player_id: PlayerId,
    pub conn_id: Uuid,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Inbound {
    pub player_id: PlayerId,
    pub conn_id: Uuid,
    pub msg: ClientMsg,
}

/// Timer for request window `window_id` ran out.
#[derive(Message)]
#[rtype(result = "()")]
struct WindowElapsed {
    window_id: u64,
}

pub struct RoomActor {
    code: String,
    members: Vec<Member>,
    host: PlayerId,
    game: Option<GameState>,
    sessions: HashMap<PlayerId, SessionLink>,
    config: GameConfig,
    registry: Arc<RoomRegistry>,
    window_timer: Option<(u64, SpawnHandle)>,
    idle_timer: Option<SpawnHandle>,
}

impl RoomActor {
    pub fn new(code: String, host: Member, config: GameConfig, registry: Arc<RoomRegistry>) -> Self {
        Self {
            code,
            host: host.id,
            members: vec![host],
            game: None,
            sessions: HashMap::new(),
            config,
            registry,
            window_timer: None,
            idle_timer: None,
        }
    }

    /// Host passes on inside the game when the host leaves.
    fn current_host(&self) -> PlayerId {
        self.game.as_ref().map_or(self.host, |g| g.host)
    }

    fn lobby_member(&self, member: &Member) -> LobbyMember {
        LobbyMember {
            id: member.id,
            name: member.name.clone(),
            is_host: member.id == self.current_host(),
            connected: self.sessions.contains_key(&member.id),
        }
    }

    fn view(&self) -> RoomView {
        RoomView {
            code: self.code.clone(),
            players: self.members.iter().map(|m| self.lobby_member(m)).collect(),
            host_id: self.current_host(),
            game_started: self.game.is_some(),
        }
    }

    fn is_member(&self, id: PlayerId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    fn is_current_session(&self, player_id: PlayerId, conn_id: Uuid) -> bool {
        self.sessions.get(&player_id).map(|s| s.conn_id) == Some(conn_id)
    }

    fn send_to(&self, player_id: PlayerId, msg: ServerMsg) {
        if let Some(link) = self.sessions.get(&player_id) {
            link.addr.do_send(SessionEvent::Send(msg));
        }
    }

    fn broadcast(&self, msg: &ServerMsg) {
        for link in self.sessions.values() {
            link.addr.do_send(SessionEvent::Send(msg.clone()));
        }
    }

    fn reject(&self, player_id: PlayerId, err: &DomainError) {
        debug!(
            room_code = %self.code,
            player_id = %player_id,
            code = err.code(),
            "[ROOM] rejected"
        );
        self.send_to(player_id, ServerMsg::error(err.code(), err.detail()));
    }

    /// The view `player_id` should hold right now: a personalized snapshot
    /// once the game runs, the lobby before that.
    fn view_for(&self, player_id: PlayerId) -> Option<ServerMsg> {
        match &self.game {
            Some(game) => match project(game, player_id) {
                Ok(snapshot) => Some(ServerMsg::GameState(snapshot)),
                Err(err) => {
                    warn!(
                        room_code = %self.code,
                        player_id = %player_id,
                        error = %err,
                        "[ROOM] projection failed"
                    );
                    None
                }
            },
            None => Some(ServerMsg::LobbyState { room: self.view() }),
        }
    }

    fn send_view(&self, player_id: PlayerId) {
        if let Some(msg) = self.view_for(player_id) {
            self.send_to(player_id, msg);
        }
    }

    fn broadcast_views(&self) {
        for player_id in self.sessions.keys() {
            self.send_view(*player_id);
        }
    }

    /// Announce `events`, re-arm the window timer and push fresh views.
    fn publish(&mut self, events: &[GameTransition], ctx: &mut Context<Self>) {
        self.sync_window_timer(ctx);
        if let Some(game) = &self.game {
            for msg in events.iter().filter_map(|e| describe(game, e)) {
                self.broadcast(&msg);
            }
        }
        self.broadcast_views();
    }

    /// Keep exactly one timer armed, for the window that is open now.
    fn sync_window_timer(&mut self, ctx: &mut Context<Self>) {
        let open = self.game.as_ref().and_then(|g| g.round.window);
        let armed = self.window_timer.as_ref().map(|(id, _)| *id);
        if open.map(|w| w.id) == armed {
            return;
        }
        if let Some((_, handle)) = self.window_timer.take() {
            ctx.cancel_future(handle);
        }
        if let Some(window) = open {
            let remaining = (window.ends_at - OffsetDateTime::now_utc()).max(Duration::ZERO);
            let window_id = window.id;
            let handle = ctx.run_later(remaining.unsigned_abs(), move |_, ctx| {
                ctx.notify(WindowElapsed { window_id })
            });
            self.window_timer = Some((window_id, handle));
        }
    }

    fn arm_idle_timer(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.idle_timer.take() {
            ctx.cancel_future(handle);
        }
        let handle = ctx.run_later(ROOM_IDLE_TIMEOUT, |act, ctx| {
            act.idle_timer = None;
            if act.sessions.is_empty() {
                info!(room_code = %act.code, "[ROOM] idle, closing");
                ctx.stop();
            }
        });
        self.idle_timer = Some(handle);
    }

    fn apply_action(&mut self, player_id: PlayerId, action: Action, ctx: &mut Context<Self>) {
        let Some(game) = self.game.as_mut() else {
            self.reject(
                player_id,
                &DomainError::validation(
                    ValidationKind::GameNotStarted,
                    "The game has not started",
                ),
            );
            return;
        };

        let now = OffsetDateTime::now_utc();
        let name = action.name();
        let mut events: Vec<GameTransition> = expire_window(game, now).into_iter().collect();
        match apply(game, player_id, action.clone(), now) {
            Ok(applied) => {
                debug!(
                    room_code = %self.code,
                    player_id = %player_id,
                    action = name,
                    events = applied.len(),
                    "[ROOM] applied"
                );
                events.extend(applied);
            }
            Err(err) => {
                events.extend(warn_for(game, player_id, &action, &err));
                self.reject(player_id, &err);
                if events.is_empty() {
                    return;
                }
            }
        }
        self.publish(&events, ctx);
    }

    fn start_game(&mut self, player_id: PlayerId, ctx: &mut Context<Self>) -> Result<(), DomainError> {
        if self.game.is_some() {
            return Err(DomainError::validation(
                ValidationKind::GameAlreadyStarted,
                "The game has already started",
            ));
        }
        if player_id != self.host {
            return Err(DomainError::validation(
                ValidationKind::NotHost,
                "Only the host can start the game",
            ));
        }

        let roster = self
            .members
            .iter()
            .map(|m| (m.id, m.name.clone()))
            .collect();
        let seed = rand::random::<u64>();
        let mut game = rounds::start_game(
            roster,
            self.host,
            self.config.rules(),
            seed,
            OffsetDateTime::now_utc(),
        )?;
        for player in &mut game.players {
            player.connected = self.sessions.contains_key(&player.id);
        }
        info!(
            room_code = %self.code,
            players = game.players.len(),
            seed,
            "[ROOM] game started"
        );
        self.game = Some(game);

        self.broadcast(&ServerMsg::GameStarted {
            message: "The game has started!".to_string(),
        });
        self.publish(&[GameTransition::RoundStarted { round_no: 1 }], ctx);
        Ok(())
    }

    fn kick(&mut self, player_id: PlayerId, target: PlayerId) -> Result<(), DomainError> {
        if player_id != self.host {
            return Err(DomainError::validation(
                ValidationKind::NotHost,
                "Only the host can kick players",
            ));
        }
        if self.game.is_some() {
            return Err(DomainError::validation(
                ValidationKind::GameAlreadyStarted,
                "Players can only be kicked from the lobby",
            ));
        }
        if target == player_id {
            return Err(DomainError::validation(
                ValidationKind::CannotKickSelf,
                "You cannot kick yourself",
            ));
        }
        let pos = self
            .members
            .iter()
            .position(|m| m.id == target)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Player, format!("player {target}"))
            })?;

        self.members.remove(pos);
        info!(room_code = %self.code, player_id = %target, "[ROOM] player kicked");
        self.broadcast(&ServerMsg::PlayerKicked { player_id: target });
        if let Some(link) = self.sessions.remove(&target) {
            link.addr.do_send(SessionEvent::Close);
        }
        self.broadcast_views();
        Ok(())
    }

    fn leave(&mut self, player_id: PlayerId, ctx: &mut Context<Self>) -> Result<(), DomainError> {
        match self.game.as_ref() {
            Some(game) => {
                let seat = game.seat_of(player_id)?;
                if game.players[seat].left {
                    return Err(DomainError::validation(
                        ValidationKind::WrongPhase,
                        "You left this game",
                    ));
                }
                self.broadcast(&ServerMsg::PlayerLeft { player_id });
                if let Some(link) = self.sessions.remove(&player_id) {
                    link.addr.do_send(SessionEvent::Close);
                }
                self.apply_action(player_id, Action::LeaveGame, ctx);
            }
            None => {
                let pos = self
                    .members
                    .iter()
                    .position(|m| m.id == player_id)
                    .ok_or_else(|| {
                        DomainError::not_found(NotFoundKind::Player, format!("player {player_id}"))
                    })?;
                self.members.remove(pos);
                if self.host == player_id {
                    if let Some(next) = self.members.first() {
                        self.host = next.id;
                    }
                }
                self.broadcast(&ServerMsg::PlayerLeft { player_id });
                if let Some(link) = self.sessions.remove(&player_id) {
                    link.addr.do_send(SessionEvent::Close);
                }
                self.broadcast_views();
            }
        }
        info!(room_code = %self.code, player_id = %player_id, "[ROOM] player left");

        let everyone_left = match &self.game {
            Some(game) => game.players.iter().all(|p| p.left),
            None => self.members.is_empty(),
        };
        if everyone_left {
            ctx.stop();
        }
        Ok(())
    }
}

impl Actor for RoomActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(room_code = %self.code, host = %self.host, "[ROOM] opened");
        self.arm_idle_timer(ctx);
    }

    fn stopped(&mut self, ctx: &mut Self::Context) {
        for link in self.sessions.values() {
            link.addr.do_send(SessionEvent::Close);
        }
        self.sessions.clear();
        self.registry.remove(&self.code, &ctx.address());
        info!(room_code = %self.code, "[ROOM] closed");
    }
}

impl Handler<Join> for RoomActor {
    type Result = Result<LobbyMember, DomainError>;

    fn handle(&mut self, msg: Join, _ctx: &mut Self::Context) -> Self::Result {
        let name = validate_player_name(&msg.name)?;
        if self.game.is_some() {
            return Err(DomainError::validation(
                ValidationKind::GameAlreadyStarted,
                "Game already started",
            ));
        }
        if self.members.len() >= self.config.max_players {
            return Err(DomainError::validation(
                ValidationKind::RoomFull,
                "Room is full",
            ));
        }

        let member = Member::new(name);
        self.members.push(member.clone());
        let player = self.lobby_member(&member);
        info!(
            room_code = %self.code,
            player_id = %member.id,
            players = self.members.len(),
            "[ROOM] player joined"
        );
        self.broadcast(&ServerMsg::PlayerJoined {
            player: player.clone(),
        });
        self.broadcast_views();
        Ok(player)
    }
}

impl Handler<Info> for RoomActor {
    type Result = Result<RoomView, DomainError>;

    fn handle(&mut self, _msg: Info, _ctx: &mut Self::Context) -> Self::Result {
        Ok(self.view())
    }
}

impl Handler<Connect> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Connect, ctx: &mut Self::Context) -> Self::Result {
        let Connect {
            player_id,
            conn_id,
            addr,
        } = msg;

        if !self.is_member(player_id) {
            warn!(
                room_code = %self.code,
                player_id = %player_id,
                conn_id = %conn_id,
                "[ROOM] connect for unknown player"
            );
            addr.do_send(SessionEvent::Send(ServerMsg::error(
                "player_not_found",
                "You are not part of this room",
            )));
            addr.do_send(SessionEvent::Close);
            return;
        }

        let link = SessionLink {
            conn_id,
            addr: addr.clone(),
        };
        if let Some(previous) = self.sessions.insert(player_id, link) {
            debug!(
                room_code = %self.code,
                player_id = %player_id,
                replaced = %previous.conn_id,
                "[ROOM] replacing session"
            );
            previous.addr.do_send(SessionEvent::Close);
        }
        if let Some(handle) = self.idle_timer.take() {
            ctx.cancel_future(handle);
        }
        info!(
            room_code = %self.code,
            player_id = %player_id,
            conn_id = %conn_id,
            "[ROOM] connected"
        );

        addr.do_send(SessionEvent::Send(ServerMsg::Connected { player_id }));
        if let Some(game) = self.game.as_mut() {
            if let Err(err) = game.set_connected(player_id, true) {
                warn!(room_code = %self.code, error = %err, "[ROOM] presence update failed");
            }
        }
        self.broadcast_views();
    }
}

impl Handler<Disconnect> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, ctx: &mut Self::Context) -> Self::Result {
        if !self.is_current_session(msg.player_id, msg.conn_id) {
            return;
        }
        self.sessions.remove(&msg.player_id);
        info!(
            room_code = %self.code,
            player_id = %msg.player_id,
            conn_id = %msg.conn_id,
            "[ROOM] disconnected"
        );

        if let Some(game) = self.game.as_mut() {
            if let Err(err) = game.set_connected(msg.player_id, false) {
                warn!(room_code = %self.code, error = %err, "[ROOM] presence update failed");
            }
        }
        self.broadcast(&ServerMsg::PlayerDisconnected {
            player_id: msg.player_id,
        });
        self.broadcast_views();

        if self.sessions.is_empty() {
            self.arm_idle_timer(ctx);
        }
    }
}

impl Handler<Inbound> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Inbound, ctx: &mut Self::Context) -> Self::Result {
        let Inbound {
            player_id,
            conn_id,
            msg,
        } = msg;
        if !self.is_current_session(player_id, conn_id) {
            debug!(
                room_code = %self.code,
                player_id = %player_id,
                conn_id = %conn_id,
                "[ROOM] dropping frame from stale session"
            );
            return;
        }

        let outcome = match msg.into_command() {
            RoomCommand::Game(action) => {
                self.apply_action(player_id, action, ctx);
                Ok(())
            }
            RoomCommand::GetState => {
                self.send_view(player_id);
                Ok(())
            }
            RoomCommand::Leave => self.leave(player_id, ctx),
            RoomCommand::StartGame => self.start_game(player_id, ctx),
            RoomCommand::KickPlayer(target) => self.kick(player_id, target),
        };
        if let Err(err) = outcome {
            self.reject(player_id, &err);
        }
    }
}

impl Handler<WindowElapsed> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: WindowElapsed, ctx: &mut Self::Context) -> Self::Result {
        if self.window_timer.as_ref().map(|(id, _)| *id) == Some(msg.window_id) {
            self.window_timer = None;
        }
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let Some(event) = close_window(game, msg.window_id) else {
            return;
        };
        debug!(
            room_code = %self.code,
            window_id = msg.window_id,
            "[ROOM] request window closed"
        );
        self.publish(&[event], ctx);
    }
}
