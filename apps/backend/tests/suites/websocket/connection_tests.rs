// Handshake, lobby presence and lobby commands over the socket.

use continental::services::lobby;
use continental::state::app_state::AppState;
use serde_json::json;
use tokio_tungstenite::connect_async;
use uuid::Uuid;

use crate::support::test_server::{quiet_config, start_test_server, two_player_room, ws_url};
use crate::support::websocket_client::WebSocketClient;

#[actix_web::test]
async fn connect_greets_then_sends_lobby_state() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let host = lobby::create_room(&state.rooms, &state.game, "Ana")?;
    let (server, addr, join) = start_test_server(state.clone()).await?;

    let url = ws_url(addr, &host.room_code, host.player_id);
    let (mut client, greeting) = WebSocketClient::join(&url).await?;
    assert_eq!(greeting["player_id"], host.player_id.to_string());

    let lobby = client.recv_type("lobby_state").await?;
    assert_eq!(lobby["room"]["code"], host.room_code.as_str());
    assert_eq!(lobby["room"]["players"][0]["is_host"], true);
    assert_eq!(lobby["room"]["players"][0]["connected"], true);

    client.close().await?;
    server.stop(false).await;
    let _ = join.await;
    Ok(())
}

#[actix_web::test]
async fn strangers_are_refused_at_handshake() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let host = lobby::create_room(&state.rooms, &state.game, "Ana")?;
    let (server, addr, join) = start_test_server(state.clone()).await?;

    assert!(connect_async(ws_url(addr, &host.room_code, Uuid::new_v4()))
        .await
        .is_err());
    assert!(connect_async(ws_url(addr, &host.room_code, "not-a-uuid"))
        .await
        .is_err());
    assert!(connect_async(ws_url(addr, "ZZZZZZ", host.player_id))
        .await
        .is_err());

    server.stop(false).await;
    let _ = join.await;
    Ok(())
}

#[actix_web::test]
async fn joins_are_announced_to_the_room() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let host = lobby::create_room(&state.rooms, &state.game, "Ana")?;
    let (server, addr, join) = start_test_server(state.clone()).await?;

    let (mut client, _) = WebSocketClient::join(&ws_url(addr, &host.room_code, host.player_id)).await?;
    client.recv_type("lobby_state").await?;

    let guest = lobby::join_room(&state.rooms, &host.room_code, "Bo").await?;
    let joined = client.recv_type("player_joined").await?;
    assert_eq!(joined["player"]["id"], guest.player_id.to_string());
    assert_eq!(joined["player"]["name"], "Bo");

    let lobby = client.recv_type("lobby_state").await?;
    assert_eq!(lobby["room"]["players"].as_array().map(Vec::len), Some(2));

    client.close().await?;
    server.stop(false).await;
    let _ = join.await;
    Ok(())
}

#[actix_web::test]
async fn host_can_kick_from_the_lobby() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let (host, guest) = two_player_room(&state).await?;
    let (server, addr, join) = start_test_server(state.clone()).await?;

    let (mut ana, _) = WebSocketClient::join(&ws_url(addr, &host.room_code, host.player_id)).await?;
    let (mut bo, _) = WebSocketClient::join(&ws_url(addr, &host.room_code, guest.player_id)).await?;
    bo.recv_type("lobby_state").await?;

    // Only the host may kick.
    bo.send_json(&json!({ "action": "kick_player", "target_player_id": host.player_id }))
        .await?;
    let err = bo.recv_type("error").await?;
    assert_eq!(err["code"], "not_host");

    ana.send_json(&json!({ "action": "kick_player", "target_player_id": host.player_id }))
        .await?;
    let err = ana.recv_type("error").await?;
    assert_eq!(err["code"], "cannot_kick_self");

    ana.send_json(&json!({ "action": "kick_player", "target_player_id": guest.player_id }))
        .await?;
    let kicked = ana.recv_type("player_kicked").await?;
    assert_eq!(kicked["player_id"], guest.player_id.to_string());
    bo.expect_closed().await?;

    let room = lobby::get_room(&state.rooms, &host.room_code).await?;
    assert_eq!(room.players.len(), 1);

    ana.close().await?;
    server.stop(false).await;
    let _ = join.await;
    Ok(())
}

#[actix_web::test]
async fn last_member_leaving_closes_the_room() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let host = lobby::create_room(&state.rooms, &state.game, "Ana")?;
    let (server, addr, join) = start_test_server(state.clone()).await?;

    let (mut client, _) = WebSocketClient::join(&ws_url(addr, &host.room_code, host.player_id)).await?;
    client.send_json(&json!({ "action": "leave_game" })).await?;
    client.expect_closed().await?;

    let start = tokio::time::Instant::now();
    while state.rooms.get(&host.room_code).is_some() {
        assert!(
            start.elapsed() < std::time::Duration::from_secs(2),
            "room was not removed"
        );
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    server.stop(false).await;
    let _ = join.await;
    Ok(())
}
