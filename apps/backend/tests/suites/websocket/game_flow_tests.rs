// Starting a game and playing turns over the socket.

use continental::domain::rules::cards_for_round;
use continental::services::lobby;
use continental::state::app_state::AppState;
use serde_json::{json, Value};

use crate::support::game_setup::started_table;
use crate::support::test_server::{quiet_config, start_test_server, two_player_room, ws_url};
use crate::support::websocket_client::WebSocketClient;

fn hand_len(snapshot: &Value) -> usize {
    snapshot["my_hand"].as_array().map_or(0, Vec::len)
}

#[actix_web::test]
async fn start_deals_private_hands() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let (server, addr, join) = start_test_server(state.clone()).await?;
    let mut table = started_table(&state, addr).await?;

    let dealt = usize::from(cards_for_round(1).expect("round 1"));
    for seat in [&table.host, &table.guest] {
        let s = &seat.snapshot;
        assert_eq!(s["round"], 1);
        assert_eq!(s["my_player_id"], seat.id().as_str());
        assert_eq!(s["host_id"], table.host.id().as_str());
        assert_eq!(s["turn_phase"], "draw");
        assert_eq!(s["has_drawn"], false);
        assert_eq!(hand_len(s), dealt);
        assert!(s["round_requirements"].is_object());
        for p in s["players"].as_array().expect("players") {
            assert!(p.get("hand").is_none(), "opponent hands must stay private");
            assert_eq!(p["hand_count"], dealt);
        }
    }
    assert_eq!(
        table.host.snapshot["current_player_id"],
        table.guest.snapshot["current_player_id"]
    );
    assert_ne!(table.host.snapshot["my_hand"], table.guest.snapshot["my_hand"]);

    table.close().await?;
    server.stop(false).await;
    let _ = join.await;
    Ok(())
}

#[actix_web::test]
async fn out_of_turn_errors_reach_only_the_sender() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let (server, addr, join) = start_test_server(state.clone()).await?;
    let mut table = started_table(&state, addr).await?;
    let (current, waiting) = table.by_turn();

    waiting
        .client
        .send_json(&json!({ "action": "draw_card", "from_pile": "deck" }))
        .await?;
    let err = waiting.client.recv_type("error").await?;
    assert_eq!(err["code"], "not_your_turn");

    // Nothing was broadcast: the current player's next frame answers its own request.
    current.client.send_json(&json!({ "action": "get_state" })).await?;
    let next = current.client.recv_json().await?;
    assert_eq!(next["type"], "game_state");
    assert_eq!(next["has_drawn"], false);

    table.close().await?;
    server.stop(false).await;
    let _ = join.await;
    Ok(())
}

#[actix_web::test]
async fn draw_then_discard_passes_the_turn() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let (server, addr, join) = start_test_server(state.clone()).await?;
    let mut table = started_table(&state, addr).await?;
    let (current, waiting) = table.by_turn();
    let dealt = hand_len(&current.snapshot);
    let waiting_id = waiting.id();

    current
        .client
        .send_json(&json!({ "action": "draw_card", "from_pile": "deck" }))
        .await?;
    let drawn = current.client.recv_type("game_state").await?;
    assert_eq!(drawn["has_drawn"], true);
    assert_eq!(drawn["turn_phase"], "action");
    assert_eq!(hand_len(&drawn), dealt + 1);

    let discard_id = drawn["my_hand"][0]["id"].clone();
    current
        .client
        .send_json(&json!({ "action": "discard_card", "card_id": discard_id }))
        .await?;
    let after = current.client.recv_type("game_state").await?;
    assert_eq!(hand_len(&after), dealt);
    assert_eq!(after["current_player_id"], waiting_id.as_str());

    let seen = waiting
        .client
        .recv_matching(|v| v["type"] == "game_state" && v["current_player_id"] == waiting_id.as_str())
        .await?;
    assert_eq!(seen["discard_pile_top"]["id"], discard_id);
    assert_eq!(seen["turn_phase"], "draw");
    assert_eq!(seen["waiting_for_requests"], true);

    table.close().await?;
    server.stop(false).await;
    let _ = join.await;
    Ok(())
}

#[actix_web::test]
async fn malformed_frames_keep_the_socket_open() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let (host, _) = two_player_room(&state).await?;
    let (server, addr, join) = start_test_server(state.clone()).await?;

    let (mut client, _) = WebSocketClient::join(&ws_url(addr, &host.room_code, host.player_id)).await?;
    client.recv_type("lobby_state").await?;

    client.send("{oops").await?;
    let err = client.recv_type("error").await?;
    assert_eq!(err["code"], "bad_request");
    assert_eq!(err["message"], "Malformed JSON");

    client.send(r#"{"action": "fly"}"#).await?;
    let err = client.recv_type("error").await?;
    assert_eq!(err["code"], "bad_request");

    // Turn actions need a running game.
    client
        .send_json(&json!({ "action": "draw_card", "from_pile": "deck" }))
        .await?;
    let err = client.recv_type("error").await?;
    assert_eq!(err["code"], "game_not_started");

    client.send_json(&json!({ "action": "get_state" })).await?;
    let lobby = client.recv_json().await?;
    assert_eq!(lobby["type"], "lobby_state");

    client.close().await?;
    server.stop(false).await;
    let _ = join.await;
    Ok(())
}

#[actix_web::test]
async fn lobby_closes_once_the_game_starts() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let (server, addr, join) = start_test_server(state.clone()).await?;
    let mut table = started_table(&state, addr).await?;

    let err = lobby::join_room(&state.rooms, &table.host.joined.room_code, "Cy")
        .await
        .expect_err("join after start");
    assert_eq!(err.status().as_u16(), 400);

    table
        .guest
        .client
        .send_json(&json!({ "action": "start_game" }))
        .await?;
    let err = table.guest.client.recv_type("error").await?;
    assert_eq!(err["code"], "game_already_started");

    let room = lobby::get_room(&state.rooms, &table.host.joined.room_code).await?;
    assert!(room.game_started);

    table.close().await?;
    server.stop(false).await;
    let _ = join.await;
    Ok(())
}

#[actix_web::test]
async fn only_the_host_starts() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let (host, guest) = two_player_room(&state).await?;
    let (server, addr, join) = start_test_server(state.clone()).await?;

    let (mut bo, _) = WebSocketClient::join(&ws_url(addr, &host.room_code, guest.player_id)).await?;
    bo.send_json(&json!({ "action": "start_game" })).await?;
    let err = bo.recv_type("error").await?;
    assert_eq!(err["code"], "not_host");

    bo.close().await?;
    server.stop(false).await;
    let _ = join.await;
    Ok(())
}

#[actix_web::test]
async fn leaving_a_two_player_game_ends_it() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(quiet_config());
    let (server, addr, join) = start_test_server(state.clone()).await?;
    let mut table = started_table(&state, addr).await?;
    let guest_id = table.guest.id();

    table
        .guest
        .client
        .send_json(&json!({ "action": "leave_game" }))
        .await?;
    table.guest.client.expect_closed().await?;

    let left = table.host.client.recv_type("player_left").await?;
    assert_eq!(left["player_id"], guest_id.as_str());
    let over = table
        .host
        .client
        .recv_matching(|v| v["type"] == "game_state" && v["game_over"] == true)
        .await?;
    let guest = over["players"]
        .as_array()
        .and_then(|ps| ps.iter().find(|p| p["id"] == guest_id.as_str()))
        .expect("guest still listed");
    assert_eq!(guest["left"], true);

    table.host.client.close().await?;
    server.stop(false).await;
    let _ = join.await;
    Ok(())
}
