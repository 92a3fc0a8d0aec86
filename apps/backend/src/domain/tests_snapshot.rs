use serde_json::Value;
use uuid::Uuid;

use crate::domain::engine::Action;
use crate::domain::game_transition::Pile;
use crate::domain::player_view::project;
use crate::domain::test_state_helpers::*;
use crate::errors::domain::NotFoundKind;
use crate::errors::DomainError;

#[test]
fn viewer_sees_only_their_own_hand() {
    let s = new_game(3, 71);
    let snap = project(&s, pid(1)).unwrap();
    assert_eq!(snap.my_player_id, pid(1));
    assert_eq!(snap.my_hand, s.players[1].hand);
    assert_eq!(snap.deck_count, s.draw_pile.len());
    assert_eq!(snap.discard_pile_top, s.discard_pile.top().copied());

    let json = serde_json::to_value(&snap).unwrap();
    for (seat, player) in json["players"].as_array().unwrap().iter().enumerate() {
        let obj = player.as_object().unwrap();
        assert!(!obj.contains_key("hand"));
        assert_eq!(obj["hand_count"], Value::from(s.players[seat].hand.len()));
    }

    // No other player's card appears anywhere in the payload.
    let text = serde_json::to_string(&snap).unwrap();
    let mine = serde_json::to_string(&snap.my_hand).unwrap();
    assert!(text.contains(&mine));
    let stripped = text.replace(&mine, "");
    for other in [0usize, 2] {
        for card in &s.players[other].hand {
            let wire = serde_json::to_string(card).unwrap();
            assert!(!stripped.contains(&wire), "leaked {wire}");
        }
    }
}

#[test]
fn repeated_projection_is_identical() {
    let mut s = new_game(2, 72);
    act(&mut s, 0, Action::DrawCard { from_pile: Pile::Deck }).unwrap();
    let a = project(&s, pid(0)).unwrap();
    let b = project(&s, pid(0)).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn unknown_viewer_is_not_found() {
    let s = new_game(2, 73);
    let err = project(&s, Uuid::from_u128(999)).unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Player, _)));
}

#[test]
fn window_flags_follow_the_window_kind() {
    let mut s = new_game(2, 74);
    let snap = project(&s, pid(0)).unwrap();
    assert!(snap.first_draw_of_round);
    assert!(!snap.waiting_for_requests);
    let expected = (T0 + time::Duration::seconds(5)).unix_timestamp() as f64;
    let ends = snap.wait_end_time.expect("first draw deadline");
    assert!((ends - expected).abs() < 1e-3);

    act(&mut s, 0, Action::DrawCard { from_pile: Pile::Deck }).unwrap();
    let snap = project(&s, pid(1)).unwrap();
    assert!(!snap.first_draw_of_round);
    assert_eq!(snap.wait_end_time, None);

    let card = s.players[0].hand[0].id;
    act(&mut s, 0, Action::DiscardCard { card_id: card }).unwrap();
    let snap = project(&s, pid(1)).unwrap();
    assert!(snap.waiting_for_requests);
    assert!(snap.wait_end_time.is_some());
    assert_eq!(snap.current_player_id, pid(1));
}

#[test]
fn wire_shape_uses_snake_case_phases() {
    let s = new_game(2, 75);
    let json = serde_json::to_value(project(&s, pid(0)).unwrap()).unwrap();
    assert_eq!(json["turn_phase"], "draw");
    assert_eq!(json["round"], 1);
    assert_eq!(json["round_requirements"]["sets"], serde_json::json!([3, 3]));
    assert_eq!(json["host_id"], pid(0).to_string());
    assert_eq!(json["standings"], Value::Null);
    assert_eq!(json["players"][0]["is_host"], true);
}

#[test]
fn only_the_deck_count_and_discard_top_describe_the_piles() {
    let s = new_game(2, 76);
    let json = serde_json::to_value(project(&s, pid(0)).unwrap()).unwrap();
    let pile_fields: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .filter(|k| k.contains("deck") || k.contains("discard") || k.contains("pile"))
        .collect();
    assert_eq!(pile_fields.len(), 2, "{pile_fields:?}");
    assert!(pile_fields.contains(&"deck_count"));
    assert!(pile_fields.contains(&"discard_pile_top"));
}

#[test]
fn standings_appear_once_the_round_ends() {
    let mut s = new_game(2, 76);
    assert!(project(&s, pid(0)).unwrap().standings.is_none());

    act(&mut s, 0, Action::HostEndRound { count_points: true }).unwrap();
    let snap = project(&s, pid(1)).unwrap();
    assert!(snap.round_ended);
    assert!(!snap.game_over);
    assert_eq!(snap.round_winner_name, None);
    assert_eq!(snap.standings.map(|t| t.len()), Some(2));
}
