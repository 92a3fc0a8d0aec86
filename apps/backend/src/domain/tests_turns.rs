use crate::domain::dealing::DiscardPile;
use crate::domain::engine::{self, Action};
use crate::domain::game_transition::{GameTransition, Pile};
use crate::domain::melds::{MeldError, MeldKind};
use crate::domain::state::{Phase, WindowKind};
use crate::domain::test_state_helpers::*;
use crate::domain::turns::MeldSpec;
use crate::errors::domain::{NotFoundKind, ValidationKind};
use crate::errors::DomainError;

fn draw(pile: Pile) -> Action {
    Action::DrawCard { from_pile: pile }
}

fn set(card_ids: Vec<crate::domain::CardId>) -> MeldSpec {
    MeldSpec {
        kind: MeldKind::Set,
        card_ids,
    }
}

fn run(card_ids: Vec<crate::domain::CardId>) -> MeldSpec {
    MeldSpec {
        kind: MeldKind::Run,
        card_ids,
    }
}

fn kind(err: &DomainError) -> ValidationKind {
    err.kind().cloned().expect("validation error")
}

/// Seat 0 holds two sets of sevens and nines plus `extra`, and has drawn.
fn laid_down_ready(extra: &str) -> crate::domain::GameState {
    let mut s = new_game(2, 11);
    rig_hand(&mut s, 0, &format!("7H 7D 7S 9C 9D 9S {extra}"));
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let melds = vec![
        set(ids(&s, 0, "7H 7D 7S")),
        set(ids(&s, 0, "9C 9D 9S")),
    ];
    act(&mut s, 0, Action::LayDownMelds { melds }).unwrap();
    s
}

#[test]
fn wrong_player_cannot_draw_and_nothing_changes() {
    let mut s = new_game(3, 1);
    let before = s.clone();
    let err = act(&mut s, 1, draw(Pile::Deck)).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::NotYourTurn);
    assert_eq!(err.code(), "not_your_turn");
    assert_eq!(s, before);
}

#[test]
fn second_draw_is_rejected_without_mutation() {
    let mut s = new_game(2, 2);
    let events = act(&mut s, 0, draw(Pile::Deck)).unwrap();
    assert!(events.contains(&GameTransition::CardDrawn {
        player_id: pid(0),
        pile: Pile::Deck
    }));
    assert_eq!(s.players[0].hand.len(), 8);
    assert_eq!(s.round.phase, Phase::Action);

    let before = s.clone();
    let err = act(&mut s, 0, draw(Pile::Discard)).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::AlreadyDrawn);
    assert_eq!(s, before);
}

#[test]
fn drawing_closes_the_first_draw_window() {
    let mut s = new_game(2, 3);
    assert_eq!(s.round.window.map(|w| w.kind), Some(WindowKind::FirstDraw));
    let flipped = *s.discard_pile.top().unwrap();

    let events = act(&mut s, 0, draw(Pile::Discard)).unwrap();
    assert!(events.contains(&GameTransition::RequestWindowClosed));
    assert!(s.round.window.is_none());
    assert!(s.discard_pile.is_empty());
    assert!(s.players[0].hand.contains(&flipped));
    assert_conserved(&s);
}

#[test]
fn discard_requires_a_draw_first() {
    let mut s = new_game(2, 4);
    let card = s.players[0].hand[0].id;
    let before = s.clone();
    let err = act(&mut s, 0, Action::DiscardCard { card_id: card }).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::MustDrawFirst);
    assert_eq!(s, before);
}

#[test]
fn discard_passes_the_turn_and_opens_a_request_window() {
    let mut s = new_game(3, 5);
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let card = s.players[0].hand[0].id;

    let events = act(&mut s, 0, Action::DiscardCard { card_id: card }).unwrap();
    assert_eq!(
        events,
        vec![
            GameTransition::CardDiscarded { player_id: pid(0) },
            GameTransition::TurnBecame { player_id: pid(1) },
        ]
    );
    assert_eq!(s.round.turn, 1);
    assert!(!s.round.has_drawn);
    assert_eq!(s.round.phase, Phase::Draw);
    assert_eq!(s.players[0].hand.len(), 7);
    assert_eq!(s.discard_pile.top().map(|c| c.id), Some(card));

    let window = s.round.window.expect("post-discard window");
    assert_eq!(window.kind, WindowKind::PostDiscard);
    assert_eq!(window.card, card);
    assert_eq!(window.discarder, Some(0));
    assert_eq!(window.ends_at, T0 + time::Duration::seconds(5));
    assert_conserved(&s);
}

#[test]
fn discard_pile_is_frozen_until_the_window_closes() {
    let mut s = new_game(2, 6);
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let card = s.players[0].hand[0].id;
    act(&mut s, 0, Action::DiscardCard { card_id: card }).unwrap();

    let err = act(&mut s, 1, draw(Pile::Discard)).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::DiscardPileFrozen);

    let events = act_at(&mut s, 1, draw(Pile::Discard), later()).unwrap();
    assert_eq!(events[0], GameTransition::RequestWindowClosed);
    assert!(s.players[1].hand.iter().any(|c| c.id == card));
}

#[test]
fn deck_draw_is_allowed_while_the_window_is_open() {
    let mut s = new_game(2, 7);
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let card = s.players[0].hand[0].id;
    act(&mut s, 0, Action::DiscardCard { card_id: card }).unwrap();

    act(&mut s, 1, draw(Pile::Deck)).unwrap();
    assert!(s.round.has_drawn);
    assert!(s.round.window.is_some());
}

#[test]
fn turn_skips_disconnected_players() {
    let mut s = new_game(3, 8);
    s.set_connected(pid(1), false).unwrap();
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let card = s.players[0].hand[0].id;
    act(&mut s, 0, Action::DiscardCard { card_id: card }).unwrap();
    assert_eq!(s.round.turn, 2);
}

#[test]
fn empty_deck_is_rebuilt_from_buried_discards() {
    let mut s = new_game(2, 9);
    let top = s.discard_pile.take_top().unwrap();
    let mut buried = s.draw_pile.take_all();
    let buried_count = buried.len();
    buried.push(top);
    s.discard_pile = DiscardPile::new(buried);

    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    assert_eq!(s.discard_pile.len(), 1);
    assert_eq!(s.discard_pile.top(), Some(&top));
    assert_eq!(s.draw_pile.len(), buried_count - 1);
    assert_eq!(s.refills, 1);
    assert_conserved(&s);
}

#[test]
fn empty_deck_and_bare_discard_is_an_empty_pile_rejection() {
    let mut s = new_game(2, 10);
    let stock = s.draw_pile.take_all();
    s.players[1].hand.extend(stock);
    let before = s.clone();

    let err = act(&mut s, 0, draw(Pile::Deck)).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::EmptyPile);
    assert_eq!(s, before);
}

#[test]
fn lay_down_two_sets_in_round_one() {
    let s = laid_down_ready("2C");
    let me = &s.players[0];
    assert!(me.has_laid_down);
    assert_eq!(me.melds.len(), 2);
    assert_eq!(me.hand.len(), 2);
    assert_conserved(&s);
}

#[test]
fn lay_down_allows_extra_melds() {
    let mut s = new_game(2, 12);
    rig_hand(&mut s, 0, "7H 7D 7S 9C 9D 9S QH QD QC");
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let melds = vec![
        set(ids(&s, 0, "7H 7D 7S")),
        set(ids(&s, 0, "9C 9D 9S")),
        set(ids(&s, 0, "QH QD QC")),
    ];
    act(&mut s, 0, Action::LayDownMelds { melds }).unwrap();
    assert_eq!(s.players[0].melds.len(), 3);
    assert_eq!(s.players[0].hand.len(), 1);
}

#[test]
fn lay_down_is_once_per_round() {
    let mut s = laid_down_ready("QH QD QC");
    let melds = vec![set(ids(&s, 0, "QH QD QC"))];
    let err = act(&mut s, 0, Action::LayDownMelds { melds }).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::AlreadyLaidDown);
}

#[test]
fn lay_down_below_objective_is_rejected_atomically() {
    let mut s = new_game(2, 13);
    rig_hand(&mut s, 0, "7H 7D 7S 9C 9D 2S 3H");
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let before = s.clone();

    let melds = vec![set(ids(&s, 0, "7H 7D 7S"))];
    let err = act(&mut s, 0, Action::LayDownMelds { melds }).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::ObjectiveNotMet);
    assert_eq!(s, before);
}

#[test]
fn lay_down_reports_which_meld_is_invalid() {
    let mut s = new_game(2, 14);
    rig_hand(&mut s, 0, "7H 7D 7S 9C 9D 8S 3H");
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let before = s.clone();

    let melds = vec![
        set(ids(&s, 0, "7H 7D 7S")),
        set(ids(&s, 0, "9C 9D 8S")),
    ];
    let err = act(&mut s, 0, Action::LayDownMelds { melds }).unwrap_err();
    assert_eq!(
        kind(&err),
        ValidationKind::InvalidMeld(MeldError::WrongRank)
    );
    assert!(err.detail().starts_with("Meld 2"));
    assert_eq!(s, before);
}

#[test]
fn lay_down_rejects_foreign_and_repeated_cards() {
    let mut s = new_game(2, 15);
    rig_hands(&mut s, &[(0, "7H 7D 7S 9C 9D 9S 3H"), (1, "7C 2D 2S 2H 4C 5C 6C")]);
    act(&mut s, 0, draw(Pile::Deck)).unwrap();

    let mut foreign = ids(&s, 0, "7H 7D");
    foreign.push(id(&s, 1, "7C"));
    let melds = vec![set(foreign), set(ids(&s, 0, "9C 9D 9S"))];
    let err = act(&mut s, 0, Action::LayDownMelds { melds }).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::CardNotInHand);

    let sevens = ids(&s, 0, "7H 7D 7S");
    let mut twice = ids(&s, 0, "9C 9D");
    twice.push(sevens[0]);
    let melds = vec![set(sevens), set(twice)];
    let err = act(&mut s, 0, Action::LayDownMelds { melds }).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::CardNotInHand);
    assert!(!s.players[0].has_laid_down);
}

#[test]
fn lay_down_requires_the_action_phase() {
    let mut s = new_game(2, 16);
    rig_hand(&mut s, 0, "7H 7D 7S 9C 9D 9S 3H");
    let melds = vec![
        set(ids(&s, 0, "7H 7D 7S")),
        set(ids(&s, 0, "9C 9D 9S")),
    ];
    let err = act(&mut s, 0, Action::LayDownMelds { melds }).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::MustDrawFirst);
}

#[test]
fn lay_off_extends_an_own_meld() {
    let mut s = laid_down_ready("7C 2H");
    let card = id(&s, 0, "7C");
    let events = act(
        &mut s,
        0,
        Action::LayOffCard {
            card_id: card,
            target_player_id: pid(0),
            meld_index: 0,
            position: None,
        },
    )
    .unwrap();
    assert_eq!(
        events,
        vec![GameTransition::CardLaidOff {
            player_id: pid(0),
            target_player_id: pid(0)
        }]
    );
    assert_eq!(s.players[0].melds[0].len(), 4);
    assert_eq!(s.players[0].hand.len(), 2);
    assert_conserved(&s);
}

#[test]
fn lay_off_requires_both_players_laid_down() {
    let mut s = new_game(2, 17);
    rig_hand(&mut s, 0, "7C 2H 3H 4H 5D 6D 8S");
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let card = id(&s, 0, "7C");
    let err = act(
        &mut s,
        0,
        Action::LayOffCard {
            card_id: card,
            target_player_id: pid(1),
            meld_index: 0,
            position: None,
        },
    )
    .unwrap_err();
    assert_eq!(kind(&err), ValidationKind::MustLayDownFirst);

    let mut s = laid_down_ready("7C 2H");
    let card = id(&s, 0, "7C");
    let before = s.clone();
    let err = act(
        &mut s,
        0,
        Action::LayOffCard {
            card_id: card,
            target_player_id: pid(1),
            meld_index: 0,
            position: None,
        },
    )
    .unwrap_err();
    assert_eq!(kind(&err), ValidationKind::TargetNotLaidDown);
    assert_eq!(s, before);
}

#[test]
fn lay_off_that_breaks_the_meld_is_rejected() {
    let mut s = laid_down_ready("8C 2H");
    let card = id(&s, 0, "8C");
    let before = s.clone();
    let err = act(
        &mut s,
        0,
        Action::LayOffCard {
            card_id: card,
            target_player_id: pid(0),
            meld_index: 0,
            position: None,
        },
    )
    .unwrap_err();
    assert_eq!(
        kind(&err),
        ValidationKind::InvalidMeld(MeldError::WrongRank)
    );
    assert_eq!(s, before);

    let err = act(
        &mut s,
        0,
        Action::LayOffCard {
            card_id: card,
            target_player_id: pid(0),
            meld_index: 5,
            position: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Meld, _)));
}

#[test]
fn replace_joker_frees_the_joker_into_a_new_slot() {
    let mut s = new_game(2, 18);
    rig_hand(&mut s, 0, "7H 7D 7S 9C 9D JK 9S 2H");
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let melds = vec![
        set(ids(&s, 0, "7H 7D 7S")),
        set(ids(&s, 0, "9C 9D JK")),
    ];
    act(&mut s, 0, Action::LayDownMelds { melds }).unwrap();
    let nine = id(&s, 0, "9S");

    let events = act(
        &mut s,
        0,
        Action::ReplaceJoker {
            card_id: nine,
            target_player_id: pid(0),
            meld_index: 1,
            joker_index: 2,
            new_joker_position: 3,
        },
    )
    .unwrap();
    assert!(matches!(events[0], GameTransition::JokerReplaced { .. }));
    let meld = &s.players[0].melds[1];
    assert_eq!(meld.len(), 4);
    assert_eq!(meld.cards()[2].id, nine);
    assert!(meld.cards()[3].is_joker());
    assert_conserved(&s);
}

#[test]
fn replace_joker_on_a_natural_slot_is_rejected() {
    let mut s = new_game(2, 19);
    rig_hand(&mut s, 0, "7H 7D 7S 9C 9D JK 9S 2H");
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let melds = vec![
        set(ids(&s, 0, "7H 7D 7S")),
        set(ids(&s, 0, "9C 9D JK")),
    ];
    act(&mut s, 0, Action::LayDownMelds { melds }).unwrap();
    let nine = id(&s, 0, "9S");
    let before = s.clone();

    let err = act(
        &mut s,
        0,
        Action::ReplaceJoker {
            card_id: nine,
            target_player_id: pid(0),
            meld_index: 1,
            joker_index: 0,
            new_joker_position: 3,
        },
    )
    .unwrap_err();
    assert_eq!(
        kind(&err),
        ValidationKind::InvalidMeld(MeldError::InvalidJokerSlot)
    );
    assert_eq!(s, before);
}

#[test]
fn going_out_in_one_turn_ends_the_round_with_a_bonus() {
    let mut s = new_game(2, 20);
    rig_hand(&mut s, 0, "7H 7D 7S 9C 9D 9S");
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let melds = vec![
        set(ids(&s, 0, "7H 7D 7S")),
        set(ids(&s, 0, "9C 9D 9S")),
    ];
    act(&mut s, 0, Action::LayDownMelds { melds }).unwrap();
    let last = s.players[0].hand[0].id;
    let loser_hand = crate::domain::scoring::deadwood(&s.players[1].hand);

    let events = act(&mut s, 0, Action::DiscardCard { card_id: last }).unwrap();
    assert!(events.contains(&GameTransition::OneTurnBonus {
        player_id: pid(0),
        points: -10
    }));
    assert!(events.contains(&GameTransition::RoundEnded {
        round_no: 1,
        winner: Some(pid(0))
    }));
    assert_eq!(s.round.phase, Phase::RoundEnded);
    assert_eq!(s.round.winner, Some(0));
    assert!(s.round.window.is_none());
    assert_eq!(s.players[0].score, -10);
    assert_eq!(s.players[1].score, loser_hand);
    assert_conserved(&s);
}

#[test]
fn round_seven_needs_the_whole_hand() {
    let mut s = new_game(2, 21);
    act(
        &mut s,
        0,
        Action::HostJumpToRound {
            target_round: 7,
            count_points: false,
        },
    )
    .unwrap();
    assert_eq!(s.players[0].hand.len(), 13);
    rig_hand(&mut s, 0, "4S 5S 6S 7S 4H 5H 6H 7H 4D 5D 6D 7D KC QC");
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let runs = |s: &crate::domain::GameState| {
        vec![
            run(ids(s, 0, "4S 5S 6S 7S")),
            run(ids(s, 0, "4H 5H 6H 7H")),
            run(ids(s, 0, "4D 5D 6D 7D")),
        ]
    };

    let melds = runs(&s);
    let err = act(&mut s, 0, Action::LayDownMelds { melds }).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::ObjectiveNotMet);

    let mut s = new_game(2, 21);
    act(
        &mut s,
        0,
        Action::HostJumpToRound {
            target_round: 7,
            count_points: false,
        },
    )
    .unwrap();
    rig_hand(&mut s, 0, "4S 5S 6S 7S 4H 5H 6H 7H 4D 5D 6D 7D");
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let melds = runs(&s);
    act(&mut s, 0, Action::LayDownMelds { melds }).unwrap();
    assert_eq!(s.players[0].hand.len(), 1);

    let last = s.players[0].hand[0].id;
    act(&mut s, 0, Action::DiscardCard { card_id: last }).unwrap();
    assert_eq!(s.round.phase, Phase::GameOver);
}

#[test]
fn reorder_hand_is_a_permutation_at_any_time() {
    let mut s = new_game(2, 22);
    let mut order: Vec<_> = s.players[1].hand.iter().map(|c| c.id).collect();
    order.reverse();
    act(&mut s, 1, Action::ReorderHand { card_order: order.clone() }).unwrap();
    let now: Vec<_> = s.players[1].hand.iter().map(|c| c.id).collect();
    assert_eq!(now, order);

    let before = s.clone();
    let mut short = order.clone();
    short.pop();
    let err = act(&mut s, 1, Action::ReorderHand { card_order: short }).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::InvalidHandOrder);

    let mut doubled = order.clone();
    doubled[0] = doubled[1];
    let err = act(&mut s, 1, Action::ReorderHand { card_order: doubled }).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::InvalidHandOrder);
    assert_eq!(s, before);
}

#[test]
fn invalid_meld_submissions_earn_warnings_then_a_penalty_card() {
    let mut s = new_game(2, 23);
    rig_hand(&mut s, 0, "7H 7D 8S 9C 9D 9S 3H");
    act(&mut s, 0, draw(Pile::Deck)).unwrap();
    let action = Action::LayDownMelds {
        melds: vec![
            set(ids(&s, 0, "7H 7D 8S")),
            set(ids(&s, 0, "9C 9D 9S")),
        ],
    };

    let err = act(&mut s, 0, action.clone()).unwrap_err();
    let events = engine::warn_for(&mut s, pid(0), &action, &err);
    assert_eq!(
        events,
        vec![GameTransition::WarningIssued {
            player_id: pid(0),
            warnings: 1,
            penalty_drawn: false
        }]
    );
    assert_eq!(s.players[0].hand.len(), 8);

    let err = act(&mut s, 0, action.clone()).unwrap_err();
    let events = engine::warn_for(&mut s, pid(0), &action, &err);
    assert_eq!(
        events,
        vec![GameTransition::WarningIssued {
            player_id: pid(0),
            warnings: 0,
            penalty_drawn: true
        }]
    );
    assert_eq!(s.players[0].hand.len(), 9);
    assert_conserved(&s);
}

#[test]
fn other_rejections_do_not_warn() {
    let mut s = new_game(2, 24);
    let action = draw(Pile::Deck);
    let err = act(&mut s, 1, action.clone()).unwrap_err();
    assert!(engine::warn_for(&mut s, pid(1), &action, &err).is_empty());
    assert_eq!(s.players[1].warnings, 0);
}

#[test]
fn a_player_who_left_cannot_act() {
    let mut s = new_game(3, 25);
    act(&mut s, 2, Action::LeaveGame).unwrap();
    let err = act(&mut s, 2, Action::ReorderHand { card_order: vec![] }).unwrap_err();
    assert_eq!(kind(&err), ValidationKind::WrongPhase);
}
