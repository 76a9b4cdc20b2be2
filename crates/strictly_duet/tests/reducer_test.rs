//! Tests for folding events into a session.

use strictly_duet::{
    Board, CellIndex, Color, Event, EventKind, GameSession, Identity, Side, Snapshot, Status,
    WireEvent, BOARD_SIZE, GREEN_TOTAL,
};
use strum::IntoEnumIterator;

/// Cells 0-9 green on A's keycard, 9-14 green on B's (9 green on both),
/// 20 black on A's, 21 black on B's, the rest tan.
fn layouts() -> (Vec<Color>, Vec<Color>) {
    let mut a = vec![Color::Tan; BOARD_SIZE];
    let mut b = vec![Color::Tan; BOARD_SIZE];
    for cell in a.iter_mut().take(10) {
        *cell = Color::Green;
    }
    for cell in b.iter_mut().take(15).skip(9) {
        *cell = Color::Green;
    }
    a[20] = Color::Black;
    b[21] = Color::Black;
    (a, b)
}

fn session() -> GameSession {
    let words: Vec<String> = (0..BOARD_SIZE).map(|i| format!("word{}", i)).collect();
    let (a, b) = layouts();
    let board = Board::from_layouts(&words, &a, &b).expect("valid board");
    GameSession::new(
        "g1".into(),
        "s1".into(),
        board,
        Identity::new("g1_alice".to_string(), "Alice".to_string()),
    )
}

fn guess(number: u64, index: i64, side: Side) -> Event {
    Event::new(
        number,
        EventKind::Guess {
            index: Some(index),
            side: Some(side),
        },
    )
}

/// Guesses that expose every green cell: B finds A's greens, A finds B's.
fn all_green_guesses(first_number: u64) -> Vec<Event> {
    let b_guesses = (0..9).map(|i| (i, Side::B));
    let a_guesses = (9..15).map(|i| (i, Side::A));
    b_guesses
        .chain(a_guesses)
        .enumerate()
        .map(|(n, (index, side))| guess(first_number + n as u64, index, side))
        .collect()
}

#[test]
fn test_apply_is_idempotent() {
    let events = [
        guess(1, 16, Side::A),
        Event::new(
            2,
            EventKind::JoinSide {
                player_id: "g1_bob".to_string(),
                side: Side::B,
            },
        ),
        guess(3, 12, Side::A),
    ];
    for event in &events {
        let once = session().apply(event);
        let twice = once.clone().apply(event);
        assert_eq!(once, twice, "applying {} twice changed the session", event);
    }
}

#[test]
fn test_replay_under_guard() {
    let e1 = guess(1, 16, Side::A);
    let e2 = guess(2, 3, Side::B);
    let e3 = guess(3, 10, Side::B);

    let clean = session().apply_all([&e1, &e2, &e3]);
    let replayed = session().apply_all([&e1, &e2, &e3, &e2]);
    assert_eq!(clean, replayed);
    assert_eq!(replayed.events().len(), 3);
    assert_eq!(replayed.last_applied(), 3);
}

#[test]
fn test_remaining_green_stays_in_bounds() {
    let mut s = session();
    let mut number = 0;
    for index in 0..BOARD_SIZE as i64 {
        for side in Side::iter() {
            number += 1;
            s = s.apply(&guess(number, index, side));
            assert!(s.board().remaining_green() <= GREEN_TOTAL);
        }
    }
    assert_eq!(s.board().remaining_green(), 0);
}

#[test]
fn test_all_green_wins() {
    let events = all_green_guesses(1);
    let s = session().apply_all(&events);
    assert_eq!(s.board().remaining_green(), 0);
    assert_eq!(
        s.status(),
        Status::Won {
            tokens_consumed: s.tokens_consumed()
        }
    );
}

#[test]
fn test_loss_takes_precedence_over_win() {
    let mut events = all_green_guesses(1);
    events.push(guess(100, 21, Side::A));
    let s = session().apply_all(&events);
    assert_eq!(s.board().remaining_green(), 0);
    assert_eq!(s.status(), Status::Lost { remaining_green: 0 });
}

#[test]
fn test_tokens_never_decrease() {
    let sequence = [
        (16, Side::A),
        (17, Side::A),
        (3, Side::B),
        (18, Side::B),
        (11, Side::A),
        (19, Side::B),
        (22, Side::A),
        (99, Side::A),
        (23, Side::B),
    ];
    let mut s = session();
    for (n, (index, side)) in sequence.into_iter().enumerate() {
        let before = s.tokens_consumed();
        s = s.apply(&guess(n as u64 + 1, index, side));
        assert!(s.tokens_consumed() >= before);
    }
}

#[test]
fn test_scenario_neutral_first_guess_passes_turn() {
    let s = session().apply(&guess(1, 16, Side::A));
    assert_eq!(s.turn(), Some(Side::B));
    assert_eq!(s.tokens_consumed(), 1);
}

#[test]
fn test_scenario_neutral_on_opponents_turn_costs_two() {
    let s = session().apply(&guess(1, 16, Side::A));
    assert_eq!(s.turn(), Some(Side::B));
    let before = s.tokens_consumed();

    let s = s.apply(&guess(2, 17, Side::A));
    assert_eq!(s.tokens_consumed(), before + 2);
    assert_eq!(s.turn(), Some(Side::B));
}

#[test]
fn test_scenario_out_of_range_guess_is_recorded_only() {
    let before = session().apply(&guess(1, 16, Side::A));
    let after = before.clone().apply(&guess(2, 99, Side::A));

    assert_eq!(after.board(), before.board());
    assert_eq!(after.turn(), before.turn());
    assert_eq!(after.tokens_consumed(), before.tokens_consumed());
    assert_eq!(after.last_applied(), 2);
    assert_eq!(after.events().len(), 2);
}

#[test]
fn test_neutral_needs_both_sides_to_resolve() {
    let index = CellIndex::from_raw(16).expect("index");
    let s = session().apply(&guess(1, 16, Side::A));
    assert_eq!(s.board().cell(index).display_color(), None);

    let s = s.apply(&guess(2, 16, Side::B));
    assert_eq!(s.board().cell(index).display_color(), Some(Color::Tan));
}

#[test]
fn test_from_snapshot_folds_history() {
    let (a, b) = layouts();
    let label = |c: &Color| c.to_string();
    let snapshot = Snapshot {
        id: "g1".into(),
        seed: "s1".into(),
        words: (0..BOARD_SIZE).map(|i| format!("word{}", i)).collect(),
        layout_a: a.iter().map(label).collect(),
        layout_b: b.iter().map(label).collect(),
        events: vec![
            WireEvent {
                number: 1,
                kind: "join_side".to_string(),
                player_id: Some("g1_alice".to_string()),
                side: Some("a".to_string()),
                ..WireEvent::default()
            },
            WireEvent {
                number: 2,
                kind: "guess".to_string(),
                side: Some("a".to_string()),
                index: Some(16),
                ..WireEvent::default()
            },
            WireEvent {
                number: 3,
                kind: "teleport".to_string(),
                ..WireEvent::default()
            },
        ],
    };

    let me = Identity::new("g1_alice".to_string(), "Alice".to_string());
    let s = GameSession::from_snapshot(snapshot, me).expect("valid snapshot");
    assert_eq!(s.local_side(), Some(Side::A));
    assert_eq!(s.last_applied(), 3);
    assert_eq!(s.events().len(), 3);
    assert_eq!(s.turn(), Some(Side::B));
    assert!(s.is_generation(&"g1".into(), &"s1".into()));
}

#[test]
fn test_from_snapshot_rejects_bad_layout() {
    let snapshot = Snapshot {
        id: "g1".into(),
        seed: "s1".into(),
        words: (0..BOARD_SIZE).map(|i| format!("word{}", i)).collect(),
        layout_a: vec!["purple".to_string(); BOARD_SIZE],
        layout_b: vec!["t".to_string(); BOARD_SIZE],
        events: Vec::new(),
    };
    let me = Identity::new("g1_alice".to_string(), "Alice".to_string());
    let err = GameSession::from_snapshot(snapshot, me).expect_err("bad color");
    assert!(err.message.contains("layout_a[0]"));
}

#[test]
fn test_from_snapshot_rejects_short_words() {
    let snapshot = Snapshot {
        id: "g1".into(),
        seed: "s1".into(),
        words: vec!["only".to_string()],
        layout_a: vec!["t".to_string(); BOARD_SIZE],
        layout_b: vec!["t".to_string(); BOARD_SIZE],
        events: Vec::new(),
    };
    let me = Identity::new("g1_alice".to_string(), "Alice".to_string());
    assert!(GameSession::from_snapshot(snapshot, me).is_err());
}
