//! Tests for building submissions from the local session.

mod common;

use common::{guess_event, join_event, session};
use strictly_duet::{CellIndex, Color, Side};
use strictly_sync::{submit_chat, submit_guess, submit_join, submit_leave};

#[test]
fn test_guess_requires_a_side() {
    let s = session("s1", Vec::new());
    assert_eq!(submit_guess(&s, 3), None);
}

#[test]
fn test_guess_off_board_is_filtered() {
    let s = session("s1", vec![join_event(1, "g1_alice", "a")]);
    assert_eq!(submit_guess(&s, 25), None);
    assert_eq!(submit_guess(&s, -1), None);
}

#[test]
fn test_guess_builds_request() {
    let s = session("s1", vec![join_event(1, "g1_alice", "a")]);
    let request = submit_guess(&s, 7).expect("guess allowed");
    assert_eq!(request.index, 7);
    assert_eq!(request.player_id, "g1_alice");
    assert_eq!(request.last_applied, 1);
    assert_eq!(request.seed, *s.seed());
}

#[test]
fn test_guess_on_own_resolved_cell_is_noop() {
    // A already guessed cell 5; guessing it again is filtered without a request.
    let s = session(
        "s1",
        vec![join_event(1, "g1_alice", "a"), guess_event(2, 5, "a")],
    );
    let before = s.clone();
    assert_eq!(submit_guess(&s, 5), None);
    assert_eq!(s, before);
}

#[test]
fn test_cell_guessed_by_opponent_stays_open() {
    // B guessed cell 1 and found A's tan; B's green there is still A's to find.
    let s = session(
        "s1",
        vec![join_event(1, "g1_alice", "a"), guess_event(2, 1, "b")],
    );
    let cell = s.board().cell(CellIndex::from_raw(1).expect("index"));
    assert_eq!(cell.display_color(), None);
    assert_eq!(cell.outcome_for(Side::A), Color::Green);

    let request = submit_guess(&s, 1).expect("guess allowed");
    assert_eq!(request.index, 1);
    assert_eq!(request.last_applied, 2);
}

#[test]
fn test_join_carries_side() {
    let s = session("s1", Vec::new());
    let request = submit_join(&s, Side::B);
    assert_eq!(request.side, Side::B);
    assert_eq!(request.last_applied, 0);
}

#[test]
fn test_leave_requires_a_side() {
    let s = session("s1", Vec::new());
    assert_eq!(submit_leave(&s), None);

    let s = session("s1", vec![join_event(1, "g1_alice", "b")]);
    let request = submit_leave(&s).expect("seated");
    assert_eq!(request.player_id, "g1_alice");
    assert_eq!(request.last_applied, 1);
}

#[test]
fn test_blank_chat_is_dropped() {
    let s = session("s1", Vec::new());
    assert_eq!(submit_chat(&s, "   "), None);

    let request = submit_chat(&s, " try ocean ").expect("message");
    assert_eq!(request.message, "try ocean");
    assert_eq!(request.name, "Alice");
}
