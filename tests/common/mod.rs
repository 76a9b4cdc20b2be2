//! Shared fixtures for integration tests.

#![allow(dead_code)]

use strictly_duet::{GameSession, Identity, Snapshot, WireEvent};
use strictly_sync::NewGameRequest;

/// Cell 0 is green on A's keycard, cell 1 green on B's, cell 2 black on A's;
/// everything else is tan.
pub fn new_game(game_id: &str, seed: &str) -> NewGameRequest {
    let mut layout_a = vec!["t".to_string(); 25];
    let mut layout_b = vec!["t".to_string(); 25];
    layout_a[0] = "g".to_string();
    layout_b[1] = "g".to_string();
    layout_a[2] = "b".to_string();
    NewGameRequest {
        game_id: game_id.into(),
        seed: seed.into(),
        words: (0..25).map(|i| format!("word{}", i)).collect(),
        layout_a,
        layout_b,
    }
}

pub fn alice() -> Identity {
    Identity::new("g1_alice".to_string(), "Alice".to_string())
}

pub fn join_event(number: u64, player_id: &str, side: &str) -> WireEvent {
    WireEvent {
        number,
        kind: "join_side".to_string(),
        player_id: Some(player_id.to_string()),
        side: Some(side.to_string()),
        ..WireEvent::default()
    }
}

pub fn guess_event(number: u64, index: i64, side: &str) -> WireEvent {
    WireEvent {
        number,
        kind: "guess".to_string(),
        side: Some(side.to_string()),
        index: Some(index),
        ..WireEvent::default()
    }
}

/// Session for game `g1`, generation `seed`, with the given history.
pub fn session(seed: &str, events: Vec<WireEvent>) -> GameSession {
    let mut snapshot = Snapshot::from(new_game("g1", seed));
    snapshot.events = events;
    GameSession::from_snapshot(snapshot, alice()).expect("valid snapshot")
}
