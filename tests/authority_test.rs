//! Tests for the in-memory authoritative log.

mod common;

use std::time::Duration;

use common::new_game;
use strictly_duet::{GameId, Seed, Side};
use strictly_sync::{
    AuthorityError, ChatRequest, GuessRequest, JoinRequest, LeaveRequest, MemoryLog, PollRequest,
};

fn join(player_id: &str, side: Side) -> JoinRequest {
    JoinRequest {
        game_id: "g1".into(),
        seed: "s1".into(),
        player_id: player_id.to_string(),
        side,
        last_applied: 0,
    }
}

fn guess(player_id: &str, index: i64, last_applied: u64) -> GuessRequest {
    GuessRequest {
        game_id: "g1".into(),
        seed: "s1".into(),
        player_id: player_id.to_string(),
        index,
        last_applied,
    }
}

fn poll(seed: &str, last_applied: u64) -> PollRequest {
    PollRequest {
        game_id: "g1".into(),
        seed: seed.into(),
        player_id: "g1_alice".to_string(),
        last_applied,
    }
}

fn leave(player_id: &str, seed: &str, last_applied: u64) -> LeaveRequest {
    LeaveRequest {
        game_id: "g1".into(),
        seed: seed.into(),
        player_id: player_id.to_string(),
        last_applied,
    }
}

async fn log_with_game(hold: Duration) -> MemoryLog {
    let log = MemoryLog::with_hold(hold);
    log.create(new_game("g1", "s1")).await.expect("create game");
    log
}

#[tokio::test]
async fn test_events_are_numbered_from_one() {
    let log = log_with_game(Duration::from_millis(50)).await;
    let update = log.join(&join("g1_alice", Side::A)).await.expect("join");
    assert_eq!(update.seed, Seed::from("s1"));
    assert_eq!(update.events.len(), 1);
    assert_eq!(update.events[0].number, 1);
    assert_eq!(update.events[0].kind, "join_side");
}

#[tokio::test]
async fn test_guess_side_comes_from_roster() {
    let log = log_with_game(Duration::from_millis(50)).await;
    log.join(&join("g1_alice", Side::B)).await.expect("join");

    let update = log.guess(&guess("g1_alice", 3, 1)).await.expect("guess");
    assert_eq!(update.events.len(), 1);
    assert_eq!(update.events[0].side.as_deref(), Some("b"));
    assert_eq!(update.events[0].index, Some(3));
}

#[tokio::test]
async fn test_unjoined_guess_has_no_side() {
    let log = log_with_game(Duration::from_millis(50)).await;
    let update = log.guess(&guess("g1_mallory", 3, 0)).await.expect("guess");
    assert_eq!(update.events[0].side, None);
}

#[tokio::test]
async fn test_idle_poll_returns_empty_after_hold() {
    let log = log_with_game(Duration::from_millis(50)).await;
    let update = log.events(&poll("s1", 0)).await.expect("poll");
    assert_eq!(update.seed, Seed::from("s1"));
    assert!(update.events.is_empty());
}

#[tokio::test]
async fn test_poll_wakes_on_append() {
    let log = log_with_game(Duration::from_secs(10)).await;

    let waiter = {
        let log = log.clone();
        tokio::spawn(async move { log.events(&poll("s1", 0)).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    log.join(&join("g1_bob", Side::A)).await.expect("join");

    let update = tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .expect("poll woke before timeout")
        .expect("task")
        .expect("poll");
    assert_eq!(update.events.len(), 1);
}

#[tokio::test]
async fn test_poll_returns_only_newer_events() {
    let log = log_with_game(Duration::from_millis(50)).await;
    log.join(&join("g1_alice", Side::A)).await.expect("join");
    log.join(&join("g1_bob", Side::B)).await.expect("join");

    let update = log.events(&poll("s1", 1)).await.expect("poll");
    let numbers: Vec<_> = update.events.iter().map(|e| e.number).collect();
    assert_eq!(numbers, [2]);
}

#[tokio::test]
async fn test_stale_seed_gets_full_history_of_current_seed() {
    let log = log_with_game(Duration::from_millis(50)).await;
    log.join(&join("g1_alice", Side::A)).await.expect("join");

    let update = log.events(&poll("s0", 5)).await.expect("poll");
    assert_eq!(update.seed, Seed::from("s1"));
    assert_eq!(update.events.len(), 1);
}

#[tokio::test]
async fn test_stale_guess_is_not_appended() {
    let log = log_with_game(Duration::from_millis(50)).await;
    let mut request = guess("g1_alice", 3, 0);
    request.seed = "s0".into();
    log.guess(&request).await.expect("guess");

    let snapshot = log.game_state(&GameId::from("g1")).await.expect("state");
    assert!(snapshot.events.is_empty());
}

#[tokio::test]
async fn test_reseed_clears_history_and_wakes_polls() {
    let log = log_with_game(Duration::from_secs(10)).await;
    log.join(&join("g1_alice", Side::A)).await.expect("join");

    let waiter = {
        let log = log.clone();
        tokio::spawn(async move { log.events(&poll("s1", 1)).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    log.create(new_game("g1", "s2")).await.expect("reseed");

    let update = tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .expect("poll woke before timeout")
        .expect("task")
        .expect("poll");
    assert_eq!(update.seed, Seed::from("s2"));
    assert!(update.events.is_empty());

    let snapshot = log.game_state(&GameId::from("g1")).await.expect("state");
    assert_eq!(snapshot.seed, Seed::from("s2"));
    assert!(snapshot.events.is_empty());
}

#[tokio::test]
async fn test_leave_appends_player_left() {
    let log = log_with_game(Duration::from_millis(50)).await;
    log.join(&join("g1_alice", Side::A)).await.expect("join");
    let update = log.leave(&leave("g1_alice", "s1", 1)).await.expect("leave");
    assert_eq!(update.events.len(), 1);
    assert_eq!(update.events[0].kind, "player_left");
    assert_eq!(update.events[0].side.as_deref(), Some("a"));

    let snapshot = log.game_state(&GameId::from("g1")).await.expect("state");
    assert_eq!(snapshot.events.len(), 2);
    assert_eq!(snapshot.events[1].kind, "player_left");

    // A guess after leaving carries no side.
    let update = log.guess(&guess("g1_alice", 3, 2)).await.expect("guess");
    assert_eq!(update.events[0].side, None);
}

#[tokio::test]
async fn test_leave_without_side_or_under_stale_seed_appends_nothing() {
    let log = log_with_game(Duration::from_millis(50)).await;
    let update = log.leave(&leave("g1_bob", "s1", 0)).await.expect("leave");
    assert!(update.events.is_empty());

    log.join(&join("g1_alice", Side::A)).await.expect("join");
    let update = log.leave(&leave("g1_alice", "s0", 1)).await.expect("stale leave");
    assert_eq!(update.seed, Seed::from("s1"));
    assert_eq!(update.events.len(), 1);
    assert_eq!(update.events[0].kind, "join_side");
}

#[tokio::test]
async fn test_unknown_game_is_rejected() {
    let log = MemoryLog::with_hold(Duration::from_millis(50));
    let err = log
        .game_state(&GameId::from("nope"))
        .await
        .expect_err("unknown game");
    assert!(matches!(err, AuthorityError::UnknownGame { .. }));
}

#[tokio::test]
async fn test_invalid_board_is_rejected() {
    let log = MemoryLog::with_hold(Duration::from_millis(50));
    let mut request = new_game("g1", "s1");
    request.words.pop();
    let err = log.create(request).await.expect_err("short word list");
    assert!(matches!(err, AuthorityError::InvalidBoard { .. }));
}

#[tokio::test]
async fn test_empty_chat_is_rejected() {
    let log = log_with_game(Duration::from_millis(50)).await;
    let request = ChatRequest {
        game_id: "g1".into(),
        seed: "s1".into(),
        player_id: "g1_alice".to_string(),
        name: "Alice".to_string(),
        message: "  ".to_string(),
        last_applied: 0,
    };
    let err = log.chat(&request).await.expect_err("empty chat");
    assert_eq!(err, AuthorityError::EmptyMessage);
}
