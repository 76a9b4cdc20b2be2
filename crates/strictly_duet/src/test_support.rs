//! Shared fixtures for unit tests.

use crate::{Board, Color, Event, EventKind, GameSession, Identity, Side, BOARD_SIZE};

/// A board where all cells are tan for both sides except:
/// cell 0 green for A, cell 1 green for B, cell 2 black for A.
pub(crate) fn session() -> GameSession {
    let words: Vec<String> = (0..BOARD_SIZE).map(|i| format!("w{}", i)).collect();
    let mut layout_a = vec![Color::Tan; BOARD_SIZE];
    let mut layout_b = vec![Color::Tan; BOARD_SIZE];
    layout_a[0] = Color::Green;
    layout_b[1] = Color::Green;
    layout_a[2] = Color::Black;
    let board = Board::from_layouts(&words, &layout_a, &layout_b).expect("board");
    GameSession::new(
        "g1".into(),
        "s1".into(),
        board,
        Identity::new("g1_alice".to_string(), "Alice".to_string()),
    )
}

pub(crate) fn guess(number: u64, index: i64, side: Side) -> Event {
    Event::new(
        number,
        EventKind::Guess {
            index: Some(index),
            side: Some(side),
        },
    )
}
