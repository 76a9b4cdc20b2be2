//! Derived match status.

use crate::{GameSession, Side};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Where a match stands.
///
/// A pure view over a session; nothing stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    /// No guess has been made yet.
    #[display("Waiting for the first guess")]
    Start,
    /// Guessing is under way.
    #[display(
        "Side {turn} to guess, {remaining_green} green left, {tokens_consumed} tokens used"
    )]
    InProgress {
        /// Side expected to guess next.
        turn: Side,
        /// Green cells still hidden.
        remaining_green: usize,
        /// Turn tokens spent.
        tokens_consumed: u32,
    },
    /// The assassin was exposed.
    #[display("Lost: assassin found with {remaining_green} green left")]
    Lost {
        /// Green cells still hidden at the time of the loss.
        remaining_green: usize,
    },
    /// Every green cell was found.
    #[display("Won using {tokens_consumed} tokens")]
    Won {
        /// Turn tokens spent.
        tokens_consumed: u32,
    },
}

impl Status {
    /// Whether the match has ended.
    pub fn is_finished(&self) -> bool {
        matches!(self, Status::Lost { .. } | Status::Won { .. })
    }
}

/// Evaluates a session's status.
///
/// A black cell loses the match even if the same guess found the last green.
#[instrument(skip(session), fields(game_id = %session.id()))]
pub fn status(session: &GameSession) -> Status {
    let board = session.board();
    let remaining_green = board.remaining_green();

    if board.black_exposed() {
        return Status::Lost { remaining_green };
    }
    if remaining_green == 0 {
        return Status::Won {
            tokens_consumed: session.tokens_consumed(),
        };
    }
    match session.turn() {
        None => Status::Start,
        Some(turn) => Status::InProgress {
            turn,
            remaining_green,
            tokens_consumed: session.tokens_consumed(),
        },
    }
}

impl GameSession {
    /// Current status of the match.
    pub fn status(&self) -> Status {
        status(self)
    }
}
