//! Strictly Duet - event-sourced game logic for a two-sided word board
//!
//! Two sides share a 5x5 board of words. Each side holds a private keycard
//! marking every word green, black or tan, and guesses the words the other
//! side clues. All state is derived by folding an append-only log of numbered
//! events through a pure reducer.
//!
//! # Architecture
//!
//! - **Board**: 25 cells with per-side exposure and keycard color
//! - **Event**: numbered facts (join, leave, guess, chat) and their wire shape
//! - **Session**: the aggregate root, built from a snapshot
//! - **Reducer**: `GameSession::apply`, idempotent under duplicate delivery
//! - **Accounting**: turn passing and token spending per guess
//! - **Status**: start, in progress, won or lost
//! - **Invariants**: properties checked after every transition in debug builds
//!
//! # Example
//!
//! ```
//! use strictly_duet::{Event, EventKind, GameSession, Identity, Side, Snapshot, Status};
//!
//! # fn example() -> Result<(), strictly_duet::SnapshotError> {
//! let snapshot = Snapshot {
//!     id: "g1".into(),
//!     seed: "s1".into(),
//!     words: (0..25).map(|i| format!("word{}", i)).collect(),
//!     layout_a: vec!["t".to_string(); 25],
//!     layout_b: vec!["t".to_string(); 25],
//!     events: Vec::new(),
//! };
//! let me = Identity::new("g1_alice".to_string(), "Alice".to_string());
//! let session = GameSession::from_snapshot(snapshot, me)?;
//! assert_eq!(session.status(), Status::Start);
//!
//! let guess = Event::new(1, EventKind::Guess { index: Some(3), side: Some(Side::A) });
//! let session = session.apply(&guess);
//! assert_eq!(session.turn(), Some(Side::B));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod color;
mod error;
mod event;
mod reducer;
mod session;
mod side;
mod status;

pub mod accounting;
pub mod invariants;

#[cfg(test)]
mod test_support;

// Crate-level exports - Value types
pub use color::Color;
pub use side::Side;

// Crate-level exports - Board model
pub use board::{Board, Cell, CellIndex, SideState, BOARD_SIZE, GREEN_TOTAL};

// Crate-level exports - Events
pub use event::{decode_batch, Event, EventKind, EventNumber, PlayerId, WireEvent};

// Crate-level exports - Session
pub use session::{GameId, GameSession, Identity, Seed, Snapshot};

// Crate-level exports - Status
pub use status::{status, Status};

// Crate-level exports - Accounting
pub use accounting::{account_guess, GuessAccounting};

// Crate-level exports - Errors
pub use error::{EventDecodeError, SnapshotError};
