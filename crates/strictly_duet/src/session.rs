//! The game session aggregate and the snapshot it is built from.

use crate::{Board, Color, Event, EventNumber, PlayerId, Side, SnapshotError, WireEvent};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Opaque identifier of a game.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque generation marker of a game.
///
/// A new seed under the same [`GameId`] means the old session was destroyed
/// and replaced; nothing carries over.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Seed(String);

impl Seed {
    /// Returns the seed as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Who is looking at the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, new)]
pub struct Identity {
    /// Player identifier issued outside this crate.
    player_id: PlayerId,
    /// Display name.
    name: String,
}

/// Everything needed to construct a session: board inputs plus prior history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Game identifier.
    pub id: GameId,
    /// Generation marker.
    pub seed: Seed,
    /// The 25 words in board order.
    pub words: Vec<String>,
    /// Side A's keycard, one color label per cell.
    pub layout_a: Vec<String>,
    /// Side B's keycard, one color label per cell.
    pub layout_b: Vec<String>,
    /// History so far, in increasing number order.
    #[serde(default)]
    pub events: Vec<WireEvent>,
}

impl Snapshot {
    /// Parses both keycards into colors.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` naming the first entry that is not a color.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn keycards(&self) -> Result<(Vec<Color>, Vec<Color>), SnapshotError> {
        let parse = |name: &str, layout: &[String]| {
            layout
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    Color::from_layout(label).ok_or_else(|| {
                        SnapshotError::new(format!("{}[{}] is not a color: {:?}", name, i, label))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        };
        Ok((parse("layout_a", &self.layout_a)?, parse("layout_b", &self.layout_b)?))
    }
}

/// A locally reconstructed game, the aggregate root of the reducer.
///
/// Only [`GameSession::apply`] changes a session after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub(crate) id: GameId,
    pub(crate) seed: Seed,
    pub(crate) players: HashMap<PlayerId, Side>,
    pub(crate) events: Vec<Event>,
    pub(crate) last_applied: EventNumber,
    pub(crate) board: Board,
    pub(crate) local_player: Identity,
    pub(crate) turn: Option<Side>,
    pub(crate) tokens_consumed: u32,
}

impl GameSession {
    /// Creates a session with no history.
    pub fn new(id: GameId, seed: Seed, board: Board, local_player: Identity) -> Self {
        Self {
            id,
            seed,
            players: HashMap::new(),
            events: Vec::new(),
            last_applied: 0,
            board,
            local_player,
            turn: None,
            tokens_consumed: 0,
        }
    }

    /// Builds a session from a snapshot, folding its history through the reducer.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the board inputs are malformed.
    #[instrument(skip(snapshot, local_player), fields(game_id = %snapshot.id, seed = %snapshot.seed))]
    pub fn from_snapshot(snapshot: Snapshot, local_player: Identity) -> Result<Self, SnapshotError> {
        let (layout_a, layout_b) = snapshot.keycards()?;
        let board = Board::from_layouts(&snapshot.words, &layout_a, &layout_b)?;
        let history = crate::decode_batch(snapshot.events);

        let session =
            Self::new(snapshot.id, snapshot.seed, board, local_player).apply_all(&history);

        info!(
            events = session.events.len(),
            last_applied = session.last_applied,
            "Session constructed from snapshot"
        );
        Ok(session)
    }

    /// Game identifier.
    pub fn id(&self) -> &GameId {
        &self.id
    }

    /// Generation marker.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Current roster.
    pub fn players(&self) -> &HashMap<PlayerId, Side> {
        &self.players
    }

    /// Applied events, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Applied events, newest first, for display.
    pub fn events_newest_first(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().rev()
    }

    /// Number of the newest applied event, or 0 before any.
    pub fn last_applied(&self) -> EventNumber {
        self.last_applied
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The viewer's identity.
    pub fn local_player(&self) -> &Identity {
        &self.local_player
    }

    /// The viewer's side, derived from the roster.
    pub fn local_side(&self) -> Option<Side> {
        self.players.get(self.local_player.player_id()).copied()
    }

    /// Side expected to guess next; `None` before the first guess.
    pub fn turn(&self) -> Option<Side> {
        self.turn
    }

    /// Turn-ending tokens spent so far.
    pub fn tokens_consumed(&self) -> u32 {
        self.tokens_consumed
    }

    /// Whether this session belongs to the given game generation.
    pub fn is_generation(&self, id: &GameId, seed: &Seed) -> bool {
        &self.id == id && &self.seed == seed
    }
}
