//! Request and response shapes exchanged with the remote log.

use serde::{Deserialize, Serialize};
use strictly_duet::{EventNumber, GameId, GameSession, PlayerId, Seed, Side, Snapshot, WireEvent};

/// Identifies the game generation a request was issued for.
///
/// Responses carry the tag of their request back to the sync client, which
/// drops any whose tag no longer names the current session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTag {
    /// Game the request targeted.
    pub game_id: GameId,
    /// Generation the request targeted.
    pub seed: Seed,
}

impl RequestTag {
    /// Tag for requests issued against `session`.
    pub fn of(session: &GameSession) -> Self {
        Self {
            game_id: session.id().clone(),
            seed: session.seed().clone(),
        }
    }

    /// Whether this tag names `session`'s generation.
    pub fn matches(&self, session: &GameSession) -> bool {
        session.is_generation(&self.game_id, &self.seed)
    }
}

/// Body of `/game-state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRequest {
    /// Game to load.
    pub game_id: GameId,
}

/// Body of `/events`: wait for events after `last_applied`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollRequest {
    /// Game to watch.
    pub game_id: GameId,
    /// Generation the caller holds.
    pub seed: Seed,
    /// Who is asking.
    pub player_id: PlayerId,
    /// Newest event the caller has applied.
    pub last_applied: EventNumber,
}

impl PollRequest {
    /// The generation this request was issued for.
    pub fn tag(&self) -> RequestTag {
        RequestTag {
            game_id: self.game_id.clone(),
            seed: self.seed.clone(),
        }
    }
}

/// Body of `/guess`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRequest {
    /// Target game.
    pub game_id: GameId,
    /// Generation the guess was made against.
    pub seed: Seed,
    /// Guessing player. The authority derives the side from its roster.
    pub player_id: PlayerId,
    /// Cell position.
    pub index: i64,
    /// Newest event the caller has applied.
    pub last_applied: EventNumber,
}

/// Body of `/join`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Target game.
    pub game_id: GameId,
    /// Generation the caller holds.
    pub seed: Seed,
    /// Joining player.
    pub player_id: PlayerId,
    /// Side to take.
    pub side: Side,
    /// Newest event the caller has applied.
    pub last_applied: EventNumber,
}

/// Body of `/leave`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Target game.
    pub game_id: GameId,
    /// Generation the caller holds.
    pub seed: Seed,
    /// Departing player.
    pub player_id: PlayerId,
    /// Newest event the caller has applied.
    pub last_applied: EventNumber,
}

/// Body of `/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Target game.
    pub game_id: GameId,
    /// Generation the caller holds.
    pub seed: Seed,
    /// Speaking player.
    pub player_id: PlayerId,
    /// Display name shown with the message.
    pub name: String,
    /// Message text.
    pub message: String,
    /// Newest event the caller has applied.
    pub last_applied: EventNumber,
}

/// Body of `/new-game`. Creates a game, or reseeds an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameRequest {
    /// Game to create or replace.
    pub game_id: GameId,
    /// New generation marker.
    pub seed: Seed,
    /// The 25 words.
    pub words: Vec<String>,
    /// Side A's keycard.
    pub layout_a: Vec<String>,
    /// Side B's keycard.
    pub layout_b: Vec<String>,
}

impl From<NewGameRequest> for Snapshot {
    fn from(req: NewGameRequest) -> Self {
        Snapshot {
            id: req.game_id,
            seed: req.seed,
            words: req.words,
            layout_a: req.layout_a,
            layout_b: req.layout_b,
            events: Vec::new(),
        }
    }
}

/// Events the caller has not seen, stamped with the authority's current seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    /// The authority's current generation.
    pub seed: Seed,
    /// Events after the caller's `last_applied`, or the full history when
    /// the caller's seed is stale.
    #[serde(default)]
    pub events: Vec<WireEvent>,
}

/// Error payload returned with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}
