//! In-process authoritative event log.
//!
//! Holds one append-only log per game, numbers events from 1, and answers
//! long polls as soon as something newer than the caller's `last_applied`
//! exists. Reseeding a game discards its history and roster.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use strictly_duet::{
    Board, Event, EventKind, EventNumber, GameId, PlayerId, Seed, Side, Snapshot, WireEvent,
};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::error::{AuthorityError, RemoteError};
use crate::protocol::{
    ChatRequest, GuessRequest, JoinRequest, LeaveRequest, NewGameRequest, PollRequest, Update,
};
use crate::remote::RemoteLog;

/// Default time a long poll is held open when nothing is new.
pub const DEFAULT_HOLD: Duration = Duration::from_secs(30);

/// One game's authoritative state.
#[derive(Debug)]
struct GameLog {
    seed: Seed,
    words: Vec<String>,
    layout_a: Vec<String>,
    layout_b: Vec<String>,
    events: Vec<Event>,
    players: HashMap<PlayerId, Side>,
    /// Bumped on every append or reseed; long polls wait on it.
    changes: watch::Sender<u64>,
}

impl GameLog {
    fn append(&mut self, kind: EventKind) -> EventNumber {
        let number = self.events.len() as EventNumber + 1;
        let event = Event::new(number, kind);
        debug!(event = %event, "Appended event");
        self.events.push(event);
        self.changes.send_modify(|version| *version += 1);
        number
    }

    fn has_newer(&self, seed: &Seed, last_applied: EventNumber) -> bool {
        &self.seed != seed || self.events.last().is_some_and(|e| e.number > last_applied)
    }

    /// Events the caller has not seen; the full history under a stale seed.
    fn update_for(&self, seed: &Seed, last_applied: EventNumber) -> Update {
        let after = if &self.seed == seed { last_applied } else { 0 };
        Update {
            seed: self.seed.clone(),
            events: self
                .events
                .iter()
                .filter(|e| e.number > after)
                .map(WireEvent::from)
                .collect(),
        }
    }

    fn snapshot(&self, game_id: &GameId) -> Snapshot {
        Snapshot {
            id: game_id.clone(),
            seed: self.seed.clone(),
            words: self.words.clone(),
            layout_a: self.layout_a.clone(),
            layout_b: self.layout_b.clone(),
            events: self.events.iter().map(WireEvent::from).collect(),
        }
    }
}

/// Shared in-memory authority for any number of games.
#[derive(Debug, Clone)]
pub struct MemoryLog {
    games: Arc<Mutex<HashMap<GameId, GameLog>>>,
    hold: Duration,
}

impl MemoryLog {
    /// Creates an empty authority holding idle polls for [`DEFAULT_HOLD`].
    #[instrument]
    pub fn new() -> Self {
        Self::with_hold(DEFAULT_HOLD)
    }

    /// Creates an empty authority with a custom long-poll hold time.
    #[instrument]
    pub fn with_hold(hold: Duration) -> Self {
        info!("Creating memory log");
        Self {
            games: Arc::new(Mutex::new(HashMap::new())),
            hold,
        }
    }

    /// Creates a game, or reseeds an existing one.
    ///
    /// Reseeding replaces the board, clears history and roster, and wakes
    /// every waiting poll so clients see the new seed.
    ///
    /// # Errors
    ///
    /// Returns `AuthorityError::InvalidBoard` if the board inputs would not
    /// build a session.
    #[instrument(skip(self, request), fields(game_id = %request.game_id, seed = %request.seed))]
    pub async fn create(&self, request: NewGameRequest) -> Result<Snapshot, AuthorityError> {
        let snapshot = Snapshot::from(request);
        let (layout_a, layout_b) = snapshot.keycards().map_err(|e| AuthorityError::InvalidBoard {
            reason: e.message,
        })?;
        Board::from_layouts(&snapshot.words, &layout_a, &layout_b).map_err(|e| {
            AuthorityError::InvalidBoard { reason: e.message }
        })?;

        let mut games = self.games.lock().await;
        match games.get_mut(&snapshot.id) {
            Some(log) => {
                info!(previous_seed = %log.seed, "Reseeding game");
                log.seed = snapshot.seed.clone();
                log.words = snapshot.words.clone();
                log.layout_a = snapshot.layout_a.clone();
                log.layout_b = snapshot.layout_b.clone();
                log.events.clear();
                log.players.clear();
                log.changes.send_modify(|version| *version += 1);
            }
            None => {
                info!("Creating game");
                let (changes, _) = watch::channel(0);
                games.insert(
                    snapshot.id.clone(),
                    GameLog {
                        seed: snapshot.seed.clone(),
                        words: snapshot.words.clone(),
                        layout_a: snapshot.layout_a.clone(),
                        layout_b: snapshot.layout_b.clone(),
                        events: Vec::new(),
                        players: HashMap::new(),
                        changes,
                    },
                );
            }
        }
        Ok(snapshot)
    }

    /// Returns a game's board inputs and full history.
    #[instrument(skip(self))]
    pub async fn game_state(&self, game_id: &GameId) -> Result<Snapshot, AuthorityError> {
        let games = self.games.lock().await;
        let log = lookup(&games, game_id)?;
        Ok(log.snapshot(game_id))
    }

    /// Long poll: returns as soon as there are events after
    /// `request.last_applied` or the seed differs, or empty-handed once the
    /// hold time passes.
    #[instrument(skip(self, request), fields(game_id = %request.game_id, last_applied = request.last_applied))]
    pub async fn events(&self, request: &PollRequest) -> Result<Update, AuthorityError> {
        let mut changes = {
            let games = self.games.lock().await;
            let log = lookup(&games, &request.game_id)?;
            if log.has_newer(&request.seed, request.last_applied) {
                return Ok(log.update_for(&request.seed, request.last_applied));
            }
            log.changes.subscribe()
        };

        let deadline = tokio::time::Instant::now() + self.hold;
        loop {
            match tokio::time::timeout_at(deadline, changes.changed()).await {
                Ok(Ok(())) => {
                    let games = self.games.lock().await;
                    let log = lookup(&games, &request.game_id)?;
                    if log.has_newer(&request.seed, request.last_applied) {
                        return Ok(log.update_for(&request.seed, request.last_applied));
                    }
                }
                Ok(Err(_)) | Err(_) => {
                    debug!("Long poll expired with nothing new");
                    let games = self.games.lock().await;
                    let log = lookup(&games, &request.game_id)?;
                    return Ok(log.update_for(&request.seed, request.last_applied));
                }
            }
        }
    }

    /// Appends a guess by the requesting player.
    ///
    /// The side comes from the roster; a player who has not joined produces a
    /// guess with no side. A stale seed appends nothing and returns the
    /// current generation's history.
    #[instrument(skip(self, request), fields(game_id = %request.game_id, index = request.index))]
    pub async fn guess(&self, request: &GuessRequest) -> Result<Update, AuthorityError> {
        let mut games = self.games.lock().await;
        let log = lookup_mut(&mut games, &request.game_id)?;
        if log.seed != request.seed {
            warn!("Guess against a stale seed, not appending");
            return Ok(log.update_for(&request.seed, request.last_applied));
        }

        let side = log.players.get(&request.player_id).copied();
        if side.is_none() {
            warn!(player_id = %request.player_id, "Guess from a player without a side");
        }
        log.append(EventKind::Guess {
            index: Some(request.index),
            side,
        });
        Ok(log.update_for(&request.seed, request.last_applied))
    }

    /// Seats the requesting player on a side.
    #[instrument(skip(self, request), fields(game_id = %request.game_id, side = %request.side))]
    pub async fn join(&self, request: &JoinRequest) -> Result<Update, AuthorityError> {
        let mut games = self.games.lock().await;
        let log = lookup_mut(&mut games, &request.game_id)?;
        if log.seed != request.seed {
            warn!("Join against a stale seed, not appending");
            return Ok(log.update_for(&request.seed, request.last_applied));
        }

        log.players.insert(request.player_id.clone(), request.side);
        log.append(EventKind::JoinSide {
            player_id: request.player_id.clone(),
            side: request.side,
        });
        Ok(log.update_for(&request.seed, request.last_applied))
    }

    /// Removes the requesting player from the roster.
    ///
    /// A player without a side appends nothing.
    #[instrument(skip(self, request), fields(game_id = %request.game_id, player_id = %request.player_id))]
    pub async fn leave(&self, request: &LeaveRequest) -> Result<Update, AuthorityError> {
        let mut games = self.games.lock().await;
        let log = lookup_mut(&mut games, &request.game_id)?;
        if log.seed != request.seed {
            warn!("Leave against a stale seed, not appending");
            return Ok(log.update_for(&request.seed, request.last_applied));
        }

        match log.players.remove(&request.player_id) {
            Some(side) => {
                log.append(EventKind::PlayerLeft {
                    player_id: request.player_id.clone(),
                    side: Some(side),
                });
            }
            None => debug!("Leaving player held no side"),
        }
        Ok(log.update_for(&request.seed, request.last_applied))
    }

    /// Appends a chat line.
    #[instrument(skip(self, request), fields(game_id = %request.game_id))]
    pub async fn chat(&self, request: &ChatRequest) -> Result<Update, AuthorityError> {
        if request.message.trim().is_empty() {
            return Err(AuthorityError::EmptyMessage);
        }

        let mut games = self.games.lock().await;
        let log = lookup_mut(&mut games, &request.game_id)?;
        if log.seed != request.seed {
            warn!("Chat against a stale seed, not appending");
            return Ok(log.update_for(&request.seed, request.last_applied));
        }

        let side = log.players.get(&request.player_id).copied();
        log.append(EventKind::Chat {
            name: request.name.clone(),
            message: request.message.clone(),
            side,
        });
        Ok(log.update_for(&request.seed, request.last_applied))
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup<'a>(
    games: &'a HashMap<GameId, GameLog>,
    game_id: &GameId,
) -> Result<&'a GameLog, AuthorityError> {
    games.get(game_id).ok_or_else(|| AuthorityError::UnknownGame {
        game_id: game_id.to_string(),
    })
}

fn lookup_mut<'a>(
    games: &'a mut HashMap<GameId, GameLog>,
    game_id: &GameId,
) -> Result<&'a mut GameLog, AuthorityError> {
    games.get_mut(game_id).ok_or_else(|| AuthorityError::UnknownGame {
        game_id: game_id.to_string(),
    })
}

#[async_trait::async_trait]
impl RemoteLog for MemoryLog {
    async fn snapshot(&self, game_id: &GameId) -> Result<Snapshot, RemoteError> {
        Ok(self.game_state(game_id).await?)
    }

    async fn poll(&self, request: &PollRequest) -> Result<Update, RemoteError> {
        Ok(self.events(request).await?)
    }

    async fn guess(&self, request: &GuessRequest) -> Result<Update, RemoteError> {
        Ok(MemoryLog::guess(self, request).await?)
    }

    async fn join(&self, request: &JoinRequest) -> Result<Update, RemoteError> {
        Ok(MemoryLog::join(self, request).await?)
    }

    async fn leave(&self, request: &LeaveRequest) -> Result<Update, RemoteError> {
        Ok(MemoryLog::leave(self, request).await?)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<Update, RemoteError> {
        Ok(MemoryLog::chat(self, request).await?)
    }
}
