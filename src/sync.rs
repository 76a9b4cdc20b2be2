//! The sync client: a pure state machine over one game generation.
//!
//! The client owns the current session and the single standing poll. Every
//! result, from a poll or from a submission, funnels through
//! [`merge_update`], so the session has one state transition regardless of
//! where its events came from. Effects are returned as data for the driver to
//! execute.

use strictly_duet::{decode_batch, GameSession};
use tracing::{debug, info, instrument, warn};

use crate::error::RemoteError;
use crate::protocol::{PollRequest, RequestTag, Update};

/// Work the driver should perform after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue this long poll.
    Poll(PollRequest),
    /// New events were appended; the history view should follow them.
    ScrollToLatest,
}

/// Result of merging one update into a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The update belonged to this generation and was folded in.
    Continue {
        /// The session after merging.
        session: GameSession,
        /// Follow-up work.
        effects: Vec<Effect>,
    },
    /// The authority's seed differs: the session was replaced and must be
    /// rebuilt from a fresh snapshot.
    Invalidated,
}

/// Merges an update into a session.
///
/// A seed mismatch merges nothing. Otherwise the events are decoded and
/// folded in arrival order; already-applied numbers are skipped by the
/// reducer.
#[instrument(
    skip(session, update),
    fields(game_id = %session.id(), seed = %session.seed(), events = update.events.len())
)]
pub fn merge_update(session: GameSession, update: Update) -> Transition {
    if &update.seed != session.seed() {
        info!(remote_seed = %update.seed, "Session replaced remotely");
        return Transition::Invalidated;
    }

    let before = session.last_applied();
    let events = decode_batch(update.events);
    let session = session.apply_all(&events);

    let mut effects = Vec::new();
    if session.last_applied() > before {
        debug!(from = before, to = session.last_applied(), "Merged new events");
        effects.push(Effect::ScrollToLatest);
    }
    Transition::Continue { session, effects }
}

/// Lifecycle of a sync client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SyncState {
    /// Holding a live session with one poll outstanding.
    #[display("polling")]
    Polling,
    /// The session was replaced; every response is ignored until
    /// [`SyncClient::replace`].
    #[display("invalidated")]
    Invalidated,
}

/// What a response did to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStep {
    /// The response was stale or arrived after invalidation; nothing changed.
    Ignored,
    /// The response was handled; execute these effects.
    Continue(Vec<Effect>),
    /// The session was replaced remotely.
    Invalidated,
}

/// Keeps a local session consistent with the remote log.
#[derive(Debug, Clone)]
pub struct SyncClient {
    session: GameSession,
    state: SyncState,
}

impl SyncClient {
    /// Starts polling for `session`.
    #[instrument(skip(session), fields(game_id = %session.id(), seed = %session.seed()))]
    pub fn new(session: GameSession) -> Self {
        info!(last_applied = session.last_applied(), "Sync client started");
        Self {
            session,
            state: SyncState::Polling,
        }
    }

    /// The current session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Tag for requests issued now.
    pub fn tag(&self) -> RequestTag {
        RequestTag::of(&self.session)
    }

    /// The poll to have outstanding for the current session.
    pub fn poll_request(&self) -> PollRequest {
        PollRequest {
            game_id: self.session.id().clone(),
            seed: self.session.seed().clone(),
            player_id: self.session.local_player().player_id().clone(),
            last_applied: self.session.last_applied(),
        }
    }

    /// Handles the result of a long poll.
    ///
    /// Success merges and re-issues the poll from the new `last_applied`;
    /// failure re-issues the same poll.
    #[instrument(skip(self, result), fields(game_id = %tag.game_id, seed = %tag.seed))]
    pub fn on_poll_response(
        &mut self,
        tag: RequestTag,
        result: Result<Update, RemoteError>,
    ) -> SyncStep {
        if !self.accepts(&tag) {
            return SyncStep::Ignored;
        }

        match result {
            Ok(update) => match self.merge(update) {
                SyncStep::Continue(mut effects) => {
                    effects.push(Effect::Poll(self.poll_request()));
                    SyncStep::Continue(effects)
                }
                other => other,
            },
            Err(e) => {
                warn!(error = %e, "Poll failed, retrying");
                SyncStep::Continue(vec![Effect::Poll(self.poll_request())])
            }
        }
    }

    /// Handles the result of any submission (guess, join, leave, chat).
    ///
    /// The standing poll is unaffected, so no poll effect is produced.
    /// Failures are not retried.
    #[instrument(skip(self, result), fields(game_id = %tag.game_id, seed = %tag.seed))]
    pub fn on_submit_response(
        &mut self,
        tag: RequestTag,
        result: Result<Update, RemoteError>,
    ) -> SyncStep {
        if !self.accepts(&tag) {
            return SyncStep::Ignored;
        }

        match result {
            Ok(update) => self.merge(update),
            Err(e) => {
                warn!(error = %e, "Submission failed");
                SyncStep::Continue(Vec::new())
            }
        }
    }

    /// Installs a freshly built session and resumes polling.
    ///
    /// Responses still in flight for the previous generation are ignored.
    #[instrument(skip(self, session), fields(game_id = %session.id(), seed = %session.seed()))]
    pub fn replace(&mut self, session: GameSession) {
        info!(
            previous_seed = %self.session.seed(),
            last_applied = session.last_applied(),
            "Installing replacement session"
        );
        self.session = session;
        self.state = SyncState::Polling;
    }

    fn accepts(&self, tag: &RequestTag) -> bool {
        if self.state == SyncState::Invalidated {
            debug!("Ignoring response after invalidation");
            return false;
        }
        if !tag.matches(&self.session) {
            debug!("Ignoring stale response");
            return false;
        }
        true
    }

    fn merge(&mut self, update: Update) -> SyncStep {
        match merge_update(self.session.clone(), update) {
            Transition::Continue { session, effects } => {
                self.session = session;
                SyncStep::Continue(effects)
            }
            Transition::Invalidated => {
                self.state = SyncState::Invalidated;
                SyncStep::Invalidated
            }
        }
    }
}
