//! Async driver: runs a sync client against a remote log.
//!
//! The driver owns the client, executes its effects as tokio tasks, and
//! routes every tagged response back into the client over one channel, so
//! the session is only ever touched from the driver loop.

use std::sync::Arc;
use std::time::Duration;

use strictly_duet::{GameId, GameSession, Identity, Side, Status};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::config::PollConfig;
use crate::error::RemoteError;
use crate::protocol::{PollRequest, RequestTag, Update};
use crate::remote::RemoteLog;
use crate::submit::{submit_chat, submit_guess, submit_join, submit_leave};
use crate::sync::{Effect, SyncClient, SyncStep};

/// Requests from the view to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Guess the cell at this index.
    Guess(i64),
    /// Take a side.
    Join(Side),
    /// Give up the held side.
    Leave,
    /// Post a chat message.
    Chat(String),
}

/// Notifications from the driver to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The first session was built from a snapshot.
    SessionLoaded(Status),
    /// New events were merged.
    Updated {
        /// Status after the merge.
        status: Status,
        /// Whether the history view should follow the newest event.
        scroll_to_latest: bool,
    },
    /// The game was reseeded and the session rebuilt.
    SessionReplaced(Status),
    /// A submission did not reach the authority. It is not retried.
    SubmitFailed {
        /// Why it failed.
        reason: String,
    },
}

/// Capped exponential delay between failed polls.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Option<Duration>,
}

impl Backoff {
    /// Creates a backoff starting at `base` and doubling up to `max`.
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            current: None,
        }
    }

    /// Delay before the next retry. A zero base always retries at once.
    pub fn next_delay(&mut self) -> Duration {
        let delay = match self.current {
            None => self.base,
            Some(previous) => previous.saturating_mul(2),
        }
        .min(self.max);
        self.current = Some(delay);
        delay
    }

    /// Forgets past failures.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

impl From<&PollConfig> for Backoff {
    fn from(config: &PollConfig) -> Self {
        Self::new(config.retry_base(), config.retry_max())
    }
}

/// A response routed back to the driver loop.
enum Response {
    Poll(RequestTag, Result<Update, RemoteError>),
    Submit(RequestTag, Result<Update, RemoteError>),
}

/// Runs one player's view of one game.
pub struct Driver {
    remote: Arc<dyn RemoteLog>,
    game_id: GameId,
    identity: Identity,
    backoff: Backoff,
    views: mpsc::UnboundedSender<ViewEvent>,
}

impl Driver {
    /// Creates a driver. Nothing happens until [`Driver::run`].
    pub fn new(
        remote: Arc<dyn RemoteLog>,
        game_id: GameId,
        identity: Identity,
        poll: &PollConfig,
        views: mpsc::UnboundedSender<ViewEvent>,
    ) -> Self {
        Self {
            remote,
            game_id,
            identity,
            backoff: Backoff::from(poll),
            views,
        }
    }

    /// Loads the game and keeps it synchronized until `commands` closes.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` only if the initial snapshot cannot be loaded.
    /// Later failures are retried or reported on the view channel.
    #[instrument(skip(self, commands), fields(game_id = %self.game_id, player_id = %self.identity.player_id()))]
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Result<(), RemoteError> {
        let session = self.load().await?;
        let mut client = SyncClient::new(session);
        self.emit(ViewEvent::SessionLoaded(client.session().status()));

        let (responses_tx, mut responses) = mpsc::unbounded_channel();
        self.spawn_poll(client.poll_request(), Duration::ZERO, &responses_tx);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.dispatch(&client, command, &responses_tx),
                    None => {
                        info!("Command channel closed, stopping driver");
                        return Ok(());
                    }
                },
                Some(response) = responses.recv() => {
                    self.handle(&mut client, response, &responses_tx).await;
                }
            }
        }
    }

    async fn load(&self) -> Result<GameSession, RemoteError> {
        let snapshot = self.remote.snapshot(&self.game_id).await?;
        Ok(GameSession::from_snapshot(snapshot, self.identity.clone())?)
    }

    /// Loads a replacement session, retrying with backoff until it succeeds.
    async fn reload(&mut self) -> GameSession {
        loop {
            match self.load().await {
                Ok(session) => {
                    self.backoff.reset();
                    return session;
                }
                Err(e) => {
                    let delay = self.backoff.next_delay();
                    warn!(error = %e, delay_ms = delay.as_millis() as u64, "Reload failed, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn dispatch(
        &self,
        client: &SyncClient,
        command: Command,
        responses: &mpsc::UnboundedSender<Response>,
    ) {
        let session = client.session();
        let tag = client.tag();
        let remote = Arc::clone(&self.remote);
        let responses = responses.clone();

        match command {
            Command::Guess(index) => {
                let Some(request) = submit_guess(session, index) else {
                    debug!(index, "Guess filtered locally");
                    return;
                };
                tokio::spawn(async move {
                    let result = remote.guess(&request).await;
                    let _ = responses.send(Response::Submit(tag, result));
                });
            }
            Command::Join(side) => {
                let request = submit_join(session, side);
                tokio::spawn(async move {
                    let result = remote.join(&request).await;
                    let _ = responses.send(Response::Submit(tag, result));
                });
            }
            Command::Leave => {
                let Some(request) = submit_leave(session) else {
                    debug!("No side to leave");
                    return;
                };
                tokio::spawn(async move {
                    let result = remote.leave(&request).await;
                    let _ = responses.send(Response::Submit(tag, result));
                });
            }
            Command::Chat(message) => {
                let Some(request) = submit_chat(session, &message) else {
                    debug!("Blank chat message dropped");
                    return;
                };
                tokio::spawn(async move {
                    let result = remote.chat(&request).await;
                    let _ = responses.send(Response::Submit(tag, result));
                });
            }
        }
    }

    async fn handle(
        &mut self,
        client: &mut SyncClient,
        response: Response,
        responses: &mpsc::UnboundedSender<Response>,
    ) {
        let before = client.session().last_applied();
        let (step, poll_failed) = match response {
            Response::Poll(tag, result) => {
                let failed = result.is_err();
                (client.on_poll_response(tag, result), failed)
            }
            Response::Submit(tag, result) => {
                let failure = result.as_ref().err().map(|e| e.message.clone());
                let step = client.on_submit_response(tag, result);
                if let (Some(reason), SyncStep::Continue(_)) = (failure, &step) {
                    self.emit(ViewEvent::SubmitFailed { reason });
                }
                (step, false)
            }
        };

        match step {
            SyncStep::Ignored => {}
            SyncStep::Continue(effects) => {
                let mut scroll_to_latest = false;
                for effect in effects {
                    match effect {
                        Effect::ScrollToLatest => scroll_to_latest = true,
                        Effect::Poll(request) => {
                            let delay = if poll_failed {
                                self.backoff.next_delay()
                            } else {
                                self.backoff.reset();
                                Duration::ZERO
                            };
                            self.spawn_poll(request, delay, responses);
                        }
                    }
                }
                if client.session().last_applied() != before {
                    self.emit(ViewEvent::Updated {
                        status: client.session().status(),
                        scroll_to_latest,
                    });
                }
            }
            SyncStep::Invalidated => {
                info!("Session invalidated, rebuilding from snapshot");
                let session = self.reload().await;
                client.replace(session);
                self.emit(ViewEvent::SessionReplaced(client.session().status()));
                self.spawn_poll(client.poll_request(), Duration::ZERO, responses);
            }
        }
    }

    fn spawn_poll(
        &self,
        request: PollRequest,
        delay: Duration,
        responses: &mpsc::UnboundedSender<Response>,
    ) {
        let remote = Arc::clone(&self.remote);
        let responses = responses.clone();
        debug!(last_applied = request.last_applied, delay_ms = delay.as_millis() as u64, "Issuing poll");
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let tag = request.tag();
            let result = remote.poll(&request).await;
            let _ = responses.send(Response::Poll(tag, result));
        });
    }

    fn emit(&self, event: ViewEvent) {
        if self.views.send(event).is_err() {
            debug!("View channel closed");
        }
    }
}
