//! The remote log seam and its HTTP implementation.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use strictly_duet::{GameId, Snapshot};
use tracing::{debug, error, info, instrument};

use crate::error::RemoteError;
use crate::protocol::{
    ChatRequest, ErrorBody, GuessRequest, JoinRequest, LeaveRequest, NewGameRequest, PollRequest,
    SnapshotRequest, Update,
};

/// The authoritative event log, as seen by a client.
#[async_trait::async_trait]
pub trait RemoteLog: Send + Sync {
    /// Loads the board inputs and full history of a game.
    async fn snapshot(&self, game_id: &GameId) -> Result<Snapshot, RemoteError>;

    /// Waits for events after `request.last_applied`.
    async fn poll(&self, request: &PollRequest) -> Result<Update, RemoteError>;

    /// Submits a guess.
    async fn guess(&self, request: &GuessRequest) -> Result<Update, RemoteError>;

    /// Takes a side.
    async fn join(&self, request: &JoinRequest) -> Result<Update, RemoteError>;

    /// Gives up the held side.
    async fn leave(&self, request: &LeaveRequest) -> Result<Update, RemoteError>;

    /// Posts a chat message.
    async fn chat(&self, request: &ChatRequest) -> Result<Update, RemoteError>;
}

/// JSON-over-HTTP client for an authority server.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Creates a client for the server at `base_url`.
    ///
    /// `timeout` bounds each request and must exceed the server's long-poll
    /// hold time.
    #[instrument(skip_all)]
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        info!(base_url = %base_url, "HTTP remote created");
        Ok(Self { base_url, client })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates or reseeds a game.
    #[instrument(skip(self, request), fields(game_id = %request.game_id, seed = %request.seed))]
    pub async fn new_game(&self, request: &NewGameRequest) -> Result<Snapshot, RemoteError> {
        self.post("new-game", request).await
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, RemoteError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Sending request");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            error!(status = %status, url = %url, message = %message, "Remote rejected request");
            return Err(RemoteError::new(format!("{} returned {}: {}", path, status, message)));
        }

        debug!(status = %status, response_length = text.len(), "Got response");
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait::async_trait]
impl RemoteLog for HttpRemote {
    #[instrument(skip(self))]
    async fn snapshot(&self, game_id: &GameId) -> Result<Snapshot, RemoteError> {
        let request = SnapshotRequest {
            game_id: game_id.clone(),
        };
        self.post("game-state", &request).await
    }

    #[instrument(skip(self, request), fields(last_applied = request.last_applied))]
    async fn poll(&self, request: &PollRequest) -> Result<Update, RemoteError> {
        self.post("events", request).await
    }

    #[instrument(skip(self, request), fields(index = request.index))]
    async fn guess(&self, request: &GuessRequest) -> Result<Update, RemoteError> {
        self.post("guess", request).await
    }

    #[instrument(skip(self, request), fields(side = %request.side))]
    async fn join(&self, request: &JoinRequest) -> Result<Update, RemoteError> {
        self.post("join", request).await
    }

    #[instrument(skip(self, request), fields(player_id = %request.player_id))]
    async fn leave(&self, request: &LeaveRequest) -> Result<Update, RemoteError> {
        self.post("leave", request).await
    }

    #[instrument(skip(self, request))]
    async fn chat(&self, request: &ChatRequest) -> Result<Update, RemoteError> {
        self.post("chat", request).await
    }
}
