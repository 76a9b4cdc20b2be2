//! Error types for the sync client, remote log and authority.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use derive_more::{Display, Error};
use strictly_duet::SnapshotError;
use tracing::instrument;

use crate::protocol::ErrorBody;

/// Configuration could not be loaded.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    #[track_caller]
    fn from(e: std::io::Error) -> Self {
        Self::new(format!("Failed to read config file: {}", e))
    }
}

impl From<toml::de::Error> for ConfigError {
    #[track_caller]
    fn from(e: toml::de::Error) -> Self {
        Self::new(format!("Failed to parse config: {}", e))
    }
}

/// A call to the remote log failed.
///
/// Covers transport failures, non-success responses and payloads that do not
/// decode. Poll failures are retried; submission failures are reported.
#[derive(Debug, Clone, Display, Error)]
#[display("Remote error: {} at {}:{}", message, file, line)]
pub struct RemoteError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RemoteError {
    /// Creates a new remote error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    #[track_caller]
    fn from(e: reqwest::Error) -> Self {
        Self::new(format!("HTTP request failed: {}", e))
    }
}

impl From<serde_json::Error> for RemoteError {
    #[track_caller]
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("Failed to decode response: {}", e))
    }
}

impl From<SnapshotError> for RemoteError {
    #[track_caller]
    fn from(e: SnapshotError) -> Self {
        Self::new(format!("Remote sent an unusable snapshot: {}", e.message))
    }
}

impl From<AuthorityError> for RemoteError {
    #[track_caller]
    fn from(e: AuthorityError) -> Self {
        Self::new(e.to_string())
    }
}

/// The authority refused a request.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum AuthorityError {
    /// No game with this identifier exists.
    #[display("Unknown game: {game_id}")]
    UnknownGame {
        /// The requested game.
        game_id: String,
    },

    /// The board inputs of a new game are malformed.
    #[display("Invalid board: {reason}")]
    InvalidBoard {
        /// What is wrong with the board.
        reason: String,
    },

    /// A chat message with no text.
    #[display("Chat message is empty")]
    EmptyMessage,
}

impl AuthorityError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthorityError::UnknownGame { .. } => StatusCode::NOT_FOUND,
            AuthorityError::InvalidBoard { .. } | AuthorityError::EmptyMessage => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for AuthorityError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
