//! Client and board configuration files.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use strictly_duet::{GameId, Identity, Seed};
use tracing::{debug, info, instrument};

use crate::error::ConfigError;
use crate::protocol::NewGameRequest;

/// Retry and timeout settings for the standing poll.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct PollConfig {
    /// First delay after a failed poll, in milliseconds. Zero retries at once.
    #[serde(default = "default_retry_base_ms")]
    retry_base_ms: u64,

    /// Largest delay between failed polls, in milliseconds.
    #[serde(default = "default_retry_max_ms")]
    retry_max_ms: u64,

    /// Per-request timeout, in seconds. Zero disables it.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

fn default_retry_base_ms() -> u64 {
    250
}

fn default_retry_max_ms() -> u64 {
    10_000
}

fn default_timeout_secs() -> u64 {
    90
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            retry_base_ms: default_retry_base_ms(),
            retry_max_ms: default_retry_max_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PollConfig {
    /// First retry delay.
    pub fn retry_base(&self) -> Duration {
        Duration::from_millis(self.retry_base_ms)
    }

    /// Retry delay ceiling.
    pub fn retry_max(&self) -> Duration {
        Duration::from_millis(self.retry_max_ms)
    }

    /// Request timeout, if enabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Configuration for a watching or guessing client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ClientConfig {
    /// Authority base URL.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// Game to follow.
    game_id: GameId,

    /// Display name.
    name: String,

    /// Player identifier. Defaults to `{game_id}_{lowercased name}`.
    #[serde(default)]
    #[setters(strip_option)]
    player_id: Option<String>,

    /// Default tracing directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Poll retry settings.
    #[serde(default)]
    poll: PollConfig,
}

fn default_server_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl ClientConfig {
    /// Creates a configuration with defaults for everything but the game and name.
    #[instrument(skip(game_id, name), fields(game_id = %game_id, name = %name))]
    pub fn new(game_id: GameId, name: String) -> Self {
        Self {
            server_url: default_server_url(),
            game_id,
            name,
            player_id: None,
            log_filter: default_log_filter(),
            poll: PollConfig::default(),
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        if config.name.trim().is_empty() {
            return Err(ConfigError::new("name must not be empty"));
        }
        info!(game_id = %config.game_id, name = %config.name, "Config loaded successfully");
        Ok(config)
    }

    /// The player identifier, derived from game and name unless set.
    pub fn resolved_player_id(&self) -> String {
        self.player_id
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.game_id, self.name.to_lowercase()))
    }

    /// Identity presented to the game.
    pub fn identity(&self) -> Identity {
        Identity::new(self.resolved_player_id(), self.name.clone())
    }
}

/// Board inputs for a game hosted by `serve`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct BoardFile {
    /// Game identifier.
    game_id: GameId,
    /// Generation marker.
    seed: Seed,
    /// The 25 words.
    words: Vec<String>,
    /// Side A's keycard.
    layout_a: Vec<String>,
    /// Side B's keycard.
    layout_b: Vec<String>,
}

impl BoardFile {
    /// Loads a board from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading board file");
        let content = std::fs::read_to_string(path.as_ref())?;
        let board: Self = toml::from_str(&content)?;
        info!(game_id = %board.game_id, seed = %board.seed, "Board loaded");
        Ok(board)
    }
}

impl From<BoardFile> for NewGameRequest {
    fn from(board: BoardFile) -> Self {
        NewGameRequest {
            game_id: board.game_id,
            seed: board.seed,
            words: board.words,
            layout_a: board.layout_a,
            layout_b: board.layout_b,
        }
    }
}
