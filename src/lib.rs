//! Strictly Sync - keeping duet boards consistent with an authoritative log
//!
//! Clients hold a locally reconstructed [`strictly_duet::GameSession`] and
//! keep it current with a standing long poll. Every result merges through one
//! path, stale responses are dropped by tag, and a changed seed rebuilds the
//! session from scratch.
//!
//! # Architecture
//!
//! - **Sync**: the pure client state machine and its effects
//! - **Submit**: optimistic filtering of guesses, joins, leaves and chat
//! - **Remote**: the `RemoteLog` seam and its HTTP client
//! - **Authority**: an in-memory append-only log with long-poll wakeups
//! - **Server**: the authority over JSON/HTTP
//! - **Driver**: tokio task running a client against a remote

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod authority;
mod config;
mod driver;
mod error;
mod protocol;
mod remote;
mod server;
mod submit;
mod sync;

// Crate-level exports - Protocol
pub use protocol::{
    ChatRequest, ErrorBody, GuessRequest, JoinRequest, LeaveRequest, NewGameRequest, PollRequest,
    RequestTag, SnapshotRequest, Update,
};

// Crate-level exports - Sync client
pub use sync::{merge_update, Effect, SyncClient, SyncState, SyncStep, Transition};

// Crate-level exports - Submissions
pub use submit::{submit_chat, submit_guess, submit_join, submit_leave};

// Crate-level exports - Remote log
pub use remote::{HttpRemote, RemoteLog};

// Crate-level exports - Authority
pub use authority::{MemoryLog, DEFAULT_HOLD};
pub use server::{router, serve};

// Crate-level exports - Driver
pub use driver::{Backoff, Command, Driver, ViewEvent};

// Crate-level exports - Configuration
pub use config::{BoardFile, ClientConfig, PollConfig};

// Crate-level exports - Errors
pub use error::{AuthorityError, ConfigError, RemoteError};
