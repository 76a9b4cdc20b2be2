//! Error types for building sessions and decoding events.

use derive_more::{Display, Error};
use tracing::instrument;

/// A snapshot could not be turned into a session.
#[derive(Debug, Clone, Display, Error)]
#[display("Snapshot error: {} at {}:{}", message, file, line)]
pub struct SnapshotError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SnapshotError {
    /// Creates a new snapshot error with caller location tracking.
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

/// A wire event that cannot be represented as a domain event.
///
/// Malformed guesses are not decode errors: they decode and are recorded
/// without touching the board.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum EventDecodeError {
    /// The `type` tag is not one of the known kinds.
    #[display("Event {number}: unknown kind {kind:?}")]
    UnknownKind {
        /// Event number.
        number: u64,
        /// The unrecognized tag.
        kind: String,
    },

    /// A field required by the kind is absent.
    #[display("Event {number}: {kind} is missing {field}")]
    MissingField {
        /// Event number.
        number: u64,
        /// Event kind tag.
        kind: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },
}
