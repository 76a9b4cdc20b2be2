//! Numbered game events and their wire shape.
//!
//! Events are immutable facts appended by the authority. The domain type is a
//! tagged union whose variants carry exactly their own fields; the wire type is
//! the flat, optional-field record the log transmits.

use crate::{CellIndex, EventDecodeError, Side};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Position of an event in a session's log. The authority numbers from 1.
pub type EventNumber = u64;

/// Unique identifier for a player.
pub type PlayerId = String;

/// A numbered event.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Event {
    /// Sequence position; strictly increasing within a session.
    pub number: EventNumber,
    /// What happened.
    pub kind: EventKind,
}

/// The payload of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A player sat down on a side.
    JoinSide {
        /// Joining player.
        player_id: PlayerId,
        /// Chosen side.
        side: Side,
    },
    /// A player left the game.
    PlayerLeft {
        /// Departing player.
        player_id: PlayerId,
        /// Side they held, if the log recorded it.
        side: Option<Side>,
    },
    /// A side guessed a cell.
    ///
    /// Fields stay raw so malformed guesses can be kept in history.
    Guess {
        /// Raw cell position as sent.
        index: Option<i64>,
        /// Acting side, if known.
        side: Option<Side>,
    },
    /// A chat line.
    Chat {
        /// Speaker's display name.
        name: String,
        /// Message text.
        message: String,
        /// Speaker's side, if seated.
        side: Option<Side>,
    },
    /// An event this client cannot interpret: an unknown kind, or a known
    /// kind missing a required field. Kept in history, never applied.
    Unrecognized {
        /// Kind tag as sent.
        kind: String,
    },
}

impl EventKind {
    /// Wire tag for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::JoinSide { .. } => "join_side",
            EventKind::PlayerLeft { .. } => "player_left",
            EventKind::Guess { .. } => "guess",
            EventKind::Chat { .. } => "chat",
            EventKind::Unrecognized { .. } => "unrecognized",
        }
    }
}

impl Event {
    /// For a structurally valid guess, the target cell and acting side.
    pub fn guess_target(&self) -> Option<(CellIndex, Side)> {
        match &self.kind {
            EventKind::Guess {
                index: Some(raw),
                side: Some(side),
            } => CellIndex::from_raw(*raw).map(|index| (index, *side)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = |s: &Option<Side>| s.map(|s| s.to_string()).unwrap_or_else(|| "?".to_string());
        match &self.kind {
            EventKind::JoinSide { player_id, side } => {
                write!(f, "#{} {} joined side {}", self.number, player_id, side)
            }
            EventKind::PlayerLeft { player_id, .. } => {
                write!(f, "#{} {} left", self.number, player_id)
            }
            EventKind::Guess { index, side: s } => match index {
                Some(i) => write!(f, "#{} side {} guessed {}", self.number, side(s), i),
                None => write!(f, "#{} side {} guessed nothing", self.number, side(s)),
            },
            EventKind::Chat { name, message, .. } => {
                write!(f, "#{} {}: {}", self.number, name, message)
            }
            EventKind::Unrecognized { kind } => {
                write!(f, "#{} unrecognized {:?}", self.number, kind)
            }
        }
    }
}

/// Event record as transmitted by the log.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireEvent {
    /// Sequence position.
    pub number: EventNumber,
    /// Kind tag (`join_side`, `player_left`, `guess`, `chat`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Acting or affected player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    /// Display name (chat).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Side label (`"a"`/`"b"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    /// Cell position (guess).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    /// Message text (chat).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TryFrom<WireEvent> for Event {
    type Error = EventDecodeError;

    #[instrument(skip(wire), fields(number = wire.number, kind = %wire.kind))]
    fn try_from(wire: WireEvent) -> Result<Self, Self::Error> {
        let number = wire.number;
        let side = wire.side.as_deref().and_then(Side::from_label);
        let missing = |kind: &'static str, field: &'static str| EventDecodeError::MissingField {
            number,
            kind,
            field,
        };

        let kind = match wire.kind.as_str() {
            "join_side" => EventKind::JoinSide {
                player_id: wire.player_id.ok_or_else(|| missing("join_side", "player_id"))?,
                side: side.ok_or_else(|| missing("join_side", "side"))?,
            },
            "player_left" => EventKind::PlayerLeft {
                player_id: wire.player_id.ok_or_else(|| missing("player_left", "player_id"))?,
                side,
            },
            "guess" => EventKind::Guess {
                index: wire.index,
                side,
            },
            "chat" => EventKind::Chat {
                name: wire.name.unwrap_or_default(),
                message: wire.message.ok_or_else(|| missing("chat", "message"))?,
                side,
            },
            other => {
                return Err(EventDecodeError::UnknownKind {
                    number,
                    kind: other.to_string(),
                });
            }
        };

        Ok(Event { number, kind })
    }
}

impl From<&Event> for WireEvent {
    fn from(event: &Event) -> Self {
        let label = |s: Side| s.to_string().to_ascii_lowercase();
        let mut wire = WireEvent {
            number: event.number,
            kind: event.kind.tag().to_string(),
            ..WireEvent::default()
        };
        match &event.kind {
            EventKind::JoinSide { player_id, side } => {
                wire.player_id = Some(player_id.clone());
                wire.side = Some(label(*side));
            }
            EventKind::PlayerLeft { player_id, side } => {
                wire.player_id = Some(player_id.clone());
                wire.side = side.map(label);
            }
            EventKind::Guess { index, side } => {
                wire.index = *index;
                wire.side = side.map(label);
            }
            EventKind::Chat {
                name,
                message,
                side,
            } => {
                wire.name = Some(name.clone());
                wire.message = Some(message.clone());
                wire.side = side.map(label);
            }
            EventKind::Unrecognized { kind } => {
                wire.kind = kind.clone();
            }
        }
        wire
    }
}

/// Decodes a batch of wire events in order.
///
/// Every event keeps its number. One that cannot be interpreted is logged and
/// decoded as [`EventKind::Unrecognized`], so the reducer still records it and
/// advances past it.
#[instrument(skip_all)]
pub fn decode_batch(wire: impl IntoIterator<Item = WireEvent>) -> Vec<Event> {
    wire.into_iter()
        .map(|w| {
            let number = w.number;
            let kind = w.kind.clone();
            Event::try_from(w).unwrap_or_else(|e| {
                warn!(error = %e, "Keeping undecodable event as unrecognized");
                Event::new(number, EventKind::Unrecognized { kind })
            })
        })
        .collect()
}
