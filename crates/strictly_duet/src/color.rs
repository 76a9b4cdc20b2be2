//! Keycard colors.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A keycard color.
///
/// Used both for a side's private mapping of a cell and for the aggregate
/// color a cell displays once it has been resolved.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// An agent to be found.
    #[display("green")]
    Green,
    /// The assassin: exposing it loses the match.
    #[display("black")]
    Black,
    /// A neutral bystander: exposing it ends the guessing side's turn.
    #[display("tan")]
    Tan,
}

impl Color {
    /// Parses a layout entry such as `"g"`, `"Green"` or `"neutral"`.
    #[instrument]
    pub fn from_layout(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" | "green" => Some(Color::Green),
            "b" | "black" => Some(Color::Black),
            "t" | "tan" | "n" | "neutral" => Some(Color::Tan),
            _ => None,
        }
    }

    /// Returns true for the neutral color.
    pub fn is_neutral(self) -> bool {
        self == Color::Tan
    }
}
