//! The two sides of a duet board.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the two sides sharing the board.
///
/// Each side holds a private keycard and guesses the words the other side
/// clues, so most board questions are asked "from the perspective of" a side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Side A.
    #[display("A")]
    A,
    /// Side B.
    #[display("B")]
    B,
}

impl Side {
    /// Returns the other side.
    pub fn opposite(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Parses a side from its wire label (`"a"`/`"b"`, case-insensitive).
    #[instrument]
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Some(Side::A),
            "b" => Some(Side::B),
            _ => None,
        }
    }

    /// Team label shown next to chat lines and player names.
    pub fn team_label(self) -> &'static str {
        match self {
            Side::A => "Team A",
            Side::B => "Team B",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_opposite_is_involution() {
        for side in Side::iter() {
            assert_ne!(side.opposite(), side);
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Side::from_label("a"), Some(Side::A));
        assert_eq!(Side::from_label(" B "), Some(Side::B));
        assert_eq!(Side::from_label("c"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Side::B).expect("serialize");
        assert_eq!(json, "\"b\"");
        let side: Side = serde_json::from_str("\"a\"").expect("deserialize");
        assert_eq!(side, Side::A);
    }
}
