//! Turn and token accounting for guesses.
//!
//! Tokens are the shared budget of turn transitions. Whether a guess spends
//! one depends on the color it discovers and on whether the turn had already
//! passed to the guessing side's opponent.

use crate::{Cell, Color, Side};
use tracing::{debug, instrument};

/// Result of accounting for one valid guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessAccounting {
    /// The guessed cell, now exposed for the guessing side.
    pub cell: Cell,
    /// Side expected to guess next.
    pub turn: Option<Side>,
    /// Updated token count.
    pub tokens_consumed: u32,
}

/// Tokens spent by a guess.
///
/// | opponent's turn | neutral outcome | delta |
/// |---|---|---|
/// | yes | yes | 2 |
/// | no  | yes | 1 |
/// | yes | no  | 1 |
/// | no  | no  | 0 |
pub fn token_delta(was_opposite_turn: bool, outcome: Color) -> u32 {
    match (was_opposite_turn, outcome.is_neutral()) {
        (true, true) => 2,
        (false, true) | (true, false) => 1,
        (false, false) => 0,
    }
}

/// Side expected to guess after `side` discovers `outcome`.
///
/// Only a neutral outcome passes the turn; any other color keeps it.
pub fn next_turn(side: Side, outcome: Color) -> Side {
    if outcome.is_neutral() {
        side.opposite()
    } else {
        side
    }
}

/// Accounts for `side` guessing `cell`.
#[instrument(skip(cell), fields(index = %cell.index()))]
pub fn account_guess(
    turn: Option<Side>,
    tokens_consumed: u32,
    cell: &Cell,
    side: Side,
) -> GuessAccounting {
    let outcome = cell.outcome_for(side);
    let was_opposite_turn = turn == Some(side.opposite());
    let delta = token_delta(was_opposite_turn, outcome);

    debug!(
        ?side,
        %outcome,
        was_opposite_turn,
        delta,
        "Accounted guess"
    );

    GuessAccounting {
        cell: cell.exposed_for(side),
        turn: Some(next_turn(side, outcome)),
        tokens_consumed: tokens_consumed.saturating_add(delta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellIndex;

    fn cell(color_a: Color, color_b: Color) -> Cell {
        Cell::new(CellIndex::from_raw(5).expect("index"), "bark", color_a, color_b)
    }

    #[test]
    fn test_delta_table() {
        assert_eq!(token_delta(true, Color::Tan), 2);
        assert_eq!(token_delta(false, Color::Tan), 1);
        assert_eq!(token_delta(true, Color::Green), 1);
        assert_eq!(token_delta(true, Color::Black), 1);
        assert_eq!(token_delta(false, Color::Green), 0);
    }

    #[test]
    fn test_neutral_passes_turn_from_start() {
        // A guesses; B's keycard entry is what A discovers.
        let result = account_guess(None, 0, &cell(Color::Green, Color::Tan), Side::A);
        assert_eq!(result.turn, Some(Side::B));
        assert_eq!(result.tokens_consumed, 1);
        assert!(result.cell.exposed(Side::A));
        assert!(!result.cell.exposed(Side::B));
    }

    #[test]
    fn test_neutral_on_opponents_turn_spends_two() {
        let result = account_guess(Some(Side::B), 3, &cell(Color::Green, Color::Tan), Side::A);
        assert_eq!(result.turn, Some(Side::B));
        assert_eq!(result.tokens_consumed, 5);
    }

    #[test]
    fn test_green_keeps_turn() {
        let result = account_guess(Some(Side::A), 2, &cell(Color::Tan, Color::Green), Side::A);
        assert_eq!(result.turn, Some(Side::A));
        assert_eq!(result.tokens_consumed, 2);
    }

    #[test]
    fn test_green_after_switch_spends_one_and_takes_turn() {
        let result = account_guess(Some(Side::A), 0, &cell(Color::Green, Color::Tan), Side::B);
        assert_eq!(result.turn, Some(Side::B));
        assert_eq!(result.tokens_consumed, 1);
    }
}
