//! Board model: 25 cells, each with a private keycard color per side.

use crate::{Color, Side, SnapshotError};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// Number of cells on a board.
pub const BOARD_SIZE: usize = 25;

/// Number of distinct green cells a well-formed pair of keycards marks.
pub const GREEN_TOTAL: usize = 15;

/// A valid cell position (0-24).
///
/// Guesses arrive from the wire as raw integers; only values that convert to a
/// `CellIndex` may touch the board.
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
)]
#[serde(try_from = "i64", into = "i64")]
pub struct CellIndex(u8);

impl CellIndex {
    /// Converts a raw index, returning `None` when it is off the board.
    #[instrument]
    pub fn from_raw(raw: i64) -> Option<Self> {
        if (0..BOARD_SIZE as i64).contains(&raw) {
            Some(Self(raw as u8))
        } else {
            None
        }
    }

    /// Position as a `usize` suitable for slice indexing.
    pub fn get(self) -> usize {
        usize::from(self.0)
    }

    /// All positions in board order.
    pub fn all() -> impl Iterator<Item = CellIndex> {
        (0..BOARD_SIZE as u8).map(CellIndex)
    }
}

impl TryFrom<i64> for CellIndex {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::from_raw(raw).ok_or_else(|| format!("cell index {} is off the board", raw))
    }
}

impl From<CellIndex> for i64 {
    fn from(index: CellIndex) -> Self {
        i64::from(index.0)
    }
}

/// One side's view of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideState {
    /// Whether this side has guessed the cell.
    pub exposed: bool,
    /// This side's keycard color for the cell.
    pub color: Color,
}

impl SideState {
    fn hidden(color: Color) -> Self {
        Self {
            exposed: false,
            color,
        }
    }
}

/// A board position with its word and both sides' keycard state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Cell {
    /// Stable position on the board.
    index: CellIndex,
    /// Display label.
    word: String,
    /// Side A's state.
    #[getter(skip)]
    a: SideState,
    /// Side B's state.
    #[getter(skip)]
    b: SideState,
}

impl Cell {
    /// Creates an unexposed cell.
    pub fn new(index: CellIndex, word: impl Into<String>, color_a: Color, color_b: Color) -> Self {
        Self {
            index,
            word: word.into(),
            a: SideState::hidden(color_a),
            b: SideState::hidden(color_b),
        }
    }

    /// Returns the given side's state.
    pub fn state(&self, side: Side) -> SideState {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    /// The given side's keycard color.
    pub fn color(&self, side: Side) -> Color {
        self.state(side).color
    }

    /// Whether the given side has guessed this cell.
    pub fn exposed(&self, side: Side) -> bool {
        self.state(side).exposed
    }

    /// The color a guess by `guesser` discovers: the other side's keycard entry.
    pub fn outcome_for(&self, guesser: Side) -> Color {
        self.color(guesser.opposite())
    }

    /// Returns a copy of this cell exposed for `side`.
    pub fn exposed_for(&self, side: Side) -> Self {
        let mut cell = self.clone();
        match side {
            Side::A => cell.a.exposed = true,
            Side::B => cell.b.exposed = true,
        }
        cell
    }

    /// Aggregate cross-side color, or `None` while unresolved.
    ///
    /// A guess by one side reveals the opposite keycard entry. Black outranks
    /// green, and a cell only resolves to tan once both sides have found it
    /// neutral.
    pub fn display_color(&self) -> Option<Color> {
        let discovered = |color: Color| {
            Side::iter().any(|side| self.exposed(side) && self.outcome_for(side) == color)
        };

        if discovered(Color::Black) {
            Some(Color::Black)
        } else if discovered(Color::Green) {
            Some(Color::Green)
        } else if self.a.exposed && self.b.exposed {
            Some(Color::Tan)
        } else {
            None
        }
    }
}

/// The 25 cells of one session.
///
/// Always holds exactly [`BOARD_SIZE`] cells, with `cells[i].index() == i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// Builds a board from a word list and both keycards.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` unless all three inputs hold exactly
    /// [`BOARD_SIZE`] entries.
    #[instrument(skip_all)]
    pub fn from_layouts(
        words: &[String],
        layout_a: &[Color],
        layout_b: &[Color],
    ) -> Result<Self, SnapshotError> {
        for (name, len) in [
            ("words", words.len()),
            ("layout_a", layout_a.len()),
            ("layout_b", layout_b.len()),
        ] {
            if len != BOARD_SIZE {
                return Err(SnapshotError::new(format!(
                    "{} has {} entries, expected {}",
                    name, len, BOARD_SIZE
                )));
            }
        }

        let cells = CellIndex::all()
            .map(|index| {
                let i = index.get();
                Cell::new(index, words[i].clone(), layout_a[i], layout_b[i])
            })
            .collect();

        debug!("Board built from layouts");
        Ok(Self { cells })
    }

    /// Returns the cell at a position.
    pub fn cell(&self, index: CellIndex) -> &Cell {
        &self.cells[index.get()]
    }

    /// All cells in board order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Replaces the cell at the cell's own position.
    pub fn with_cell(mut self, cell: Cell) -> Self {
        let i = cell.index().get();
        self.cells[i] = cell;
        self
    }

    /// Count of cells resolved green.
    pub fn green_found(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.display_color() == Some(Color::Green))
            .count()
    }

    /// Green cells still to be found, never below zero.
    pub fn remaining_green(&self) -> usize {
        GREEN_TOTAL.saturating_sub(self.green_found())
    }

    /// Whether any cell has resolved to the assassin.
    pub fn black_exposed(&self) -> bool {
        self.cells
            .iter()
            .any(|c| c.display_color() == Some(Color::Black))
    }

    /// Formats the board as a 5x5 text grid.
    ///
    /// Unresolved cells show their word, resolved cells show their color.
    pub fn display(&self) -> String {
        self.cells
            .chunks(5)
            .map(|row| {
                row.iter()
                    .map(|cell| match cell.display_color() {
                        Some(color) => format!("[{}]", color),
                        None => cell.word().clone(),
                    })
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
