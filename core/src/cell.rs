use serde::{Deserialize, Serialize};

use crate::*;

/// A single board square and everything the engine knows about it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coords: Coord2,
    pub(crate) is_mine: bool,
    pub(crate) is_revealed: bool,
    pub(crate) is_marked: bool,
    pub(crate) adjacent_mines: u8,
}

impl Cell {
    pub const fn new(coords: Coord2) -> Self {
        Self {
            coords,
            is_mine: false,
            is_revealed: false,
            is_marked: false,
            adjacent_mines: 0,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        self.coords
    }

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub const fn is_marked(&self) -> bool {
        self.is_marked
    }

    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    /// Player-visible state of the cell.
    pub const fn state(&self) -> CellState {
        if self.is_revealed {
            CellState::Revealed
        } else if self.is_marked {
            CellState::Flagged
        } else {
            CellState::Hidden
        }
    }

    /// What the cell really holds, regardless of whether the player can see it.
    pub const fn true_glyph(&self) -> Glyph {
        if self.is_mine {
            Glyph::Mine
        } else {
            Glyph::Open(self.adjacent_mines)
        }
    }

    /// What the player currently sees on the cell.
    pub const fn visible_glyph(&self) -> Glyph {
        match self.state() {
            CellState::Hidden => Glyph::Hidden,
            CellState::Flagged => Glyph::Flag,
            CellState::Revealed => self.true_glyph(),
        }
    }
}

/// Valid transitions:
/// - Hidden -> Flagged
/// - Flagged -> Hidden
/// - Hidden -> Revealed
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Revealed,
}

impl CellState {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// Content handed to the presentation layer for a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Glyph {
    /// Unrevealed, nothing drawn.
    Hidden,
    Flag,
    /// Revealed safe cell with its adjacent mine count, `0` draws blank.
    Open(u8),
    Mine,
}

impl Glyph {
    /// Short text form, the same glyphs the browser front end draws.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hidden | Self::Open(0) => "",
            Self::Flag => "🚩",
            Self::Mine => "💥",
            Self::Open(1) => "1",
            Self::Open(2) => "2",
            Self::Open(3) => "3",
            Self::Open(4) => "4",
            Self::Open(5) => "5",
            Self::Open(6) => "6",
            Self::Open(7) => "7",
            Self::Open(_) => "8",
        }
    }
}
