use alloc::vec::Vec;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::*;

/// Strategy that decides where the mines of a fresh board go.
///
/// Placement runs once per game, on the first reveal, and must never put a mine on `excluded`.
pub trait MinePlacer {
    fn place(&mut self, board: &mut Board, count: CellCount, excluded: Coord2) -> Result<()>;
}

/// Purely random placement: shuffle every cell and take the first `count` that are not excluded.
#[derive(Clone, Debug)]
pub struct ShufflePlacer<R = SmallRng> {
    rng: R,
}

impl<R: Rng> ShufflePlacer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MinePlacer for ShufflePlacer<R> {
    fn place(&mut self, board: &mut Board, count: CellCount, excluded: Coord2) -> Result<()> {
        board.place_mines(count, excluded, &mut self.rng)
    }
}

/// Places mines on a predetermined set of coordinates, used for puzzles and reproducible layouts.
///
/// The excluded cell is skipped if it appears in the list, the first `count` remaining coordinates become mines.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedPlacer {
    coords: Vec<Coord2>,
}

impl FixedPlacer {
    pub fn new(coords: impl Into<Vec<Coord2>>) -> Self {
        Self {
            coords: coords.into(),
        }
    }
}

impl MinePlacer for FixedPlacer {
    fn place(&mut self, board: &mut Board, count: CellCount, excluded: Coord2) -> Result<()> {
        if self.coords.contains(&excluded) {
            log::warn!("Fixed layout has a mine on the first click at {:?}, skipping it", excluded);
        }
        let chosen: Vec<Coord2> = self
            .coords
            .iter()
            .copied()
            .filter(|&coords| coords != excluded)
            .take(count.into())
            .collect();
        if chosen.len() < usize::from(count) {
            return Err(GameError::TooManyMines);
        }
        board.place_mines_at(&chosen)
    }
}
