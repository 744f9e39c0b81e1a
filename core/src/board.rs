use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::*;

/// Coordinates of every mine on the board, in placement order.
///
/// Derived from [`Cell::is_mine`] and only ever written by [`Board`], which keeps the two in sync.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MineSet {
    coords: Vec<Coord2>,
}

impl MineSet {
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.coords.iter().copied()
    }
}

/// Square grid of cells plus the mines placed on it.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    cells: Array2<Cell>,
    mines: MineSet,
    counts_ready: bool,
}

impl Board {
    /// Builds a `side` by `side` board of fresh cells, no mines placed yet.
    pub fn new(side: Coord) -> Result<Self> {
        if side == 0 {
            return Err(GameError::EmptyBoard);
        }
        let side = usize::from(side);
        let cells = Array2::from_shape_fn((side, side), |(row, col)| {
            // both fit: side came from a Coord
            Cell::new((row as Coord, col as Coord))
        });
        Ok(Self {
            cells,
            mines: MineSet::default(),
            counts_ready: false,
        })
    }

    /// `(rows, cols)` of the board.
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mines.len() as CellCount
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count()
    }

    pub fn mines(&self) -> &MineSet {
        &self.mines
    }

    pub fn has_mines(&self) -> bool {
        !self.mines.is_empty()
    }

    /// Whether adjacency counts have been computed for the current layout.
    pub fn counts_ready(&self) -> bool {
        self.counts_ready
    }

    pub fn is_in_bounds(&self, loc: Offset2) -> bool {
        is_in_bounds(loc, self.size())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    /// Randomly places `count` mines, never on `excluded`.
    ///
    /// Every cell is shuffled, the excluded one (if on the board) is dropped from the pool and the first `count`
    /// cells of what remains become mines.
    pub fn place_mines<R: Rng + ?Sized>(
        &mut self,
        count: CellCount,
        excluded: Coord2,
        rng: &mut R,
    ) -> Result<()> {
        if self.has_mines() {
            return Err(GameError::MinesAlreadyPlaced);
        }
        if count >= self.total_cells() {
            log::warn!(
                "Cannot keep a safe cell, requested {} mines but board only has {} cells",
                count,
                self.total_cells()
            );
            return Err(GameError::TooManyMines);
        }

        let mut pool: Vec<Coord2> = self.cells.iter().map(Cell::coords).collect();
        pool.shuffle(rng);

        if let Some(index) = pool.iter().position(|&coords| coords == excluded) {
            pool.remove(index);
        }

        for &coords in pool.iter().take(count.into()) {
            self.mark_mine(coords);
        }
        log::debug!("Placed {} mines, excluded {:?}", self.mine_count(), excluded);
        Ok(())
    }

    /// Places mines on exactly the given coordinates, duplicates are ignored.
    pub fn place_mines_at(&mut self, mine_coords: &[Coord2]) -> Result<()> {
        if self.has_mines() {
            return Err(GameError::MinesAlreadyPlaced);
        }
        for &coords in mine_coords {
            self.validate_coords(coords)?;
        }
        if mine_coords.len() >= usize::from(self.total_cells()) {
            return Err(GameError::TooManyMines);
        }

        for &coords in mine_coords {
            if !self[coords].is_mine {
                self.mark_mine(coords);
            }
        }
        Ok(())
    }

    fn mark_mine(&mut self, coords: Coord2) {
        self.cell_mut(coords).is_mine = true;
        self.mines.coords.push(coords);
    }

    /// Number of mines among the in-bounds neighbors of `coords`.
    pub fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine)
            .count() as u8
    }

    /// Stores the adjacent mine count on every cell, run once after placement.
    pub fn compute_adjacency_counts(&mut self) {
        if self.counts_ready {
            log::warn!("Adjacency counts were already computed, recomputing");
        }
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let count = self.count_adjacent_mines((row, col));
                self.cell_mut((row, col)).adjacent_mines = count;
            }
        }
        self.counts_ready = true;
    }

    pub(crate) fn set_marked(&mut self, coords: Coord2, marked: bool) {
        self.cell_mut(coords).is_marked = marked;
    }

    /// Hidden cells that are not mines, in row-major order.
    pub fn hidden_safe_cells(&self) -> Vec<Coord2> {
        self.cells
            .iter()
            .filter(|cell| cell.state().is_hidden() && !cell.is_mine)
            .map(Cell::coords)
            .collect()
    }

    /// Permanently reveals every mine, returning the ones that were not already revealed.
    pub fn reveal_all_mines(&mut self) -> Vec<Coord2> {
        let mines: Vec<Coord2> = self.mines.iter().collect();
        mines
            .into_iter()
            .filter(|&coords| {
                let cell = self.cell_mut(coords);
                let newly = !cell.is_revealed;
                cell.is_revealed = true;
                newly
            })
            .collect()
    }

    /// Revealed cells that are not mines.
    pub fn revealed_safe_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_revealed && !cell.is_mine)
            .count() as CellCount
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn new_board_is_blank() {
        let board = Board::new(4).unwrap();

        assert_eq!(board.size(), (4, 4));
        assert_eq!(board.total_cells(), 16);
        assert_eq!(board.mine_count(), 0);
        assert!(!board.counts_ready());
        assert!(board.iter_cells().all(|cell| *cell == Cell::new(cell.coords())));
        assert_eq!(board[(3, 1)].coords(), (3, 1));
    }

    #[test]
    fn new_board_rejects_zero_side() {
        assert_eq!(Board::new(0), Err(GameError::EmptyBoard));
    }

    #[test]
    fn out_of_bounds_lookup_is_rejected() {
        let board = Board::new(3).unwrap();

        assert_eq!(board.cell_at((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.cell_at((0, 3)), Err(GameError::InvalidCoords));
        assert!(board.cell_at((2, 2)).is_ok());
        assert!(!board.is_in_bounds((-1, 0)));
    }

    #[test]
    fn place_mines_never_hits_excluded_cell() {
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut board = Board::new(4).unwrap();

            board.place_mines(15, (2, 1), &mut rng).unwrap();

            assert!(!board[(2, 1)].is_mine());
            assert_eq!(board.mine_count(), 15);
            assert_eq!(board.iter_cells().filter(|cell| cell.is_mine()).count(), 15);
        }
    }

    #[test]
    fn place_mines_can_use_every_other_cell() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut hits = [[false; 3]; 3];
        for _ in 0..200 {
            let mut board = Board::new(3).unwrap();
            board.place_mines(1, (0, 0), &mut rng).unwrap();
            for (row, col) in board.mines().iter() {
                hits[usize::from(row)][usize::from(col)] = true;
            }
        }

        assert!(!hits[0][0]);
        let covered = hits.iter().flatten().filter(|&&hit| hit).count();
        assert_eq!(covered, 8);
    }

    #[test]
    fn place_mines_places_exact_count() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut board = Board::new(8).unwrap();

        board.place_mines(14, (0, 0), &mut rng).unwrap();

        assert_eq!(board.mine_count(), 14);
        for coords in board.mines().iter() {
            assert!(board[coords].is_mine());
        }
        assert_eq!(board.safe_cell_count(), 50);
    }

    #[test]
    fn place_mines_needs_a_safe_cell() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut board = Board::new(2).unwrap();

        assert_eq!(board.place_mines(4, (0, 0), &mut rng), Err(GameError::TooManyMines));
        assert_eq!(board.mine_count(), 0);
    }

    #[test]
    fn place_mines_with_absent_exclusion_still_places() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut board = Board::new(2).unwrap();

        board.place_mines(3, (9, 9), &mut rng).unwrap();

        assert_eq!(board.mine_count(), 3);
    }

    #[test]
    fn place_mines_only_once() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut board = Board::new(3).unwrap();
        board.place_mines(1, (0, 0), &mut rng).unwrap();

        assert_eq!(
            board.place_mines(1, (0, 0), &mut rng),
            Err(GameError::MinesAlreadyPlaced)
        );
    }

    #[test]
    fn adjacency_counts_match_neighbor_mines() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut board = Board::new(9).unwrap();
        board.place_mines(20, (4, 4), &mut rng).unwrap();

        board.compute_adjacency_counts();

        let (rows, cols) = board.size();
        for row in 0..rows {
            for col in 0..cols {
                let expected = neighbors_of((row, col))
                    .into_iter()
                    .filter_map(|loc| to_coords(loc, board.size()))
                    .filter(|&pos| board[pos].is_mine())
                    .count() as u8;
                assert_eq!(board[(row, col)].adjacent_mines(), expected);
                assert!(expected <= 8);
            }
        }
        assert!(board.counts_ready());
    }

    #[test]
    fn adjacency_counts_for_known_layout() {
        let mut board = Board::new(3).unwrap();
        board.place_mines_at(&[(0, 0), (2, 2)]).unwrap();

        board.compute_adjacency_counts();

        assert_eq!(board[(1, 1)].adjacent_mines(), 2);
        assert_eq!(board[(0, 1)].adjacent_mines(), 1);
        assert_eq!(board[(0, 2)].adjacent_mines(), 0);
        assert_eq!(board[(2, 0)].adjacent_mines(), 0);
    }

    #[test]
    fn reveal_all_mines_reports_each_once() {
        let mut board = Board::new(3).unwrap();
        board.place_mines_at(&[(0, 0), (1, 2)]).unwrap();

        let first = board.reveal_all_mines();
        let second = board.reveal_all_mines();

        assert_eq!(first, alloc::vec![(0, 0), (1, 2)]);
        assert!(second.is_empty());
        assert!(board[(1, 2)].is_revealed());
        assert_eq!(board.revealed_safe_count(), 0);
    }
}
