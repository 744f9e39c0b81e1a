use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::*;

/// Cells and their true content inside a 3x3 peek window.
pub type PeekArea = SmallVec<[(Coord2, Glyph); 9]>;

impl Board {
    /// Reveals a hidden safe cell and, when it has no adjacent mines, the zero region around it.
    ///
    /// Returns every newly revealed cell, the clicked one first. Mines, flagged and already revealed cells are left
    /// alone and yield an empty list.
    pub fn open_cell(&mut self, coords: Coord2) -> Result<Vec<Coord2>> {
        let coords = self.validate_coords(coords)?;
        let cell = self[coords];
        if cell.is_mine || !cell.state().is_hidden() {
            return Ok(Vec::new());
        }

        self.cell_mut(coords).is_revealed = true;
        let mut opened = alloc::vec![coords];
        log::debug!("Open cell at {:?}, mine count: {}", coords, cell.adjacent_mines);

        if cell.adjacent_mines == 0 {
            opened.extend(self.expand_from(coords));
        }
        Ok(opened)
    }

    /// Flood-fills outward from a revealed zero cell.
    ///
    /// Each in-bounds neighbor that is safe, unflagged and still hidden is revealed, and zero-count neighbors are
    /// explored in turn. A cell is revealed before it is pushed, so it is never visited twice.
    pub fn expand_from(&mut self, coords: Coord2) -> Vec<Coord2> {
        let mut opened = Vec::new();
        let mut to_visit = alloc::vec![coords];
        log::trace!("Starting flood-fill from {:?}", coords);

        while let Some(visit_coords) = to_visit.pop() {
            for pos in self.iter_neighbors(visit_coords) {
                let neighbor = self[pos];
                if neighbor.is_mine || neighbor.is_marked || neighbor.is_revealed {
                    continue;
                }

                self.cell_mut(pos).is_revealed = true;
                opened.push(pos);
                log::trace!(
                    "Flood opened cell at {:?}, mine count: {}",
                    pos,
                    neighbor.adjacent_mines
                );

                if neighbor.adjacent_mines == 0 {
                    to_visit.push(pos);
                }
            }
        }
        opened
    }

    /// True content of every hidden cell in the 3x3 window centred on `coords`, the centre included.
    ///
    /// Nothing is mutated, flagged and revealed cells are left out.
    pub fn peek_area(&self, coords: Coord2) -> Result<PeekArea> {
        let coords = self.validate_coords(coords)?;
        let mut area = PeekArea::new();
        for pos in core::iter::once(coords).chain(self.iter_neighbors(coords)) {
            let cell = self[pos];
            if cell.state().is_hidden() {
                area.push((pos, cell.true_glyph()));
            }
        }
        area.sort_unstable_by_key(|&(pos, _)| pos);
        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::collections::BTreeSet;

    fn board(side: Coord, mines: &[Coord2]) -> Board {
        let mut board = Board::new(side).unwrap();
        board.place_mines_at(mines).unwrap();
        board.compute_adjacency_counts();
        board
    }

    /// Zero region reachable from `start` plus its numbered border, computed by brute force.
    fn expected_region(board: &Board, start: Coord2) -> BTreeSet<Coord2> {
        let mut region = BTreeSet::from([start]);
        let mut frontier = vec![start];
        while let Some(coords) = frontier.pop() {
            if board[coords].adjacent_mines() != 0 {
                continue;
            }
            for pos in board.iter_neighbors(coords) {
                if !board[pos].is_mine() && region.insert(pos) {
                    frontier.push(pos);
                }
            }
        }
        region
    }

    #[test]
    fn open_numbered_cell_reveals_only_itself() {
        let mut board = board(3, &[(0, 0)]);

        let opened = board.open_cell((1, 1)).unwrap();

        assert_eq!(opened, vec![(1, 1)]);
        assert!(board[(1, 1)].is_revealed());
        assert!(!board[(2, 2)].is_revealed());
    }

    #[test]
    fn flood_fill_opens_zero_region_and_border_once() {
        let mut board = board(5, &[(0, 4), (4, 0)]);
        let expected = expected_region(&board, (2, 2));

        let opened = board.open_cell((2, 2)).unwrap();

        let unique: BTreeSet<_> = opened.iter().copied().collect();
        assert_eq!(unique.len(), opened.len(), "no cell revealed twice");
        assert_eq!(unique, expected);
        assert!(opened.iter().all(|&coords| !board[coords].is_mine()));
        assert!(!board[(0, 4)].is_revealed());
        assert!(!board[(4, 0)].is_revealed());
        assert_eq!(board.revealed_safe_count() as usize, opened.len());
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        let mut board = board(3, &[(2, 2)]);
        board.set_marked((0, 2), true);

        let opened = board.open_cell((0, 0)).unwrap();

        assert!(!opened.contains(&(0, 2)));
        assert!(!board[(0, 2)].is_revealed());
        assert!(board[(0, 2)].is_marked());
        assert_eq!(opened.len(), 7);
    }

    #[test]
    fn flood_fill_on_large_empty_board_does_not_recurse() {
        let mut board = board(200, &[(199, 199)]);

        let opened = board.open_cell((0, 0)).unwrap();

        assert_eq!(opened.len(), 200 * 200 - 1);
        assert_eq!(board.revealed_safe_count(), board.safe_cell_count());
    }

    #[test]
    fn open_cell_ignores_mines_and_revealed_cells() {
        let mut board = board(3, &[(0, 0)]);

        assert!(board.open_cell((0, 0)).unwrap().is_empty());
        board.open_cell((1, 1)).unwrap();
        assert!(board.open_cell((1, 1)).unwrap().is_empty());
        assert_eq!(board.open_cell((5, 5)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn peek_area_reports_true_content_without_mutation() {
        let mut board = board(4, &[(0, 0)]);
        board.set_marked((2, 2), true);
        let before = board.clone();

        let area = board.peek_area((1, 1)).unwrap();

        assert_eq!(area.len(), 8);
        assert!(area.contains(&((0, 0), Glyph::Mine)));
        assert!(area.contains(&((1, 1), Glyph::Open(1))));
        assert!(area.contains(&((2, 1), Glyph::Open(0))));
        assert!(!area.iter().any(|&(pos, _)| pos == (2, 2)));
        assert_eq!(board, before);
    }

    #[test]
    fn peek_area_clips_at_corner() {
        let board = board(4, &[]);

        let area = board.peek_area((0, 0)).unwrap();

        assert_eq!(area.len(), 4);
    }
}
