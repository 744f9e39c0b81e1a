use ndarray::Array2;

/// Single coordinate axis used for board side length and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional board coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Signed `(row, col)` location that may fall outside the board.
pub type Offset2 = (i16, i16);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

const DISPLACEMENTS: [(i16, i16); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The 8 candidate locations around `(row, col)`, diagonals included.
///
/// Candidates are not filtered by bounds, pair with [`is_in_bounds`].
pub fn neighbors_of((row, col): Coord2) -> [Offset2; 8] {
    let (row, col) = (i16::from(row), i16::from(col));
    DISPLACEMENTS.map(|(dr, dc)| (row + dr, col + dc))
}

/// Whether `loc` lies inside a board of `bounds` rows by columns.
pub fn is_in_bounds(loc: Offset2, bounds: Coord2) -> bool {
    let (row, col) = loc;
    (0..i16::from(bounds.0)).contains(&row) && (0..i16::from(bounds.1)).contains(&col)
}

/// Narrows `loc` to board coordinates, returning a value only when it is in bounds.
pub fn to_coords(loc: Offset2, bounds: Coord2) -> Option<Coord2> {
    if is_in_bounds(loc, bounds) {
        Some((loc.0.try_into().ok()?, loc.1.try_into().ok()?))
    } else {
        None
    }
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        let bounds = (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        );
        NeighborIter::new(index, bounds)
    }
}

/// In-bounds neighbors of a cell, in row-major order.
#[derive(Debug)]
pub struct NeighborIter {
    candidates: [Offset2; 8],
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            candidates: neighbors_of(center),
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let candidate = *self.candidates.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(coords) = to_coords(candidate, self.bounds) {
                return Some(coords);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn neighbors_of_corner_includes_out_of_bounds_candidates() {
        let candidates = neighbors_of((0, 0));

        assert_eq!(candidates.len(), 8);
        assert!(candidates.contains(&(-1, -1)));
        assert!(candidates.contains(&(1, 1)));
        assert!(!candidates.contains(&(0, 0)));
    }

    #[test]
    fn bounds_check_rejects_negative_and_overflowing_locations() {
        assert!(is_in_bounds((0, 0), (4, 4)));
        assert!(is_in_bounds((3, 3), (4, 4)));
        assert!(!is_in_bounds((-1, 2), (4, 4)));
        assert!(!is_in_bounds((2, 4), (4, 4)));
        assert!(!is_in_bounds((4, 0), (4, 4)));
    }

    #[test]
    fn neighbor_iter_filters_to_board() {
        let corner: Vec<_> = NeighborIter::new((0, 0), (3, 3)).collect();
        assert_eq!(corner, vec![(0, 1), (1, 0), (1, 1)]);

        let center = NeighborIter::new((1, 1), (3, 3)).count();
        assert_eq!(center, 8);

        let lone = NeighborIter::new((0, 0), (1, 1)).count();
        assert_eq!(lone, 0);
    }
}
