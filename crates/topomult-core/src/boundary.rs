//! Start cells of sweep lines.
//!
//! Cardinal directions start on one edge. Diagonals start on two edges that
//! share a corner; the corner is emitted once.
use std::collections::BTreeSet;

use crate::direction::Direction;
use crate::indexing::GridIndexing;

/// Linear indices of every cell on the given cardinal edge.
fn edge_indices(ix: GridIndexing, edge: Direction) -> Vec<usize> {
    let last_row = ix.nrows - 1;
    let last_col = ix.ncols - 1;
    match edge {
        Direction::N => (0..ix.ncols).map(|c| ix.to_linear(0, c)).collect(),
        Direction::S => (0..ix.ncols).map(|c| ix.to_linear(last_row, c)).collect(),
        Direction::E => (0..ix.nrows).map(|r| ix.to_linear(r, last_col)).collect(),
        Direction::W => (0..ix.nrows).map(|r| ix.to_linear(r, 0)).collect(),
        diagonal => unreachable!("{diagonal} is not an edge"),
    }
}

/// Sorted, duplicate-free start indices for `direction`.
///
/// For `n`/`s` there is one start per column, for `e`/`w` one per row, and a
/// diagonal gets `nrows + ncols - 1` starts.
pub fn start_indices(ix: GridIndexing, direction: Direction) -> Vec<usize> {
    if ix.is_empty() {
        return Vec::new();
    }
    let starts: BTreeSet<usize> = direction
        .edges()
        .iter()
        .flat_map(|&edge| edge_indices(ix, edge))
        .collect();
    starts.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_edges_match_linear_layout() {
        let ix = GridIndexing::new(3, 4);
        assert_eq!(start_indices(ix, Direction::N), vec![0, 3, 6, 9]);
        assert_eq!(start_indices(ix, Direction::S), vec![2, 5, 8, 11]);
        assert_eq!(start_indices(ix, Direction::E), vec![9, 10, 11]);
        assert_eq!(start_indices(ix, Direction::W), vec![0, 1, 2]);
    }

    #[test]
    fn diagonal_corner_appears_once() {
        let ix = GridIndexing::new(3, 4);
        let corners = [
            (Direction::Ne, ix.to_linear(0, 3)),
            (Direction::Nw, ix.to_linear(0, 0)),
            (Direction::Se, ix.to_linear(2, 3)),
            (Direction::Sw, ix.to_linear(2, 0)),
        ];
        for (d, corner) in corners {
            let starts = start_indices(ix, d);
            assert_eq!(starts.iter().filter(|&&i| i == corner).count(), 1, "{d}");
            assert_eq!(starts.len(), ix.nrows + ix.ncols - 1, "{d}");
        }
    }

    #[test]
    fn single_cell_has_one_start_everywhere() {
        let ix = GridIndexing::new(1, 1);
        for d in Direction::ALL {
            assert_eq!(start_indices(ix, d), vec![0], "{d}");
        }
    }
}
