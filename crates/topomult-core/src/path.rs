//! Sweep-line generation.
use crate::direction::Direction;
use crate::indexing::GridIndexing;

/// Cells visited walking downwind from `start` until the next step would
/// leave the grid. The start cell is always the first element.
///
/// Steps are taken in (row, col) space rather than by adding a fixed linear
/// offset, so a line never wraps from the bottom of one column into the top
/// of the next.
pub fn build_path(ix: GridIndexing, start: usize, direction: Direction) -> Vec<usize> {
    let (drow, dcol) = direction.step();
    let mut path = Vec::with_capacity(ix.nrows.max(ix.ncols));
    let mut current = Some(start);
    while let Some(idx) = current {
        path.push(idx);
        current = ix.step(idx, drow, dcol);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::start_indices;

    /// Every direction's lines must cover the grid exactly once.
    fn assert_partition(nrows: usize, ncols: usize, direction: Direction) {
        let ix = GridIndexing::new(nrows, ncols);
        let mut hits = vec![0u32; ix.len()];
        for start in start_indices(ix, direction) {
            for idx in build_path(ix, start, direction) {
                hits[idx] += 1;
            }
        }
        let bad: Vec<usize> = (0..ix.len()).filter(|&i| hits[i] != 1).collect();
        assert!(
            bad.is_empty(),
            "{direction} on {nrows}x{ncols}: cells {bad:?} hit {:?} times",
            bad.iter().map(|&i| hits[i]).collect::<Vec<_>>()
        );
    }

    #[test]
    fn all_directions_partition_small_grids() {
        for nrows in 1..=7 {
            for ncols in 1..=7 {
                for d in Direction::ALL {
                    assert_partition(nrows, ncols, d);
                }
            }
        }
    }

    #[test]
    fn strongly_rectangular_grids_partition() {
        for (nrows, ncols) in [(1, 40), (40, 1), (2, 33), (31, 3)] {
            for d in Direction::ALL {
                assert_partition(nrows, ncols, d);
            }
        }
    }

    #[test]
    fn linear_step_is_constant_along_a_line() {
        let ix = GridIndexing::new(4, 5);
        let n = ix.nrows as isize;
        let cases = [
            (Direction::N, 0, 1),
            (Direction::S, 3, -1),
            (Direction::W, 1, n),
            (Direction::E, ix.to_linear(1, 4), -n),
            (Direction::Nw, 0, n + 1),
            (Direction::Ne, ix.to_linear(0, 4), 1 - n),
            (Direction::Se, ix.to_linear(3, 4), -n - 1),
            (Direction::Sw, 3, n - 1),
        ];
        for (d, start, delta) in cases {
            let path = build_path(ix, start, d);
            assert!(path.len() > 1, "{d}");
            for pair in path.windows(2) {
                assert_eq!(pair[1] as isize - pair[0] as isize, delta, "{d}");
            }
        }
    }

    #[test]
    fn rows_are_swept_west_to_east() {
        let ix = GridIndexing::new(3, 3);
        assert_eq!(build_path(ix, 1, Direction::W), vec![1, 4, 7]);
        assert_eq!(build_path(ix, 7, Direction::E), vec![7, 4, 1]);
    }

    #[test]
    fn single_cell_path() {
        let ix = GridIndexing::new(1, 1);
        for d in Direction::ALL {
            assert_eq!(build_path(ix, 0, d), vec![0]);
        }
    }
}
