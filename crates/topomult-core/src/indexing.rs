/// Linear addressing of grid cells.
///
/// Cells are flattened column by column: `idx = row + col * nrows`, with row 0
/// the northernmost (first written) row of the DEM. Boundary enumeration, path
/// generation and reassembly all go through this type so they agree on one
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndexing {
    pub nrows: usize,
    pub ncols: usize,
}

impl GridIndexing {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self { nrows, ncols }
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.nrows * self.ncols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn to_linear(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.nrows && col < self.ncols, "({row}, {col}) outside grid");
        row + col * self.nrows
    }

    #[inline]
    pub fn from_linear(&self, idx: usize) -> (usize, usize) {
        debug_assert!(idx < self.len(), "index {idx} outside grid");
        (idx % self.nrows, idx / self.nrows)
    }

    /// Whether signed coordinates fall inside the grid.
    #[inline]
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.nrows && (col as usize) < self.ncols
    }

    /// Move one cell by `(drow, dcol)` from `idx`.
    /// Returns `None` when the move would leave the grid.
    pub fn step(&self, idx: usize, drow: isize, dcol: isize) -> Option<usize> {
        let (row, col) = self.from_linear(idx);
        let r = row as isize + drow;
        let c = col as isize + dcol;
        self.contains(r, c).then(|| self.to_linear(r as usize, c as usize))
    }
}
