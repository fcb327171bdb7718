use serde::{Deserialize, Serialize};

use crate::error::{Result, TopoError};
use crate::indexing::GridIndexing;

/// Georeferencing carried alongside every raster this crate reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridHeader {
    pub ncols: usize,
    pub nrows: usize,
    /// Lower-left corner of the lower-left cell.
    pub xllcorner: f64,
    pub yllcorner: f64,
    pub cellsize: f64,
    pub nodata: Option<f64>,
}

impl GridHeader {
    pub fn indexing(&self) -> GridIndexing {
        GridIndexing::new(self.nrows, self.ncols)
    }

    fn validate(&self) -> Result<()> {
        if self.nrows == 0 || self.ncols == 0 {
            return Err(TopoError::InvalidGrid(format!(
                "grid must have at least one cell, got {} rows x {} cols",
                self.nrows, self.ncols
            )));
        }
        if self.cellsize.is_nan() || self.cellsize <= 0.0 {
            return Err(TopoError::InvalidGrid(format!(
                "cellsize must be positive, got {}",
                self.cellsize
            )));
        }
        Ok(())
    }
}

/// An elevation raster held in [`GridIndexing`] linear order.
///
/// Built once per run from the DEM reader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub header: GridHeader,
    cells: Vec<f64>,
}

impl Grid {
    /// Wrap cells that are already in linear (column-contiguous) order.
    pub fn new(header: GridHeader, cells: Vec<f64>) -> Result<Self> {
        header.validate()?;
        let expected = header.nrows * header.ncols;
        if cells.len() != expected {
            return Err(TopoError::CellCount {
                nrows: header.nrows,
                ncols: header.ncols,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { header, cells })
    }

    /// Build from values in file order (row-major, northern row first).
    pub fn from_rows(header: GridHeader, values: &[f64]) -> Result<Self> {
        header.validate()?;
        let expected = header.nrows * header.ncols;
        if values.len() != expected {
            return Err(TopoError::CellCount {
                nrows: header.nrows,
                ncols: header.ncols,
                expected,
                found: values.len(),
            });
        }
        let ix = header.indexing();
        let mut cells = vec![0.0; expected];
        for (i, &v) in values.iter().enumerate() {
            let (row, col) = (i / header.ncols, i % header.ncols);
            cells[ix.to_linear(row, col)] = v;
        }
        Ok(Self { header, cells })
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.header.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.header.ncols
    }

    pub fn indexing(&self) -> GridIndexing {
        self.header.indexing()
    }

    /// Cells in linear order.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[self.indexing().to_linear(row, col)]
    }
}
