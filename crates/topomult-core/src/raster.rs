//! Row-major output rasters: reassembly from linear order and 3x3 smoothing.
use crate::indexing::GridIndexing;

/// Fill value read for kernel taps that fall outside the raster.
pub const SMOOTH_FILL: f64 = 1.0;

/// A row-major raster, row 0 north, as written to ascii-grid files.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub nrows: usize,
    pub ncols: usize,
    pub data: Vec<f64>,
}

impl Raster {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.ncols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.ncols..(row + 1) * self.ncols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.ncols)
    }
}

/// Reorient a linear-order buffer into a row-major raster.
///
/// Equivalent to reshaping the buffer to `(ncols, nrows)` and transposing.
pub fn assemble(flat: &[f64], ix: GridIndexing) -> Raster {
    assert_eq!(flat.len(), ix.len(), "buffer does not match grid shape");
    let mut data = Vec::with_capacity(ix.len());
    for row in 0..ix.nrows {
        for col in 0..ix.ncols {
            data.push(flat[ix.to_linear(row, col)]);
        }
    }
    Raster {
        nrows: ix.nrows,
        ncols: ix.ncols,
        data,
    }
}

/// 3x3 box mean with "same" output size. Taps outside the raster read
/// [`SMOOTH_FILL`], pulling edge cells toward the neutral multiplier.
pub fn smooth(raster: &Raster) -> Raster {
    let (nrows, ncols) = (raster.nrows as isize, raster.ncols as isize);
    let tap = |r: isize, c: isize| -> f64 {
        if r < 0 || c < 0 || r >= nrows || c >= ncols {
            SMOOTH_FILL
        } else {
            raster.get(r as usize, c as usize)
        }
    };

    let mut data = Vec::with_capacity(raster.data.len());
    for r in 0..nrows {
        for c in 0..ncols {
            let mut sum = 0.0;
            for dr in -1..=1 {
                for dc in -1..=1 {
                    sum += tap(r + dr, c + dc);
                }
            }
            data.push(sum / 9.0);
        }
    }
    Raster {
        nrows: raster.nrows,
        ncols: raster.ncols,
        data,
    }
}
