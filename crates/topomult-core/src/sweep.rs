//! Per-line multiplier orchestration.
//!
//! For one direction: enumerate start cells, expand each into a sweep line,
//! run the model over the line's elevation profile and scatter the result
//! back to the same cells.
use tracing::debug;

use crate::boundary::start_indices;
use crate::direction::Direction;
use crate::error::{Result, TopoError};
use crate::grid::Grid;
use crate::multiplier::MultiplierModel;
use crate::path::build_path;

/// Value of every output cell before any line has been processed.
pub const SENTINEL: f64 = 1.0;

/// Run the model over one sweep line and write its multipliers into `out`.
pub fn process_path(
    cells: &[f64],
    path: &[usize],
    spacing: f64,
    direction: Direction,
    model: &dyn MultiplierModel,
    out: &mut [f64],
) -> Result<()> {
    let profile: Vec<f64> = path.iter().map(|&i| cells[i]).collect();
    let multipliers = model.multipliers(&profile, spacing);
    if multipliers.len() != profile.len() {
        return Err(TopoError::ModelContract {
            direction,
            expected: profile.len(),
            actual: multipliers.len(),
        });
    }
    for (&idx, m) in path.iter().zip(multipliers) {
        out[idx] = m;
    }
    Ok(())
}

/// Multipliers for every cell of `grid`, in linear order.
pub fn sweep_direction(
    grid: &Grid,
    direction: Direction,
    model: &dyn MultiplierModel,
) -> Result<Vec<f64>> {
    let ix = grid.indexing();
    let spacing = direction.spacing(grid.header.cellsize);
    let mut out = vec![SENTINEL; ix.len()];

    let starts = start_indices(ix, direction);
    let mut covered = 0usize;
    for (n, &start) in starts.iter().enumerate() {
        debug!("processing path {:3} of {:3}, index {:5}", n + 1, starts.len(), start);
        let path = build_path(ix, start, direction);
        covered += path.len();
        process_path(grid.cells(), &path, spacing, direction, model, &mut out)?;
    }
    debug_assert_eq!(covered, ix.len(), "{direction} lines do not partition the grid");

    Ok(out)
}
