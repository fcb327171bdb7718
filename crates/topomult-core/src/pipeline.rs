//! Per-direction pipeline and the worker entry points.
//!
//! `run` → `work` → `topomult` for each direction assigned to this worker:
//!   1. sweep the grid along the direction and collect multipliers
//!   2. reassemble into a north-up raster
//!   3. smooth with the 3x3 box filter
//!   4. write `mh_<d>.asc` and `mh_<d>_smooth.asc`
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span};

use crate::ascii::{output_paths, read_ascii, write_ascii};
use crate::direction::Direction;
use crate::error::{Result, TopoError};
use crate::grid::Grid;
use crate::multiplier::MultiplierModel;
use crate::raster::{assemble, smooth, Raster};
use crate::schedule::{balanced, ProcessGroup};
use crate::sweep::sweep_direction;

fn all_directions() -> Vec<Direction> {
    Direction::ALL.to_vec()
}

/// What to compute and where to put it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Ascii-grid DEM.
    pub input: PathBuf,
    /// Created if absent.
    pub output_dir: PathBuf,
    #[serde(default = "all_directions")]
    pub directions: Vec<Direction>,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            directions: all_directions(),
        }
    }

    pub fn with_directions(mut self, directions: Vec<Direction>) -> Self {
        self.directions = directions;
        self
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| TopoError::io(path, e))?;
        let config: RunConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.directions.is_empty() {
            return Err(TopoError::NoDirections);
        }
        Ok(())
    }
}

/// Raw and smoothed multipliers for one direction.
pub struct DirectionResult {
    pub raw: Raster,
    pub smoothed: Raster,
}

/// Files written for one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionOutput {
    pub direction: Direction,
    pub raw_path: PathBuf,
    pub smooth_path: PathBuf,
}

/// Outcome of one worker's share of the directions.
#[derive(Debug, Default)]
pub struct WorkReport {
    pub completed: Vec<DirectionOutput>,
    pub failed: Vec<(Direction, TopoError)>,
}

impl WorkReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn compute_direction(
    grid: &Grid,
    direction: Direction,
    model: &dyn MultiplierModel,
) -> Result<DirectionResult> {
    let flat = sweep_direction(grid, direction, model)?;
    let raw = assemble(&flat, grid.indexing());
    let smoothed = smooth(&raw);
    Ok(DirectionResult { raw, smoothed })
}

/// Compute one direction and write both output rasters into `output_dir`.
pub fn topomult(
    grid: &Grid,
    output_dir: &Path,
    direction: Direction,
    model: &dyn MultiplierModel,
) -> Result<DirectionOutput> {
    fs::create_dir_all(output_dir).map_err(|e| TopoError::io(output_dir, e))?;

    let spacing = direction.spacing(grid.header.cellsize);
    info!("calculating multiplier for direction {direction} (data spacing {spacing})");
    let result = compute_direction(grid, direction, model)?;

    let (raw_path, smooth_path) = output_paths(output_dir, direction);
    info!("outputting unsmoothed data to: {}", raw_path.display());
    write_ascii(&raw_path, &grid.header, &result.raw)?;
    info!("outputting smoothed data to: {}", smooth_path.display());
    write_ascii(&smooth_path, &grid.header, &result.smoothed)?;

    info!("Finished direction {direction}");
    Ok(DirectionOutput {
        direction,
        raw_path,
        smooth_path,
    })
}

/// Process this worker's share of `config.directions`.
///
/// The DEM is read once up front; a bad input fails before any direction is
/// touched. A failing direction is recorded and the rest still run.
pub fn work<G>(config: &RunConfig, model: &dyn MultiplierModel, group: &G) -> Result<WorkReport>
where
    G: ProcessGroup + ?Sized,
{
    config.validate()?;
    let grid = read_ascii(&config.input)?;
    info!(
        "xll = {}, yll = {}, cellsize = {}",
        grid.header.xllcorner, grid.header.yllcorner, grid.header.cellsize
    );

    let mut report = WorkReport::default();
    for &direction in balanced(&config.directions, group) {
        match topomult(&grid, &config.output_dir, direction, model) {
            Ok(out) => report.completed.push(out),
            Err(e) => {
                error!("direction {direction} failed: {e}");
                report.failed.push((direction, e));
            }
        }
    }
    Ok(report)
}

/// Worker entry point: barrier, work, barrier.
///
/// The trailing barrier is reached even if `work` fails, so the other
/// workers are never left waiting on this one.
pub fn run<G>(config: &RunConfig, model: &dyn MultiplierModel, group: &G) -> Result<WorkReport>
where
    G: ProcessGroup + ?Sized,
{
    let span = info_span!("worker", rank = group.rank(), size = group.size());
    let _guard = span.enter();

    group.barrier();
    let report = work(config, model, group);
    group.barrier();

    if let Ok(r) = &report {
        info!(
            "worker finished: {} directions written, {} failed",
            r.completed.len(),
            r.failed.len()
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridHeader;
    use crate::multiplier::{Identity, Neutral};
    use crate::schedule::SingleProcess;
    use approx::assert_relative_eq;

    const DEM_3X3: &str =
        "ncols 3\nnrows 3\nxllcorner 0\nyllcorner 0\ncellsize 1\nNODATA_value -9999\n1 2 3\n4 5 6\n7 8 9\n";

    fn write_dem(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("dem.asc");
        fs::write(&path, text).unwrap();
        path
    }

    fn data_block(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .skip(6)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn west_identity_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_dem(tmp.path(), DEM_3X3);
        let out_dir = tmp.path().join("out");
        let config = RunConfig::new(&input, &out_dir).with_directions(vec![Direction::W]);

        let report = run(&config, &Identity, &SingleProcess).unwrap();
        assert!(report.is_success());
        assert_eq!(report.completed.len(), 1);

        let out = &report.completed[0];
        assert_eq!(out.raw_path, out_dir.join("mh_w.asc"));
        assert_eq!(
            data_block(&out.raw_path),
            vec!["1.00 2.00 3.00", "4.00 5.00 6.00", "7.00 8.00 9.00"]
        );
        assert!(out.smooth_path.exists());
    }

    #[test]
    fn identity_reproduces_dem_for_every_direction() {
        let grid = crate::ascii::parse_ascii(DEM_3X3).unwrap();
        let expected: Vec<f64> = (1..=9).map(f64::from).collect();
        for d in Direction::ALL {
            let result = compute_direction(&grid, d, &Identity).unwrap();
            assert_eq!(result.raw.data, expected, "{d}");
        }
    }

    #[test]
    fn smoothed_output_centre_is_box_mean() {
        let grid = crate::ascii::parse_ascii(DEM_3X3).unwrap();
        let result = compute_direction(&grid, Direction::N, &Identity).unwrap();
        assert_relative_eq!(result.smoothed.get(1, 1), 5.0, epsilon = 1e-12);
        // Corner (0,0): taps 1,2,4,5 plus five fill cells.
        assert_relative_eq!(result.smoothed.get(0, 0), (12.0 + 5.0) / 9.0, epsilon = 1e-12);
    }

    #[test]
    fn single_cell_dem_runs_all_directions() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_dem(
            tmp.path(),
            "ncols 1\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 10\n42\n",
        );
        let config = RunConfig::new(&input, tmp.path().join("out"));
        let report = work(&config, &Neutral, &SingleProcess).unwrap();
        assert_eq!(report.completed.len(), 8);
        for out in &report.completed {
            assert_eq!(data_block(&out.raw_path), vec!["1.00"]);
        }
    }

    #[test]
    fn missing_input_aborts_before_any_direction() {
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("out");
        let config = RunConfig::new(tmp.path().join("missing.asc"), &out_dir);
        let err = run(&config, &Neutral, &SingleProcess).unwrap_err();
        assert!(matches!(err, TopoError::Io { .. }));
        assert!(!out_dir.exists());
    }

    #[test]
    fn model_contract_failure_is_isolated_to_its_direction() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_dem(tmp.path(), DEM_3X3);
        let config = RunConfig::new(&input, tmp.path().join("out"))
            .with_directions(vec![Direction::N, Direction::Ne, Direction::S]);
        // Diagonal lines have spacing sqrt(2); break only those.
        let flaky = |p: &[f64], spacing: f64| {
            if spacing > 1.0 {
                Vec::new()
            } else {
                vec![1.0; p.len()]
            }
        };
        let report = work(&config, &flaky, &SingleProcess).unwrap();
        assert_eq!(report.completed.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, Direction::Ne);
        assert!(matches!(report.failed[0].1, TopoError::ModelContract { .. }));
        assert!(!tmp.path().join("out/mh_ne.asc").exists());
    }

    #[test]
    fn output_header_keeps_georeferencing() {
        let tmp = tempfile::tempdir().unwrap();
        let header = GridHeader {
            ncols: 2,
            nrows: 1,
            xllcorner: 500.0,
            yllcorner: 6000.0,
            cellsize: 25.0,
            nodata: None,
        };
        let grid = Grid::from_rows(header, &[3.0, 4.0]).unwrap();
        let out = topomult(&grid, tmp.path(), Direction::E, &Identity).unwrap();
        let back = read_ascii(&out.raw_path).unwrap();
        assert_eq!(back.header.xllcorner, 500.0);
        assert_eq!(back.header.yllcorner, 6000.0);
        assert_eq!(back.header.cellsize, 25.0);
        assert_eq!(back.cells(), grid.cells());
    }

    #[test]
    fn config_json_defaults_to_all_directions() {
        let config: RunConfig =
            serde_json::from_str(r#"{"input": "dem.asc", "output_dir": "out"}"#).unwrap();
        assert_eq!(config.directions, Direction::ALL.to_vec());

        let empty: RunConfig =
            serde_json::from_str(r#"{"input": "a", "output_dir": "b", "directions": []}"#).unwrap();
        assert!(matches!(empty.validate(), Err(TopoError::NoDirections)));
    }

    #[cfg(feature = "threading")]
    #[test]
    fn parallel_workers_write_every_direction_once() {
        use crate::schedule::run_parallel;

        let tmp = tempfile::tempdir().unwrap();
        let input = write_dem(tmp.path(), DEM_3X3);
        let out_dir = tmp.path().join("out");
        let config = RunConfig::new(&input, &out_dir);

        let reports = run_parallel(3, |member| run(&config, &Identity, member)).unwrap();
        let mut written: Vec<Direction> = reports
            .into_iter()
            .flat_map(|r| r.unwrap().completed)
            .map(|o| o.direction)
            .collect();
        assert_eq!(written.len(), 8);
        written.sort_by_key(|d| d.code());
        written.dedup();
        assert_eq!(written.len(), 8);
        assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 16);
    }
}
