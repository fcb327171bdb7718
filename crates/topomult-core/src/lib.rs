//! Directional topographic wind multipliers from an ascii-grid DEM.
//!
//! For each of the eight compass directions the grid is cut into straight
//! sweep lines, each line's elevation profile is turned into multipliers by a
//! [`multiplier::MultiplierModel`], and the results are reassembled, smoothed
//! and written back out as ascii grids.
pub mod ascii;
pub mod boundary;
pub mod direction;
pub mod error;
pub mod grid;
pub mod indexing;
pub mod multiplier;
pub mod path;
pub mod pipeline;
pub mod raster;
pub mod schedule;
pub mod sweep;

pub use direction::Direction;
pub use error::{Result, TopoError};
pub use grid::Grid;
pub use indexing::GridIndexing;
pub use multiplier::{Identity, MultiplierModel, Neutral};
pub use pipeline::{run, topomult, work, DirectionOutput, RunConfig, WorkReport};
pub use raster::Raster;
pub use schedule::{balanced, ProcessGroup, SingleProcess, ThreadMember};
