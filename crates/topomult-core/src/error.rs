use std::path::PathBuf;

use crate::direction::Direction;

/// Errors raised by the multiplier pipeline. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum TopoError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed ascii-grid header line or field.
    #[error("invalid ascii-grid header: {0}")]
    Header(String),

    #[error("expected {expected} cell values ({nrows} rows x {ncols} cols), found {found}")]
    CellCount {
        nrows: usize,
        ncols: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("invalid direction {0:?}: must be one of n, s, e, w, ne, nw, se, sw")]
    InvalidDirection(String),

    /// The multiplier model returned a line of the wrong length.
    #[error("multiplier model returned {actual} values for a {expected}-cell profile (direction {direction})")]
    ModelContract {
        direction: Direction,
        expected: usize,
        actual: usize,
    },

    #[error("no directions to compute")]
    NoDirections,

    #[error("could not build worker pool: {0}")]
    ThreadPool(String),

    #[error("invalid run configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl TopoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TopoError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TopoError>;
