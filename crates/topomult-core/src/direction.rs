use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TopoError;

/// Compass direction the wind blows from.
///
/// A sweep for a direction starts on the matching grid edge(s) and walks
/// downwind, so `N` lines run from the top row towards the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl Direction {
    /// All eight directions in processing order.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::S,
        Direction::E,
        Direction::W,
        Direction::Ne,
        Direction::Nw,
        Direction::Se,
        Direction::Sw,
    ];

    /// Lowercase code used in file names and on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Direction::N => "n",
            Direction::S => "s",
            Direction::E => "e",
            Direction::W => "w",
            Direction::Ne => "ne",
            Direction::Nw => "nw",
            Direction::Se => "se",
            Direction::Sw => "sw",
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(self, Direction::Ne | Direction::Nw | Direction::Se | Direction::Sw)
    }

    /// Distance between consecutive cells of a sweep line.
    pub fn spacing(self, cellsize: f64) -> f64 {
        if self.is_diagonal() {
            cellsize * std::f64::consts::SQRT_2
        } else {
            cellsize
        }
    }

    /// Downwind step as `(drow, dcol)`; row 0 is the northern edge.
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::N => (1, 0),
            Direction::S => (-1, 0),
            Direction::E => (0, -1),
            Direction::W => (0, 1),
            Direction::Ne => (1, -1),
            Direction::Nw => (1, 1),
            Direction::Se => (-1, -1),
            Direction::Sw => (-1, 1),
        }
    }

    /// Cardinal edges sweep lines start from.
    pub fn edges(self) -> &'static [Direction] {
        match self {
            Direction::N => &[Direction::N],
            Direction::S => &[Direction::S],
            Direction::E => &[Direction::E],
            Direction::W => &[Direction::W],
            Direction::Ne => &[Direction::N, Direction::E],
            Direction::Nw => &[Direction::N, Direction::W],
            Direction::Se => &[Direction::S, Direction::E],
            Direction::Sw => &[Direction::S, Direction::W],
        }
    }

    /// Parse a comma separated list such as `"n, se,W"`.
    pub fn parse_list(s: &str) -> Result<Vec<Direction>, TopoError> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Direction {
    type Err = TopoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Direction::ALL
            .into_iter()
            .find(|d| d.code() == code)
            .ok_or_else(|| TopoError::InvalidDirection(s.to_string()))
    }
}
