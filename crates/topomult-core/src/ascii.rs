//! Ascii-grid (Esri `.asc`) reading and writing.
//!
//! A file is a short `key value` header followed by whitespace separated
//! values, northern row first.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::direction::Direction;
use crate::error::{Result, TopoError};
use crate::grid::{Grid, GridHeader};
use crate::raster::Raster;

/// No-data marker written to every output header.
pub const NODATA_VALUE: i32 = -9999;

/// Read and parse an ascii-grid DEM.
pub fn read_ascii(path: &Path) -> Result<Grid> {
    let text = fs::read_to_string(path).map_err(|e| TopoError::io(path, e))?;
    let grid = parse_ascii(&text)?;
    info!(
        "read {} ({} rows x {} cols)",
        path.display(),
        grid.nrows(),
        grid.ncols()
    );
    Ok(grid)
}

#[derive(Default)]
struct RawHeader {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xll: Option<(f64, bool)>,
    yll: Option<(f64, bool)>,
    cellsize: Option<f64>,
    nodata: Option<f64>,
}

fn set_once<T>(slot: &mut Option<T>, key: &str, value: T) -> Result<()> {
    if slot.is_some() {
        return Err(TopoError::Header(format!("duplicate field {key:?}")));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| TopoError::Header(format!("cannot parse {key} value {value:?}")))
}

/// Parse ascii-grid text. Header keys are case-insensitive; `xllcenter` and
/// `yllcenter` are converted to corner registration.
pub fn parse_ascii(text: &str) -> Result<Grid> {
    let mut raw = RawHeader::default();
    let mut lines = text.lines().peekable();

    while let Some(&line) = lines.peek() {
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else {
            lines.next();
            continue;
        };
        if key.parse::<f64>().is_ok() {
            break;
        }
        let value = tokens
            .next()
            .ok_or_else(|| TopoError::Header(format!("field {key:?} has no value")))?;
        let lower = key.to_ascii_lowercase();
        match lower.as_str() {
            "ncols" => set_once(&mut raw.ncols, key, parse_value(key, value)?)?,
            "nrows" => set_once(&mut raw.nrows, key, parse_value(key, value)?)?,
            "xllcorner" => set_once(&mut raw.xll, key, (parse_value(key, value)?, false))?,
            "xllcenter" => set_once(&mut raw.xll, key, (parse_value(key, value)?, true))?,
            "yllcorner" => set_once(&mut raw.yll, key, (parse_value(key, value)?, false))?,
            "yllcenter" => set_once(&mut raw.yll, key, (parse_value(key, value)?, true))?,
            "cellsize" => set_once(&mut raw.cellsize, key, parse_value(key, value)?)?,
            k if k.starts_with("nodata") => set_once(&mut raw.nodata, key, parse_value(key, value)?)?,
            _ => return Err(TopoError::Header(format!("unknown field {key:?}"))),
        }
        lines.next();
    }

    let missing = |name: &str| TopoError::Header(format!("missing field {name:?}"));
    let ncols = raw.ncols.ok_or_else(|| missing("ncols"))?;
    let nrows = raw.nrows.ok_or_else(|| missing("nrows"))?;
    let cellsize = raw.cellsize.ok_or_else(|| missing("cellsize"))?;
    let (xll, x_centred) = raw.xll.ok_or_else(|| missing("xllcorner"))?;
    let (yll, y_centred) = raw.yll.ok_or_else(|| missing("yllcorner"))?;
    let half = cellsize / 2.0;

    let header = GridHeader {
        ncols,
        nrows,
        xllcorner: if x_centred { xll - half } else { xll },
        yllcorner: if y_centred { yll - half } else { yll },
        cellsize,
        nodata: raw.nodata,
    };

    let values = lines
        .flat_map(str::split_whitespace)
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|_| TopoError::Header(format!("bad cell value {tok:?}")))
        })
        .collect::<Result<Vec<f64>>>()?;

    Grid::from_rows(header, &values)
}

/// File names for one direction: `(mh_<d>.asc, mh_<d>_smooth.asc)`.
pub fn output_paths(dir: &Path, direction: Direction) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("mh_{direction}.asc")),
        dir.join(format!("mh_{direction}_smooth.asc")),
    )
}

/// Write `raster` with the georeferencing of `header`. Values are written
/// with two decimals, one raster row per line.
pub fn write_ascii(path: &Path, header: &GridHeader, raster: &Raster) -> Result<()> {
    let io_err = |e| TopoError::io(path, e);
    let file = File::create(path).map_err(io_err)?;
    let mut w = BufWriter::new(file);
    write_raster(&mut w, header, raster).map_err(io_err)?;
    w.flush().map_err(io_err)
}

fn write_raster<W: Write>(w: &mut W, header: &GridHeader, raster: &Raster) -> std::io::Result<()> {
    writeln!(w, "{:<14}{}", "ncols", raster.ncols)?;
    writeln!(w, "{:<14}{}", "nrows", raster.nrows)?;
    // `{:?}` keeps a trailing `.0` on whole numbers (`25.0`, not `25`).
    writeln!(w, "{:<14}{:?}", "xllcorner", header.xllcorner)?;
    writeln!(w, "{:<14}{:?}", "yllcorner", header.yllcorner)?;
    writeln!(w, "{:<14}{:?}", "cellsize", header.cellsize)?;
    writeln!(w, "{:<14}{}", "NODATA_value", NODATA_VALUE)?;
    for row in raster.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:4.2}")).collect();
        writeln!(w, "{}", line.join(" "))?;
    }
    Ok(())
}
