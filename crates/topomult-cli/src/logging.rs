//! Logging setup for the `topomult` binary.
//!
//! - Writes to a log file (truncated at start)
//! - Mirrors to stderr unless `--quiet`; only rank 0 of a worker pool
//!   reaches the console, every rank reaches the file
//! - Filter from `RUST_LOG`, falling back to `--log-level`

use std::fs;
use std::io;
use std::path::Path;

use topomult_core::schedule::worker_rank;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the non-blocking file writer alive. Dropping it flushes the log.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Split a log path into (directory, file name), defaulting the directory to `.`.
fn split_log_path(log_file: &Path) -> io::Result<(&Path, &std::ffi::OsStr)> {
    let name = log_file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log path {} has no file name", log_file.display()),
        )
    })?;
    let dir = match log_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Ok((dir, name))
}

/// Parse `--log-level`, rejecting anything that is not a level name.
fn parse_level(level: &str) -> io::Result<LevelFilter> {
    level.parse().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid log level {level:?}: expected off, error, warn, info, debug or trace"),
        )
    })
}

/// Whether the current thread may write to the console.
fn console_enabled_on(thread_name: Option<&str>) -> bool {
    worker_rank(thread_name).map_or(true, |rank| rank == 0)
}

/// Install the global subscriber.
pub fn init_logging(log_file: &Path, level: &str, quiet: bool) -> io::Result<LoggingGuard> {
    let level = parse_level(level)?;
    let (dir, name) = split_log_path(log_file)?;
    fs::create_dir_all(dir)?;
    fs::write(dir.join(name), "")?;

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_names(true);

    let console_layer = (!quiet).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_filter(filter_fn(|_| console_enabled_on(std::thread::current().name())))
    });

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
