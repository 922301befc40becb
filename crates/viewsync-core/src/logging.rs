//! Logging init: append to a file under the XDG state dir, or fall back to stderr.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,viewsync_core=debug,viewsync=debug";

/// Per-event writer: a clone of the log file, or stderr if cloning failed.
enum SinkWriter {
    File(fs::File),
    Stderr,
}

impl io::Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            SinkWriter::File(f) => f.write(buf),
            SinkWriter::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SinkWriter::File(f) => f.flush(),
            SinkWriter::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct LogFile(fs::File);

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(SinkWriter::File)
            .unwrap_or(SinkWriter::Stderr)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `~/.local/state/viewsync/viewsync.log`
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("viewsync")?;
    Ok(xdg_dirs.get_state_home().join("viewsync.log"))
}

fn open_append(path: &Path) -> Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    Ok(fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?)
}

/// Initialize structured logging to the default log file.
/// Returns Err if the file can't be opened or a subscriber is already set,
/// so the caller can fall back to `init_logging_stderr`.
pub fn init_logging() -> Result<()> {
    init_logging_at(&log_file_path()?)
}

pub fn init_logging_at(path: &Path) -> Result<()> {
    let file = open_append(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(LogFile(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {e}"))?;

    tracing::info!(path = %path.display(), "viewsync logging initialized");
    Ok(())
}

/// Stderr-only logging. Never fails; a second call is a no-op.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn log_path_ends_with_app_dir() {
        let p = log_file_path().unwrap();
        assert!(p.ends_with("viewsync/viewsync.log"));
        assert!(!p.ends_with("viewsync/viewsync/viewsync.log"));
    }

    #[test]
    fn open_append_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("x.log");
        let mut f = open_append(&path).unwrap();
        io::Write::write_all(&mut f, b"one\n").unwrap();
        let mut f = open_append(&path).unwrap();
        io::Write::write_all(&mut f, b"two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }
}
