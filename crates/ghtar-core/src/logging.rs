//! Diagnostics for a ghtar run.
//!
//! The terminal belongs to the status lines and the spinner, so tracing
//! output normally goes to `$XDG_STATE_HOME/ghtar/ghtar.log`. When that file
//! cannot be opened the binary falls back to stderr at `warn`.
//! `RUST_LOG` overrides the filter in both modes.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const FILE_FILTER: &str = "info,ghtar_core=debug,ghtar_cli=debug";
const STDERR_FILTER: &str = "warn";

pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ghtar")?;
    Ok(xdg_dirs.place_state_file("ghtar.log")?)
}

/// Opens `path` for appending, creating it and its parent directory.
pub fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))
}

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs the global subscriber writing to the state-dir log file.
/// Errors leave no subscriber installed, so the caller can try stderr.
pub fn init_logging() -> Result<()> {
    let path = log_path()?;
    let file = open_log(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter_or(FILE_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {e}"))?;

    tracing::debug!(log = %path.display(), "logging to file");
    Ok(())
}

pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_or(STDERR_FILTER))
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
