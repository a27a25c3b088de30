//! File logging. The TUI owns stdout/stderr, so everything goes to
//! `~/.local/share/mypctools/mypctools.log`.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `MYPCTOOLS_LOG=mypctools=debug`.
pub const LOG_ENV: &str = "MYPCTOOLS_LOG";

/// Target for user-visible actions (installs, updates, cleanups, ...).
pub const ACTION_TARGET: &str = "mypctools::action";

pub fn data_dir() -> Result<PathBuf> {
    let mut path = dirs::home_dir().context("Could not determine home directory")?;
    path.push(".local");
    path.push("share");
    path.push("mypctools");
    Ok(path)
}

pub fn log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("mypctools.log"))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init() -> Result<()> {
    fs::create_dir_all(data_dir()?).context("Failed to create data directory")?;

    let path = log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();

    Ok(())
}

/// Record a user action, e.g. `action("INSTALL OK: Firefox")`.
pub fn action(what: &str) {
    tracing::info!(target: ACTION_TARGET, "{}", what);
}
