use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Overrides the configured level, e.g. `DASHTOP_LOG=dashtop=debug`.
pub const FILTER_ENV: &str = "DASHTOP_LOG";

pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("dashtop")
        .join("dashtop.log")
}

pub fn log_path(config: &LoggingConfig) -> PathBuf {
    config.file.clone().unwrap_or_else(default_log_path)
}

pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs a file-backed subscriber. The terminal belongs to the dashboard,
/// so nothing is ever written to stdout or stderr.
pub fn init(config: &LoggingConfig) -> Result<PathBuf> {
    let path = log_path(config);
    ensure_parent_dir(&path)?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(env_filter(&config.level))
        .with_writer(Mutex::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(path)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
