//! Unified path management for PREP files.
//!
//! Platform directories are resolved via `AppPaths` from the version-migrate
//! crate, the same resolver `AsyncDirStorage` uses.

use std::path::PathBuf;
use version_migrate::AppPaths;

const APP_NAME: &str = "prep";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for prep_core::PrepError {
    fn from(e: PathError) -> Self {
        prep_core::PrepError::config(e.to_string())
    }
}

/// Path layout:
///
/// ```text
/// ~/.config/prep/              # Config directory
/// └── config.toml              # PrepConfig
///
/// ~/.local/share/prep/         # Data directory (or `data_dir` from config)
/// └── data/prep/sessions/      # One TOML record per session
/// ```
pub struct PrepPaths;

impl PrepPaths {
    fn app_paths() -> AppPaths {
        AppPaths::new(APP_NAME)
    }

    /// Returns the configuration directory (e.g. `~/.config/prep/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the data directory (e.g. `~/.local/share/prep/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .data_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
