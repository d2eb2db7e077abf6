//! Configuration service implementation.
//!
//! Loads [`PrepConfig`] from `config.toml` (by default `~/.config/prep/config.toml`).
//! A missing file yields the defaults and is not created.

use crate::paths::PrepPaths;
use crate::storage::AtomicTomlFile;
use prep_core::{Result, config::PrepConfig};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration, filled on first successful load.
    config: Arc<RwLock<Option<PrepConfig>>>,
}

impl ConfigService {
    /// Uses the platform config file.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(PrepPaths::config_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// # Errors
    ///
    /// - `Serialization` if the file is not valid TOML for [`PrepConfig`]
    /// - `Config` if a value is out of range
    pub fn get_config(&self) -> Result<PrepConfig> {
        if let Ok(read_lock) = self.config.read() {
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Writes `config` to disk and refreshes the cache.
    pub fn save_config(&self, config: &PrepConfig) -> Result<()> {
        config.validate()?;
        AtomicTomlFile::new(self.path.clone()).save(config)?;

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(config.clone());
        }
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_config(&self) -> Result<PrepConfig> {
        let file = AtomicTomlFile::<PrepConfig>::new(self.path.clone());
        let config = match file.load()? {
            Some(config) => {
                tracing::debug!("Loaded config from {}", self.path.display());
                config
            }
            None => {
                tracing::debug!(
                    "No config at {}, using defaults",
                    self.path.display()
                );
                PrepConfig::default()
            }
        };
        config.validate()?;
        Ok(config)
    }
}
