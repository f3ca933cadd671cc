//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml`
//! (`~/.config/armctl/config.toml` unless another path is given).

use crate::dto::ConfigRoot;
use crate::paths::ArmctlPaths;
use crate::storage::AtomicTomlFile;
use armctl_core::error::{ArmError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Loads, and on request creates, the configuration file.
pub struct ConfigService {
    file: AtomicTomlFile<ConfigRoot>,
}

impl ConfigService {
    /// Uses the platform default location.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(ArmctlPaths::config_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the configuration, falling back to defaults for a missing file.
    ///
    /// # Returns
    ///
    /// - `Ok(ConfigRoot)`: Parsed configuration, or defaults if the file is absent
    /// - `Err(ArmError::Config)`: The file exists but is not valid configuration
    pub fn load(&self) -> Result<ConfigRoot> {
        match self.file.load() {
            Ok(Some(config)) => {
                debug!(path = %self.path().display(), "loaded configuration");
                Ok(config)
            }
            Ok(None) => {
                debug!(path = %self.path().display(), "no configuration file, using defaults");
                Ok(ConfigRoot::default())
            }
            Err(err) => Err(ArmError::config(format!(
                "{}: {}",
                self.path().display(),
                err
            ))),
        }
    }

    /// Writes a default configuration if none exists yet.
    ///
    /// Returns `true` when a file was created.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.path().exists() {
            return Ok(false);
        }
        self.file.save(&ConfigRoot::default())?;
        info!(path = %self.path().display(), "wrote default configuration");
        Ok(true)
    }
}
