//! Unified path management for armctl files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/armctl/            # Config directory
//! ├── config.toml              # Application configuration
//! └── logs/                    # Application logs
//!     └── armctl.log.YYYY-MM-DD
//!
//! ~/.local/share/armctl/       # Data directory
//! └── recordings/              # One TOML file per recording
//! ```

use armctl_core::error::{ArmError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "armctl";

/// Resolves the platform directories used by armctl.
pub struct ArmctlPaths;

impl ArmctlPaths {
    /// Returns the armctl configuration directory (e.g. `~/.config/armctl/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| ArmError::config("cannot determine the config directory"))
    }

    /// Returns the armctl data directory (e.g. `~/.local/share/armctl/`).
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| ArmError::config("cannot determine the data directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Default recordings folder, used unless the config or the command line
    /// names another one.
    pub fn recordings_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("recordings"))
    }

    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("logs"))
    }
}
