//! Root configuration file (`config.toml`).
//!
//! Every section and every field is optional; missing values fall back to the
//! defaults below, so an empty file is a valid configuration.

use armctl_core::config::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRoot {
    pub controller: ControllerConfig,
    pub motion: SessionConfig,
    pub gripper: GripperConfig,
    pub recordings: RecordingsConfig,
}

// ============================================================================
// Sections
// ============================================================================

/// Where the arm controller listens and how to talk to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub host: String,
    pub port: u16,
    /// Motion profile number passed to `movec`, `Straight` and `Speed`.
    pub profile: u32,
    pub connect_timeout_ms: u64,
    /// Upper bound on a single reply; homing can take several seconds.
    pub read_timeout_ms: u64,
    /// Power up and home the arm when the session starts.
    pub enable_on_connect: bool,
    /// Settle delays of the enable sequence (after `hp 1`, `attach 1`, `home`).
    pub power_settle_ms: u64,
    pub attach_settle_ms: u64,
    pub home_settle_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            host: "10.10.10.40".to_string(),
            port: 10100,
            profile: 1,
            connect_timeout_ms: 5_000,
            read_timeout_ms: 30_000,
            enable_on_connect: true,
            power_settle_ms: 4_000,
            attach_settle_ms: 1_000,
            home_settle_ms: 5_000,
        }
    }
}

/// Servo goal positions for the gripper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripperConfig {
    pub servo_id: u8,
    pub open_position: u16,
    pub closed_position: u16,
}

impl Default for GripperConfig {
    fn default() -> Self {
        Self {
            servo_id: 1,
            open_position: 200,
            closed_position: 70,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingsConfig {
    /// Overrides the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,
}
