//! On-disk representations.
//!
//! Domain types in `armctl-core` never derive serde for file formats; these
//! DTOs own the layout of `config.toml` and of recording files.

pub mod config_root;
pub mod recording;

pub use config_root::{ConfigRoot, ControllerConfig, GripperConfig, RecordingsConfig};
pub use recording::{RECORDING_FORMAT_VERSION, RecordingFileV1, StepDTO};
