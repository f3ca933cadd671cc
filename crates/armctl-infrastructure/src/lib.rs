pub mod config_service;
pub mod dto;
pub mod paths;
pub mod storage;
pub mod toml_recording_repository;

pub use crate::config_service::ConfigService;
pub use crate::paths::ArmctlPaths;
pub use crate::toml_recording_repository::TomlRecordingRepository;
