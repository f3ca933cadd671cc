//! Recording file DTO.

use armctl_core::error::{ArmError, Result};
use armctl_core::recording::Recording;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layout version written to every recording file.
pub const RECORDING_FORMAT_VERSION: u32 = 1;

/// One command/response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDTO {
    pub input: String,
    pub output: String,
}

/// A recording file, version 1.
///
/// ```toml
/// version = 1
/// name = "demo"
/// created_at = "2026-10-19T10:00:00Z"
///
/// [[steps]]
/// input = "m 1 2 3 4 5 6"
/// output = "moved to 1 2 3 4 5 6 (requested 1 2 3 4 5 6)"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingFileV1 {
    pub version: u32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub steps: Vec<StepDTO>,
}

impl From<&Recording> for RecordingFileV1 {
    fn from(recording: &Recording) -> Self {
        Self {
            version: RECORDING_FORMAT_VERSION,
            name: recording.name().to_string(),
            created_at: recording.created_at(),
            steps: recording
                .steps()
                .map(|(input, output)| StepDTO {
                    input: input.to_string(),
                    output: output.to_string(),
                })
                .collect(),
        }
    }
}

impl RecordingFileV1 {
    /// Converts to the domain model, rejecting files from a newer layout.
    pub fn into_domain(self) -> Result<Recording> {
        if self.version != RECORDING_FORMAT_VERSION {
            return Err(ArmError::Serialization {
                format: "recording".to_string(),
                message: format!(
                    "'{}' uses format version {}, expected {}",
                    self.name, self.version, RECORDING_FORMAT_VERSION
                ),
            });
        }
        let (inputs, outputs): (Vec<String>, Vec<String>) = self
            .steps
            .into_iter()
            .map(|step| (step.input, step.output))
            .unzip();
        Recording::from_parts(self.name, self.created_at, inputs, outputs)
    }
}
