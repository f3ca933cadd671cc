//! Error types for the armctl interpreter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire armctl workspace.
///
/// Every failure the operator can cause (or the hardware can report) is a
/// variant here. The interpreter turns them into response strings, so none of
/// them abort the REPL except [`ArmError::Connection`].
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArmError {
    /// Malformed command, wrong argument count or type
    #[error("Parse error: {0}")]
    Parse(String),

    /// Repeat shorthand reaching further back than the recorded history
    #[error("Parse error: repetition depth {depth} exceeds history ({available} entries)")]
    RepetitionDepth { depth: usize, available: usize },

    /// Keyword that neither the alias table nor `cmd` claimed
    #[error("Unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("Nothing to undo")]
    EmptyUndoStack,

    #[error("Home stack is empty")]
    EmptyHomeStack,

    /// Relative grip adjustment requested before any absolute grip
    #[error("No grip history: issue 'grip' or 'ungrip' before adjusting")]
    NoGripHistory,

    #[error("A recording is already active")]
    RecordingAlreadyActive,

    #[error("No recording is active")]
    NoActiveRecording,

    #[error("Cannot play a recording while recording")]
    RecordingInProgress,

    #[error("Cannot start a playback from inside a playback")]
    PlaybackInProgress,

    #[error("Cannot start a recording during playback")]
    RecordingDuringPlayback,

    #[error("Recording not found: '{0}'")]
    RecordingNotFound(String),

    /// The controller (or the servo) rejected or failed a request
    #[error("Backend error: {0}")]
    Backend(String),

    /// The controller link is gone; the session cannot continue
    #[error("Connection error: {0}")]
    Connection(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", ...
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ArmError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error was raised while parsing operator input
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Self::Parse(_) | Self::RepetitionDepth { .. } | Self::UnknownCommand(_)
        )
    }

    /// Check if this error came from the motion backend
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Connection(_))
    }

    /// Check if this error is a missing recording
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordingNotFound(_))
    }

    /// Check if the session has to be torn down after this error.
    ///
    /// Only a lost controller connection is fatal; everything else is reported
    /// and the loop keeps accepting input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ArmError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for ArmError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ArmError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ArmError>`.
pub type Result<T> = std::result::Result<T, ArmError>;
