//! Structured operator commands.

use std::fmt;
use std::path::PathBuf;

use strum::{Display, IntoStaticStr};

use crate::motion::{GripLevel, Pose};

/// Direction of a relative grip adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum GripDirection {
    Less,
    More,
}

/// How `play-recording` picks a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingSelector {
    /// Matches a recording by its name, in memory first and then on disk.
    Name(String),
    /// Position in the list of finalized recordings, starting at 0.
    Index(usize),
}

impl fmt::Display for RecordingSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingSelector::Name(name) => write!(f, "{}", name),
            RecordingSelector::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// One parsed operator command.
///
/// The set is closed: the interpreter matches on it exhaustively, so adding a
/// command means adding a variant here and an arm in the dispatcher.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Command {
    Move {
        pose: Pose,
        speed: Option<f64>,
    },
    Undo,
    Grip {
        level: Option<GripLevel>,
    },
    Ungrip {
        level: Option<GripLevel>,
    },
    AdjustGrip(GripDirection),
    Wait {
        seconds: f64,
    },
    /// Controller text. `forwarded` is set for `cmd ...`; an unresolved
    /// keyword yields an unforwarded value that the dispatcher rejects.
    RawText {
        text: String,
        forwarded: bool,
    },
    PushHome,
    PopHome,
    ClearHome,
    SetLinear,
    SetMaxSpeed(f64),
    SetSpeed(f64),
    DisableZeroTorque,
    QueryPose,
    QueryJoints,
    QueryGrip,
    /// Re-execute the history entry `count` positions back.
    Repeat(usize),
    History,
    ClearHistory,
    Record {
        name: Option<String>,
    },
    StopRecord,
    SetRecordingsFolder(PathBuf),
    PlayRecording(Option<RecordingSelector>),
    Exit,
}

impl Command {
    /// Stable kebab-case name of the variant, used in logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Whether the command changes pose or grip (and is thus undoable).
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Move { .. }
                | Command::Grip { .. }
                | Command::Ungrip { .. }
                | Command::AdjustGrip(_)
                | Command::PopHome
        )
    }
}
