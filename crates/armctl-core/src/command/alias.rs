//! Keyword alias table.
//!
//! Every alias maps to exactly one [`Keyword`]. The table is built once and
//! cached for the lifetime of the process.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Command keyword after alias resolution, before arguments are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Move,
    Undo,
    Grip,
    Ungrip,
    LessGrip,
    MoreGrip,
    Wait,
    Cmd,
    PushHome,
    PopHome,
    ClearHome,
    SetLinear,
    SetMaxSpeed,
    DisableZeroTorque,
    SetSpeed,
    QueryPose,
    QueryJoints,
    QueryGrip,
    Repeat,
    History,
    ClearHistory,
    Record,
    StopRecord,
    SetRecordingsFolder,
    PlayRecording,
    Exit,
}

/// The character a repeat-shorthand run is made of (`r`, `rr`, `rrr`, ...).
pub const REPEAT_CHAR: char = 'r';

/// A keyword together with its spellings and help text.
#[derive(Debug, Clone, Copy)]
pub struct AliasEntry {
    pub keyword: Keyword,
    /// Accepted spellings; the first one is canonical.
    pub aliases: &'static [&'static str],
    /// Usage format (e.g., "move <x> <y> <z> <yaw> <pitch> <roll>")
    pub usage: &'static str,
    pub description: &'static str,
}

const ALIAS_TABLE: &[AliasEntry] = &[
    AliasEntry {
        keyword: Keyword::Move,
        aliases: &["movec", "move", "m"],
        usage: "movec <x> <y> <z> <yaw> <pitch> <roll>",
        description: "Move to a cartesian pose",
    },
    AliasEntry {
        keyword: Keyword::Undo,
        aliases: &["undo", "u"],
        usage: "undo",
        description: "Reverse the most recent move or grip",
    },
    AliasEntry {
        keyword: Keyword::Grip,
        aliases: &["grip"],
        usage: "grip [level]",
        description: "Close the gripper (default fully closed)",
    },
    AliasEntry {
        keyword: Keyword::Ungrip,
        aliases: &["ungrip", "release"],
        usage: "ungrip [level]",
        description: "Open the gripper (default fully open)",
    },
    AliasEntry {
        keyword: Keyword::LessGrip,
        aliases: &["less-grip", "less", "ls"],
        usage: "less-grip",
        description: "Open the gripper by one step",
    },
    AliasEntry {
        keyword: Keyword::MoreGrip,
        aliases: &["more-grip", "more", "mr"],
        usage: "more-grip",
        description: "Close the gripper by one step",
    },
    AliasEntry {
        keyword: Keyword::Wait,
        aliases: &["wait", "sleep"],
        usage: "wait <seconds>",
        description: "Pause before the next command",
    },
    AliasEntry {
        keyword: Keyword::Cmd,
        aliases: &["cmd"],
        usage: "cmd <controller text>",
        description: "Send text to the controller verbatim",
    },
    AliasEntry {
        keyword: Keyword::PushHome,
        aliases: &["push-home", "set-home", "sh"],
        usage: "push-home",
        description: "Save the current pose on the home stack",
    },
    AliasEntry {
        keyword: Keyword::PopHome,
        aliases: &["pop-home", "home", "ph", "h"],
        usage: "pop-home",
        description: "Return to the most recently saved home pose",
    },
    AliasEntry {
        keyword: Keyword::ClearHome,
        aliases: &["clear-home", "ch"],
        usage: "clear-home",
        description: "Forget all saved home poses",
    },
    AliasEntry {
        keyword: Keyword::SetLinear,
        aliases: &["set-linear", "linear", "l"],
        usage: "set-linear",
        description: "Restrict motion to straight lines at the session speed",
    },
    AliasEntry {
        keyword: Keyword::SetMaxSpeed,
        aliases: &["set-max-speed", "max-speed", "ms"],
        usage: "set-max-speed <speed>",
        description: "Set the controller speed limit",
    },
    AliasEntry {
        keyword: Keyword::DisableZeroTorque,
        aliases: &["disable-zero-torque", "dzt", "ztq", "zt", "zq", "z"],
        usage: "disable-zero-torque",
        description: "Leave zero-torque (hand guiding) mode",
    },
    AliasEntry {
        keyword: Keyword::SetSpeed,
        aliases: &["set-speed", "speed", "ss"],
        usage: "set-speed <speed>",
        description: "Set the speed used by subsequent moves",
    },
    AliasEntry {
        keyword: Keyword::QueryPose,
        aliases: &["wherec", "wc", "w"],
        usage: "wherec",
        description: "Report the cartesian pose",
    },
    AliasEntry {
        keyword: Keyword::QueryJoints,
        aliases: &["wherej", "wj", "j"],
        usage: "wherej",
        description: "Report the joint angles",
    },
    AliasEntry {
        keyword: Keyword::QueryGrip,
        aliases: &["whereg", "wg", "g"],
        usage: "whereg",
        description: "Report the grip level",
    },
    AliasEntry {
        keyword: Keyword::Repeat,
        aliases: &["again", "redo", "repeat", "r"],
        usage: "r | rr | rrr ... | repeat [depth]",
        description: "Re-run the command that many entries back in history",
    },
    AliasEntry {
        keyword: Keyword::History,
        aliases: &["history", "hi"],
        usage: "history",
        description: "Show the command log",
    },
    AliasEntry {
        keyword: Keyword::ClearHistory,
        aliases: &["clear-history", "chi"],
        usage: "clear-history",
        description: "Empty the command log",
    },
    AliasEntry {
        keyword: Keyword::Record,
        aliases: &["record", "rec"],
        usage: "record [name]",
        description: "Start capturing commands and responses",
    },
    AliasEntry {
        keyword: Keyword::StopRecord,
        aliases: &["stop-record", "stop-rec"],
        usage: "stop-record",
        description: "Finish and save the active recording",
    },
    AliasEntry {
        keyword: Keyword::SetRecordingsFolder,
        aliases: &["set-recordings-folder", "srf"],
        usage: "set-recordings-folder <path>",
        description: "Choose where recordings are saved and loaded",
    },
    AliasEntry {
        keyword: Keyword::PlayRecording,
        aliases: &["play-recording", "play-rec", "play"],
        usage: "play-recording [name | index]",
        description: "Replay a recording and report differences",
    },
    AliasEntry {
        keyword: Keyword::Exit,
        aliases: &["exit", "quit"],
        usage: "exit",
        description: "Release the arm and end the session",
    },
];

static ALIAS_INDEX: OnceLock<HashMap<&'static str, Keyword>> = OnceLock::new();

/// Returns every keyword entry in display order.
pub fn alias_entries() -> &'static [AliasEntry] {
    ALIAS_TABLE
}

/// Resolves a lower-cased word to its keyword.
pub fn resolve(word: &str) -> Option<Keyword> {
    ALIAS_INDEX
        .get_or_init(|| {
            ALIAS_TABLE
                .iter()
                .flat_map(|entry| entry.aliases.iter().map(|alias| (*alias, entry.keyword)))
                .collect()
        })
        .get(word)
        .copied()
}

/// True for a non-empty run made only of [`REPEAT_CHAR`].
pub fn is_repeat_run(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c == REPEAT_CHAR)
}
