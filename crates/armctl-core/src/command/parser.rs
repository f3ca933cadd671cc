//! Operator input parsing.
//!
//! Parsing is pure: it never blocks and never touches hardware. The only
//! session fact it consults is the current history length, which bounds the
//! repeat shorthand.

use std::path::PathBuf;
use std::time::Duration;

use super::alias::{self, Keyword};
use super::model::{Command, GripDirection, RecordingSelector};
use crate::error::{ArmError, Result};
use crate::motion::{GripLevel, Pose};

/// Separator between chained sub-commands.
pub const CHAIN_SEPARATOR: &str = "&&";

/// Splits a raw line on `&&` into trimmed, non-empty sub-commands.
pub fn split_chain(line: &str) -> Vec<&str> {
    line.split(CHAIN_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Parses a whole line up front.
///
/// Sub-command `i` is checked as if `i` earlier sub-commands had already been
/// appended to the history. Any failure rejects the whole line.
pub fn parse_line(line: &str, history_len: usize) -> Result<Vec<Command>> {
    split_chain(line)
        .into_iter()
        .enumerate()
        .map(|(offset, part)| parse_command(part, history_len + offset))
        .collect()
}

/// Parses a single sub-command (no `&&`).
pub fn parse_command(input: &str, history_len: usize) -> Result<Command> {
    let trimmed = input.trim();
    let mut tokens = trimmed.split_whitespace();
    let Some(first) = tokens.next() else {
        return Err(ArmError::parse("empty command"));
    };
    let word = first.to_lowercase();
    let args: Vec<&str> = tokens.collect();

    if alias::is_repeat_run(&word) && args.is_empty() {
        return repeat(word.chars().count(), history_len);
    }

    let Some(keyword) = alias::resolve(&word) else {
        return Ok(Command::RawText {
            text: trimmed.to_string(),
            forwarded: false,
        });
    };

    let command = match keyword {
        Keyword::Move => {
            let values = numbers(&args)?;
            Command::Move {
                pose: Pose::from_slice(&values)?,
                speed: None,
            }
        }
        Keyword::Undo => no_args(&word, &args, Command::Undo)?,
        Keyword::Grip => Command::Grip {
            level: optional_level(&word, &args)?,
        },
        Keyword::Ungrip => Command::Ungrip {
            level: optional_level(&word, &args)?,
        },
        Keyword::LessGrip => no_args(&word, &args, Command::AdjustGrip(GripDirection::Less))?,
        Keyword::MoreGrip => no_args(&word, &args, Command::AdjustGrip(GripDirection::More))?,
        Keyword::Wait => {
            let seconds = single_number(&word, &args)?;
            if seconds < 0.0 {
                return Err(ArmError::parse("wait needs a non-negative duration"));
            }
            if Duration::try_from_secs_f64(seconds).is_err() {
                return Err(ArmError::parse(format!("wait of {}s is out of range", seconds)));
            }
            Command::Wait { seconds }
        }
        Keyword::Cmd => {
            let text = remainder(trimmed, first);
            if text.is_empty() {
                return Err(ArmError::parse("cmd needs controller text"));
            }
            Command::RawText {
                text: text.to_string(),
                forwarded: true,
            }
        }
        Keyword::PushHome => no_args(&word, &args, Command::PushHome)?,
        Keyword::PopHome => no_args(&word, &args, Command::PopHome)?,
        Keyword::ClearHome => no_args(&word, &args, Command::ClearHome)?,
        Keyword::SetLinear => no_args(&word, &args, Command::SetLinear)?,
        Keyword::SetMaxSpeed => Command::SetMaxSpeed(speed(&word, &args)?),
        Keyword::DisableZeroTorque => no_args(&word, &args, Command::DisableZeroTorque)?,
        Keyword::SetSpeed => Command::SetSpeed(speed(&word, &args)?),
        Keyword::QueryPose => no_args(&word, &args, Command::QueryPose)?,
        Keyword::QueryJoints => no_args(&word, &args, Command::QueryJoints)?,
        Keyword::QueryGrip => no_args(&word, &args, Command::QueryGrip)?,
        Keyword::Repeat => {
            let depth = match args.as_slice() {
                [] => 1,
                [depth] => depth
                    .parse::<usize>()
                    .ok()
                    .filter(|d| *d > 0)
                    .ok_or_else(|| {
                        ArmError::parse(format!("'{}' is not a repetition depth", depth))
                    })?,
                _ => return Err(arity(&word, "at most one argument", args.len())),
            };
            repeat(depth, history_len)?
        }
        Keyword::History => no_args(&word, &args, Command::History)?,
        Keyword::ClearHistory => no_args(&word, &args, Command::ClearHistory)?,
        Keyword::Record => match args.as_slice() {
            [] => Command::Record { name: None },
            [name] => Command::Record {
                name: Some(recording_name(name)?),
            },
            _ => return Err(arity(&word, "at most one name", args.len())),
        },
        Keyword::StopRecord => no_args(&word, &args, Command::StopRecord)?,
        Keyword::SetRecordingsFolder => {
            let path = remainder(trimmed, first);
            if path.is_empty() {
                return Err(ArmError::parse("set-recordings-folder needs a path"));
            }
            Command::SetRecordingsFolder(PathBuf::from(path))
        }
        Keyword::PlayRecording => match args.as_slice() {
            [] => Command::PlayRecording(None),
            [selector] => Command::PlayRecording(Some(selector_from(selector))),
            _ => return Err(arity(&word, "at most one selector", args.len())),
        },
        Keyword::Exit => no_args(&word, &args, Command::Exit)?,
    };

    Ok(command)
}

fn repeat(depth: usize, history_len: usize) -> Result<Command> {
    if depth > history_len {
        return Err(ArmError::RepetitionDepth {
            depth,
            available: history_len,
        });
    }
    Ok(Command::Repeat(depth))
}

/// Text after the keyword, with the operator's spelling and spacing intact.
fn remainder<'a>(trimmed: &'a str, keyword: &str) -> &'a str {
    trimmed[keyword.len()..].trim()
}

fn arity(word: &str, expected: &str, got: usize) -> ArmError {
    ArmError::parse(format!("'{}' takes {}, got {}", word, expected, got))
}

fn no_args(word: &str, args: &[&str], command: Command) -> Result<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(arity(word, "no arguments", args.len()))
    }
}

fn number(token: &str) -> Result<f64> {
    let value: f64 = token
        .parse()
        .map_err(|_| ArmError::parse(format!("'{}' is not a number", token)))?;
    if !value.is_finite() {
        return Err(ArmError::parse(format!("'{}' is not a finite number", token)));
    }
    Ok(value)
}

fn numbers(args: &[&str]) -> Result<Vec<f64>> {
    args.iter().map(|token| number(token)).collect()
}

fn single_number(word: &str, args: &[&str]) -> Result<f64> {
    match args {
        [token] => number(token),
        _ => Err(arity(word, "exactly one number", args.len())),
    }
}

fn speed(word: &str, args: &[&str]) -> Result<f64> {
    let value = single_number(word, args)?;
    if value <= 0.0 {
        return Err(ArmError::parse(format!("'{}' needs a positive speed", word)));
    }
    Ok(value)
}

fn optional_level(word: &str, args: &[&str]) -> Result<Option<GripLevel>> {
    match args {
        [] => Ok(None),
        [token] => GripLevel::new(number(token)?).map(Some),
        _ => Err(arity(word, "at most one grip level", args.len())),
    }
}

fn recording_name(name: &str) -> Result<String> {
    if name.chars().all(|c| c.is_ascii_digit()) {
        return Err(ArmError::parse(
            "recording names cannot be purely numeric (numbers select by index)",
        ));
    }
    if name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(ArmError::parse(format!(
            "'{}' is not a valid recording name",
            name
        )));
    }
    Ok(name.to_string())
}

fn selector_from(token: &str) -> RecordingSelector {
    match token.parse::<usize>() {
        Ok(index) => RecordingSelector::Index(index),
        Err(_) => RecordingSelector::Name(token.to_string()),
    }
}
