//! Playback reports.

use std::fmt;

/// A replayed step whose live response differed from the recorded one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDiff {
    /// Zero-based position of the step within the recording.
    pub index: usize,
    pub input: String,
    pub recorded: String,
    pub live: String,
}

/// Outcome of replaying a recording against the live backend.
///
/// A mismatch is data, not an error: playback always runs every step unless
/// the session ends underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackReport {
    pub name: String,
    pub total_steps: usize,
    pub steps_run: usize,
    pub diffs: Vec<StepDiff>,
    /// Set when the session finished before every step ran.
    pub aborted: bool,
}

impl PlaybackReport {
    pub fn new(name: impl Into<String>, total_steps: usize) -> Self {
        Self {
            name: name.into(),
            total_steps,
            steps_run: 0,
            diffs: Vec::new(),
            aborted: false,
        }
    }

    /// Records one replayed step, keeping it only if the responses differ.
    pub fn record(&mut self, index: usize, input: &str, recorded: &str, live: &str) {
        self.steps_run += 1;
        if recorded != live {
            self.diffs.push(StepDiff {
                index,
                input: input.to_string(),
                recorded: recorded.to_string(),
                live: live.to_string(),
            });
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diffs.is_empty() && !self.aborted
    }
}

impl fmt::Display for PlaybackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "played '{}': {}/{} steps",
            self.name, self.steps_run, self.total_steps
        )?;
        if self.aborted {
            write!(f, " (session ended early)")?;
        }
        if self.diffs.is_empty() {
            return write!(f, ", no differences");
        }
        write!(f, ", {} difference(s)", self.diffs.len())?;
        for diff in &self.diffs {
            write!(
                f,
                "\n  step {} '{}'\n    recorded: {}\n    live:     {}",
                diff.index + 1,
                diff.input,
                diff.recorded,
                diff.live
            )?;
        }
        Ok(())
    }
}
