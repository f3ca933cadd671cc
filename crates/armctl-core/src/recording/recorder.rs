//! Capture of command/response pairs into recordings.

use chrono::Local;

use super::model::{ActiveRecording, Recording};
use super::store::RecordingStore;
use crate::error::{ArmError, Result};

/// Owns the active recording (if any) and the finalized ones.
#[derive(Debug, Default)]
pub struct Recorder {
    current: Option<ActiveRecording>,
    store: RecordingStore,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&ActiveRecording> {
        self.current.as_ref()
    }

    /// Starts capturing. Fails if a recording is already in progress.
    pub fn start(&mut self, name: Option<String>) -> Result<()> {
        if self.current.is_some() {
            return Err(ArmError::RecordingAlreadyActive);
        }
        self.current = Some(ActiveRecording::new(name));
        Ok(())
    }

    /// Appends a pair to the active recording; no-op when not recording.
    pub fn capture(&mut self, input: &str, output: &str) {
        if let Some(current) = self.current.as_mut() {
            current.push(input, output);
        }
    }

    /// Finalizes the active recording and adds it to the store.
    ///
    /// Unnamed recordings get a timestamp name, suffixed if that name is
    /// already taken. Returns the store index of the new recording.
    pub fn stop(&mut self) -> Result<usize> {
        self.stop_avoiding(&[])
    }

    /// Like [`Recorder::stop`], but a generated name also avoids `taken`
    /// (names already persisted elsewhere).
    pub fn stop_avoiding(&mut self, taken: &[String]) -> Result<usize> {
        let current = self.current.take().ok_or(ArmError::NoActiveRecording)?;
        let name = match current.name() {
            Some(name) => name.to_string(),
            None => {
                let base = format!("recording_{}", Local::now().format("%Y-%m-%d_%H-%M-%S"));
                unique_name(base, |candidate| {
                    self.store.contains_name(candidate) || taken.iter().any(|t| t == candidate)
                })
            }
        };
        Ok(self.store.add(current.finalize(name)))
    }

    pub fn store(&self) -> &RecordingStore {
        &self.store
    }

    /// Adds a recording loaded from disk and returns its index.
    pub fn merge(&mut self, recording: Recording) -> usize {
        self.store.add(recording)
    }

}

/// `base`, or `base-2`, `base-3`, ... whichever is first not taken.
fn unique_name(base: String, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or(base)
}
