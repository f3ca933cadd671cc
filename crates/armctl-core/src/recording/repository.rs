//! Recording repository trait.
//!
//! Defines the interface for recording persistence operations.

use std::path::{Path, PathBuf};

use super::model::Recording;
use crate::error::Result;

/// An abstract repository for persisting finalized recordings.
///
/// Recordings live in a single folder, one entry per name. The folder can be
/// changed while the session runs (`set-recordings-folder`).
///
/// # Implementation Notes
///
/// `save` must never leave a partially written recording visible under its
/// final name: write the whole recording elsewhere and then make it visible.
pub trait RecordingRepository {
    /// The folder recordings are currently saved to and loaded from.
    fn folder(&self) -> &Path;

    /// Points the repository at another folder.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Folder accepted (it may be created lazily on first save)
    /// - `Err(_)`: The path exists but is not a directory
    fn set_folder(&mut self, folder: PathBuf) -> Result<()>;

    /// Saves a recording under its name, replacing any previous one.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Where the recording was written
    /// - `Err(_)`: Error occurred during serialization or write
    fn save(&self, recording: &Recording) -> Result<PathBuf>;

    /// Loads a recording by name.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Recording))`: Recording found
    /// - `Ok(None)`: No recording with this name in the folder
    /// - `Err(_)`: The file exists but could not be read or parsed
    fn load(&self, name: &str) -> Result<Option<Recording>>;

    /// Names of all recordings in the folder, sorted.
    fn list_names(&self) -> Result<Vec<String>>;
}

impl<R: RecordingRepository + ?Sized> RecordingRepository for Box<R> {
    fn folder(&self) -> &Path {
        (**self).folder()
    }

    fn set_folder(&mut self, folder: PathBuf) -> Result<()> {
        (**self).set_folder(folder)
    }

    fn save(&self, recording: &Recording) -> Result<PathBuf> {
        (**self).save(recording)
    }

    fn load(&self, name: &str) -> Result<Option<Recording>> {
        (**self).load(name)
    }

    fn list_names(&self) -> Result<Vec<String>> {
        (**self).list_names()
    }
}
