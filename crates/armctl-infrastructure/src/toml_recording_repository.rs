//! TOML-based implementation of RecordingRepository.
//!
//! Each recording is stored as `<folder>/<name>.toml`.

use crate::dto::RecordingFileV1;
use crate::storage::AtomicTomlFile;
use armctl_core::error::{ArmError, Result};
use armctl_core::recording::{Recording, RecordingRepository};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTENSION: &str = "toml";

/// A repository that keeps one TOML file per recording in a folder.
pub struct TomlRecordingRepository {
    folder: PathBuf,
}

impl TomlRecordingRepository {
    /// Creates a repository over `folder`. The folder is created on first save.
    pub fn new(folder: PathBuf) -> Self {
        Self { folder }
    }

    fn file_for(&self, name: &str) -> Result<AtomicTomlFile<RecordingFileV1>> {
        if name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\'])
        {
            return Err(ArmError::parse(format!(
                "'{}' cannot be used as a recording file name",
                name
            )));
        }
        Ok(AtomicTomlFile::new(
            self.folder.join(format!("{}.{}", name, EXTENSION)),
        ))
    }
}

impl RecordingRepository for TomlRecordingRepository {
    fn folder(&self) -> &Path {
        &self.folder
    }

    fn set_folder(&mut self, folder: PathBuf) -> Result<()> {
        if folder.exists() && !folder.is_dir() {
            return Err(ArmError::config(format!(
                "{} exists and is not a directory",
                folder.display()
            )));
        }
        debug!(folder = %folder.display(), "recordings folder changed");
        self.folder = folder;
        Ok(())
    }

    fn save(&self, recording: &Recording) -> Result<PathBuf> {
        let file = self.file_for(recording.name())?;
        file.save(&RecordingFileV1::from(recording))?;
        debug!(path = %file.path().display(), steps = recording.len(), "recording written");
        Ok(file.path().to_path_buf())
    }

    fn load(&self, name: &str) -> Result<Option<Recording>> {
        let file = self.file_for(name)?;
        let Some(dto) = file.load()? else {
            return Ok(None);
        };
        if dto.name != name {
            return Err(ArmError::Serialization {
                format: "recording".to_string(),
                message: format!(
                    "{} holds recording '{}', expected '{}'",
                    file.path().display(),
                    dto.name,
                    name
                ),
            });
        }
        dto.into_domain().map(Some)
    }

    fn list_names(&self) -> Result<Vec<String>> {
        if !self.folder.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.folder)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if !stem.starts_with('.') {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
