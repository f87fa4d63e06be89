//! Storage for generated audio files

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{ReadalongError, Result};

pub trait AudioStore {
    /// Write `bytes` to `folder/file_name`, creating the folder if needed.
    /// Returns the stored path.
    fn save(&mut self, folder: &str, file_name: &str, bytes: &[u8]) -> Result<String>;
    fn load(&self, path: &str) -> Result<Vec<u8>>;
    /// Returns false when there was nothing to remove.
    fn remove(&mut self, path: &str) -> Result<bool>;
}

/// Audio files under a root directory. Paths are relative to the root.
#[derive(Debug, Clone)]
pub struct FsAudioStore {
    root: PathBuf,
}

impl FsAudioStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl AudioStore for FsAudioStore {
    fn save(&mut self, folder: &str, file_name: &str, bytes: &[u8]) -> Result<String> {
        fs::create_dir_all(self.root.join(folder))?;
        let path = format!("{folder}/{file_name}");
        fs::write(self.resolve(&path), bytes)?;
        Ok(path)
    }

    fn load(&self, path: &str) -> Result<Vec<u8>> {
        fs::read(self.resolve(path)).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ReadalongError::AudioNotFound(path.to_string()),
            _ => ReadalongError::Io(err),
        })
    }

    fn remove(&mut self, path: &str) -> Result<bool> {
        match fs::remove_file(self.resolve(path)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
