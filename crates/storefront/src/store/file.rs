//! JSON-file store backend.
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go to a sibling temp file
//! that is then renamed over the target, so a crash mid-write leaves either
//! the old or the new blob on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Store, StoreError, StoreKey};

/// Store that keeps one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Open` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Open {
            path: dir.clone(),
            source,
        })?;
        tracing::debug!(path = %dir.display(), "Opened JSON file store");
        Ok(Self { dir })
    }

    /// Directory holding the blobs.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl Store for JsonFileStore {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { key, source }),
        }
    }

    fn write(&self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        let target = self.path_for(key);
        let staging = self.dir.join(format!("{}.json.tmp", key.as_str()));

        fs::write(&staging, value).map_err(|source| StoreError::Io { key, source })?;
        fs::rename(&staging, &target).map_err(|source| {
            if let Err(e) = fs::remove_file(&staging) {
                tracing::warn!(path = %staging.display(), error = %e, "Failed to remove staging file");
            }
            StoreError::Io { key, source }
        })
    }

    fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { key, source }),
        }
    }
}
