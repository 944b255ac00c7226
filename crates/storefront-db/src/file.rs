//! JSON-file-backed key-value store.
//!
//! Writes land in memory; [`KeyValueStore::flush`] serializes the whole map
//! to a uniquely named temp file in the target's directory, syncs it to disk,
//! and renames it over the target. A crash mid-write leaves the previous save
//! intact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::DbError;
use crate::kv::KeyValueStore;
use crate::memory::MemoryStore;

/// A [`KeyValueStore`] persisted as a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    cache: MemoryStore,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store; the file is created on the
    /// first flush.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`] if the file exists but cannot be read.
    /// Returns [`DbError::Serialization`] if it is not a JSON object of
    /// integers and strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let path = path.into();
        let cache = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => MemoryStore::new(),
            Ok(contents) => MemoryStore::from_values(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No save file yet, starting empty");
                MemoryStore::new()
            }
            Err(err) => return Err(err.into()),
        };

        info!(path = %path.display(), keys = cache.values().len(), "Opened file store");
        Ok(Self { path, cache })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl KeyValueStore for FileStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.cache.get_int(key, default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.cache.set_int(key, value);
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.cache.get_string(key)
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.cache.set_string(key, value);
    }

    fn has_key(&self, key: &str) -> bool {
        self.cache.has_key(key)
    }

    fn flush(&mut self) -> Result<(), DbError> {
        let parent = self.parent_dir();
        fs::create_dir_all(parent)?;

        let json = serde_json::to_vec_pretty(self.cache.values())?;
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        if let Err(err) = tmp.persist(&self.path) {
            return Err(err.error.into());
        }

        self.cache.flush()?;
        debug!(path = %self.path.display(), "Flushed file store");
        Ok(())
    }
}
