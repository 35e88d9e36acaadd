//! Durable key-value storage for the session record.
//!
//! A [`StorageBackend`] holds string values under string keys. Multi-key
//! writes and removals are a single logical unit: a backend either applies
//! all of them or reports an error.

use scorecard_core::Result;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StorageError;

/// Key-value persistence used by the session store.
pub trait StorageBackend {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores every entry as one logical write.
    fn set_entries(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError>;

    /// Removes every key as one logical write. Missing keys are ignored.
    fn remove_entries(&mut self, keys: &[&str]) -> Result<(), StorageError>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set_entries(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        (**self).set_entries(entries)
    }

    fn remove_entries(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        (**self).remove_entries(keys)
    }
}

/// In-process storage. Nothing outlives the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_entries(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_entries(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}

/// Storage backed by a JSON object file.
///
/// Every write rewrites the whole file through a temporary file in the same
/// directory, which is then atomically renamed over the target. A missing
/// file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates a store at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    location: self.location(),
                    reason: e.to_string(),
                }
                .into());
            }
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let entries = serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt {
            location: self.location(),
            reason: e.to_string(),
        })?;
        Ok(entries)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let write_failed = |reason: String| StorageError::WriteFailed {
            location: self.location(),
            reason,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| write_failed(e.to_string()))?;

        let json = serde_json::to_vec_pretty(entries).map_err(|e| write_failed(e.to_string()))?;

        let mut staged =
            tempfile::NamedTempFile::new_in(&dir).map_err(|e| write_failed(e.to_string()))?;
        staged
            .write_all(&json)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| write_failed(e.to_string()))?;
        staged
            .persist(&self.path)
            .map_err(|e| write_failed(e.error.to_string()))?;

        debug!(path = %self.path.display(), entries = entries.len(), "wrote storage file");
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut entries = self.read_all()?;
        Ok(entries.remove(key))
    }

    fn set_entries(&mut self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking new writes.
        let mut current = self.read_all().unwrap_or_default();
        for (key, value) in entries {
            current.insert((*key).to_string(), value.clone());
        }
        self.write_all(&current)
    }

    fn remove_entries(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        let mut current = self.read_all().unwrap_or_default();
        let before = current.len();
        for key in keys {
            current.remove(*key);
        }
        if current.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::WriteFailed {
                    location: self.location(),
                    reason: e.to_string(),
                }
                .into()),
            };
        }
        if current.len() == before {
            return Ok(());
        }
        self.write_all(&current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty());

        storage
            .set_entries(&[("a", "1".to_string()), ("b", "2".to_string())])
            .expect("set");
        assert_eq!(storage.get("a").expect("get"), Some("1".to_string()));
        assert_eq!(storage.len(), 2);

        storage.remove_entries(&["a", "missing"]).expect("remove");
        assert!(!storage.contains("a"));
        assert!(storage.contains("b"));
    }

    #[test]
    fn file_storage_missing_file_reads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.get("anything").expect("get"), None);
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("store.json");

        let mut writer = FileStorage::new(&path);
        writer
            .set_entries(&[("k", "v".to_string())])
            .expect("set");

        let reader = FileStorage::new(&path);
        assert_eq!(reader.get("k").expect("get"), Some("v".to_string()));
    }

    #[test]
    fn file_storage_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").expect("write");

        let storage = FileStorage::new(&path);
        let err = storage.get("k").unwrap_err();
        assert!(err.to_string().contains("corrupt"));
    }

    #[test]
    fn file_storage_write_replaces_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        fs::write(&path, "garbage").expect("write");

        let mut storage = FileStorage::new(&path);
        storage
            .set_entries(&[("k", "v".to_string())])
            .expect("set");
        assert_eq!(storage.get("k").expect("get"), Some("v".to_string()));
    }

    #[test]
    fn file_storage_removing_last_key_deletes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.json");

        let mut storage = FileStorage::new(&path);
        storage
            .set_entries(&[("a", "1".to_string()), ("b", "2".to_string())])
            .expect("set");
        storage.remove_entries(&["a"]).expect("remove");
        assert!(path.exists());

        storage.remove_entries(&["b"]).expect("remove");
        assert!(!path.exists());

        storage.remove_entries(&["b"]).expect("idempotent remove");
    }
}
