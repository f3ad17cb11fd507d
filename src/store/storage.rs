use std::collections::HashMap;
use std::fs;
use std::io;
use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;

/// Default per-store quota, matching the usual browser origin limit.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { needed: u64, quota: u64 },
}

/// A string key-value store.
pub trait Storage {
    /// Read a value. A missing key is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails or exceeds the quota.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be modified.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage, used for tests and `--ephemeral` sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<u64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_quota(mut self, quota: u64) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Seed a raw value, bypassing the quota.
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    fn used_without(&self, key: &str) -> u64 {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = self.used_without(key) + (key.len() + value.len()) as u64;
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed storage: one `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota: u64,
}

impl FileStorage {
    /// Storage rooted at `dir`, created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota: DEFAULT_QUOTA_BYTES,
        }
    }

    #[must_use]
    pub const fn with_quota(mut self, quota: u64) -> Self {
        self.quota = quota;
        self
    }

    /// File path holding `key`. Bytes outside `[A-Za-z0-9_-]` are written
    /// as `%XX`, so distinct keys never share a file.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                name.push(char::from(byte));
            } else {
                let _ = write!(name, "%{byte:02X}");
            }
        }
        self.dir.join(format!("{name}.json"))
    }

    /// Bytes used by every stored value other than `key`'s.
    fn used_without(&self, key: &str) -> Result<u64, StorageError> {
        let skip = self.path_for(key);
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };
        Ok(entries
            .filter_map(Result::ok)
            .filter(|e| e.path() != skip)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|e| e.metadata().ok())
            .filter(fs::Metadata::is_file)
            .map(|m| m.len())
            .sum())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let needed = self.used_without(key)? + value.len() as u64;
        if needed > self.quota {
            return Err(StorageError::QuotaExceeded {
                needed,
                quota: self.quota,
            });
        }
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage_get_set_remove() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get("k").unwrap().is_none());
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();
        assert!(storage.get("k").unwrap().is_none());
    }

    #[test]
    fn test_memory_quota_rejects_and_keeps_old_value() {
        let mut storage = MemoryStorage::new().with_quota(8);
        storage.set("k", "1234").unwrap();
        let err = storage.set("k", "123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("data"));
        assert!(storage.get("editorContent").unwrap().is_none());

        storage.set("editorContent", "[1,2]").unwrap();
        assert_eq!(
            storage.get("editorContent").unwrap().as_deref(),
            Some("[1,2]")
        );
        assert!(dir.path().join("data").join("editorContent.json").exists());

        storage.remove("editorContent").unwrap();
        storage.remove("editorContent").unwrap();
        assert!(storage.get("editorContent").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_escapes_key() {
        let storage = FileStorage::new("/tmp/x");
        assert_eq!(
            storage.path_for("../evil key"),
            PathBuf::from("/tmp/x/%2E%2E%2Fevil%20key.json")
        );
        assert_eq!(
            storage.path_for("editorContent"),
            PathBuf::from("/tmp/x/editorContent.json")
        );
    }

    #[test]
    fn test_distinct_keys_get_distinct_files() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        assert_ne!(storage.path_for("a.b"), storage.path_for("a_b"));
        storage.set("a.b", "dot").unwrap();
        storage.set("a_b", "underscore").unwrap();
        assert_eq!(storage.get("a.b").unwrap().as_deref(), Some("dot"));
        assert_eq!(storage.get("a_b").unwrap().as_deref(), Some("underscore"));
    }

    #[test]
    fn test_file_storage_quota_counts_other_keys() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path()).with_quota(10);
        storage.set("a", "123456").unwrap();
        // Rewriting the same key only counts the new value
        storage.set("a", "1234567890").unwrap();
        let err = storage.set("b", "12").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 12,
                quota: 10
            }
        ));
    }
}
