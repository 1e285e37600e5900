use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create storage directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// String key-value persistence the list store writes through.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keeps each key in its own file inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `gymlist:v1` lives in `gymlist_v1.json`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|source| StorageError::Write { path, source })
    }
}

#[cfg(test)]
pub use memory::MemoryStore;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).expect("open");
        assert!(store.get("gymlist:v1").expect("get").is_none());
    }

    #[test]
    fn written_value_reads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::open(dir.path()).expect("open");
        store.set("gymlist:v1", "[]").expect("set");
        store.set("gymlist:v1", "[1]").expect("overwrite");
        assert_eq!(store.get("gymlist:v1").expect("get").as_deref(), Some("[1]"));
        assert!(!dir.path().join("gymlist_v1.json.tmp").exists());
    }

    #[test]
    fn key_maps_to_sanitized_file_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).expect("open");
        assert_eq!(
            store.path_for("gymlist:v1"),
            dir.path().join("gymlist_v1.json")
        );
        assert_eq!(store.path_for("../x"), dir.path().join("___x.json"));
    }

    #[test]
    fn open_creates_nested_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).expect("open");
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn write_into_removed_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("gone");
        let mut store = FileStore::open(&nested).expect("open");
        std::fs::remove_dir_all(&nested).expect("remove");
        let err = store.set("gymlist:v1", "[]").unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
    }

    #[test]
    fn open_over_a_file_reports_the_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("taken");
        fs::write(&blocker, "x").expect("write");
        let err = FileStore::open(blocker.join("data")).unwrap_err();
        assert!(matches!(err, StorageError::CreateDir { .. }));
        assert!(err.to_string().contains("taken"));
    }

    #[test]
    fn unreadable_entry_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).expect("open");
        fs::create_dir(store.path_for("a")).expect("mkdir");
        let err = store.get("a").unwrap_err();
        assert!(matches!(err, StorageError::Read { .. }));
    }
}
