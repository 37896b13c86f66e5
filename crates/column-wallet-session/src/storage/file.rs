//! File-backed session store.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use column_wallet_core::traits::{SessionStore, StorageError};

/// Store that keeps the slots as one JSON object on disk.
///
/// Every operation reads the file afresh, so several processes pointed at the
/// same path behave like tabs sharing an origin: last write wins.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Store at an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store under the platform data directory.
    ///
    /// # Errors
    /// Returns error if the platform has no data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        let dir = dirs::data_local_dir()
            .ok_or_else(|| StorageError::Internal("No local data directory".to_string()))?;
        Ok(Self::new(dir.join("column-wallet").join("session.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Corrupt(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(slots)
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, StorageError> {
        self.lock
            .lock()
            .map_err(|e| StorageError::Internal(e.to_string()))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard()?;
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        let mut slots = self.read()?;
        slots.insert(key.to_string(), value.to_string());
        self.write(&slots)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.guard()?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ADDRESS_KEY, NETWORK_KEY};

    #[test]
    fn test_roundtrip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let a = FileStore::new(&path);
        a.set(ADDRESS_KEY, "0xABC").unwrap();
        a.set(NETWORK_KEY, "testnet").unwrap();

        let b = FileStore::new(&path);
        assert_eq!(b.get(ADDRESS_KEY).unwrap().as_deref(), Some("0xABC"));
        assert_eq!(b.get(NETWORK_KEY).unwrap().as_deref(), Some("testnet"));
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get(ADDRESS_KEY).unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get(ADDRESS_KEY), Err(StorageError::Corrupt(_))));

        store.clear().unwrap();
        assert!(!path.exists());
    }
}
