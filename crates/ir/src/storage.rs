//! Storage backends for the diagram stores
//!
//! - [`MemoryStorage`]: an in-process map, used by tests and ephemeral sessions
//! - [`FileStorage`]: one `<key>.json` file per key inside a directory

use erd_core::{DiagramError, DiagramResult, KeyValueStorage};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ============================================================================
// MemoryStorage
// ============================================================================

/// Key-value storage held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    values: BTreeMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every key
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Stored keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Get the number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> DiagramResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> DiagramResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DiagramResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

// ============================================================================
// FileStorage
// ============================================================================

/// Key-value storage backed by a directory of JSON files
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory
    pub fn open(root: impl Into<PathBuf>) -> DiagramResult<Self> {
        let root = root.into();
        if !root.exists() {
            std::fs::create_dir_all(&root).map_err(|e| DiagramError::DirectoryCreate {
                path: root.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(Self { root })
    }

    /// Directory holding the key files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> DiagramResult<PathBuf> {
        if !is_valid_key(key) {
            return Err(DiagramError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> DiagramResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DiagramError::StorageRead {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> DiagramResult<()> {
        let path = self.path_for(key)?;
        // write beside the target, then rename over it
        let tmp = path.with_extension("json.tmp");
        let write_err = |e: std::io::Error| DiagramError::StorageWrite {
            key: key.to_string(),
            message: e.to_string(),
        };
        std::fs::write(&tmp, value).map_err(write_err)?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                tracing::warn!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            return Err(write_err(e));
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DiagramResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DiagramError::StorageWrite {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Keys become file names, so only a conservative character set is allowed
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.get("entities").unwrap(), None);

        storage.set("entities", "[]").unwrap();
        storage.set("entities", "[1]").unwrap();
        assert_eq!(storage.get("entities").unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.len(), 1);

        storage.remove("entities").unwrap();
        storage.remove("entities").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp_dir.path().join("store")).unwrap();

        assert_eq!(storage.get("entities").unwrap(), None);
        storage.set("entities", r#"[{"id":"1"}]"#).unwrap();
        assert_eq!(
            storage.get("entities").unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
        assert!(storage.root().join("entities.json").exists());
        assert!(!storage.root().join("entities.json.tmp").exists());

        storage.remove("entities").unwrap();
        assert_eq!(storage.get("entities").unwrap(), None);
        storage.remove("entities").unwrap();
    }

    #[test]
    fn test_file_storage_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp_dir.path()).unwrap();
        storage.set("relationships", "[1,2,3]").unwrap();
        storage.set("relationships", "[]").unwrap();
        assert_eq!(storage.get("relationships").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp_dir.path()).unwrap();
        // a non-empty directory in place of the target makes the rename fail
        let blocked = temp_dir.path().join("entities.json");
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), "").unwrap();

        let err = storage.set("entities", "[]").unwrap_err();
        assert!(err.is_storage());
        assert!(!temp_dir.path().join("entities.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_rejects_bad_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp_dir.path()).unwrap();

        for key in ["", "../escape", "a/b", ".hidden"] {
            let err = storage.set(key, "[]").unwrap_err();
            assert!(matches!(err, DiagramError::InvalidKey(_)), "key {:?}", key);
        }
        assert!(storage.set("shop.entities", "[]").is_ok());
    }
}
