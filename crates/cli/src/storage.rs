//! File-backed key-value storage: one file per key under a data directory.

use showcase_core::{Error, Result, Storage};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`. Characters outside `[A-Za-z0-9._-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name.trim_start_matches('.')))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Storage(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase_core::PresentationStore;

    #[test]
    fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get_item("absent").unwrap(), None);
    }

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));

        storage.set_item("showcase-gallery-auth", "true").unwrap();
        assert_eq!(
            storage.get_item("showcase-gallery-auth").unwrap().as_deref(),
            Some("true")
        );

        storage.remove_item("showcase-gallery-auth").unwrap();
        assert_eq!(storage.get_item("showcase-gallery-auth").unwrap(), None);
        storage.remove_item("showcase-gallery-auth").unwrap();
    }

    #[test]
    fn test_key_is_sanitized() {
        let storage = FileStorage::new("/data");
        assert_eq!(
            storage.path_for("../a/b c"),
            PathBuf::from("/data/_a_b_c.json")
        );
    }

    #[test]
    fn test_store_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = PresentationStore::new(FileStorage::new(dir.path()));
        store.load();
        store
            .update(|c| {
                let mut next = c.clone();
                next.intro_title = "Q3 Launch".to_string();
                next
            })
            .unwrap();

        let mut reopened = PresentationStore::new(FileStorage::new(dir.path()));
        assert_eq!(reopened.load().intro_title, "Q3 Launch");
    }
}
