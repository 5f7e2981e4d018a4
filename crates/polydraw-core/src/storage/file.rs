//! File-based storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::document::SessionDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores documents as JSON files in a directory, one file per ID.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/polydraw/sketches/`
    /// On Windows: `%LOCALAPPDATA%\polydraw\sketches\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("polydraw").join("sketches"))
    }

    fn document_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, document: &SessionDocument) -> StorageResult<()> {
        let path = self.document_path(id);
        let json = document
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        log::debug!("Saved {} to {}", id, path.display());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<SessionDocument> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        SessionDocument::from_json(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::session::Session;
    use kurbo::Point;
    use tempfile::tempdir;

    fn sample() -> SessionDocument {
        let mut session = Session::with_calibration(Calibration::new(2.0, 20.0).unwrap());
        for (x, y) in [(0.0, 0.0), (30.0, 0.0), (30.0, 40.0), (1.0, 1.0)] {
            session.add_point(Point::new(x, y));
        }
        session.to_document()
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let doc = sample();

        storage.save("test-doc", &doc).unwrap();
        let loaded = storage.load("test-doc").unwrap();

        assert_eq!(loaded, doc);
        assert_eq!(loaded.scale, 2.0);
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let result = storage.load("nonexistent");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();

        let result = storage.load("broken");
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_overwrites() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        storage.save("doc", &sample()).unwrap();

        let empty = Session::new().to_document();
        storage.save("doc", &empty).unwrap();
        assert_eq!(storage.load("doc").unwrap(), empty);
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let doc = sample();

        storage.save("test/doc:with*special", &doc).unwrap();
        let loaded = storage.load("test/doc:with*special").unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::new(nested.clone()).unwrap();
        assert_eq!(storage.base_path(), nested.as_path());
        assert!(nested.exists());
    }
}
