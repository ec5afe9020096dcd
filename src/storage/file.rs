//! File-backed storage.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::trace;

use super::{Storage, StorageError, validate_key};

/// Storage that keeps each key in `<dir>/<key>.json`.
///
/// The directory is created on the first write. Writes go to a temporary
/// sibling file which is then renamed over the target, so a reader never sees
/// a half-written value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    /// The directory holding the stored files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a key is stored in.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if the key is not a plain name.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = self.dir.join(format!("{key}.json.tmp"));

        fs::create_dir_all(&self.dir)?;
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        trace!(path = %path.display(), bytes = value.len(), "stored value");

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn get_before_any_write_is_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("missing"));

        assert_eq!(storage.get("manga-cart")?, None);

        Ok(())
    }

    #[test]
    fn set_creates_directory_and_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::new(dir.path().join("nested").join("data"));

        storage.set("manga-cart", r#"{"items":[],"total":0.0}"#)?;

        let path = storage.path_for("manga-cart")?;

        assert!(path.exists());
        assert_eq!(
            storage.get("manga-cart")?.as_deref(),
            Some(r#"{"items":[],"total":0.0}"#)
        );
        assert!(!dir.path().join("nested/data/manga-cart.json.tmp").exists());

        Ok(())
    }

    #[test]
    fn set_overwrites_previous_value() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::new(dir.path());

        storage.set("manga-cart", "first")?;
        storage.set("manga-cart", "second")?;

        assert_eq!(storage.get("manga-cart")?.as_deref(), Some("second"));

        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::new(dir.path());

        storage.set("manga-cart", "{}")?;
        storage.remove("manga-cart")?;
        storage.remove("manga-cart")?;

        assert_eq!(storage.get("manga-cart")?, None);

        Ok(())
    }

    #[test]
    fn path_like_keys_are_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());

        assert!(matches!(
            storage.path_for("../escape"),
            Err(StorageError::InvalidKey(_))
        ));

        Ok(())
    }
}
