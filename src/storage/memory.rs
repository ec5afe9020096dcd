//! In-memory storage.

use rustc_hash::FxHashMap;

use super::{Storage, StorageError, validate_key};

/// Storage backed by a map held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Create storage pre-populated with a single entry.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = FxHashMap::default();
        entries.insert(key.into(), value.into());

        MemoryStorage { entries }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;

        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.entries.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn get_missing_key_is_none() -> TestResult {
        let storage = MemoryStorage::new();

        assert_eq!(storage.get("manga-cart")?, None);

        Ok(())
    }

    #[test]
    fn set_then_get_returns_value() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.set("manga-cart", "{}")?;
        storage.set("manga-cart", r#"{"items":[]}"#)?;

        assert_eq!(storage.get("manga-cart")?.as_deref(), Some(r#"{"items":[]}"#));
        assert_eq!(storage.len(), 1);

        Ok(())
    }

    #[test]
    fn remove_deletes_and_tolerates_missing_keys() -> TestResult {
        let mut storage = MemoryStorage::with_entry("manga-cart", "{}");

        storage.remove("manga-cart")?;
        storage.remove("manga-cart")?;

        assert!(storage.is_empty());

        Ok(())
    }

    #[test]
    fn invalid_keys_are_rejected() {
        let mut storage = MemoryStorage::new();

        assert!(matches!(storage.set("", "{}"), Err(StorageError::InvalidKey(_))));
    }
}
