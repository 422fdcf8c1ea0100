//! Key-value store abstraction and the in-memory backend

use std::collections::BTreeMap;

use crate::StorageResult;

/// String key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`; false if it was not present
    fn remove(&mut self, key: &str) -> StorageResult<bool>;

    /// All keys, sorted
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Bytes held by keys and values together
    fn used_bytes(&self) -> StorageResult<usize> {
        let mut total = 0;
        for key in self.keys()? {
            let value = self.get(&key)?.unwrap_or_default();
            total += key.len() + value.len();
        }
        Ok(total)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
