//! Document persistence collaborator
//!
//! The editor session never touches a key-value store directly; it talks to
//! a `DocumentStore` that knows where the serialized document lives.

use editor_core::SerializedDocument;

use crate::kv::KeyValueStore;
use crate::StorageResult;

/// Loads and saves the serialized document
pub trait DocumentStore {
    /// Returns the saved document, or `None` if there is none
    ///
    /// Read failures are logged and reported as `None`.
    fn load(&self) -> Option<SerializedDocument>;

    fn save(&mut self, document: &SerializedDocument) -> StorageResult<()>;
}

/// DocumentStore over any KeyValueStore, under one key
#[derive(Debug)]
pub struct KeyValueDocumentStore<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KeyValueDocumentStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: KeyValueStore> DocumentStore for KeyValueDocumentStore<S> {
    fn load(&self) -> Option<SerializedDocument> {
        match self.store.get(&self.key) {
            Ok(value) => value.map(SerializedDocument::from_json),
            Err(err) => {
                log::warn!("failed to read {}: {}", self.key, err);
                None
            }
        }
    }

    fn save(&mut self, document: &SerializedDocument) -> StorageResult<()> {
        self.store.set(&self.key, document.as_str())?;
        log::debug!("saved {} ({} bytes)", self.key, document.as_str().len());
        Ok(())
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for Box<T> {
    fn load(&self) -> Option<SerializedDocument> {
        (**self).load()
    }

    fn save(&mut self, document: &SerializedDocument) -> StorageResult<()> {
        (**self).save(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailingStore, FailurePolicy, MemoryStore, StorageError};

    #[test]
    fn test_load_missing_is_none() {
        let store = KeyValueDocumentStore::new(MemoryStore::new(), "editorContent");
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = KeyValueDocumentStore::new(MemoryStore::new(), "editorContent");
        let doc = SerializedDocument::from_json("{\"blocks\":[]}");
        store.save(&doc).unwrap();

        assert_eq!(store.load(), Some(doc));
        assert_eq!(
            store.store().get("editorContent").unwrap().as_deref(),
            Some("{\"blocks\":[]}")
        );
    }

    #[test]
    fn test_save_failure_propagates() {
        let failing = FailingStore::new(MemoryStore::new(), FailurePolicy::Always);
        let mut store = KeyValueDocumentStore::new(failing, "editorContent");
        let err = store
            .save(&SerializedDocument::from_json("{}"))
            .unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_boxed_store() {
        let mut boxed: Box<dyn DocumentStore> = Box::new(KeyValueDocumentStore::new(
            MemoryStore::new(),
            "notes",
        ));
        boxed.save(&SerializedDocument::from_json("{}")).unwrap();
        assert!(boxed.load().is_some());
    }
}
