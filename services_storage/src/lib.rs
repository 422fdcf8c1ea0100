//! # Storage Service
//!
//! Persistence for the rich-text editor.
//!
//! ## Philosophy
//!
//! - **Injected, not global**: The session is handed a store; nothing reaches for a process-wide one
//! - **Key-value underneath**: Documents live under a configured key in a string key-value store
//! - **Crash-safe files**: The file store writes a checksummed snapshot to a sibling and renames it
//! - **Failures are testable**: `FailingStore` injects write failures on demand
//!
//! ## Design
//!
//! - **KeyValueStore**: `get`/`set`/`remove` over string keys and values
//! - **MemoryStore**, **FileStore**: the two backends
//! - **FailingStore**: wrapper that fails writes per a `FailurePolicy`
//! - **DocumentStore**: what the editor session talks to (`load`/`save`)

pub mod document_store;
pub mod failing_store;
pub mod file_store;
pub mod kv;

pub use document_store::{DocumentStore, KeyValueDocumentStore};
pub use failing_store::{FailingStore, FailurePolicy};
pub use file_store::FileStore;
pub use kv::{KeyValueStore, MemoryStore};

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupted store: {0}")]
    Corrupted(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },
}
