//! File-backed key-value store
//!
//! All entries live in one JSON snapshot:
//!
//! ```json
//! { "version": 1, "checksum": 2913547510, "entries": { "editorContent": "..." } }
//! ```
//!
//! The checksum is the CRC32 of the serialized `entries` map. Every write
//! serializes the full snapshot to a `.tmp` sibling and renames it over the
//! real file, so a crash mid-write leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::kv::KeyValueStore;
use crate::{StorageError, StorageResult};

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    checksum: u32,
    entries: BTreeMap<String, String>,
}

impl Snapshot {
    const CURRENT_VERSION: u32 = 1;

    fn new(entries: BTreeMap<String, String>) -> StorageResult<Self> {
        let checksum = checksum(&entries)?;
        Ok(Self {
            version: Self::CURRENT_VERSION,
            checksum,
            entries,
        })
    }

    fn is_valid(&self) -> StorageResult<bool> {
        Ok(checksum(&self.entries)? == self.checksum)
    }
}

/// Compute CRC32 checksum of the serialized entries
fn checksum(entries: &BTreeMap<String, String>) -> StorageResult<u32> {
    let data =
        serde_json::to_vec(entries).map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(crc32fast::hash(&data))
}

/// Key-value store persisted to a single file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            Self::read_snapshot(&path)?
        } else {
            BTreeMap::new()
        };
        log::debug!("opened file store {} ({} entries)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    /// Opens the store, starting empty if the file cannot be read
    ///
    /// The unreadable file is only replaced on the next write.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(err) => {
                log::warn!("starting with an empty store, {} unreadable: {}", path.display(), err);
                Self {
                    path,
                    entries: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_snapshot(path: &Path) -> StorageResult<BTreeMap<String, String>> {
        let bytes = fs::read(path)?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Corrupted(format!("{}: {}", path.display(), e)))?;
        if snapshot.version != Snapshot::CURRENT_VERSION {
            return Err(StorageError::Corrupted(format!(
                "{}: unsupported version {}",
                path.display(),
                snapshot.version
            )));
        }
        if !snapshot.is_valid()? {
            return Err(StorageError::Corrupted(format!(
                "{}: checksum mismatch",
                path.display()
            )));
        }
        Ok(snapshot.entries)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_snapshot(&self, entries: BTreeMap<String, String>) -> StorageResult<()> {
        let snapshot = Snapshot::new(entries)?;
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let temp = self.temp_path();
        fs::write(&temp, bytes)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    /// Writes `entries` and adopts them only once they are on disk
    fn commit(&mut self, entries: BTreeMap<String, String>) -> StorageResult<()> {
        self.write_snapshot(entries.clone())?;
        self.entries = entries;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.to_string());
        self.commit(entries)
    }

    fn remove(&mut self, key: &str) -> StorageResult<bool> {
        if !self.entries.contains_key(key) {
            return Ok(false);
        }
        let mut entries = self.entries.clone();
        entries.remove(key);
        self.commit(entries)?;
        Ok(true)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
