//! Settings persistence layer
//!
//! Loads and saves settings overrides as a versioned JSON document:
//!
//! ```json
//! { "version": 1, "overrides": { "editor.autosave": false } }
//! ```
//!
//! Loading never fails the caller: a corrupt or unknown-version file means
//! "no overrides".

extern crate alloc;

use crate::{SettingKey, SettingValue, SettingsError, SettingsRegistry};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Serializable container for settings overrides
/// Uses BTreeMap for stable ordering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsOverridesData {
    /// Version of the settings format (for future migrations)
    pub version: u32,
    /// Overrides keyed by setting name
    #[serde(default)]
    pub overrides: BTreeMap<String, SettingValue>,
}

impl SettingsOverridesData {
    /// Current version of the settings format
    pub const CURRENT_VERSION: u32 = 1;

    /// Creates a new empty settings data
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            overrides: BTreeMap::new(),
        }
    }

    /// Captures the overrides currently set in `registry`
    pub fn from_registry(registry: &SettingsRegistry) -> Self {
        let mut data = Self::new();
        for (key, value) in registry.export_overrides() {
            data.overrides.insert(key.as_str().to_string(), value);
        }
        data
    }

    /// Converts settings data to typed overrides
    pub fn to_overrides(&self) -> BTreeMap<SettingKey, SettingValue> {
        self.overrides
            .iter()
            .map(|(key, value)| (SettingKey::new(key.as_str()), value.clone()))
            .collect()
    }

    /// Applies the overrides to `registry`, returning the rejected ones
    pub fn apply_to(&self, registry: &mut SettingsRegistry) -> Vec<SettingsError> {
        registry.apply_overrides(self.to_overrides())
    }
}

impl Default for SettingsOverridesData {
    fn default() -> Self {
        Self::new()
    }
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur during persistence operations
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// Failed to serialize settings
    SerializationFailed(String),
    /// Failed to deserialize settings
    DeserializationFailed(String),
    /// Unsupported settings version
    UnsupportedVersion(u32),
}

impl core::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PersistenceError::SerializationFailed(msg) => {
                write!(f, "Failed to serialize settings: {}", msg)
            }
            PersistenceError::DeserializationFailed(msg) => {
                write!(f, "Failed to deserialize settings: {}", msg)
            }
            PersistenceError::UnsupportedVersion(version) => {
                write!(f, "Unsupported settings version: {}", version)
            }
        }
    }
}

impl core::error::Error for PersistenceError {}

/// Serializes settings overrides to JSON bytes
pub fn serialize_overrides(data: &SettingsOverridesData) -> PersistenceResult<Vec<u8>> {
    serde_json::to_vec_pretty(data)
        .map_err(|e| PersistenceError::SerializationFailed(e.to_string()))
}

/// Deserializes settings overrides from JSON bytes
pub fn deserialize_overrides(bytes: &[u8]) -> PersistenceResult<SettingsOverridesData> {
    let data: SettingsOverridesData = serde_json::from_slice(bytes)
        .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;

    // Check version compatibility
    if data.version != SettingsOverridesData::CURRENT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(data.version));
    }

    Ok(data)
}

/// Attempts to load settings from bytes, falling back to defaults on error
pub fn load_overrides_safe(bytes: &[u8]) -> SettingsOverridesData {
    deserialize_overrides(bytes).unwrap_or_else(|err| {
        log::warn!("ignoring settings overrides: {}", err);
        SettingsOverridesData::new()
    })
}
