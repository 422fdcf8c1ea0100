#![no_std]

//! # Settings Registry Service
//!
//! Typed settings for the rich-text editor.
//!
//! ## Philosophy
//!
//! - **Typed settings**: All settings have explicit types, not stringly-typed
//! - **Layered**: Read-only defaults + overrides loaded from a config file
//! - **Type-checked overrides**: An override must have the same type as its default
//! - **Deterministic**: Settings are serializable and reproducible
//!
//! ## Example
//!
//! ```ignore
//! use services_settings::{create_default_registry, keys, EditorConfig, SettingValue};
//!
//! let mut registry = create_default_registry();
//! registry.set_override(keys::EDITOR_AUTOSAVE, SettingValue::Boolean(false))?;
//!
//! let config = EditorConfig::from_registry(&registry);
//! assert!(!config.autosave);
//! ```

pub mod persistence;

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Setting key (path-like identifier)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SettingKey(String);

impl SettingKey {
    /// Creates a new setting key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SettingKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Setting value (strongly typed)
///
/// Serialized as the bare JSON value so config files read naturally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// String value
    String(String),
}

impl SettingValue {
    /// Name of the value's type
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Boolean(_) => "boolean",
            SettingValue::Integer(_) => "integer",
            SettingValue::String(_) => "string",
        }
    }

    /// True when both values have the same type
    pub fn same_type(&self, other: &SettingValue) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// Tries to get as boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            SettingValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Boolean(v) => write!(f, "{}", v),
            SettingValue::Integer(v) => write!(f, "{}", v),
            SettingValue::String(v) => write!(f, "{}", v),
        }
    }
}

/// Result type for registry operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors raised when overriding settings
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// No default is registered under the key
    UnknownKey(SettingKey),
    /// Override type differs from the default's type
    TypeMismatch {
        key: SettingKey,
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownKey(key) => write!(f, "Unknown setting: {}", key),
            SettingsError::TypeMismatch {
                key,
                expected,
                found,
            } => write!(
                f,
                "Setting {} expects a {}, got a {}",
                key, expected, found
            ),
        }
    }
}

impl core::error::Error for SettingsError {}

/// Settings registry
pub struct SettingsRegistry {
    /// Default settings (read-only)
    defaults: BTreeMap<SettingKey, SettingValue>,
    /// Overrides, each matching its default's type
    overrides: BTreeMap<SettingKey, SettingValue>,
}

impl SettingsRegistry {
    /// Creates a new settings registry
    pub fn new() -> Self {
        Self {
            defaults: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }

    /// Registers a default setting
    pub fn register_default(&mut self, key: impl Into<SettingKey>, value: SettingValue) {
        self.defaults.insert(key.into(), value);
    }

    /// Sets an override, checking it against the registered default
    pub fn set_override(
        &mut self,
        key: impl Into<SettingKey>,
        value: SettingValue,
    ) -> SettingsResult<()> {
        let key = key.into();
        let default = self
            .defaults
            .get(&key)
            .ok_or_else(|| SettingsError::UnknownKey(key.clone()))?;
        if !default.same_type(&value) {
            return Err(SettingsError::TypeMismatch {
                key,
                expected: default.type_name(),
                found: value.type_name(),
            });
        }
        self.overrides.insert(key, value);
        Ok(())
    }

    /// Gets the effective setting value (override or default)
    pub fn get(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.overrides.get(key).or_else(|| self.defaults.get(key))
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(&SettingKey::new(key)).and_then(SettingValue::as_boolean)
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(&SettingKey::new(key)).and_then(SettingValue::as_integer)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(&SettingKey::new(key)).and_then(SettingValue::as_string)
    }

    /// Exports all overrides for persistence
    pub fn export_overrides(&self) -> BTreeMap<SettingKey, SettingValue> {
        self.overrides.clone()
    }

    /// Applies overrides one by one
    ///
    /// Valid overrides are kept even when others are rejected; the rejected
    /// ones are returned.
    pub fn apply_overrides(
        &mut self,
        overrides: BTreeMap<SettingKey, SettingValue>,
    ) -> Vec<SettingsError> {
        overrides
            .into_iter()
            .filter_map(|(key, value)| self.set_override(key, value).err())
            .collect()
    }
}

impl Default for SettingsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Common setting keys
pub mod keys {
    pub const STORAGE_KEY: &str = "storage.key";
    pub const STORAGE_PATH: &str = "storage.path";
    pub const EDITOR_AUTOSAVE: &str = "editor.autosave";
    pub const EDITOR_SHORTCUTS: &str = "editor.shortcuts";
    pub const EDITOR_HISTORY_LIMIT: &str = "editor.history_limit";
    pub const RENDER_ANSI: &str = "render.ansi";
}

/// Key the document is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "editorContent";

/// File the file store writes unless configured otherwise
pub const DEFAULT_STORAGE_PATH: &str = "editor-content.json";

/// Creates a settings registry with default settings
pub fn create_default_registry() -> SettingsRegistry {
    let mut registry = SettingsRegistry::new();

    // Storage settings
    registry.register_default(
        keys::STORAGE_KEY,
        SettingValue::String(DEFAULT_STORAGE_KEY.to_string()),
    );
    registry.register_default(
        keys::STORAGE_PATH,
        SettingValue::String(DEFAULT_STORAGE_PATH.to_string()),
    );

    // Editor settings
    registry.register_default(keys::EDITOR_AUTOSAVE, SettingValue::Boolean(true));
    registry.register_default(keys::EDITOR_SHORTCUTS, SettingValue::Boolean(true));
    registry.register_default(keys::EDITOR_HISTORY_LIMIT, SettingValue::Integer(100));

    // Render settings
    registry.register_default(keys::RENDER_ANSI, SettingValue::Boolean(true));

    registry
}

/// Typed view of the settings the editor consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Key-value key the document lives under
    pub storage_key: String,
    /// File used by the file store
    pub storage_path: String,
    /// Persist after every accepted change
    pub autosave: bool,
    /// Run the shortcut rules at all
    pub shortcuts: bool,
    /// Undo depth
    pub history_limit: usize,
    /// Render with ANSI escapes
    pub ansi: bool,
}

impl EditorConfig {
    /// Reads the effective values from `registry`, falling back to the
    /// built-in defaults for anything missing
    pub fn from_registry(registry: &SettingsRegistry) -> Self {
        let fallback = Self::default();
        Self {
            storage_key: registry
                .get_string(keys::STORAGE_KEY)
                .map(ToString::to_string)
                .unwrap_or(fallback.storage_key),
            storage_path: registry
                .get_string(keys::STORAGE_PATH)
                .map(ToString::to_string)
                .unwrap_or(fallback.storage_path),
            autosave: registry
                .get_bool(keys::EDITOR_AUTOSAVE)
                .unwrap_or(fallback.autosave),
            shortcuts: registry
                .get_bool(keys::EDITOR_SHORTCUTS)
                .unwrap_or(fallback.shortcuts),
            history_limit: registry
                .get_integer(keys::EDITOR_HISTORY_LIMIT)
                .map(|limit| usize::try_from(limit).unwrap_or(0))
                .unwrap_or(fallback.history_limit),
            ansi: registry.get_bool(keys::RENDER_ANSI).unwrap_or(fallback.ansi),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_path: DEFAULT_STORAGE_PATH.to_string(),
            autosave: true,
            shortcuts: true,
            history_limit: 100,
            ansi: true,
        }
    }
}
