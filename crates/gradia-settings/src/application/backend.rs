//! The persistence port behind [`crate::application::settings::Settings`].
//!
//! The application layer only talks to storage through [`SettingsBackend`].
//! Concrete adapters live in `infrastructure::storage`; the in-memory
//! [`MemoryBackend`] lives here because it performs no I/O and is what tests
//! and embedders reach for first.

use std::collections::BTreeMap;
use std::path::PathBuf;

use gradia_core::{SettingKey, SettingValue};
use thiserror::Error;

/// Errors reported by a storage backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored data could not be parsed.
    #[error("failed to parse settings at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The settings could not be serialized for writing.
    #[error("failed to serialize settings: {0}")]
    Serialize(String),
}

/// Storage adapter for user overrides.
///
/// A backend stores only keys the user has changed; everything else reads as
/// the schema default.  `load` returns raw entries exactly as stored: the
/// settings handle is responsible for dropping unknown keys and wrong-typed
/// values, so a corrupted store never prevents start-up.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsBackend {
    /// Reads every stored override as `(key name, value)` pairs.
    fn load(&mut self) -> Result<Vec<(String, SettingValue)>, BackendError>;

    /// Persists `value` under `key`.  On error nothing must have been stored.
    fn write(&mut self, key: SettingKey, value: &SettingValue) -> Result<(), BackendError>;

    /// Removes the override for `key`, if any.
    fn remove(&mut self, key: SettingKey) -> Result<(), BackendError>;
}

/// Backend that keeps overrides in memory only.
///
/// Each instance is isolated, which makes it the natural choice for tests:
/// every test case builds its own store instead of sharing global state.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: BTreeMap<String, SettingValue>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the backend with raw entries, as if they had been persisted by an
    /// earlier run.  Entries are not validated here.
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, SettingValue)>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Returns the stored override for `name`, if any.
    pub fn stored(&self, name: &str) -> Option<&SettingValue> {
        self.entries.get(name)
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&mut self) -> Result<Vec<(String, SettingValue)>, BackendError> {
        Ok(self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn write(&mut self, key: SettingKey, value: &SettingValue) -> Result<(), BackendError> {
        self.entries.insert(key.name().to_string(), value.clone());
        Ok(())
    }

    fn remove(&mut self, key: SettingKey) -> Result<(), BackendError> {
        self.entries.remove(key.name());
        Ok(())
    }
}
