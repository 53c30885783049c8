//! TOML-file settings backend.
//!
//! Overrides are stored as a flat table in the platform config file:
//! - Windows:  `%APPDATA%\Gradia\settings.toml`
//! - Linux:    `$XDG_CONFIG_HOME/gradia/settings.toml` (or `~/.config/gradia/...`)
//! - macOS:    `~/Library/Application Support/Gradia/settings.toml`
//!
//! Only keys the user changed are written, so the file stays short and a new
//! release can change a default without a migration:
//!
//! ```toml
//! draw-mode = "PEN"
//! pen-color = "1.000,0.000,0.000,1.000"
//! pen-size = 6.0
//! ```
//!
//! Every write rewrites the whole file.  The in-memory table is only updated
//! after the file was written, so a failed write leaves both untouched.

use std::path::{Path, PathBuf};

use gradia_core::{SettingKey, SettingValue};
use toml::{Table, Value};
use tracing::{debug, warn};

use crate::application::backend::{BackendError, SettingsBackend};

const FILE_NAME: &str = "settings.toml";

/// Settings backend persisting overrides to a TOML file.
#[derive(Debug)]
pub struct TomlFileBackend {
    path: PathBuf,
    /// Contents of the file as last read or written; `None` until first read.
    table: Option<Table>,
}

impl TomlFileBackend {
    /// A backend over the file at `path`.  The file is read lazily, by
    /// [`SettingsBackend::load`] or before the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: None,
        }
    }

    /// A backend over the default settings file for this platform.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NoPlatformConfigDir`] when the base directory
    /// cannot be determined from the environment.
    pub fn open_default() -> Result<Self, BackendError> {
        Ok(Self::new(settings_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the file; a missing file is an empty table.
    fn read_table(&self) -> Result<Table, BackendError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file yet; using defaults");
                return Ok(Table::new());
            }
            Err(source) => {
                return Err(BackendError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        content.parse().map_err(|e: toml::de::Error| BackendError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// The current file contents, reading the file if it was never read.
    fn current_table(&mut self) -> Result<Table, BackendError> {
        match &self.table {
            Some(table) => Ok(table.clone()),
            None => {
                let table = self.read_table()?;
                self.table = Some(table.clone());
                Ok(table)
            }
        }
    }

    fn save(&self, table: &Table) -> Result<(), BackendError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| BackendError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content =
            toml::to_string_pretty(table).map_err(|e| BackendError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|source| BackendError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsBackend for TomlFileBackend {
    fn load(&mut self) -> Result<Vec<(String, SettingValue)>, BackendError> {
        let table = self.read_table()?;
        let entries = table
            .iter()
            .filter_map(|(name, value)| match from_toml(value) {
                Some(value) => Some((name.clone(), value)),
                None => {
                    warn!(key = %name, "ignoring unsupported value in settings file");
                    None
                }
            })
            .collect();
        self.table = Some(table);
        Ok(entries)
    }

    fn write(&mut self, key: SettingKey, value: &SettingValue) -> Result<(), BackendError> {
        let mut table = self.current_table()?;
        table.insert(key.name().to_string(), to_toml(value));
        self.save(&table)?;
        self.table = Some(table);
        Ok(())
    }

    fn remove(&mut self, key: SettingKey) -> Result<(), BackendError> {
        let mut table = self.current_table()?;
        if table.remove(key.name()).is_none() {
            return Ok(());
        }
        self.save(&table)?;
        self.table = Some(table);
        Ok(())
    }
}

fn to_toml(value: &SettingValue) -> Value {
    match value {
        SettingValue::String(s) => Value::String(s.clone()),
        SettingValue::Boolean(b) => Value::Boolean(*b),
        SettingValue::Integer(i) => Value::Integer(i64::from(*i)),
        SettingValue::Double(d) => Value::Float(*d),
    }
}

fn from_toml(value: &Value) -> Option<SettingValue> {
    match value {
        Value::String(s) => Some(SettingValue::String(s.clone())),
        Value::Boolean(b) => Some(SettingValue::Boolean(*b)),
        Value::Integer(i) => i32::try_from(*i).ok().map(SettingValue::Integer),
        Value::Float(f) => Some(SettingValue::Double(*f)),
        _ => None,
    }
}

// ── Paths ─────────────────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the settings file.
///
/// # Errors
///
/// Returns [`BackendError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, BackendError> {
    platform_config_dir().ok_or(BackendError::NoPlatformConfigDir)
}

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`BackendError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn settings_file_path() -> Result<PathBuf, BackendError> {
    Ok(config_dir()?.join(FILE_NAME))
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Gradia"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("gradia"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("Gradia"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
