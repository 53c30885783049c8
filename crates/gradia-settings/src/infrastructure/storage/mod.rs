//! Storage infrastructure: settings file persistence.
//!
//! The `toml_file` sub-module implements
//! [`SettingsBackend`](crate::application::backend::SettingsBackend) on top of
//! a TOML file in the platform config directory.  The application layer never
//! sees paths or file formats; swapping the format only touches this module.

pub mod toml_file;
