//! gradia-settings library entry point.
//!
//! Typed, observable access to Gradia's persisted preferences.  The binary in
//! `main.rs` and the integration tests in `tests/` share this module tree.
//!
//! ```
//! use gradia_settings::application::settings::Settings;
//! use gradia_core::SettingKey;
//!
//! let settings = Settings::in_memory();
//! settings.set(SettingKey::PenSize, 6.0)?;
//! assert_eq!(settings.pen_size(), 6.0);
//! # Ok::<(), gradia_settings::application::settings::SettingsError>(())
//! ```

pub mod application;
pub mod infrastructure;

pub use application::accessors::ColorSetting;
pub use application::backend::{BackendError, MemoryBackend, SettingsBackend};
pub use application::color_selector::{ColorSelector, ColorSelectorError};
pub use application::options::{DrawingOptions, ExportOptions, ImageOptions};
pub use application::settings::{Settings, SettingsError, SettingsSender, SubscriptionId};
pub use infrastructure::storage::toml_file::TomlFileBackend;
