//! # gradia-core
//!
//! Shared domain library for the Gradia settings layer: the settings schema,
//! typed setting values, and the string codecs layered on top of plain string
//! settings.
//!
//! This crate has zero dependencies on storage, UI toolkits, or threads.  It
//! can be compiled and tested on any platform without external setup.
//!
//! # Architecture overview (for beginners)
//!
//! Gradia persists its user preferences in a flat keyed store.  Every key is
//! declared once in a *schema* together with its type and default value.  The
//! store itself (see the `gradia-settings` crate) only knows about four value
//! types: string, boolean, integer and double.  Richer concepts such as
//! colours or the active drawing tool are stored as strings and converted at
//! the boundary.
//!
//! - **`domain::schema`** – The list of keys ([`SettingKey`]) with their
//!   declared type and default.
//!
//! - **`domain::value`** – [`SettingValue`], the tagged union stored for each
//!   key, and [`ValueType`], its declared type.
//!
//! - **`domain::color`**, **`domain::draw_mode`**, **`domain::export`**,
//!   **`domain::aspect_ratio`** – Codecs between the stored strings and the
//!   structured values the UI works with.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `gradia_core::SettingKey` instead of `gradia_core::domain::schema::SettingKey`.
pub use domain::aspect_ratio::{AspectRatio, AspectRatioError};
pub use domain::color::{ColorError, Rgba};
pub use domain::draw_mode::{DrawMode, DrawModeError};
pub use domain::errors::{SchemaError, TypeMismatchError};
pub use domain::export::{ExportFormat, ExportFormatError};
pub use domain::schema::{SettingKey, SCHEMA_ID, SCHEMA_PATH};
pub use domain::value::{FromSettingValue, SettingValue, ValueType};
