//! Application layer of the settings service.
//!
//! # What lives here? (for beginners)
//!
//! Everything in this layer works against the [`backend::SettingsBackend`]
//! trait and never touches the file system itself, so it can be tested with
//! an in-memory or mock backend.
//!
//! # Sub-modules
//!
//! - **`backend`**        – The storage port and the in-memory backend.
//! - **`settings`**       – The `Settings` handle: get, set, reset, observe,
//!   and writes queued from other threads.
//! - **`accessors`**      – Named getters/setters per key and the codec
//!   accessors for colours, draw mode, export format and aspect ratio.
//! - **`color_selector`** – A colour control plus preset grid bound to one
//!   colour setting.
//! - **`options`**        – Option bundles read by the drawing tools, the
//!   image editor and the exporter.

pub mod accessors;
pub mod backend;
pub mod color_selector;
pub mod options;
pub mod settings;
