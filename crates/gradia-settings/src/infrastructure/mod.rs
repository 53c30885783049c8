//! Infrastructure layer: adapters that touch the operating system.
//!
//! - **`storage`** – Settings backends that persist overrides to disk.

pub mod storage;
