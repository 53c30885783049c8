//! Domain entities for the Gradia settings layer.
//!
//! This module contains pure rules with no infrastructure dependencies.
//!
//! # What belongs in the domain? (for beginners)
//!
//! The domain is the innermost layer of the workspace.  Domain code:
//!
//! - Declares what a valid setting looks like (key, type, default).
//! - Converts between stored strings and structured values (colours, tools).
//! - Has **no** imports from file systems, UI toolkits, or async runtimes.
//!
//! The `gradia-settings` crate depends on this module, but never the other way
//! around.  That keeps every rule here testable in isolation.

/// Free or fixed `W:H` aspect ratio for the image editor.
pub mod aspect_ratio;

/// RGBA colour codec (`"r,g,b,a"` strings).
pub mod color;

/// Active annotation tool.
pub mod draw_mode;

/// Schema-level error types shared by every layer.
pub mod errors;

/// Export file format.
pub mod export;

/// The settings schema: every key with its type and default.
pub mod schema;

/// Typed setting values.
pub mod value;
