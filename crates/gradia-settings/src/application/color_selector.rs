//! A colour-picking control bound to one colour setting.
//!
//! # How the binding works (for beginners)
//!
//! A [`ColorSelector`] is the model behind a colour button plus a grid of
//! preset swatches.  It keeps the colour it is currently showing and is wired
//! to the settings store in both directions:
//!
//! - **control → store**: [`ColorSelector::select`] and
//!   [`ColorSelector::activate_preset`] write the setting.
//! - **store → control**: the selector observes its setting, so a write made
//!   anywhere else (another window, the CLI, a queued background write) updates
//!   the colour it shows.
//!
//! Selecting the colour that is already stored does nothing, so the observer
//! firing after our own write never bounces back into another write.  A
//! malformed stored value is shown as the default colour, the same way
//! [`Settings::color`] reads it.
//! Dropping the selector disconnects its observer.

use std::cell::Cell;
use std::rc::Rc;

use gradia_core::Rgba;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::accessors::ColorSetting;
use crate::application::settings::{Settings, SettingsError, SubscriptionId};

#[derive(Debug, Error)]
pub enum ColorSelectorError {
    #[error("no preset at index {index} (palette has {len})")]
    NoSuchPreset { index: usize, len: usize },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// The palette shown when the caller does not supply one.
///
/// One light and one dark shade of each hue, followed by greys.
pub fn default_presets() -> Vec<Rgba> {
    [
        (0xf6, 0x61, 0x51),
        (0xc0, 0x1c, 0x28),
        (0xff, 0xa3, 0x48),
        (0xe6, 0x61, 0x00),
        (0xf8, 0xe4, 0x5c),
        (0xe5, 0xa5, 0x0a),
        (0x57, 0xe3, 0x89),
        (0x26, 0xa2, 0x69),
        (0x62, 0xa0, 0xea),
        (0x1a, 0x5f, 0xb4),
        (0xc0, 0x61, 0xcb),
        (0x61, 0x35, 0x83),
        (0xff, 0xff, 0xff),
        (0x9a, 0x99, 0x96),
        (0x3d, 0x38, 0x46),
        (0x00, 0x00, 0x00),
    ]
    .into_iter()
    .map(|(r, g, b)| Rgba::from_rgba8(r, g, b, 0xff))
    .collect()
}

/// Model of a colour button plus preset grid, bound to one colour setting.
pub struct ColorSelector {
    settings: Settings,
    target: ColorSetting,
    current: Rc<Cell<Rgba>>,
    presets: Vec<Rgba>,
    subscription: SubscriptionId,
}

impl ColorSelector {
    /// Binds a selector to `target` using [`default_presets`].
    pub fn new(settings: &Settings, target: ColorSetting) -> Self {
        Self::with_presets(settings, target, default_presets())
    }

    /// Binds a selector to `target` with a caller-supplied palette.
    pub fn with_presets(settings: &Settings, target: ColorSetting, presets: Vec<Rgba>) -> Self {
        let current = Rc::new(Cell::new(settings.color(target)));

        // The observer only captures the shared cell, never the store, so no
        // reference cycle keeps the store alive.
        let shown = Rc::clone(&current);
        let subscription = settings.observe(target.key(), move |value| {
            let text = value.as_str().unwrap_or_default();
            let color = text.parse::<Rgba>().unwrap_or_else(|e| {
                warn!(setting = ?target, "malformed colour {text:?} ({e}); showing default");
                target.default_color()
            });
            shown.set(color);
        });

        Self {
            settings: settings.clone(),
            target,
            current,
            presets,
            subscription,
        }
    }

    pub fn target(&self) -> ColorSetting {
        self.target
    }

    /// The colour the control is currently showing.
    pub fn color(&self) -> Rgba {
        self.current.get()
    }

    /// Handles a user selection.
    ///
    /// Returns `Ok(false)` when `color` encodes to the stored value, in which
    /// case nothing is written.  The comparison is against the store rather
    /// than the shown colour, so a malformed stored value is always replaced.
    ///
    /// # Errors
    ///
    /// Propagates the store's [`SettingsError`]; the shown colour is unchanged.
    pub fn select(&self, color: Rgba) -> Result<bool, ColorSelectorError> {
        let stored = self.settings.get(self.target.key());
        if stored.as_str() == Some(color.encode().as_str()) {
            return Ok(false);
        }
        debug!(setting = ?self.target, %color, "colour selected");
        self.settings.set_color(self.target, color)?;
        Ok(true)
    }

    /// Selects the preset at `index` in one step.
    ///
    /// # Errors
    ///
    /// [`ColorSelectorError::NoSuchPreset`] if `index` is out of range.
    pub fn activate_preset(&self, index: usize) -> Result<bool, ColorSelectorError> {
        let color = *self
            .presets
            .get(index)
            .ok_or(ColorSelectorError::NoSuchPreset {
                index,
                len: self.presets.len(),
            })?;
        self.select(color)
    }

    pub fn presets(&self) -> &[Rgba] {
        &self.presets
    }

    /// The palette laid out row-major, `columns` swatches per row.  The last
    /// row may be shorter.  A `columns` of zero is treated as one.
    pub fn preset_rows(&self, columns: usize) -> Vec<&[Rgba]> {
        self.presets.chunks(columns.max(1)).collect()
    }
}

impl Drop for ColorSelector {
    fn drop(&mut self) {
        self.settings.disconnect(self.subscription);
    }
}
