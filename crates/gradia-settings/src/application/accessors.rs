//! Named and codec-aware accessors on [`Settings`].
//!
//! The raw store only deals in [`SettingValue`]s.  This module adds:
//!
//! - one getter and one setter per schema key (`pen_size()`,
//!   `set_pen_size(..)`, ...), so call sites never spell a key or a type;
//! - decoding of string keys that carry structured data (colours, draw mode,
//!   export format, aspect ratio).  A malformed stored string decodes to the
//!   schema default and logs a warning; it is never raised to the caller.

use gradia_core::{AspectRatio, DrawMode, ExportFormat, FromSettingValue, Rgba, SettingKey};
use tracing::warn;

use crate::application::settings::{Settings, SettingsError};

/// The settings that hold an RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSetting {
    Pen,
    Highlighter,
    Fill,
}

impl ColorSetting {
    pub const ALL: [ColorSetting; 3] = [
        ColorSetting::Pen,
        ColorSetting::Highlighter,
        ColorSetting::Fill,
    ];

    pub fn key(self) -> SettingKey {
        match self {
            ColorSetting::Pen => SettingKey::PenColor,
            ColorSetting::Highlighter => SettingKey::HighlighterColor,
            ColorSetting::Fill => SettingKey::FillColor,
        }
    }

    /// The schema default, decoded.
    pub fn default_color(self) -> Rgba {
        match self {
            ColorSetting::Pen => Rgba::WHITE,
            ColorSetting::Highlighter => Rgba::new(1.0, 1.0, 0.0, 0.5),
            ColorSetting::Fill => Rgba::TRANSPARENT,
        }
    }
}

/// Generates a typed getter/setter pair for a plain (non-codec) key.
macro_rules! typed_accessors {
    ($( $(#[$doc:meta])* $getter:ident, $setter:ident: $ty:ty => $key:ident; )*) => {
        impl Settings {
            $(
                $(#[$doc])*
                pub fn $getter(&self) -> $ty {
                    self.read(SettingKey::$key)
                }

                #[doc = concat!("Writes `", stringify!($getter), "`; see [`Settings::set`].")]
                pub fn $setter(&self, value: impl Into<$ty>) -> Result<(), SettingsError> {
                    self.set(SettingKey::$key, value.into())
                }
            )*
        }
    };
}

typed_accessors! {
    /// Pen stroke width in pixels.
    pen_size, set_pen_size: f64 => PenSize;
    /// Highlighter stroke width in pixels.
    highlighter_size, set_highlighter_size: f64 => HighlighterSize;
    /// Number stamp radius in pixels.
    number_radius, set_number_radius: f64 => NumberRadius;
    /// Font family for text annotations.
    font, set_font: String => Font;
    image_padding, set_image_padding: i32 => ImagePadding;
    image_corner_radius, set_image_corner_radius: i32 => ImageCornerRadius;
    image_shadow_strength, set_image_shadow_strength: i32 => ImageShadowStrength;
    image_auto_balance, set_image_auto_balance: bool => ImageAutoBalance;
    /// Subfolder of the pictures directory scanned for screenshots.
    screenshot_subfolder, set_screenshot_subfolder: String => ScreenshotSubfolder;
    export_compress, set_export_compress: bool => ExportCompress;
    trash_screenshots_on_close, set_trash_screenshots_on_close: bool => TrashScreenshotsOnClose;
    /// Keep image options when a new image is opened.
    image_options_lock, set_image_options_lock: bool => ImageOptionsLock;
    show_close_confirm_dialog, set_show_close_confirm_dialog: bool => ShowCloseConfirmDialog;
    /// Command run on exported files; empty when unset.
    custom_export_command, set_custom_export_command: String => CustomExportCommand;
    provider_name, set_provider_name: String => ProviderName;
    show_export_confirm_dialog, set_show_export_confirm_dialog: bool => ShowExportConfirmDialog;
}

impl Settings {
    /// Reads a plain key whose type is fixed by the accessor table above.
    fn read<T: FromSettingValue + Default>(&self, key: SettingKey) -> T {
        debug_assert_eq!(T::VALUE_TYPE, key.value_type(), "accessor type for {key}");
        self.get_as(key).unwrap_or_default()
    }

    /// Decodes a colour setting, substituting the default when malformed.
    pub fn color(&self, which: ColorSetting) -> Rgba {
        let key = which.key();
        let stored = self.get(key);
        let text = stored.as_str().unwrap_or_default();
        text.parse().unwrap_or_else(|e| {
            warn!(%key, "malformed stored colour {text:?} ({e}); using default");
            which.default_color()
        })
    }

    /// Encodes and writes a colour setting.  Channels outside `[0, 1]` are
    /// clamped.
    ///
    /// # Errors
    ///
    /// [`SettingsError::NonFinite`] if any channel is NaN or infinite;
    /// otherwise see [`Settings::set`].
    pub fn set_color(&self, which: ColorSetting, color: Rgba) -> Result<(), SettingsError> {
        if !color.is_finite() {
            return Err(SettingsError::NonFinite(which.key()));
        }
        self.set(which.key(), color.encode())
    }

    pub fn pen_color(&self) -> Rgba {
        self.color(ColorSetting::Pen)
    }

    pub fn set_pen_color(&self, color: Rgba) -> Result<(), SettingsError> {
        self.set_color(ColorSetting::Pen, color)
    }

    pub fn highlighter_color(&self) -> Rgba {
        self.color(ColorSetting::Highlighter)
    }

    pub fn set_highlighter_color(&self, color: Rgba) -> Result<(), SettingsError> {
        self.set_color(ColorSetting::Highlighter, color)
    }

    pub fn fill_color(&self) -> Rgba {
        self.color(ColorSetting::Fill)
    }

    pub fn set_fill_color(&self, color: Rgba) -> Result<(), SettingsError> {
        self.set_color(ColorSetting::Fill, color)
    }

    /// The active tool; an unrecognised stored tag reads as [`DrawMode::Select`].
    pub fn draw_mode(&self) -> DrawMode {
        let stored = self.get(SettingKey::DrawMode);
        DrawMode::decode_or_default(stored.as_str().unwrap_or_default())
    }

    pub fn set_draw_mode(&self, mode: DrawMode) -> Result<(), SettingsError> {
        self.set(SettingKey::DrawMode, mode.tag())
    }

    /// The export format; an unsupported stored tag reads as PNG.
    pub fn export_format(&self) -> ExportFormat {
        let stored = self.get(SettingKey::ExportFormat);
        ExportFormat::decode_or_default(stored.as_str().unwrap_or_default())
    }

    pub fn set_export_format(&self, format: ExportFormat) -> Result<(), SettingsError> {
        self.set(SettingKey::ExportFormat, format.tag())
    }

    /// The image aspect ratio; a malformed stored value reads as free.
    pub fn image_aspect_ratio(&self) -> AspectRatio {
        let stored = self.get(SettingKey::ImageAspectRatio);
        AspectRatio::decode_or_default(stored.as_str().unwrap_or_default())
    }

    pub fn set_image_aspect_ratio(&self, ratio: AspectRatio) -> Result<(), SettingsError> {
        self.set(SettingKey::ImageAspectRatio, ratio.to_string())
    }
}
