//! The Gradia settings schema.
//!
//! Every persisted preference is declared here exactly once, with one
//! [`ValueType`] and one default.  Key names and defaults are a compatibility
//! contract: existing settings files written by other builds must keep
//! reading back the same values, so neither may change.
//!
//! | Key                          | Type    | Default                     |
//! |------------------------------|---------|-----------------------------|
//! | `draw-mode`                  | string  | `"SELECT"`                  |
//! | `pen-color`                  | string  | `"1.000,1.000,1.000,1.000"` |
//! | `highlighter-color`          | string  | `"1.000,1.000,0.000,0.500"` |
//! | `highlighter-size`           | double  | `5.0`                       |
//! | `fill-color`                 | string  | `"0.000,0.000,0.000,0.000"` |
//! | `pen-size`                   | double  | `3.0`                       |
//! | `number-radius`              | double  | `10.0`                      |
//! | `font`                       | string  | `"Adwaita Sans"`            |
//! | `image-padding`              | integer | `5`                         |
//! | `image-corner-radius`        | integer | `2`                         |
//! | `image-aspect-ratio`         | string  | `""`                        |
//! | `image-shadow-strength`      | integer | `5`                         |
//! | `image-auto-balance`         | boolean | `false`                     |
//! | `screenshot-subfolder`       | string  | `"Screenshots"`             |
//! | `export-format`              | string  | `"png"`                     |
//! | `export-compress`            | boolean | `true`                      |
//! | `trash-screenshots-on-close` | boolean | `false`                     |
//! | `image-options-lock`         | boolean | `false`                     |
//! | `show-close-confirm-dialog`  | boolean | `true`                      |
//! | `custom-export-command`      | string  | `""`                        |
//! | `provider-name`              | string  | `""`                        |
//! | `show-export-confirm-dialog` | boolean | `true`                      |

use std::fmt;
use std::str::FromStr;

use crate::domain::errors::SchemaError;
use crate::domain::value::{SettingValue, ValueType};

/// Schema identifier of the application's settings.
pub const SCHEMA_ID: &str = "be.alexandervanhee.gradia";

/// Path prefix under which every key is namespaced.
pub const SCHEMA_PATH: &str = "/be/alexandervanhee/gradia/";

/// A key declared in the settings schema.
///
/// Using an enum instead of raw strings makes an undeclared key
/// unrepresentable in typed code.  String-keyed entry points go through
/// [`SettingKey::from_str`], which is the only place an unknown key can be
/// reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingKey {
    DrawMode,
    PenColor,
    HighlighterColor,
    HighlighterSize,
    FillColor,
    PenSize,
    NumberRadius,
    Font,
    ImagePadding,
    ImageCornerRadius,
    ImageAspectRatio,
    ImageShadowStrength,
    ImageAutoBalance,
    ScreenshotSubfolder,
    ExportFormat,
    ExportCompress,
    TrashScreenshotsOnClose,
    ImageOptionsLock,
    ShowCloseConfirmDialog,
    CustomExportCommand,
    ProviderName,
    ShowExportConfirmDialog,
}

impl SettingKey {
    /// Every declared key, in schema order.
    pub const ALL: [SettingKey; 22] = [
        SettingKey::DrawMode,
        SettingKey::PenColor,
        SettingKey::HighlighterColor,
        SettingKey::HighlighterSize,
        SettingKey::FillColor,
        SettingKey::PenSize,
        SettingKey::NumberRadius,
        SettingKey::Font,
        SettingKey::ImagePadding,
        SettingKey::ImageCornerRadius,
        SettingKey::ImageAspectRatio,
        SettingKey::ImageShadowStrength,
        SettingKey::ImageAutoBalance,
        SettingKey::ScreenshotSubfolder,
        SettingKey::ExportFormat,
        SettingKey::ExportCompress,
        SettingKey::TrashScreenshotsOnClose,
        SettingKey::ImageOptionsLock,
        SettingKey::ShowCloseConfirmDialog,
        SettingKey::CustomExportCommand,
        SettingKey::ProviderName,
        SettingKey::ShowExportConfirmDialog,
    ];

    /// The key name as persisted (e.g. `"pen-color"`).
    pub fn name(self) -> &'static str {
        match self {
            SettingKey::DrawMode => "draw-mode",
            SettingKey::PenColor => "pen-color",
            SettingKey::HighlighterColor => "highlighter-color",
            SettingKey::HighlighterSize => "highlighter-size",
            SettingKey::FillColor => "fill-color",
            SettingKey::PenSize => "pen-size",
            SettingKey::NumberRadius => "number-radius",
            SettingKey::Font => "font",
            SettingKey::ImagePadding => "image-padding",
            SettingKey::ImageCornerRadius => "image-corner-radius",
            SettingKey::ImageAspectRatio => "image-aspect-ratio",
            SettingKey::ImageShadowStrength => "image-shadow-strength",
            SettingKey::ImageAutoBalance => "image-auto-balance",
            SettingKey::ScreenshotSubfolder => "screenshot-subfolder",
            SettingKey::ExportFormat => "export-format",
            SettingKey::ExportCompress => "export-compress",
            SettingKey::TrashScreenshotsOnClose => "trash-screenshots-on-close",
            SettingKey::ImageOptionsLock => "image-options-lock",
            SettingKey::ShowCloseConfirmDialog => "show-close-confirm-dialog",
            SettingKey::CustomExportCommand => "custom-export-command",
            SettingKey::ProviderName => "provider-name",
            SettingKey::ShowExportConfirmDialog => "show-export-confirm-dialog",
        }
    }

    /// The fully namespaced path of the key.
    pub fn path(self) -> String {
        format!("{SCHEMA_PATH}{}", self.name())
    }

    /// The declared value type.
    pub fn value_type(self) -> ValueType {
        match self {
            SettingKey::DrawMode
            | SettingKey::PenColor
            | SettingKey::HighlighterColor
            | SettingKey::FillColor
            | SettingKey::Font
            | SettingKey::ImageAspectRatio
            | SettingKey::ScreenshotSubfolder
            | SettingKey::ExportFormat
            | SettingKey::CustomExportCommand
            | SettingKey::ProviderName => ValueType::String,

            SettingKey::HighlighterSize | SettingKey::PenSize | SettingKey::NumberRadius => {
                ValueType::Double
            }

            SettingKey::ImagePadding
            | SettingKey::ImageCornerRadius
            | SettingKey::ImageShadowStrength => ValueType::Integer,

            SettingKey::ImageAutoBalance
            | SettingKey::ExportCompress
            | SettingKey::TrashScreenshotsOnClose
            | SettingKey::ImageOptionsLock
            | SettingKey::ShowCloseConfirmDialog
            | SettingKey::ShowExportConfirmDialog => ValueType::Boolean,
        }
    }

    /// The schema default.  Always has type [`SettingKey::value_type`].
    pub fn default_value(self) -> SettingValue {
        match self {
            SettingKey::DrawMode => "SELECT".into(),
            SettingKey::PenColor => "1.000,1.000,1.000,1.000".into(),
            SettingKey::HighlighterColor => "1.000,1.000,0.000,0.500".into(),
            SettingKey::HighlighterSize => SettingValue::Double(5.0),
            SettingKey::FillColor => "0.000,0.000,0.000,0.000".into(),
            SettingKey::PenSize => SettingValue::Double(3.0),
            SettingKey::NumberRadius => SettingValue::Double(10.0),
            SettingKey::Font => "Adwaita Sans".into(),
            SettingKey::ImagePadding => SettingValue::Integer(5),
            SettingKey::ImageCornerRadius => SettingValue::Integer(2),
            SettingKey::ImageAspectRatio => "".into(),
            SettingKey::ImageShadowStrength => SettingValue::Integer(5),
            SettingKey::ImageAutoBalance => SettingValue::Boolean(false),
            SettingKey::ScreenshotSubfolder => "Screenshots".into(),
            SettingKey::ExportFormat => "png".into(),
            SettingKey::ExportCompress => SettingValue::Boolean(true),
            SettingKey::TrashScreenshotsOnClose => SettingValue::Boolean(false),
            SettingKey::ImageOptionsLock => SettingValue::Boolean(false),
            SettingKey::ShowCloseConfirmDialog => SettingValue::Boolean(true),
            SettingKey::CustomExportCommand => "".into(),
            SettingKey::ProviderName => "".into(),
            SettingKey::ShowExportConfirmDialog => SettingValue::Boolean(true),
        }
    }

    /// One-line summary shown in settings editors.
    pub fn summary(self) -> &'static str {
        match self {
            SettingKey::DrawMode => "Active annotation tool",
            SettingKey::PenColor => "Pen color",
            SettingKey::HighlighterColor => "Highlighter color",
            SettingKey::HighlighterSize => "Highlighter stroke width",
            SettingKey::FillColor => "Shape fill color",
            SettingKey::PenSize => "Pen stroke width",
            SettingKey::NumberRadius => "Number stamp radius",
            SettingKey::Font => "Text annotation font",
            SettingKey::ImagePadding => "Image padding",
            SettingKey::ImageCornerRadius => "Image corner radius",
            SettingKey::ImageAspectRatio => "Image aspect ratio",
            SettingKey::ImageShadowStrength => "Image shadow strength",
            SettingKey::ImageAutoBalance => "Automatically balance image padding",
            SettingKey::ScreenshotSubfolder => "Screenshot subfolder",
            SettingKey::ExportFormat => "Export file format",
            SettingKey::ExportCompress => "Compress exported images",
            SettingKey::TrashScreenshotsOnClose => "Move source screenshots to trash on close",
            SettingKey::ImageOptionsLock => "Keep image options between images",
            SettingKey::ShowCloseConfirmDialog => "Confirm before closing",
            SettingKey::CustomExportCommand => "Custom export command",
            SettingKey::ProviderName => "Export provider name",
            SettingKey::ShowExportConfirmDialog => "Confirm before exporting",
        }
    }

    /// Longer description of what the key controls.
    pub fn description(self) -> &'static str {
        match self {
            SettingKey::DrawMode => {
                "Identifier of the annotation tool selected when the editor opens, e.g. SELECT or PEN."
            }
            SettingKey::PenColor => {
                "Stroke and text color as four comma-separated channels (red, green, blue, alpha) in [0,1]."
            }
            SettingKey::HighlighterColor => {
                "Highlighter color as four comma-separated channels (red, green, blue, alpha) in [0,1]."
            }
            SettingKey::HighlighterSize => "Width of highlighter strokes in pixels.",
            SettingKey::FillColor => {
                "Fill color for shapes, text backgrounds and number stamps; fully transparent disables the fill."
            }
            SettingKey::PenSize => "Width of pen, line, arrow and shape strokes in pixels.",
            SettingKey::NumberRadius => "Radius of numbered stamps in pixels.",
            SettingKey::Font => "Font family used for text annotations.",
            SettingKey::ImagePadding => "Padding added around the screenshot.",
            SettingKey::ImageCornerRadius => "Corner radius applied to the screenshot.",
            SettingKey::ImageAspectRatio => {
                "Aspect ratio of the output as W:H, or empty to follow the image."
            }
            SettingKey::ImageShadowStrength => "Strength of the drop shadow behind the screenshot.",
            SettingKey::ImageAutoBalance => {
                "Automatically balance padding so the screenshot looks centered."
            }
            SettingKey::ScreenshotSubfolder => {
                "Subfolder of the pictures directory that is scanned for screenshots."
            }
            SettingKey::ExportFormat => "File format used when exporting: png, jpg, webp or avif.",
            SettingKey::ExportCompress => "Compress images when exporting.",
            SettingKey::TrashScreenshotsOnClose => {
                "Move the original screenshot files to the trash when the window is closed."
            }
            SettingKey::ImageOptionsLock => {
                "Keep the current background and image options instead of resetting them when a new image is opened."
            }
            SettingKey::ShowCloseConfirmDialog => {
                "Ask for confirmation before closing a window with unsaved changes."
            }
            SettingKey::CustomExportCommand => {
                "Command run on the exported file; empty disables the custom export action."
            }
            SettingKey::ProviderName => "Display name of the configured export provider.",
            SettingKey::ShowExportConfirmDialog => {
                "Ask for confirmation before running an export command."
            }
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingKey {
    type Err = SchemaError;

    /// Looks a key up by its persisted name.  A fully namespaced path
    /// (`/be/alexandervanhee/gradia/pen-color`) is accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(SCHEMA_PATH).unwrap_or(s);
        SettingKey::ALL
            .iter()
            .copied()
            .find(|key| key.name() == name)
            .ok_or_else(|| SchemaError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_default_has_the_declared_type() {
        for key in SettingKey::ALL {
            assert_eq!(
                key.default_value().value_type(),
                key.value_type(),
                "default of {key} must match its declared type"
            );
        }
    }

    #[test]
    fn test_key_names_are_unique() {
        let names: HashSet<_> = SettingKey::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), SettingKey::ALL.len());
    }

    #[test]
    fn test_from_str_round_trips_every_name() {
        for key in SettingKey::ALL {
            assert_eq!(key.name().parse::<SettingKey>(), Ok(key));
        }
    }

    #[test]
    fn test_from_str_accepts_full_path() {
        let key: SettingKey = "/be/alexandervanhee/gradia/pen-color".parse().unwrap();
        assert_eq!(key, SettingKey::PenColor);
        assert_eq!(key.path(), "/be/alexandervanhee/gradia/pen-color");
    }

    #[test]
    fn test_from_str_rejects_unknown_key() {
        let result = "pen-colour".parse::<SettingKey>();
        assert_eq!(result, Err(SchemaError::UnknownKey("pen-colour".to_string())));
    }

    #[test]
    fn test_selected_defaults_match_contract() {
        assert_eq!(SettingKey::DrawMode.default_value(), SettingValue::from("SELECT"));
        assert_eq!(
            SettingKey::HighlighterColor.default_value(),
            SettingValue::from("1.000,1.000,0.000,0.500")
        );
        assert_eq!(SettingKey::NumberRadius.default_value(), SettingValue::Double(10.0));
        assert_eq!(SettingKey::ImagePadding.default_value(), SettingValue::Integer(5));
        assert_eq!(SettingKey::ExportCompress.default_value(), SettingValue::Boolean(true));
        assert_eq!(SettingKey::ImageAspectRatio.default_value(), SettingValue::from(""));
    }

    #[test]
    fn test_lock_and_trash_keys_have_distinct_summaries() {
        assert_ne!(
            SettingKey::ImageOptionsLock.summary(),
            SettingKey::TrashScreenshotsOnClose.summary()
        );
        assert_ne!(
            SettingKey::ImageOptionsLock.description(),
            SettingKey::TrashScreenshotsOnClose.description()
        );
    }
}
