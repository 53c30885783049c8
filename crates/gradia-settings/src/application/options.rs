//! Point-in-time option bundles read by the drawing tools, the image editor
//! and the exporter.
//!
//! Each bundle is a plain value: reading it does not keep it in sync with the
//! store.  Consumers re-read on change, typically from an `observe_all`
//! callback.

use gradia_core::{AspectRatio, DrawMode, ExportFormat, Rgba, SettingKey};
use serde::Serialize;

use crate::application::settings::{Settings, SettingsError};

/// Everything the annotation tools need to draw the next stroke or shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawingOptions {
    pub mode: DrawMode,
    pub pen_color: Rgba,
    pub pen_size: f64,
    pub highlighter_color: Rgba,
    pub highlighter_size: f64,
    pub fill_color: Rgba,
    pub font: String,
    pub number_radius: f64,
}

impl DrawingOptions {
    pub fn read(settings: &Settings) -> Self {
        Self {
            mode: settings.draw_mode(),
            pen_color: settings.pen_color(),
            pen_size: settings.pen_size(),
            highlighter_color: settings.highlighter_color(),
            highlighter_size: settings.highlighter_size(),
            fill_color: settings.fill_color(),
            font: settings.font(),
            number_radius: settings.number_radius(),
        }
    }

    /// The colour of the outline drawn by the active tool.
    pub fn stroke_color(&self) -> Rgba {
        match self.mode {
            DrawMode::Highlighter => self.highlighter_color,
            _ => self.pen_color,
        }
    }

    pub fn stroke_width(&self) -> f64 {
        match self.mode {
            DrawMode::Highlighter => self.highlighter_size,
            _ => self.pen_size,
        }
    }

    /// The fill for the active tool, or `None` when it draws no fill or the
    /// fill colour is fully transparent.
    pub fn fill(&self) -> Option<Rgba> {
        (self.mode.uses_fill() && self.fill_color.is_visible()).then_some(self.fill_color)
    }
}

/// Background and framing options of the image editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageOptions {
    pub padding: i32,
    pub corner_radius: i32,
    pub aspect_ratio: AspectRatio,
    pub shadow_strength: i32,
    pub auto_balance: bool,
    /// Keep these options when a new image is opened.
    pub locked: bool,
}

impl ImageOptions {
    pub fn read(settings: &Settings) -> Self {
        Self {
            padding: settings.image_padding(),
            corner_radius: settings.image_corner_radius(),
            aspect_ratio: settings.image_aspect_ratio(),
            shadow_strength: settings.image_shadow_strength(),
            auto_balance: settings.image_auto_balance(),
            locked: settings.image_options_lock(),
        }
    }

    /// Writes every field back.  Unchanged fields are no-ops and notify nobody.
    ///
    /// # Errors
    ///
    /// Stops at the first failed write; earlier fields stay written.
    pub fn apply(&self, settings: &Settings) -> Result<(), SettingsError> {
        settings.set_image_padding(self.padding)?;
        settings.set_image_corner_radius(self.corner_radius)?;
        settings.set_image_aspect_ratio(self.aspect_ratio)?;
        settings.set_image_shadow_strength(self.shadow_strength)?;
        settings.set_image_auto_balance(self.auto_balance)?;
        settings.set_image_options_lock(self.locked)
    }
}

/// What the exporter does with a finished image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub compress: bool,
    pub screenshot_subfolder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    pub confirm_export: bool,
    pub confirm_close: bool,
    pub trash_on_close: bool,
}

impl ExportOptions {
    pub fn read(settings: &Settings) -> Self {
        Self {
            format: settings.export_format(),
            compress: settings.export_compress(),
            screenshot_subfolder: settings.screenshot_subfolder(),
            custom_command: non_empty(settings.custom_export_command()),
            provider_name: non_empty(settings.provider_name()),
            confirm_export: settings.show_export_confirm_dialog(),
            confirm_close: settings.show_close_confirm_dialog(),
            trash_on_close: settings.trash_screenshots_on_close(),
        }
    }

    /// Keys whose change invalidates an [`ExportOptions`] snapshot.
    pub const KEYS: [SettingKey; 8] = [
        SettingKey::ExportFormat,
        SettingKey::ExportCompress,
        SettingKey::ScreenshotSubfolder,
        SettingKey::CustomExportCommand,
        SettingKey::ProviderName,
        SettingKey::ShowExportConfirmDialog,
        SettingKey::ShowCloseConfirmDialog,
        SettingKey::TrashScreenshotsOnClose,
    ];
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
