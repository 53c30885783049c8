//! Export file format stored under `export-format`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported export format: {0:?}")]
pub struct ExportFormatError(pub String);

/// Image formats the exporter can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpg,
    Webp,
    Avif,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Png,
        ExportFormat::Jpg,
        ExportFormat::Webp,
        ExportFormat::Avif,
    ];

    /// The persisted tag, which is also the file extension.
    pub fn tag(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Webp => "webp",
            ExportFormat::Avif => "avif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
            ExportFormat::Avif => "image/avif",
        }
    }

    /// `false` for formats that cannot store an alpha channel.
    pub fn supports_transparency(self) -> bool {
        !matches!(self, ExportFormat::Jpg)
    }

    /// Decodes a stored tag, substituting PNG for anything unsupported.
    pub fn decode_or_default(tag: &str) -> ExportFormat {
        tag.parse().unwrap_or_else(|err: ExportFormatError| {
            warn!("{err}; falling back to {}", ExportFormat::default());
            ExportFormat::default()
        })
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportFormatError;

    /// Matching ignores ASCII case, and `jpeg` is accepted as an alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "jpeg" {
            return Ok(ExportFormat::Jpg);
        }
        ExportFormat::ALL
            .iter()
            .copied()
            .find(|format| format.tag() == lower)
            .ok_or_else(|| ExportFormatError(s.to_string()))
    }
}
