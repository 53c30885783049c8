//! Aspect ratio stored under `image-aspect-ratio`.
//!
//! The empty string means the output follows the image; otherwise the value
//! is `"W:H"` with two positive integers, e.g. `"16:9"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid aspect ratio {0:?}: expected \"W:H\" with positive integers")]
pub struct AspectRatioError(pub String);

/// Output aspect ratio of the image editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AspectRatio {
    /// No constraint; the output follows the image.
    #[default]
    Free,
    /// Fixed `width:height` ratio.
    Fixed { width: u32, height: u32 },
}

impl AspectRatio {
    /// Ratio presets offered by the image editor.
    pub const PRESETS: [AspectRatio; 6] = [
        AspectRatio::Free,
        AspectRatio::Fixed { width: 1, height: 1 },
        AspectRatio::Fixed { width: 4, height: 3 },
        AspectRatio::Fixed { width: 3, height: 2 },
        AspectRatio::Fixed { width: 16, height: 9 },
        AspectRatio::Fixed { width: 9, height: 16 },
    ];

    /// `width / height`, or `None` when free.
    pub fn as_f64(self) -> Option<f64> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::Fixed { width, height } => Some(f64::from(width) / f64::from(height)),
        }
    }

    /// Decodes a stored value, substituting [`AspectRatio::Free`] for anything
    /// malformed.
    pub fn decode_or_default(text: &str) -> AspectRatio {
        text.parse().unwrap_or_else(|err: AspectRatioError| {
            warn!("{err}; using a free aspect ratio");
            AspectRatio::Free
        })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectRatio::Free => Ok(()),
            AspectRatio::Fixed { width, height } => write!(f, "{width}:{height}"),
        }
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(AspectRatio::Free);
        }

        let invalid = || AspectRatioError(s.to_string());
        let (w, h) = trimmed.split_once(':').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(AspectRatio::Fixed { width, height })
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = AspectRatioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(ratio: AspectRatio) -> Self {
        ratio.to_string()
    }
}
