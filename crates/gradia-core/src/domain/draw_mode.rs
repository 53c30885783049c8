//! The active annotation tool.
//!
//! Stored under `draw-mode` as an upper-case tag.  A tag written by a newer
//! build, or edited by hand, may not be recognised; readers then fall back to
//! [`DrawMode::Select`] instead of failing (see [`DrawMode::decode_or_default`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// A tag that does not name any known tool.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognised draw mode: {0:?}")]
pub struct DrawModeError(pub String);

/// Annotation tools selectable in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DrawMode {
    Pen,
    Arrow,
    Line,
    Square,
    Circle,
    Text,
    #[default]
    Select,
    Highlighter,
    Censor,
    Number,
}

impl DrawMode {
    /// Every tool, in toolbar order.
    pub const ALL: [DrawMode; 10] = [
        DrawMode::Pen,
        DrawMode::Arrow,
        DrawMode::Line,
        DrawMode::Square,
        DrawMode::Circle,
        DrawMode::Text,
        DrawMode::Select,
        DrawMode::Highlighter,
        DrawMode::Censor,
        DrawMode::Number,
    ];

    /// The persisted tag.
    pub fn tag(self) -> &'static str {
        match self {
            DrawMode::Pen => "PEN",
            DrawMode::Arrow => "ARROW",
            DrawMode::Line => "LINE",
            DrawMode::Square => "SQUARE",
            DrawMode::Circle => "CIRCLE",
            DrawMode::Text => "TEXT",
            DrawMode::Select => "SELECT",
            DrawMode::Highlighter => "HIGHLIGHTER",
            DrawMode::Censor => "CENSOR",
            DrawMode::Number => "NUMBER",
        }
    }

    /// Human-readable name for tooltips and menus.
    pub fn label(self) -> &'static str {
        match self {
            DrawMode::Pen => "Pen",
            DrawMode::Arrow => "Arrow",
            DrawMode::Line => "Line",
            DrawMode::Square => "Square",
            DrawMode::Circle => "Circle",
            DrawMode::Text => "Text",
            DrawMode::Select => "Select",
            DrawMode::Highlighter => "Highlighter",
            DrawMode::Censor => "Censor",
            DrawMode::Number => "Number",
        }
    }

    /// `true` for tools that draw with the pen colour and size.
    pub fn uses_pen(self) -> bool {
        matches!(
            self,
            DrawMode::Pen
                | DrawMode::Arrow
                | DrawMode::Line
                | DrawMode::Square
                | DrawMode::Circle
                | DrawMode::Text
                | DrawMode::Number
        )
    }

    /// `true` for tools that paint the fill colour.
    pub fn uses_fill(self) -> bool {
        matches!(
            self,
            DrawMode::Square | DrawMode::Circle | DrawMode::Text | DrawMode::Number
        )
    }

    /// Decodes a stored tag, substituting [`DrawMode::Select`] for anything
    /// unrecognised.  The substitution is logged, never raised.
    pub fn decode_or_default(tag: &str) -> DrawMode {
        tag.parse().unwrap_or_else(|err: DrawModeError| {
            warn!("{err}; falling back to {}", DrawMode::default());
            DrawMode::default()
        })
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DrawMode {
    type Err = DrawModeError;

    /// Tags are matched exactly; the store always writes upper case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DrawMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.tag() == s)
            .ok_or_else(|| DrawModeError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_select() {
        assert_eq!(DrawMode::default(), DrawMode::Select);
        assert_eq!(DrawMode::default().tag(), "SELECT");
    }

    #[test]
    fn test_from_str_round_trips_every_tag() {
        for mode in DrawMode::ALL {
            assert_eq!(mode.tag().parse::<DrawMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_from_str_is_case_sensitive() {
        assert_eq!(
            "pen".parse::<DrawMode>(),
            Err(DrawModeError("pen".to_string()))
        );
    }

    #[test]
    fn test_decode_or_default_substitutes_select_for_unknown_tag() {
        assert_eq!(DrawMode::decode_or_default("LASER"), DrawMode::Select);
        assert_eq!(DrawMode::decode_or_default(""), DrawMode::Select);
        assert_eq!(DrawMode::decode_or_default("CENSOR"), DrawMode::Censor);
    }

    #[test]
    fn test_labels_are_title_case() {
        assert_eq!(DrawMode::Highlighter.label(), "Highlighter");
        assert_eq!(DrawMode::Number.label(), "Number");
    }

    #[test]
    fn test_select_uses_neither_pen_nor_fill() {
        assert!(!DrawMode::Select.uses_pen());
        assert!(!DrawMode::Select.uses_fill());
        assert!(DrawMode::Square.uses_pen() && DrawMode::Square.uses_fill());
        assert!(DrawMode::Number.uses_fill());
    }
}
