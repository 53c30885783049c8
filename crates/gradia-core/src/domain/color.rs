//! RGBA colour codec.
//!
//! Colours are persisted as plain strings of four comma-separated channels:
//!
//! ```text
//! "1.000,0.500,0.000,1.000"
//!   red   green blue  alpha
//! ```
//!
//! Each channel is nominally in `[0, 1]`.  Parsing tolerates whitespace
//! around channels and clamps out-of-range values; it rejects anything that
//! is not exactly four finite numbers.  Formatting always writes three
//! decimals per channel, which is the form the schema defaults use.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while decoding a colour string.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ColorError {
    /// The string does not have exactly four comma-separated channels.
    #[error("expected 4 comma-separated channels, found {0}")]
    ChannelCount(usize),

    /// A channel is not a finite floating-point number.
    #[error("invalid channel value {0:?}")]
    InvalidChannel(String),
}

/// A colour with floating-point red, green, blue and alpha channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a colour from raw channels.  No clamping is applied.
    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates a colour from 8-bit channels.
    pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        let channel = |v: u8| f64::from(v) / 255.0;
        Self::new(channel(red), channel(green), channel(blue), channel(alpha))
    }

    /// Returns the channels as a `(red, green, blue, alpha)` tuple.
    pub fn to_tuple(self) -> (f64, f64, f64, f64) {
        (self.red, self.green, self.blue, self.alpha)
    }

    /// `true` when the colour has a visible alpha.
    ///
    /// A fully transparent fill colour means "no fill" for shapes, text
    /// backgrounds and number stamps.
    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }

    /// Compares two colours channel by channel within `tolerance`.
    pub fn approx_eq(&self, other: &Rgba, tolerance: f64) -> bool {
        (self.red - other.red).abs() <= tolerance
            && (self.green - other.green).abs() <= tolerance
            && (self.blue - other.blue).abs() <= tolerance
            && (self.alpha - other.alpha).abs() <= tolerance
    }

    /// `true` when every channel is a finite number.
    pub fn is_finite(&self) -> bool {
        self.red.is_finite()
            && self.green.is_finite()
            && self.blue.is_finite()
            && self.alpha.is_finite()
    }

    /// The colour with every channel clamped to `[0, 1]`.
    pub fn clamped(self) -> Rgba {
        let clamp = |v: f64| v.clamp(0.0, 1.0);
        Rgba::new(clamp(self.red), clamp(self.green), clamp(self.blue), clamp(self.alpha))
    }

    /// Serializes the colour in the persisted three-decimal form, clamping
    /// channels to `[0, 1]` so that the stored string decodes to itself.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.clamped();
        write!(f, "{:.3},{:.3},{:.3},{:.3}", c.red, c.green, c.blue, c.alpha)
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(ColorError::ChannelCount(parts.len()));
        }

        let mut channels = [0.0_f64; 4];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            let value: f64 = part
                .trim()
                .parse()
                .map_err(|_| ColorError::InvalidChannel(part.to_string()))?;
            if !value.is_finite() {
                return Err(ColorError::InvalidChannel(part.to_string()));
            }
            *slot = value.clamp(0.0, 1.0);
        }

        Ok(Rgba::new(channels[0], channels[1], channels[2], channels[3]))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_encode_uses_three_decimals() {
        assert_eq!(Rgba::WHITE.encode(), "1.000,1.000,1.000,1.000");
        assert_eq!(
            Rgba::new(1.0, 1.0, 0.0, 0.5).encode(),
            "1.000,1.000,0.000,0.500"
        );
    }

    #[test]
    fn test_decode_encode_round_trip_within_tolerance() {
        // Arrange
        let original = Rgba::new(1.0, 0.5, 0.0, 1.0);

        // Act
        let decoded: Rgba = original.encode().parse().expect("decode");

        // Assert
        assert!(decoded.approx_eq(&original, TOLERANCE), "{decoded:?}");
    }

    #[test]
    fn test_decode_accepts_whitespace_and_short_forms() {
        let color: Rgba = " 0.2, 0.4 ,0.6,1".parse().unwrap();
        assert!(color.approx_eq(&Rgba::new(0.2, 0.4, 0.6, 1.0), TOLERANCE));
    }

    #[test]
    fn test_decode_clamps_out_of_range_channels() {
        let color: Rgba = "1.5,-0.25,0.5,2".parse().unwrap();
        assert_eq!(color, Rgba::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_decode_rejects_wrong_channel_count() {
        assert_eq!("1,1,1".parse::<Rgba>(), Err(ColorError::ChannelCount(3)));
        assert_eq!("".parse::<Rgba>(), Err(ColorError::ChannelCount(1)));
        assert_eq!("1,1,1,1,1".parse::<Rgba>(), Err(ColorError::ChannelCount(5)));
    }

    #[test]
    fn test_decode_rejects_non_numeric_and_non_finite_channels() {
        assert_eq!(
            "1,red,1,1".parse::<Rgba>(),
            Err(ColorError::InvalidChannel("red".to_string()))
        );
        assert!("1,NaN,1,1".parse::<Rgba>().is_err());
        assert!("1,1,inf,1".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_transparent_is_not_visible() {
        assert!(!Rgba::TRANSPARENT.is_visible());
        assert!(Rgba::new(0.0, 0.0, 0.0, 0.1).is_visible());
    }

    #[test]
    fn test_from_rgba8_scales_channels() {
        let color = Rgba::from_rgba8(255, 0, 51, 255);
        assert!(color.approx_eq(&Rgba::new(1.0, 0.0, 0.2, 1.0), TOLERANCE));
    }

    #[test]
    fn test_encode_clamps_out_of_range_channels() {
        // Arrange
        let color = Rgba::new(2.0, -0.5, 0.25, 1.5);

        // Act
        let encoded = color.encode();
        let decoded: Rgba = encoded.parse().unwrap();

        // Assert
        assert_eq!(encoded, "1.000,0.000,0.250,1.000");
        assert_eq!(decoded.encode(), encoded);
    }

    #[test]
    fn test_is_finite_rejects_nan_and_infinity() {
        assert!(Rgba::WHITE.is_finite());
        assert!(!Rgba::new(f64::NAN, 0.0, 0.0, 1.0).is_finite());
        assert!(!Rgba::new(0.0, 0.0, f64::INFINITY, 1.0).is_finite());
    }
}
