//! Colors and the four-color palette of a styled code.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::QrStyleError;

/// An opaque 8-bit RGB color, written as `#rrggbb`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    /// WCAG relative luminance in `0.0..=1.0`.
    pub fn relative_luminance(self) -> f64 {
        fn channel(c: u8) -> f64 {
            let c = f64::from(c) / 255.0;
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// WCAG contrast ratio between two colors, from 1.0 (identical) to 21.0.
    pub fn contrast_ratio(self, other: Color) -> f64 {
        let (a, b) = (self.relative_luminance(), other.relative_luminance());
        let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
        (hi + 0.05) / (lo + 0.05)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = QrStyleError;

    /// Accepts `#rrggbb`, `#rgb`, with or without the leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || QrStyleError::Parse(format!("invalid hex color `{s}`"));
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Color::from_hex(value)),
            3 => {
                let expand = |nibble: u32| ((nibble & 0xf) * 0x11) as u8;
                Ok(Color::rgb(expand(value >> 8), expand(value >> 4), expand(value)))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = QrStyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// The palette a style paints with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSet {
    /// Data modules.
    pub foreground: Color,
    /// Canvas fill, eye clearance and logo backing.
    pub background: Color,
    /// Eye frames and eye balls.
    pub eye_color: Color,
    pub frame_color: Color,
}

impl ColorSet {
    pub const fn new(foreground: Color, background: Color, eye_color: Color, frame_color: Color) -> Self {
        Self {
            foreground,
            background,
            eye_color,
            frame_color,
        }
    }

    /// Lowest contrast between the background and either of the module colors.
    pub fn min_contrast(&self) -> f64 {
        self.foreground
            .contrast_ratio(self.background)
            .min(self.eye_color.contrast_ratio(self.background))
    }
}

impl Default for ColorSet {
    fn default() -> Self {
        ColorSet::new(Color::BLACK, Color::WHITE, Color::BLACK, Color::from_hex(0x333333))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#2563eb".parse::<Color>().unwrap(), Color::rgb(0x25, 0x63, 0xeb));
        assert_eq!("FFFFFF".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#f80".parse::<Color>().unwrap(), Color::rgb(0xff, 0x88, 0x00));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
        assert!("#+12345".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        assert_eq!(Color::from_hex(0x1D4ED8).to_string(), "#1d4ed8");
    }

    #[test]
    fn test_contrast_ratio_bounds() {
        assert!((Color::BLACK.contrast_ratio(Color::WHITE) - 21.0).abs() < 1e-9);
        assert!((Color::WHITE.contrast_ratio(Color::WHITE) - 1.0).abs() < 1e-9);
        let neon = ColorSet::new(
            Color::from_hex(0x06b6d4),
            Color::from_hex(0x0f172a),
            Color::from_hex(0x0891b2),
            Color::from_hex(0x22d3ee),
        );
        assert!(neon.min_contrast() > 3.0);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Color::from_hex(0xdc2626)).unwrap();
        assert_eq!(json, "\"#dc2626\"");
        let back: Color = serde_json::from_str("\"#DC2626\"").unwrap();
        assert_eq!(back, Color::from_hex(0xdc2626));
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }
}
