//! The styling configuration and its parts.
//!
//! [`StyleConfig`] is an immutable value: every `with_*` method consumes it and hands back an
//! updated copy. It serializes as camelCase JSON so callers can persist it next to a payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorSet};
use crate::error::QrStyleError;
use crate::qrcode::QrCodeEcc;
use crate::shape::ShapeSpec;

/// Default canvas side length in pixels.
pub const DEFAULT_SIZE: u32 = 300;
/// Default frame stroke width in pixels.
pub const DEFAULT_FRAME_WIDTH: u32 = 8;
/// Default distance the logo backing extends past the logo.
pub const DEFAULT_LOGO_PADDING: u32 = 6;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    #[default]
    None,
    Square,
    Rounded,
    Circle,
    Double,
    Brackets,
}

impl FrameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameKind::None => "none",
            FrameKind::Square => "square",
            FrameKind::Rounded => "rounded",
            FrameKind::Circle => "circle",
            FrameKind::Double => "double",
            FrameKind::Brackets => "brackets",
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameKind {
    type Err = QrStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FrameKind::None),
            "square" => Ok(FrameKind::Square),
            "rounded" => Ok(FrameKind::Rounded),
            "circle" => Ok(FrameKind::Circle),
            "double" => Ok(FrameKind::Double),
            "brackets" => Ok(FrameKind::Brackets),
            other => Err(QrStyleError::Parse(format!("unknown frame `{other}`"))),
        }
    }
}

/// Decorative border drawn at the canvas edge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSpec {
    pub kind: FrameKind,
    /// Stroke width in pixels.
    #[serde(default = "default_frame_width")]
    pub width: u32,
}

impl FrameSpec {
    pub const NONE: FrameSpec = FrameSpec::new(FrameKind::None);

    pub const fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            width: DEFAULT_FRAME_WIDTH,
        }
    }
}

impl Default for FrameSpec {
    fn default() -> Self {
        FrameSpec::NONE
    }
}

fn default_frame_width() -> u32 {
    DEFAULT_FRAME_WIDTH
}

/// Quiet zone around the symbol.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Margin {
    /// Measured in modules; the module size absorbs it.
    Modules(u32),
    /// Measured in canvas pixels.
    Pixels(u32),
}

impl Default for Margin {
    fn default() -> Self {
        Margin::Modules(2)
    }
}

impl FromStr for Margin {
    type Err = QrStyleError;

    /// `4` or `4m` is four modules, `20px` is twenty pixels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || QrStyleError::Parse(format!("invalid margin `{s}`"));
        if let Some(px) = s.strip_suffix("px") {
            return px.trim().parse().map(Margin::Pixels).map_err(|_| invalid());
        }
        s.strip_suffix('m')
            .unwrap_or(s)
            .trim()
            .parse()
            .map(Margin::Modules)
            .map_err(|_| invalid())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoClip {
    #[default]
    Circle,
    Square,
    RoundedSquare,
}

impl FromStr for LogoClip {
    type Err = QrStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(LogoClip::Circle),
            "square" => Ok(LogoClip::Square),
            "rounded" | "rounded-square" => Ok(LogoClip::RoundedSquare),
            other => Err(QrStyleError::Parse(format!("unknown logo clip `{other}`"))),
        }
    }
}

/// A centered logo. The image bytes stay encoded (PNG, JPEG, ...) until render time.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoSpec {
    #[serde(with = "base64_bytes")]
    pub image_bytes: Vec<u8>,
    pub size_px: u32,
    #[serde(default)]
    pub clip: LogoClip,
    #[serde(default = "default_logo_padding")]
    pub padding: u32,
}

impl LogoSpec {
    pub fn new(image_bytes: Vec<u8>, size_px: u32) -> Self {
        Self {
            image_bytes,
            size_px,
            clip: LogoClip::default(),
            padding: DEFAULT_LOGO_PADDING,
        }
    }

    pub fn with_clip(self, clip: LogoClip) -> Self {
        Self { clip, ..self }
    }

    pub fn with_padding(self, padding: u32) -> Self {
        Self { padding, ..self }
    }
}

impl fmt::Debug for LogoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoSpec")
            .field("image_bytes", &format_args!("<{} bytes>", self.image_bytes.len()))
            .field("size_px", &self.size_px)
            .field("clip", &self.clip)
            .field("padding", &self.padding)
            .finish()
    }
}

fn default_logo_padding() -> u32 {
    DEFAULT_LOGO_PADDING
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(serde::de::Error::custom)
    }
}

/// Everything the renderer needs besides the payload.
///
/// The default is the `classic` preset: square modules and eyes, black on white, a two-module
/// quiet zone, 300 px, error correction level H.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    pub(crate) body_shape: ShapeSpec,
    pub(crate) eye_frame_shape: ShapeSpec,
    pub(crate) eye_ball_shape: ShapeSpec,
    #[serde(default)]
    pub(crate) frame: FrameSpec,
    pub(crate) colors: ColorSet,
    pub(crate) size: u32,
    #[serde(default)]
    pub(crate) margin: Margin,
    pub(crate) error_correction_level: QrCodeEcc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) logo: Option<LogoSpec>,
}

impl StyleConfig {
    /// A logo-free style with the given shapes, frame and palette, at the default size,
    /// margin and error correction level.
    pub const fn preset(
        body_shape: ShapeSpec,
        eye_frame_shape: ShapeSpec,
        eye_ball_shape: ShapeSpec,
        frame: FrameKind,
        colors: ColorSet,
    ) -> Self {
        Self {
            body_shape,
            eye_frame_shape,
            eye_ball_shape,
            frame: FrameSpec::new(frame),
            colors,
            size: DEFAULT_SIZE,
            margin: Margin::Modules(2),
            error_correction_level: QrCodeEcc::High,
            logo: None,
        }
    }

    /// Parses a style from its JSON form.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| QrStyleError::Parse(format!("style json: {e}")))
    }

    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| QrStyleError::Parse(format!("style json: {e}")))
    }

    pub fn body_shape(&self) -> ShapeSpec {
        self.body_shape
    }

    pub fn eye_frame_shape(&self) -> ShapeSpec {
        self.eye_frame_shape
    }

    pub fn eye_ball_shape(&self) -> ShapeSpec {
        self.eye_ball_shape
    }

    pub fn frame(&self) -> FrameSpec {
        self.frame
    }

    pub fn colors(&self) -> &ColorSet {
        &self.colors
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn margin(&self) -> Margin {
        self.margin
    }

    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.error_correction_level
    }

    pub fn logo(&self) -> Option<&LogoSpec> {
        self.logo.as_ref()
    }

    pub fn with_body_shape(self, body_shape: ShapeSpec) -> Self {
        Self { body_shape, ..self }
    }

    pub fn with_eye_frame_shape(self, eye_frame_shape: ShapeSpec) -> Self {
        Self {
            eye_frame_shape,
            ..self
        }
    }

    pub fn with_eye_ball_shape(self, eye_ball_shape: ShapeSpec) -> Self {
        Self {
            eye_ball_shape,
            ..self
        }
    }

    pub fn with_frame(self, frame: FrameSpec) -> Self {
        Self { frame, ..self }
    }

    pub fn with_colors(self, colors: ColorSet) -> Self {
        Self { colors, ..self }
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.colors.foreground = color;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.colors.background = color;
        self
    }

    pub fn with_eye_color(mut self, color: Color) -> Self {
        self.colors.eye_color = color;
        self
    }

    pub fn with_frame_color(mut self, color: Color) -> Self {
        self.colors.frame_color = color;
        self
    }

    pub fn with_size(self, size: u32) -> Self {
        Self { size, ..self }
    }

    pub fn with_margin(self, margin: Margin) -> Self {
        Self { margin, ..self }
    }

    pub fn with_error_correction_level(self, error_correction_level: QrCodeEcc) -> Self {
        Self {
            error_correction_level,
            ..self
        }
    }

    pub fn with_logo(self, logo: Option<LogoSpec>) -> Self {
        Self { logo, ..self }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig::preset(
            ShapeSpec::Square,
            ShapeSpec::Square,
            ShapeSpec::Square,
            FrameKind::None,
            ColorSet::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;

    fn hash_of(style: &StyleConfig) -> u64 {
        let mut hasher = DefaultHasher::new();
        style.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_with_methods_return_updated_copies() {
        let base = StyleConfig::default();
        let round = base.clone().with_body_shape(ShapeSpec::Circle).with_size(512);
        assert_eq!(base.body_shape(), ShapeSpec::Square);
        assert_eq!(round.body_shape(), ShapeSpec::Circle);
        assert_eq!(round.size(), 512);
        assert_ne!(base, round);
        assert_eq!(hash_of(&base), hash_of(&StyleConfig::default()));
    }

    #[test]
    fn test_json_round_trip_with_logo() {
        let style = StyleConfig::default()
            .with_margin(Margin::Pixels(12))
            .with_frame(FrameSpec::new(FrameKind::Brackets))
            .with_logo(Some(LogoSpec::new(vec![1, 2, 3, 250], 40).with_clip(LogoClip::Square)));
        let json = style.to_json().unwrap();
        assert!(json.contains("\"bodyShape\": \"square\""));
        assert!(json.contains("\"imageBytes\": \"AQID+g==\""));
        assert!(json.contains("\"errorCorrectionLevel\": \"H\""));
        assert_eq!(StyleConfig::from_json(&json).unwrap(), style);
    }

    #[test]
    fn test_json_defaults_for_optional_fields() {
        let json = r##"{
            "bodyShape": "circle",
            "eyeFrameShape": "rounded-square",
            "eyeBallShape": "circle",
            "colors": {
                "foreground": "#2563eb",
                "background": "#ffffff",
                "eyeColor": "#1d4ed8",
                "frameColor": "#3b82f6"
            },
            "size": 300,
            "errorCorrectionLevel": "M"
        }"##;
        let style = StyleConfig::from_json(json).unwrap();
        assert_eq!(style.margin(), Margin::Modules(2));
        assert_eq!(style.frame(), FrameSpec::NONE);
        assert_eq!(style.error_correction_level(), QrCodeEcc::Medium);
        assert!(style.logo().is_none());
        assert!(StyleConfig::from_json("{\"bodyShape\": \"blob\"}").is_err());
    }

    #[test]
    fn test_parse_margin_and_frame() {
        assert_eq!("4".parse::<Margin>().unwrap(), Margin::Modules(4));
        assert_eq!("3m".parse::<Margin>().unwrap(), Margin::Modules(3));
        assert_eq!("20px".parse::<Margin>().unwrap(), Margin::Pixels(20));
        assert!("-1".parse::<Margin>().is_err());
        assert_eq!("Double".parse::<FrameKind>().unwrap(), FrameKind::Double);
        assert!("oval".parse::<FrameKind>().is_err());
    }
}
