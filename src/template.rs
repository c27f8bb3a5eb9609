//! Built-in style presets.

use std::fmt;

use serde::Serialize;

use crate::color::{Color, ColorSet};
use crate::qrcode::QrCodeEcc;
use crate::shape::ShapeSpec;
use crate::style::{FrameKind, FrameSpec, Margin, StyleConfig, DEFAULT_SIZE};

use self::TemplateCategory as C;
use crate::shape::ShapeSpec as S;
use crate::style::FrameKind as F;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Business,
    Minimal,
    Creative,
    Social,
    Decorative,
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TemplateCategory::Business => "business",
            TemplateCategory::Minimal => "minimal",
            TemplateCategory::Creative => "creative",
            TemplateCategory::Social => "social",
            TemplateCategory::Decorative => "decorative",
        })
    }
}

/// A named, immutable preset.
#[derive(Debug, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub category: TemplateCategory,
    pub description: &'static str,
    pub style: StyleConfig,
}

const fn style(
    body: ShapeSpec,
    eye_frame: ShapeSpec,
    eye_ball: ShapeSpec,
    frame: FrameKind,
    margin: u32,
    colors: [u32; 4],
) -> StyleConfig {
    StyleConfig {
        body_shape: body,
        eye_frame_shape: eye_frame,
        eye_ball_shape: eye_ball,
        frame: FrameSpec::new(frame),
        colors: ColorSet::new(
            Color::from_hex(colors[0]),
            Color::from_hex(colors[1]),
            Color::from_hex(colors[2]),
            Color::from_hex(colors[3]),
        ),
        size: DEFAULT_SIZE,
        margin: Margin::Modules(margin),
        error_correction_level: QrCodeEcc::High,
        logo: None,
    }
}

static TEMPLATES: [Template; 13] = [
    Template {
        id: "classic",
        name: "Classic",
        category: C::Business,
        description: "Traditional black and white",
        style: style(S::Square, S::Square, S::Square, F::None, 2, [0x000000, 0xffffff, 0x000000, 0x333333]),
    },
    Template {
        id: "modern",
        name: "Modern",
        category: C::Minimal,
        description: "Round dots with a soft blue frame",
        style: style(S::Circle, S::RoundedSquare, S::Circle, F::Rounded, 2, [0x2563eb, 0xffffff, 0x1d4ed8, 0x3b82f6]),
    },
    Template {
        id: "elegant",
        name: "Elegant",
        category: C::Business,
        description: "Rounded modules in slate",
        style: style(S::RoundedSquare, S::Square, S::RoundedSquare, F::Square, 2, [0x1e293b, 0xf8fafc, 0x0f172a, 0x475569]),
    },
    Template {
        id: "vibrant",
        name: "Vibrant",
        category: C::Creative,
        description: "Red diamonds on warm cream",
        style: style(S::Diamond, S::Circle, S::Diamond, F::Circle, 2, [0xdc2626, 0xfef3c7, 0xb91c1c, 0xf59e0b]),
    },
    Template {
        id: "minimal",
        name: "Minimal",
        category: C::Minimal,
        description: "Grey dots with a wide quiet zone",
        style: style(S::Circle, S::RoundedSquare, S::Circle, F::None, 4, [0x374151, 0xffffff, 0x111827, 0x6b7280]),
    },
    Template {
        id: "corporate",
        name: "Corporate",
        category: C::Business,
        description: "Squared navy with a square frame",
        style: style(S::Square, S::Square, S::Square, F::Square, 2, [0x0f172a, 0xf1f5f9, 0x1e293b, 0x334155]),
    },
    Template {
        id: "social-media",
        name: "Social Media",
        category: C::Social,
        description: "Perfect for social media sharing",
        style: style(S::Cross, S::RoundedSquare, S::Circle, F::Rounded, 2, [0x7c3aed, 0xffffff, 0x5b21b6, 0x8b5cf6]),
    },
    Template {
        id: "tech-startup",
        name: "Tech Startup",
        category: C::Business,
        description: "Modern tech-inspired design",
        style: style(S::Diamond, S::Hexagon, S::Diamond, F::Square, 2, [0x059669, 0xf0fdf4, 0x047857, 0x10b981]),
    },
    Template {
        id: "luxury-brand",
        name: "Luxury Brand",
        category: C::Business,
        description: "Elegant luxury design",
        style: style(S::Hexagon, S::Square, S::Hexagon, F::Double, 2, [0x92400e, 0xfffbeb, 0x78350f, 0xd97706]),
    },
    Template {
        id: "playful-dots",
        name: "Playful Dots",
        category: C::Creative,
        description: "Fun dotted pattern design",
        style: style(S::Dot, S::Circle, S::Circle, F::Circle, 2, [0xea580c, 0xfff7ed, 0xc2410c, 0xfb923c]),
    },
    Template {
        id: "heart-love",
        name: "Heart & Love",
        category: C::Creative,
        description: "Romantic heart-themed design",
        style: style(S::Heart, S::RoundedSquare, S::Heart, F::Rounded, 2, [0xe11d48, 0xfdf2f8, 0xbe123c, 0xf43f5e]),
    },
    Template {
        id: "star-premium",
        name: "Star Premium",
        category: C::Decorative,
        description: "Premium star-themed design",
        style: style(S::Star, S::Square, S::Star, F::Brackets, 2, [0x7c2d12, 0xfefce8, 0xa16207, 0xeab308]),
    },
    Template {
        id: "neon-cyber",
        name: "Neon Cyber",
        category: C::Creative,
        description: "Futuristic neon cyber design",
        style: style(S::HorizontalLine, S::Square, S::Square, F::Square, 2, [0x06b6d4, 0x0f172a, 0x0891b2, 0x22d3ee]),
    },
];

/// Every built-in template, `classic` first.
pub fn list_templates() -> &'static [Template] {
    &TEMPLATES
}

pub fn get_template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// The style of template `id`, or of `classic` when no template has that id.
pub fn apply_template(id: &str) -> StyleConfig {
    get_template(id).unwrap_or(&TEMPLATES[0]).style.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let templates = list_templates();
        for (i, a) in templates.iter().enumerate() {
            assert!(templates[i + 1..].iter().all(|b| b.id != a.id), "duplicate {}", a.id);
        }
        assert_eq!(templates[0].id, "classic");
    }

    #[test]
    fn test_classic_is_the_default_style() {
        assert_eq!(apply_template("classic"), StyleConfig::default());
    }

    #[test]
    fn test_unknown_id_falls_back_to_classic() {
        assert!(get_template("nope").is_none());
        assert_eq!(apply_template("nope"), apply_template("classic"));
    }

    #[test]
    fn test_modern_palette() {
        let style = apply_template("modern");
        assert_eq!(style.body_shape(), ShapeSpec::Circle);
        assert_eq!(style.frame().kind, FrameKind::Rounded);
        assert_eq!(style.colors().foreground.to_string(), "#2563eb");
        assert_eq!(style.colors().eye_color.to_string(), "#1d4ed8");
    }

    #[test]
    fn test_presets_keep_readable_contrast() {
        for template in list_templates() {
            assert!(template.style.colors().min_contrast() >= 3.0, "{}", template.id);
        }
    }
}
