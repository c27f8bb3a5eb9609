//! # qrstyle
//!
//! A Rust library for rendering styled QR codes.
//!
//! `qrstyle` encodes text into a QR Code Model 2 symbol (versions 1 to 40, four error
//! correction levels) and composites it onto a raster canvas with decorative module shapes,
//! custom finder "eyes", frames, colors and an optional centered logo. Output is PNG bytes, a
//! `data:` URL, a file on disk, or an SVG document.
//!
//! ## Features
//!
//! - Fifteen module shapes, from plain squares to connected `liquid` and line patterns.
//! - Three-layer finder eyes drawn from fixed geometry, independent of the encoded bits.
//! - Square, rounded, circle, double and bracket frames.
//! - Logo embedding with a padded background backing and circular or square clipping.
//! - Built-in templates and a JSON-serializable [`StyleConfig`].
//! - Deterministic output: the same inputs always produce byte-identical PNGs.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! Render a template to PNG:
//!
//! ```rust
//! use qrstyle::{generate, template::apply_template};
//!
//! let style = apply_template("modern");
//! let image = generate("https://example.com", &style).unwrap();
//! assert_eq!(image.size(), 300);
//! assert!(image.to_data_url().starts_with("data:image/png;base64,"));
//! ```
//!
//! Build a style by hand:
//!
//! ```rust
//! use qrstyle::{generate, Color, ShapeSpec, StyleConfig};
//!
//! let style = StyleConfig::default()
//!     .with_body_shape(ShapeSpec::Liquid)
//!     .with_eye_ball_shape(ShapeSpec::Circle)
//!     .with_foreground(Color::from_hex(0x7c3aed))
//!     .with_size(512);
//! let image = generate("Hello, World!", &style).unwrap();
//! assert_eq!(image.image().dimensions(), (512, 512));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Core QR code encoding.
//! - [`grid`] and [`region`]: the module matrix and its eye/data partition.
//! - [`shape`], [`geometry`] and [`resolve`]: drawing primitives and the draw command list.
//! - [`surface`], [`render`] and [`helper`]: raster and SVG output.
//! - [`style`], [`color`] and [`template`]: configuration and presets.
//! - [`cache`]: an optional LRU for repeated renders.

pub mod cache;
pub mod color;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod helper;
pub mod qrcode;
pub mod region;
pub mod render;
pub mod resolve;
pub mod shape;
pub mod style;
pub mod surface;
pub mod template;

pub use cache::RenderCache;
pub use color::{Color, ColorSet};
pub use error::{QrStyleError, RenderError, Result};
pub use grid::{encode, ModuleGrid};
pub use qrcode::QrCodeEcc;
pub use region::{classify, EyeCorner, RegionKind};
pub use render::{render, render_svg, RenderedImage};
pub use shape::ShapeSpec;
pub use style::{FrameKind, FrameSpec, LogoClip, LogoSpec, Margin, StyleConfig};
pub use template::{apply_template, get_template, list_templates, Template};

/// Encodes `text` at the style's error correction level and renders it.
///
/// # Errors
///
/// Any [`QrStyleError`] from [`encode`] or [`render`].
pub fn generate(text: &str, style: &StyleConfig) -> Result<RenderedImage> {
    let grid = encode(text, style.error_correction_level())?;
    render(&grid, style)
}
