//! The compositor: decode the logo, lay out, paint, encode.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, RgbaImage};
use tracing::{debug, warn};

use crate::error::{QrStyleError, Result};
use crate::grid::ModuleGrid;
use crate::helper::SvgCanvas;
use crate::resolve::{resolve, Resolved};
use crate::style::StyleConfig;
use crate::surface::Surface;

/// Below this WCAG contrast ratio scanners start to struggle.
const MIN_CONTRAST: f64 = 3.0;

/// A finished raster image.
#[derive(Clone, PartialEq, Debug)]
pub struct RenderedImage {
    png: Vec<u8>,
    image: RgbaImage,
    size: u32,
    occlusion: Option<f64>,
}

impl RenderedImage {
    /// Encoded PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn into_png(self) -> Vec<u8> {
        self.png
    }

    /// The pixels the PNG was encoded from.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Share of data modules hidden behind the logo backing, if a logo was drawn.
    pub fn logo_occlusion(&self) -> Option<f64> {
        self.occlusion
    }

    /// `data:image/png;base64,...`
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }

    /// Download name for a code identified by `slug`.
    pub fn file_name(slug: &str) -> String {
        format!("{slug}-qr-code.png")
    }

    /// Writes the PNG to `<dir>/<slug>-qr-code.png`, creating `dir` if needed, and returns
    /// the path written.
    pub fn save(&self, dir: impl AsRef<Path>, slug: &str) -> Result<PathBuf> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(Self::file_name(slug));
        fs::write(&path, &self.png)?;
        debug!(path = %path.display(), bytes = self.png.len(), "saved png");
        Ok(path)
    }
}

/// Renders `grid` under `style` to a PNG.
///
/// Pipeline: decode the logo, validate the layout, fill the background, then paint the frame,
/// data modules, eyes and logo in that order. Identical inputs give byte-identical output.
///
/// # Errors
///
/// [`QrStyleError::AssetLoad`] when the logo bytes are not a decodable image, and
/// [`QrStyleError::Render`] when the canvas is out of range, too small for the grid, or
/// smaller than the logo.
///
/// # Example
///
/// ```rust
/// use qrstyle::{grid::encode, render::render, qrcode::QrCodeEcc, StyleConfig};
///
/// let grid = encode("https://example.com", QrCodeEcc::High).unwrap();
/// let image = render(&grid, &StyleConfig::default()).unwrap();
/// assert_eq!(image.size(), 300);
/// ```
pub fn render(grid: &ModuleGrid, style: &StyleConfig) -> Result<RenderedImage> {
    let resolved = prepare(grid, style)?;
    let mut surface = Surface::new(resolved.layout.size, resolved.background)?;
    resolved.execute(&mut surface)?;
    let png = surface.encode_png()?;
    debug!(size = resolved.layout.size, bytes = png.len(), "rendered png");
    Ok(RenderedImage {
        png,
        image: surface.into_image(),
        size: resolved.layout.size,
        occlusion: resolved.occlusion,
    })
}

/// Renders the same draw commands as [`render`] into an SVG document.
pub fn render_svg(grid: &ModuleGrid, style: &StyleConfig) -> Result<String> {
    let resolved = prepare(grid, style)?;
    let mut canvas = SvgCanvas::new(resolved.layout.size, resolved.background);
    resolved.execute(&mut canvas)?;
    Ok(canvas.finish())
}

fn prepare(grid: &ModuleGrid, style: &StyleConfig) -> Result<Resolved> {
    let logo = style.logo().map(|spec| decode_logo(&spec.image_bytes)).transpose()?;

    let contrast = style.colors().min_contrast();
    if contrast < MIN_CONTRAST {
        warn!(contrast, "low contrast between modules and background");
    }

    let resolved = resolve(grid, style, logo.as_ref())?;
    debug!(
        modules = grid.size(),
        module_size = resolved.layout.module_size,
        commands = resolved.commands.len(),
        "resolved layout"
    );

    if let Some(occlusion) = resolved.occlusion {
        let level = style.error_correction_level();
        if occlusion > level.recovery_capacity() {
            warn!(
                occlusion,
                level = %level,
                "logo covers more data modules than level {} can recover",
                level
            );
        }
    }
    Ok(resolved)
}

fn decode_logo(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(QrStyleError::AssetLoad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::encode;
    use crate::qrcode::QrCodeEcc;
    use crate::style::LogoSpec;

    #[test]
    fn test_render_is_idempotent() {
        let grid = encode("idempotent", QrCodeEcc::Medium).unwrap();
        let style = StyleConfig::default();
        let a = render(&grid, &style).unwrap();
        let b = render(&grid, &style).unwrap();
        assert_eq!(a.png(), b.png());
        assert_eq!(a.image(), b.image());
    }

    #[test]
    fn test_bad_logo_fails_before_painting() {
        let grid = encode("logo", QrCodeEcc::High).unwrap();
        let style = StyleConfig::default().with_logo(Some(LogoSpec::new(b"not an image".to_vec(), 40)));
        assert!(matches!(render(&grid, &style), Err(QrStyleError::AssetLoad(_))));
    }

    #[test]
    fn test_data_url_and_file_name() {
        let grid = encode("url", QrCodeEcc::Low).unwrap();
        let image = render(&grid, &StyleConfig::default().with_size(64)).unwrap();
        assert!(image.to_data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(RenderedImage::file_name("abc123"), "abc123-qr-code.png");
    }

    #[test]
    fn test_save_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("out");
        let grid = encode("save me", QrCodeEcc::Quartile).unwrap();
        let image = render(&grid, &StyleConfig::default()).unwrap();
        let path = image.save(&dir, "promo").unwrap();
        assert_eq!(path, dir.join("promo-qr-code.png"));
        assert_eq!(std::fs::read(path).unwrap(), image.png());
    }

    #[test]
    fn test_svg_output() {
        let grid = encode("vector", QrCodeEcc::High).unwrap();
        let svg = render_svg(&grid, &StyleConfig::default()).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("viewBox=\"0 0 300 300\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
