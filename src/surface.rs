//! Drawing targets.
//!
//! The compositor never paints directly: it hands [`crate::resolve::DrawCommand`]s to a
//! [`Canvas`]. [`Surface`] is the raster target; the SVG target lives in [`crate::helper`].

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::color::Color;
use crate::error::{RenderError, Result};
use crate::geometry::{Path, Point};

/// Largest canvas side length the renderer will allocate.
pub const MAX_CANVAS_SIZE: u32 = 8192;

/// A square drawing target.
pub trait Canvas {
    /// Fills every pixel whose center lies inside `path`.
    fn fill_path(&mut self, path: &Path, color: Color);

    /// Alpha-blends `image` with its top-left corner at `(x, y)`, keeping only the pixels
    /// whose centers lie inside `clip`.
    fn draw_image(&mut self, image: &RgbaImage, x: u32, y: u32, clip: &Path) -> Result<()>;
}

/// An RGBA raster surface, sampled at pixel centers without anti-aliasing.
#[derive(Clone, Debug)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Allocates a `size`×`size` surface filled with `background`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::CanvasSize`] when `size` is zero or above [`MAX_CANVAS_SIZE`].
    pub fn new(size: u32, background: Color) -> Result<Self> {
        validate_canvas_size(size)?;
        Ok(Self {
            image: RgbaImage::from_pixel(size, size, background.to_rgba()),
        })
    }

    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Serializes the surface as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(RenderError::Encode)?;
        Ok(bytes)
    }

    // Pixel index range `[lo, hi)` covering `lo_f..hi_f`, clamped to the surface.
    fn span(&self, lo_f: f64, hi_f: f64) -> (u32, u32) {
        let size = f64::from(self.size());
        let lo = lo_f.floor().clamp(0.0, size) as u32;
        let hi = hi_f.ceil().clamp(0.0, size) as u32;
        (lo, hi)
    }
}

impl Canvas for Surface {
    fn fill_path(&mut self, path: &Path, color: Color) {
        let Some(bounds) = path.bounds() else {
            return;
        };
        let (x0, x1) = self.span(bounds.x0, bounds.x1);
        let (y0, y1) = self.span(bounds.y0, bounds.y1);
        let rgba = color.to_rgba();
        for y in y0..y1 {
            for x in x0..x1 {
                if path.contains(Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)) {
                    self.image.put_pixel(x, y, rgba);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, x: u32, y: u32, clip: &Path) -> Result<()> {
        for (ix, iy, pixel) in image.enumerate_pixels() {
            let (cx, cy) = (x + ix, y + iy);
            if cx >= self.size() || cy >= self.size() {
                continue;
            }
            if !clip.contains(Point::new(f64::from(cx) + 0.5, f64::from(cy) + 0.5)) {
                continue;
            }
            let under = *self.image.get_pixel(cx, cy);
            self.image.put_pixel(cx, cy, alpha_blend(&under, pixel));
        }
        Ok(())
    }
}

pub(crate) fn validate_canvas_size(size: u32) -> Result<()> {
    if size == 0 || size > MAX_CANVAS_SIZE {
        return Err(RenderError::CanvasSize(size).into());
    }
    Ok(())
}

/// Source-over blend of `fg` onto an opaque `bg`.
fn alpha_blend(bg: &Rgba<u8>, fg: &Rgba<u8>) -> Rgba<u8> {
    let alpha = u32::from(fg[3]);
    let inv = 255 - alpha;
    let mix = |b: u8, f: u8| ((u32::from(f) * alpha + u32::from(b) * inv + 127) / 255) as u8;
    Rgba([mix(bg[0], fg[0]), mix(bg[1], fg[1]), mix(bg[2], fg[2]), 255])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_new_surface_is_background() {
        let surface = Surface::new(16, Color::from_hex(0xfef3c7)).unwrap();
        assert!(surface.image().pixels().all(|p| *p == Rgba([0xfe, 0xf3, 0xc7, 255])));
    }

    #[test]
    fn test_canvas_size_limits() {
        assert!(Surface::new(0, Color::WHITE).is_err());
        assert!(Surface::new(MAX_CANVAS_SIZE + 1, Color::WHITE).is_err());
        assert!(Surface::new(1, Color::WHITE).is_ok());
    }

    #[test]
    fn test_fill_path_samples_pixel_centers() {
        let mut surface = Surface::new(10, Color::WHITE).unwrap();
        surface.fill_path(&Path::Rect(Rect::from_xywh(2.0, 2.0, 3.0, 3.0)), Color::BLACK);
        let black = Rgba([0, 0, 0, 255]);
        assert_eq!(*surface.image().get_pixel(2, 2), black);
        assert_eq!(*surface.image().get_pixel(4, 4), black);
        assert_ne!(*surface.image().get_pixel(5, 4), black);
        assert_ne!(*surface.image().get_pixel(1, 2), black);
    }

    #[test]
    fn test_fill_path_clamps_to_surface() {
        let mut surface = Surface::new(4, Color::WHITE).unwrap();
        surface.fill_path(&Path::Rect(Rect::from_xywh(-5.0, -5.0, 20.0, 20.0)), Color::BLACK);
        assert!(surface.image().pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn test_draw_image_blends_inside_clip() {
        let mut surface = Surface::new(8, Color::WHITE).unwrap();
        let logo = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 128]));
        let clip = Path::Rect(Rect::from_xywh(2.0, 2.0, 2.0, 4.0));
        surface.draw_image(&logo, 2, 2, &clip).unwrap();
        assert_eq!(*surface.image().get_pixel(2, 2), Rgba([255, 127, 127, 255]));
        // Outside the clip, the logo is discarded.
        assert_eq!(*surface.image().get_pixel(4, 2), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_png_encoding_is_deterministic() {
        let mut surface = Surface::new(32, Color::WHITE).unwrap();
        surface.fill_path(&Path::circle(Point::new(16.0, 16.0), 10.0), Color::BLACK);
        let a = surface.encode_png().unwrap();
        let b = surface.encode_png().unwrap();
        assert_eq!(a, b);
        assert_eq!(&a[1..4], b"PNG");
    }
}
