use std::fmt::Write as _;
use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};

use crate::color::Color;
use crate::error::{RenderError, Result};
use crate::geometry::Path;
use crate::grid::ModuleGrid;
use crate::surface::Canvas;

/*---- Utilities ----*/

/// A [`Canvas`] that records fills as SVG elements.
///
/// Unions are emitted as one element per member so overlapping parts never cancel out;
/// everything else becomes a single `evenodd` path.
#[derive(Debug)]
pub struct SvgCanvas {
    size: u32,
    body: String,
    clips: usize,
}

impl SvgCanvas {
    /// Starts a `size`×`size` document with a `background` fill.
    pub fn new(size: u32, background: Color) -> Self {
        let mut body = String::new();
        let _ = writeln!(body, "\t<rect width=\"100%\" height=\"100%\" fill=\"{background}\"/>");
        Self { size, body, clips: 0 }
    }

    /// Closes the document. The string always uses Unix newlines (\n).
    pub fn finish(self) -> String {
        let mut result = String::new();
        result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
        result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
        result += &format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
            self.size
        );
        result += &self.body;
        result += "</svg>\n";
        result
    }
}

impl Canvas for SvgCanvas {
    fn fill_path(&mut self, path: &Path, color: Color) {
        match path {
            Path::Union(parts) => parts.iter().for_each(|part| self.fill_path(part, color)),
            other => {
                let _ = writeln!(
                    self.body,
                    "\t<path d=\"{}\" fill=\"{color}\" fill-rule=\"evenodd\"/>",
                    other.to_svg_data()
                );
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, x: u32, y: u32, clip: &Path) -> Result<()> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(RenderError::Encode)?;
        self.clips += 1;
        let id = format!("clip{}", self.clips);
        let _ = writeln!(
            self.body,
            "\t<clipPath id=\"{id}\"><path d=\"{}\"/></clipPath>",
            clip.to_svg_data()
        );
        let _ = writeln!(
            self.body,
            "\t<image x=\"{x}\" y=\"{y}\" width=\"{}\" height=\"{}\" clip-path=\"url(#{id})\" xlink:href=\"data:image/png;base64,{}\"/>",
            image.width(),
            image.height(),
            STANDARD.encode(&png)
        );
        Ok(())
    }
}

/// Returns a string of SVG code for an unstyled image of the given grid, with the given
/// number of border modules, one user unit per module.
///
/// # Example
///
/// ```
/// use qrstyle::{grid::encode, helper::to_svg_string, qrcode::QrCodeEcc};
///
/// let grid = encode("HELLO WORLD", QrCodeEcc::Low).unwrap();
/// let svg = to_svg_string(&grid, 4);
/// assert!(svg.contains("viewBox=\"0 0 29 29\""));
/// ```
pub fn to_svg_string(grid: &ModuleGrid, border: usize) -> String {
    let dimension = grid.size() + border * 2;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension
    );
    result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
    result += "\t<path d=\"";
    let mut first = true;
    for y in 0..grid.size() {
        for x in 0..grid.size() {
            if grid.is_dark(y, x) {
                if !first {
                    result += " ";
                }
                first = false;
                let _ = write!(result, "M{},{}h1v1h-1z", x + border, y + border);
            }
        }
    }
    result += "\" fill=\"#000000\"/>\n";
    result += "</svg>\n";
    result
}

/// Prints the given grid to the console with a four-module border.
pub fn print_grid(grid: &ModuleGrid) {
    println!("{}", grid.to_ascii(4));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect};
    use crate::grid::encode;
    use crate::qrcode::QrCodeEcc;

    #[test]
    fn test_to_svg_string() {
        let grid = encode("HELLO WORLD", QrCodeEcc::Low).unwrap();
        let svg = to_svg_string(&grid, 4);

        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(svg.matches("h1v1h-1z").count(), grid.dark_count());
    }

    #[test]
    fn test_svg_canvas_splits_unions() {
        let mut canvas = SvgCanvas::new(20, Color::WHITE);
        canvas.fill_path(
            &Path::Union(vec![
                Path::Rect(Rect::from_xywh(0.0, 0.0, 5.0, 5.0)),
                Path::circle(Point::new(10.0, 10.0), 3.0),
            ]),
            Color::from_hex(0x7c3aed),
        );
        let svg = canvas.finish();
        assert_eq!(svg.matches("fill=\"#7c3aed\"").count(), 2);
        assert!(svg.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn test_svg_canvas_embeds_clipped_image() {
        let mut canvas = SvgCanvas::new(20, Color::WHITE);
        let logo = RgbaImage::new(4, 4);
        let clip = Path::circle(Point::new(10.0, 10.0), 2.0);
        canvas.draw_image(&logo, 8, 8, &clip).unwrap();
        let svg = canvas.finish();
        assert!(svg.contains("<clipPath id=\"clip1\">"));
        assert!(svg.contains("clip-path=\"url(#clip1)\""));
        assert!(svg.contains("data:image/png;base64,"));
    }
}
