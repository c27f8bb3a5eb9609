//! Turns a classified grid plus a style into an ordered list of draw commands.
//!
//! Command order is the paint order: frame, data modules, eyes, logo backing, logo.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::color::Color;
use crate::error::{RenderError, Result};
use crate::geometry::{Path, Point, Rect};
use crate::grid::ModuleGrid;
use crate::region::{self, EyeCorner, RegionKind, RegionMap, EYE_SIZE};
use crate::shape::Neighbors;
use crate::style::{FrameKind, FrameSpec, LogoClip, LogoSpec, Margin, StyleConfig};
use crate::surface::{validate_canvas_size, Canvas};

/// Corner radius of the `rounded` frame in pixels.
const FRAME_CORNER_RADIUS: f64 = 20.0;

/// Pixel placement of the module grid on the canvas.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Layout {
    pub size: u32,
    pub modules: usize,
    pub module_size: f64,
    /// Distance from the canvas edge to the first module, in pixels.
    pub offset: f64,
}

impl Layout {
    /// # Errors
    ///
    /// [`RenderError::CanvasSize`] for a canvas outside `1..=8192`, and
    /// [`RenderError::ModuleTooSmall`] when a module would be narrower than one pixel.
    pub fn compute(size: u32, margin: Margin, modules: usize) -> Result<Self> {
        validate_canvas_size(size)?;
        let n = modules as f64;
        let (module_size, offset) = match margin {
            Margin::Modules(m) => {
                let module_size = f64::from(size) / (n + 2.0 * f64::from(m));
                (module_size, f64::from(m) * module_size)
            }
            Margin::Pixels(px) => {
                let inner = f64::from(size) - 2.0 * f64::from(px);
                (inner / n, f64::from(px))
            }
        };
        if module_size < 1.0 {
            return Err(RenderError::ModuleTooSmall {
                size,
                modules,
                module_size,
            }
            .into());
        }
        Ok(Self {
            size,
            modules,
            module_size,
            offset,
        })
    }

    /// Top-left pixel corner of module `(row, col)`.
    pub fn cell_origin(&self, row: usize, col: usize) -> Point {
        Point::new(
            self.offset + col as f64 * self.module_size,
            self.offset + row as f64 * self.module_size,
        )
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        let o = self.cell_origin(row, col);
        Rect::from_xywh(o.x, o.y, self.module_size, self.module_size)
    }
}

/// One paint operation.
#[derive(Clone, Debug)]
pub enum DrawCommand {
    Fill { path: Path, color: Color },
    /// A logo already resized to its final pixel size.
    Image { image: RgbaImage, x: u32, y: u32, clip: Path },
}

/// The output of [`resolve`].
#[derive(Clone, Debug)]
pub struct Resolved {
    pub layout: Layout,
    pub background: Color,
    pub commands: Vec<DrawCommand>,
    /// Share of data modules under the logo backing, when a logo is present.
    pub occlusion: Option<f64>,
}

impl Resolved {
    /// Replays the commands onto `canvas` in order.
    pub fn execute<C: Canvas>(&self, canvas: &mut C) -> Result<()> {
        for command in &self.commands {
            match command {
                DrawCommand::Fill { path, color } => canvas.fill_path(path, *color),
                DrawCommand::Image { image, x, y, clip } => canvas.draw_image(image, *x, *y, clip)?,
            }
        }
        Ok(())
    }
}

/// Builds the draw commands for `grid` under `style`. `logo` must be the decoded form of
/// `style.logo()`.
///
/// # Errors
///
/// Fails with a [`RenderError`] when the canvas cannot hold the grid or the logo.
pub fn resolve(grid: &ModuleGrid, style: &StyleConfig, logo: Option<&DynamicImage>) -> Result<Resolved> {
    let layout = Layout::compute(style.size(), style.margin(), grid.size())?;
    let regions = region::classify(grid.size())?;
    let colors = style.colors();
    let mut commands = Vec::new();

    if let Some(path) = frame_path(style.frame(), f64::from(layout.size)) {
        commands.push(DrawCommand::Fill {
            path,
            color: colors.frame_color,
        });
    }

    let before = commands.len();
    let n = grid.size();
    let dark_data = |row: usize, col: usize| {
        grid.is_dark(row, col) && regions.kind(row, col) == RegionKind::DataModule
    };
    for row in 0..n {
        for col in 0..n {
            if !dark_data(row, col) {
                continue;
            }
            let neighbors = Neighbors {
                top: row > 0 && dark_data(row - 1, col),
                right: dark_data(row, col + 1),
                bottom: dark_data(row + 1, col),
                left: col > 0 && dark_data(row, col - 1),
            };
            commands.push(DrawCommand::Fill {
                path: style
                    .body_shape()
                    .path(layout.cell_origin(row, col), layout.module_size, neighbors),
                color: colors.foreground,
            });
        }
    }
    debug!(modules = commands.len() - before, "resolved data modules");

    for corner in EyeCorner::ALL {
        commands.extend(eye_commands(corner, &layout, style));
    }

    let mut occlusion = None;
    if let (Some(spec), Some(image)) = (style.logo(), logo) {
        let (backing, x, y, clip) = logo_geometry(spec, layout.size)?;
        occlusion = Some(occluded_fraction(&backing, &layout, &regions));
        commands.push(DrawCommand::Fill {
            path: backing,
            color: colors.background,
        });
        let resized = imageops::resize(image, spec.size_px, spec.size_px, FilterType::Lanczos3);
        commands.push(DrawCommand::Image {
            image: resized,
            x,
            y,
            clip,
        });
    }

    Ok(Resolved {
        layout,
        background: colors.background,
        commands,
        occlusion,
    })
}

// Outer 7-module shape, 5-module background inset in the same shape, 3-module ball.
// The encoded finder bits are not consulted.
fn eye_commands(corner: EyeCorner, layout: &Layout, style: &StyleConfig) -> [DrawCommand; 3] {
    let (row, col) = corner.origin(layout.modules);
    let origin = layout.cell_origin(row, col);
    let m = layout.module_size;
    let layer = |inset: f64| Point::new(origin.x + inset * m, origin.y + inset * m);
    let eye_size = EYE_SIZE as f64;
    let colors = style.colors();
    [
        DrawCommand::Fill {
            path: style.eye_frame_shape().eye_path(layer(0.0), eye_size * m),
            color: colors.eye_color,
        },
        DrawCommand::Fill {
            path: style.eye_frame_shape().eye_path(layer(1.0), (eye_size - 2.0) * m),
            color: colors.background,
        },
        DrawCommand::Fill {
            path: style.eye_ball_shape().eye_path(layer(2.0), (eye_size - 4.0) * m),
            color: colors.eye_color,
        },
    ]
}

fn frame_path(frame: FrameSpec, size: f64) -> Option<Path> {
    let w = f64::from(frame.width).min(size / 2.0);
    let canvas = Rect::from_xywh(0.0, 0.0, size, size);
    let inner = canvas.outset(-w);
    let center = canvas.center();
    match frame.kind {
        FrameKind::None => None,
        FrameKind::Square => Some(Path::ring(Path::Rect(canvas), Path::Rect(inner))),
        FrameKind::Rounded => {
            let outer_r = FRAME_CORNER_RADIUS + w / 2.0;
            let inner_r = (FRAME_CORNER_RADIUS - w / 2.0).max(0.0);
            Some(Path::ring(
                Path::rounded_rect(canvas, outer_r),
                Path::rounded_rect(inner, inner_r),
            ))
        }
        FrameKind::Circle => Some(Path::ring(
            Path::circle(center, size / 2.0),
            Path::circle(center, size / 2.0 - w),
        )),
        FrameKind::Double => {
            let t = (w / 3.0).max(1.0);
            let ring = |at: f64| {
                let outer = canvas.outset(-at);
                Path::ring(Path::Rect(outer), Path::Rect(outer.outset(-t)))
            };
            Some(Path::Union(vec![ring(0.0), ring(2.0 * t)]))
        }
        FrameKind::Brackets => Some(Path::Union(brackets(size, w))),
    }
}

// Four L-shaped corner marks, each arm a fifth of the side long.
fn brackets(size: f64, w: f64) -> Vec<Path> {
    let len = (size / 5.0).max(w);
    let l_shape = |sx: f64, sy: f64| {
        // Corner at (cx, cy), arms pointing inward along sx / sy.
        let (cx, cy) = (if sx > 0.0 { 0.0 } else { size }, if sy > 0.0 { 0.0 } else { size });
        let p = |dx: f64, dy: f64| Point::new(cx + sx * dx, cy + sy * dy);
        Path::Polygon(vec![
            p(0.0, 0.0),
            p(len, 0.0),
            p(len, w),
            p(w, w),
            p(w, len),
            p(0.0, len),
        ])
    };
    vec![
        l_shape(1.0, 1.0),
        l_shape(-1.0, 1.0),
        l_shape(-1.0, -1.0),
        l_shape(1.0, -1.0),
    ]
}

/// Backing path, logo position and clip path for a centered logo.
fn logo_geometry(spec: &LogoSpec, size: u32) -> Result<(Path, u32, u32, Path)> {
    if spec.size_px == 0 || spec.size_px > size {
        return Err(RenderError::LogoSize {
            logo: spec.size_px,
            size,
        }
        .into());
    }
    let offset = (size - spec.size_px) / 2;
    let rect = Rect::from_xywh(
        f64::from(offset),
        f64::from(offset),
        f64::from(spec.size_px),
        f64::from(spec.size_px),
    );
    let pad = f64::from(spec.padding);
    let half = rect.width() / 2.0;
    let (backing, clip) = match spec.clip {
        LogoClip::Circle => (
            Path::circle(rect.center(), half + pad),
            Path::circle(rect.center(), half),
        ),
        LogoClip::Square => (Path::Rect(rect.outset(pad)), Path::Rect(rect)),
        LogoClip::RoundedSquare => {
            let r = rect.width() * 0.2;
            (
                Path::rounded_rect(rect.outset(pad), r + pad),
                Path::rounded_rect(rect, r),
            )
        }
    };
    Ok((backing, offset, offset, clip))
}

/// Share of data modules whose center falls under `backing`.
fn occluded_fraction(backing: &Path, layout: &Layout, regions: &RegionMap) -> f64 {
    let n = regions.size();
    let mut data = 0usize;
    let mut covered = 0usize;
    for row in 0..n {
        for col in 0..n {
            if regions.kind(row, col) != RegionKind::DataModule {
                continue;
            }
            data += 1;
            if backing.contains(layout.cell_rect(row, col).center()) {
                covered += 1;
            }
        }
    }
    if data == 0 {
        0.0
    } else {
        covered as f64 / data as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QrStyleError;
    use crate::grid::encode;
    use crate::qrcode::QrCodeEcc;

    #[test]
    fn test_layout_with_module_margin() {
        let layout = Layout::compute(370, Margin::Modules(2), 33).unwrap();
        assert_eq!(layout.module_size, 10.0);
        assert_eq!(layout.offset, 20.0);
        assert_eq!(layout.cell_origin(1, 2), Point::new(40.0, 30.0));
    }

    #[test]
    fn test_layout_with_pixel_margin() {
        let layout = Layout::compute(300, Margin::Pixels(40), 22 + 1).unwrap();
        assert_eq!(layout.offset, 40.0);
        assert!((layout.module_size - 220.0 / 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_module_too_small() {
        let err = Layout::compute(10, Margin::Modules(2), 41).unwrap_err();
        assert!(matches!(err, QrStyleError::Render(RenderError::ModuleTooSmall { .. })));
        let err = Layout::compute(100, Margin::Pixels(60), 21).unwrap_err();
        assert!(matches!(err, QrStyleError::Render(RenderError::ModuleTooSmall { .. })));
        let err = Layout::compute(9000, Margin::Modules(2), 21).unwrap_err();
        assert!(matches!(err, QrStyleError::Render(RenderError::CanvasSize(9000))));
    }

    #[test]
    fn test_commands_follow_paint_order() {
        let grid = encode("hello", QrCodeEcc::High).unwrap();
        let style = StyleConfig::default().with_frame(FrameSpec::new(FrameKind::Square));
        let resolved = resolve(&grid, &style, None).unwrap();
        let colors: Vec<Color> = resolved
            .commands
            .iter()
            .map(|c| match c {
                DrawCommand::Fill { color, .. } => *color,
                DrawCommand::Image { .. } => unreachable!("no logo configured"),
            })
            .collect();
        let frame_color = style.colors().frame_color;
        assert_eq!(colors[0], frame_color);
        // Nine eye layers close the list.
        assert_eq!(colors.len() - 10, dark_data_count(&grid));
        assert_eq!(colors[colors.len() - 8], style.colors().background);
        assert!(resolved.occlusion.is_none());
    }

    fn dark_data_count(grid: &ModuleGrid) -> usize {
        let n = grid.size();
        (0..n * n)
            .filter(|i| {
                let (row, col) = (i / n, i % n);
                grid.is_dark(row, col) && !region::is_eye_region(row, col, n)
            })
            .count()
    }

    #[test]
    fn test_logo_geometry_is_centered() {
        let spec = LogoSpec::new(Vec::new(), 40);
        let (backing, x, y, clip) = logo_geometry(&spec, 300).unwrap();
        assert_eq!((x, y), (130, 130));
        assert_eq!(clip.bounds(), Some(Rect::from_xywh(130.0, 130.0, 40.0, 40.0)));
        assert_eq!(backing.bounds(), Some(Rect::from_xywh(124.0, 124.0, 52.0, 52.0)));
        assert!(matches!(
            logo_geometry(&LogoSpec::new(Vec::new(), 301), 300),
            Err(QrStyleError::Render(RenderError::LogoSize { .. }))
        ));
    }

    #[test]
    fn test_occlusion_grows_with_logo() {
        let layout = Layout::compute(300, Margin::Modules(2), 25).unwrap();
        let regions = region::classify(25).unwrap();
        let small = logo_geometry(&LogoSpec::new(Vec::new(), 30), 300).unwrap().0;
        let large = logo_geometry(&LogoSpec::new(Vec::new(), 120), 300).unwrap().0;
        let a = occluded_fraction(&small, &layout, &regions);
        let b = occluded_fraction(&large, &layout, &regions);
        assert!(a > 0.0 && a < b && b < 1.0);
    }

    #[test]
    fn test_frames() {
        assert!(frame_path(FrameSpec::NONE, 300.0).is_none());
        for kind in [
            FrameKind::Square,
            FrameKind::Rounded,
            FrameKind::Circle,
            FrameKind::Double,
            FrameKind::Brackets,
        ] {
            let path = frame_path(FrameSpec::new(kind), 300.0).unwrap();
            assert!(!path.contains(Point::new(150.0, 150.0)), "{kind}");
            assert!(path.contains(Point::new(150.0, 0.5)) || kind == FrameKind::Brackets, "{kind}");
        }
        let brackets = frame_path(FrameSpec::new(FrameKind::Brackets), 300.0).unwrap();
        assert!(brackets.contains(Point::new(0.5, 0.5)));
        assert!(brackets.contains(Point::new(299.5, 299.5)));
        assert!(!brackets.contains(Point::new(150.0, 0.5)));
    }
}
