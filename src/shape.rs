//! Module and eye drawing primitives.
//!
//! Every [`ShapeSpec`] turns a cell `(origin, size)` into a closed [`Path`]. Most shapes stay
//! inscribed in their cell; the connecting shapes look at which orthogonal neighbors are dark
//! data modules, and `liquid` is the only one that reaches past its own cell.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QrStyleError;
use crate::geometry::{Path, Point, Rect};

/// Corner radius of `rounded-square` data modules, as a fraction of the cell.
const BODY_CORNER: f64 = 0.2;
/// Corner radius of `rounded-square` eye layers, as a fraction of the layer.
const EYE_CORNER: f64 = 0.15;

/// Which orthogonal neighbors of a data module are dark data modules.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Neighbors {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Neighbors {
    pub const NONE: Neighbors = Neighbors {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };
}

/// The closed catalog of drawing primitives.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeSpec {
    Square,
    Circle,
    RoundedSquare,
    Diamond,
    Star,
    Dot,
    Cross,
    Plus,
    Heart,
    Hexagon,
    Triangle,
    Classy,
    Liquid,
    VerticalLine,
    HorizontalLine,
}

impl ShapeSpec {
    pub const ALL: [ShapeSpec; 15] = [
        ShapeSpec::Square,
        ShapeSpec::Circle,
        ShapeSpec::RoundedSquare,
        ShapeSpec::Diamond,
        ShapeSpec::Star,
        ShapeSpec::Dot,
        ShapeSpec::Cross,
        ShapeSpec::Plus,
        ShapeSpec::Heart,
        ShapeSpec::Hexagon,
        ShapeSpec::Triangle,
        ShapeSpec::Classy,
        ShapeSpec::Liquid,
        ShapeSpec::VerticalLine,
        ShapeSpec::HorizontalLine,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeSpec::Square => "square",
            ShapeSpec::Circle => "circle",
            ShapeSpec::RoundedSquare => "rounded-square",
            ShapeSpec::Diamond => "diamond",
            ShapeSpec::Star => "star",
            ShapeSpec::Dot => "dot",
            ShapeSpec::Cross => "cross",
            ShapeSpec::Plus => "plus",
            ShapeSpec::Heart => "heart",
            ShapeSpec::Hexagon => "hexagon",
            ShapeSpec::Triangle => "triangle",
            ShapeSpec::Classy => "classy",
            ShapeSpec::Liquid => "liquid",
            ShapeSpec::VerticalLine => "vertical-line",
            ShapeSpec::HorizontalLine => "horizontal-line",
        }
    }

    /// Whether the drawing depends on the cell's dark neighbors.
    pub fn is_connecting(self) -> bool {
        matches!(
            self,
            ShapeSpec::Classy | ShapeSpec::Liquid | ShapeSpec::VerticalLine | ShapeSpec::HorizontalLine
        )
    }

    /// Path for a data module whose top-left corner is `origin`.
    pub fn path(self, origin: Point, size: f64, neighbors: Neighbors) -> Path {
        let cell = Rect::from_xywh(origin.x, origin.y, size, size);
        match self {
            ShapeSpec::Square => Path::Rect(cell),
            ShapeSpec::Circle => Path::circle(cell.center(), size / 2.0),
            ShapeSpec::RoundedSquare => Path::rounded_rect(cell, size * BODY_CORNER),
            ShapeSpec::Diamond => diamond(&cell),
            ShapeSpec::Star => star(&cell),
            ShapeSpec::Dot => Path::circle(cell.center(), size * 0.35),
            ShapeSpec::Cross => cross(&cell),
            ShapeSpec::Plus => plus(&cell),
            ShapeSpec::Heart => heart(&cell),
            ShapeSpec::Hexagon => regular_polygon(&cell, 6),
            ShapeSpec::Triangle => Path::Polygon(vec![
                Point::new(cell.x0 + size / 2.0, cell.y0),
                Point::new(cell.x1, cell.y1),
                Point::new(cell.x0, cell.y1),
            ]),
            ShapeSpec::Classy => classy(cell, neighbors),
            ShapeSpec::Liquid => liquid(&cell, neighbors),
            ShapeSpec::VerticalLine => vertical_line(&cell, neighbors),
            ShapeSpec::HorizontalLine => horizontal_line(&cell, neighbors),
        }
    }

    /// Path for one layer of a finder eye, covering the square at `origin` with side `size`.
    ///
    /// Eye layers have no neighbors, so the connecting shapes fall back to their
    /// isolated-cell form, and `liquid` becomes a fully rounded square.
    pub fn eye_path(self, origin: Point, size: f64) -> Path {
        let square = Rect::from_xywh(origin.x, origin.y, size, size);
        match self {
            ShapeSpec::RoundedSquare => Path::rounded_rect(square, size * EYE_CORNER),
            ShapeSpec::Liquid => Path::rounded_rect(square, size * 0.35),
            ShapeSpec::VerticalLine | ShapeSpec::HorizontalLine => {
                Path::rounded_rect(square, size * 0.25)
            }
            other => other.path(origin, size, Neighbors::NONE),
        }
    }
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeSpec {
    type Err = QrStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        // "rounded" is accepted as shorthand for the rounded square.
        if s == "rounded" {
            return Ok(ShapeSpec::RoundedSquare);
        }
        ShapeSpec::ALL
            .into_iter()
            .find(|shape| shape.as_str() == s)
            .ok_or_else(|| QrStyleError::Parse(format!("unknown shape `{s}`")))
    }
}

fn diamond(cell: &Rect) -> Path {
    let c = cell.center();
    Path::Polygon(vec![
        Point::new(c.x, cell.y0),
        Point::new(cell.x1, c.y),
        Point::new(c.x, cell.y1),
        Point::new(cell.x0, c.y),
    ])
}

// Five-pointed star, first point straight up.
fn star(cell: &Rect) -> Path {
    let c = cell.center();
    let outer = cell.width() / 2.0;
    let inner = outer * 0.4;
    let points = (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = -PI / 2.0 + f64::from(i) * PI / 5.0;
            Point::new(c.x + r * angle.cos(), c.y + r * angle.sin())
        })
        .collect();
    Path::Polygon(points)
}

fn regular_polygon(cell: &Rect, sides: u32) -> Path {
    let c = cell.center();
    let r = cell.width() / 2.0;
    let points = (0..sides)
        .map(|i| {
            let angle = -PI / 2.0 + f64::from(i) * 2.0 * PI / f64::from(sides);
            Point::new(c.x + r * angle.cos(), c.y + r * angle.sin())
        })
        .collect();
    Path::Polygon(points)
}

// Diagonal X made of two bars.
fn cross(cell: &Rect) -> Path {
    let a = cell.width() * 0.2;
    let (x0, y0, x1, y1) = (cell.x0, cell.y0, cell.x1, cell.y1);
    Path::Union(vec![
        Path::Polygon(vec![
            Point::new(x0 + a, y0),
            Point::new(x1, y1 - a),
            Point::new(x1 - a, y1),
            Point::new(x0, y0 + a),
        ]),
        Path::Polygon(vec![
            Point::new(x1 - a, y0),
            Point::new(x1, y0 + a),
            Point::new(x0 + a, y1),
            Point::new(x0, y1 - a),
        ]),
    ])
}

fn plus(cell: &Rect) -> Path {
    let s = cell.width();
    let bar = s / 3.0;
    Path::Union(vec![
        Path::Rect(Rect::from_xywh(cell.x0, cell.y0 + bar, s, bar)),
        Path::Rect(Rect::from_xywh(cell.x0 + bar, cell.y0, bar, s)),
    ])
}

// Two lobes over a downward point.
fn heart(cell: &Rect) -> Path {
    let s = cell.width();
    let at = |fx: f64, fy: f64| Point::new(cell.x0 + fx * s, cell.y0 + fy * s);
    let lobe = 0.23 * s;
    Path::Union(vec![
        Path::circle(at(0.28, 0.35), lobe),
        Path::circle(at(0.72, 0.35), lobe),
        Path::Polygon(vec![at(0.06, 0.42), at(0.94, 0.42), at(0.5, 0.95)]),
    ])
}

// Square with the outward-facing corners rounded on the top-left and bottom-right.
fn classy(cell: Rect, n: Neighbors) -> Path {
    let r = cell.width() / 2.0;
    let tl = if !n.top && !n.left { r } else { 0.0 };
    let br = if !n.bottom && !n.right { r } else { 0.0 };
    Path::RoundedRect {
        rect: cell,
        radii: [tl, 0.0, br, 0.0],
    }
}

// A blob per module, bridged right and down into dark neighbors so runs read as one body.
fn liquid(cell: &Rect, n: Neighbors) -> Path {
    let s = cell.width();
    let c = cell.center();
    let mut parts = vec![Path::circle(c, s / 2.0)];
    if n.right {
        parts.push(Path::Rect(Rect::from_xywh(c.x, cell.y0, s, s)));
    }
    if n.bottom {
        parts.push(Path::Rect(Rect::from_xywh(cell.x0, c.y, s, s)));
    }
    match parts.len() {
        1 => parts.remove(0),
        _ => Path::Union(parts),
    }
}

fn vertical_line(cell: &Rect, n: Neighbors) -> Path {
    let s = cell.width();
    let (inset, r) = (s * 0.15, s * 0.35);
    let rect = Rect {
        x0: cell.x0 + inset,
        x1: cell.x1 - inset,
        ..*cell
    };
    let top = if n.top { 0.0 } else { r };
    let bottom = if n.bottom { 0.0 } else { r };
    Path::RoundedRect {
        rect,
        radii: [top, top, bottom, bottom],
    }
}

fn horizontal_line(cell: &Rect, n: Neighbors) -> Path {
    let s = cell.width();
    let (inset, r) = (s * 0.15, s * 0.35);
    let rect = Rect {
        y0: cell.y0 + inset,
        y1: cell.y1 - inset,
        ..*cell
    };
    let left = if n.left { 0.0 } else { r };
    let right = if n.right { 0.0 } else { r };
    Path::RoundedRect {
        rect,
        radii: [left, right, right, left],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Point = Point::new(10.0, 20.0);
    const SIZE: f64 = 10.0;

    fn cell() -> Rect {
        Rect::from_xywh(ORIGIN.x, ORIGIN.y, SIZE, SIZE)
    }

    #[test]
    fn test_non_liquid_shapes_stay_inscribed() {
        let all = Neighbors {
            top: true,
            right: true,
            bottom: true,
            left: true,
        };
        for shape in ShapeSpec::ALL.into_iter().filter(|s| *s != ShapeSpec::Liquid) {
            for n in [Neighbors::NONE, all] {
                let bounds = shape.path(ORIGIN, SIZE, n).bounds().unwrap();
                assert!(cell().outset(1e-9).encloses(&bounds), "{shape} escapes its cell");
            }
        }
    }

    #[test]
    fn test_liquid_bridges_into_dark_neighbors() {
        let alone = ShapeSpec::Liquid.path(ORIGIN, SIZE, Neighbors::NONE);
        assert!(cell().encloses(&alone.bounds().unwrap()));
        let joined = ShapeSpec::Liquid.path(
            ORIGIN,
            SIZE,
            Neighbors {
                right: true,
                ..Neighbors::NONE
            },
        );
        // The gap between this blob and the next one is filled.
        assert!(joined.contains(Point::new(ORIGIN.x + SIZE + 0.5, ORIGIN.y + 0.5)));
        assert!(!alone.contains(Point::new(ORIGIN.x + SIZE - 0.5, ORIGIN.y + 0.5)));
    }

    #[test]
    fn test_square_fills_cell_edge_to_edge() {
        let path = ShapeSpec::Square.path(ORIGIN, SIZE, Neighbors::NONE);
        assert!(path.contains(Point::new(10.5, 20.5)));
        assert!(path.contains(Point::new(19.5, 29.5)));
        assert!(!path.contains(Point::new(20.5, 25.0)));
    }

    #[test]
    fn test_vertical_line_joins_vertically() {
        let capped = ShapeSpec::VerticalLine.path(ORIGIN, SIZE, Neighbors::NONE);
        let open = ShapeSpec::VerticalLine.path(
            ORIGIN,
            SIZE,
            Neighbors {
                top: true,
                ..Neighbors::NONE
            },
        );
        let near_top_corner = Point::new(ORIGIN.x + 1.6, ORIGIN.y + 0.2);
        assert!(!capped.contains(near_top_corner));
        assert!(open.contains(near_top_corner));
    }

    #[test]
    fn test_parse_round_trips() {
        for shape in ShapeSpec::ALL {
            assert_eq!(shape.as_str().parse::<ShapeSpec>().unwrap(), shape);
            let json = serde_json::to_string(&shape).unwrap();
            assert_eq!(json, format!("\"{shape}\""));
        }
        assert_eq!("Rounded".parse::<ShapeSpec>().unwrap(), ShapeSpec::RoundedSquare);
        assert!("blob".parse::<ShapeSpec>().is_err());
    }

    #[test]
    fn test_eye_paths_cover_center() {
        for shape in ShapeSpec::ALL {
            let path = shape.eye_path(Point::new(0.0, 0.0), 30.0);
            assert!(path.contains(Point::new(15.0, 15.0)), "{shape}");
        }
    }
}
