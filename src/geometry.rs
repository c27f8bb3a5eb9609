//! Closed fill paths in canvas pixel coordinates.
//!
//! Paths are sampled at pixel centers. Rectangles are half-open (`x0 <= x < x1`), so cells
//! that share an edge never both claim the same pixel and a uniform grid of squares tiles
//! without gaps.

use std::fmt::Write as _;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, `x0 <= x < x1`, `y0 <= y < y1`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x + w,
            y1: y + h,
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x < self.x1 && p.y >= self.y0 && p.y < self.y1
    }

    /// Grows the rectangle by `d` on every side.
    pub fn outset(&self, d: f64) -> Self {
        Self {
            x0: self.x0 - d,
            y0: self.y0 - d,
            x1: self.x1 + d,
            y1: self.y1 + d,
        }
    }

    pub fn union(&self, other: &Rect) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Whether `other` lies entirely within this rectangle.
    pub fn encloses(&self, other: &Rect) -> bool {
        other.x0 >= self.x0 && other.y0 >= self.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }
}

/// Corner radii in the order top-left, top-right, bottom-right, bottom-left.
pub type CornerRadii = [f64; 4];

/// A closed fill description.
#[derive(Clone, PartialEq, Debug)]
pub enum Path {
    Rect(Rect),
    RoundedRect { rect: Rect, radii: CornerRadii },
    Circle { center: Point, radius: f64 },
    Polygon(Vec<Point>),
    Union(Vec<Path>),
    /// Pixels inside the first path and outside the second.
    Difference(Box<Path>, Box<Path>),
}

impl Path {
    pub fn rounded_rect(rect: Rect, radius: f64) -> Self {
        Path::RoundedRect {
            rect,
            radii: [radius; 4],
        }
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Path::Circle { center, radius }
    }

    pub fn ring(outer: Path, inner: Path) -> Self {
        Path::Difference(Box::new(outer), Box::new(inner))
    }

    pub fn contains(&self, p: Point) -> bool {
        match self {
            Path::Rect(rect) => rect.contains(p),
            Path::RoundedRect { rect, radii } => rounded_rect_contains(rect, radii, p),
            Path::Circle { center, radius } => {
                let (dx, dy) = (p.x - center.x, p.y - center.y);
                dx * dx + dy * dy < radius * radius
            }
            Path::Polygon(points) => polygon_contains(points, p),
            Path::Union(paths) => paths.iter().any(|path| path.contains(p)),
            Path::Difference(keep, cut) => keep.contains(p) && !cut.contains(p),
        }
    }

    /// Bounding box, or `None` for an empty union or polygon.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Path::Rect(rect) | Path::RoundedRect { rect, .. } => Some(*rect),
            Path::Circle { center, radius } => Some(Rect {
                x0: center.x - radius,
                y0: center.y - radius,
                x1: center.x + radius,
                y1: center.y + radius,
            }),
            Path::Polygon(points) => {
                let first = points.first()?;
                Some(points.iter().fold(
                    Rect {
                        x0: first.x,
                        y0: first.y,
                        x1: first.x,
                        y1: first.y,
                    },
                    |r, p| Rect {
                        x0: r.x0.min(p.x),
                        y0: r.y0.min(p.y),
                        x1: r.x1.max(p.x),
                        y1: r.y1.max(p.y),
                    },
                ))
            }
            Path::Union(paths) => paths
                .iter()
                .filter_map(Path::bounds)
                .reduce(|a, b| a.union(&b)),
            Path::Difference(keep, _) => keep.bounds(),
        }
    }

    /// SVG path data for this fill. Differences are emitted as separate subpaths and rely on
    /// the `evenodd` fill rule, which holds for the nested rings this crate builds.
    pub fn to_svg_data(&self) -> String {
        let mut d = String::new();
        self.write_svg_data(&mut d);
        d
    }

    fn write_svg_data(&self, d: &mut String) {
        match self {
            Path::Rect(r) => {
                let _ = write!(d, "M{:.2},{:.2}H{:.2}V{:.2}H{:.2}Z", r.x0, r.y0, r.x1, r.y1, r.x0);
            }
            Path::RoundedRect { rect: r, radii } => {
                let [tl, tr, br, bl] = *radii;
                let _ = write!(
                    d,
                    "M{:.2},{:.2}H{:.2}A{tr:.2},{tr:.2} 0 0 1 {:.2},{:.2}V{:.2}A{br:.2},{br:.2} 0 0 1 {:.2},{:.2}H{:.2}A{bl:.2},{bl:.2} 0 0 1 {:.2},{:.2}V{:.2}A{tl:.2},{tl:.2} 0 0 1 {:.2},{:.2}Z",
                    r.x0 + tl, r.y0,
                    r.x1 - tr,
                    r.x1, r.y0 + tr,
                    r.y1 - br,
                    r.x1 - br, r.y1,
                    r.x0 + bl,
                    r.x0, r.y1 - bl,
                    r.y0 + tl,
                    r.x0 + tl, r.y0,
                );
            }
            Path::Circle { center, radius } => {
                let _ = write!(
                    d,
                    "M{:.2},{:.2}a{r:.2},{r:.2} 0 1,0 {:.2},0a{r:.2},{r:.2} 0 1,0 {:.2},0Z",
                    center.x - radius,
                    center.y,
                    2.0 * radius,
                    -2.0 * radius,
                    r = radius,
                );
            }
            Path::Polygon(points) => {
                for (i, p) in points.iter().enumerate() {
                    let _ = write!(d, "{}{:.2},{:.2}", if i == 0 { 'M' } else { 'L' }, p.x, p.y);
                }
                if !points.is_empty() {
                    d.push('Z');
                }
            }
            Path::Union(paths) => paths.iter().for_each(|p| p.write_svg_data(d)),
            Path::Difference(keep, cut) => {
                keep.write_svg_data(d);
                cut.write_svg_data(d);
            }
        }
    }
}

fn rounded_rect_contains(rect: &Rect, radii: &CornerRadii, p: Point) -> bool {
    if !rect.contains(p) {
        return false;
    }
    let [tl, tr, br, bl] = *radii;
    // Each corner: (radius, arc center, whether p is in that corner's square).
    let corners = [
        (tl, Point::new(rect.x0 + tl, rect.y0 + tl), p.x < rect.x0 + tl && p.y < rect.y0 + tl),
        (tr, Point::new(rect.x1 - tr, rect.y0 + tr), p.x > rect.x1 - tr && p.y < rect.y0 + tr),
        (br, Point::new(rect.x1 - br, rect.y1 - br), p.x > rect.x1 - br && p.y > rect.y1 - br),
        (bl, Point::new(rect.x0 + bl, rect.y1 - bl), p.x < rect.x0 + bl && p.y > rect.y1 - bl),
    ];
    corners.iter().all(|&(r, c, inside_square)| {
        if r <= 0.0 || !inside_square {
            return true;
        }
        let (dx, dy) = (p.x - c.x, p.y - c.y);
        dx * dx + dy * dy < r * r
    })
}

// Even-odd crossing test.
fn polygon_contains(points: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for (i, a) in points.iter().enumerate() {
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_is_half_open() {
        let r = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(9.5, 9.5)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
    }

    #[test]
    fn test_rounded_corner_is_cut() {
        let path = Path::rounded_rect(Rect::from_xywh(0.0, 0.0, 10.0, 10.0), 4.0);
        assert!(!path.contains(Point::new(0.5, 0.5)));
        assert!(path.contains(Point::new(5.0, 0.5)));
        assert!(path.contains(Point::new(5.0, 5.0)));
        assert!(!path.contains(Point::new(9.5, 9.5)));
    }

    #[test]
    fn test_polygon_diamond() {
        let diamond = Path::Polygon(vec![
            Point::new(5.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(5.0, 10.0),
            Point::new(0.0, 5.0),
        ]);
        assert!(diamond.contains(Point::new(5.0, 5.0)));
        assert!(!diamond.contains(Point::new(0.5, 0.5)));
        assert_eq!(diamond.bounds(), Some(Rect::from_xywh(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_difference_makes_a_ring() {
        let ring = Path::ring(
            Path::Rect(Rect::from_xywh(0.0, 0.0, 7.0, 7.0)),
            Path::Rect(Rect::from_xywh(1.0, 1.0, 5.0, 5.0)),
        );
        assert!(ring.contains(Point::new(0.5, 3.5)));
        assert!(!ring.contains(Point::new(3.5, 3.5)));
    }

    #[test]
    fn test_svg_data_is_closed() {
        let d = Path::circle(Point::new(5.0, 5.0), 2.0).to_svg_data();
        assert!(d.starts_with("M3.00,5.00"));
        assert!(d.ends_with('Z'));
        assert_eq!(Path::Union(vec![]).bounds(), None);
    }
}
