//! Finder-eye versus data-module partitioning.
//!
//! A QR symbol carries finder patterns in three corners only: top-left, top-right and
//! bottom-left. Each is a 7×7 footprint (dark ring, light ring, dark 3×3 core) bordered on its
//! inward sides by a one-module light separator. Everything else is treated as data.

use crate::error::Result;
use crate::grid::validate_size;

/// Side length of a finder footprint in modules.
pub const EYE_SIZE: usize = 7;

/// What a module belongs to, as far as styling is concerned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RegionKind {
    DataModule,
    /// Outer dark ring of a finder pattern.
    EyeFrame,
    /// Dark 3×3 core of a finder pattern.
    EyeBall,
    /// Light ring inside the frame, plus the separator around the footprint.
    EyeClearance,
}

impl RegionKind {
    pub fn is_eye(self) -> bool {
        !matches!(self, RegionKind::DataModule)
    }
}

/// The three corners that hold a finder pattern.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EyeCorner {
    TopLeft,
    TopRight,
    BottomLeft,
}

impl EyeCorner {
    pub const ALL: [EyeCorner; 3] = [EyeCorner::TopLeft, EyeCorner::TopRight, EyeCorner::BottomLeft];

    /// `(row, col)` of the footprint's top-left module in an `n`-sized grid.
    pub fn origin(self, n: usize) -> (usize, usize) {
        match self {
            EyeCorner::TopLeft => (0, 0),
            EyeCorner::TopRight => (0, n - EYE_SIZE),
            EyeCorner::BottomLeft => (n - EYE_SIZE, 0),
        }
    }

    // Local coordinates inside the footprint-plus-separator zone, where local 0..=6 is the
    // footprint and local 7 is the separator.
    fn local(self, row: usize, col: usize, n: usize) -> Option<(usize, usize)> {
        let zone = EYE_SIZE + 1;
        match self {
            EyeCorner::TopLeft => (row < zone && col < zone).then_some((row, col)),
            EyeCorner::TopRight => {
                (row < zone && col + zone >= n).then(|| (row, n - 1 - col))
            }
            EyeCorner::BottomLeft => {
                (row + zone >= n && col < zone).then(|| (n - 1 - row, col))
            }
        }
    }
}

/// Classifies a single module. Coordinates are assumed to lie inside an `n`-sized grid.
///
/// TopRight and BottomLeft zones are mirrored into top-left local coordinates, which leaves
/// the ring arithmetic identical for all three eyes.
pub fn region_of(row: usize, col: usize, n: usize) -> RegionKind {
    let Some((lr, lc)) = EyeCorner::ALL.iter().find_map(|corner| corner.local(row, col, n)) else {
        return RegionKind::DataModule;
    };
    if lr == EYE_SIZE || lc == EYE_SIZE {
        return RegionKind::EyeClearance;
    }
    // Chebyshev distance from the eye center (3, 3).
    let dist = lr.abs_diff(3).max(lc.abs_diff(3));
    match dist {
        0 | 1 => RegionKind::EyeBall,
        3 => RegionKind::EyeFrame,
        _ => RegionKind::EyeClearance,
    }
}

/// Whether `(row, col)` lies in an eye footprint or its separator.
pub fn is_eye_region(row: usize, col: usize, n: usize) -> bool {
    region_of(row, col, n).is_eye()
}

/// Which eye, if any, owns `(row, col)`.
pub fn eye_corner_of(row: usize, col: usize, n: usize) -> Option<EyeCorner> {
    EyeCorner::ALL.into_iter().find(|corner| corner.local(row, col, n).is_some())
}

/// Per-module classification of an `n`×`n` grid.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RegionMap {
    size: usize,
    kinds: Vec<RegionKind>,
}

impl RegionMap {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn kind(&self, row: usize, col: usize) -> RegionKind {
        self.kinds[row * self.size + col]
    }

    /// Counts modules of one kind.
    pub fn count(&self, kind: RegionKind) -> usize {
        self.kinds.iter().filter(|&&k| k == kind).count()
    }
}

/// Classifies every module of an `n`×`n` grid.
///
/// # Errors
///
/// Returns [`crate::QrStyleError::InvalidGrid`] if `n` is even or outside 21..=177.
pub fn classify(n: usize) -> Result<RegionMap> {
    validate_size(n)?;
    let kinds = (0..n * n).map(|i| region_of(i / n, i % n, n)).collect();
    Ok(RegionMap { size: n, kinds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QrStyleError;

    #[test]
    fn test_bottom_right_is_never_an_eye() {
        for n in (21..=177).step_by(4) {
            let map = classify(n).unwrap();
            for row in n - 9..n {
                for col in n - 9..n {
                    assert_eq!(map.kind(row, col), RegionKind::DataModule, "n={n} ({row},{col})");
                }
            }
        }
    }

    #[test]
    fn test_exactly_three_footprints() {
        for n in [21, 25, 41, 101, 177] {
            let map = classify(n).unwrap();
            // Per eye: 24 frame cells, 9 ball cells, 16 clearance cells plus a 15-cell separator.
            assert_eq!(map.count(RegionKind::EyeFrame), 3 * 24);
            assert_eq!(map.count(RegionKind::EyeBall), 3 * 9);
            assert_eq!(map.count(RegionKind::EyeClearance), 3 * (16 + 15));
        }
    }

    #[test]
    fn test_local_rings() {
        let n = 25;
        assert_eq!(region_of(0, 0, n), RegionKind::EyeFrame);
        assert_eq!(region_of(6, 3, n), RegionKind::EyeFrame);
        assert_eq!(region_of(1, 1, n), RegionKind::EyeClearance);
        assert_eq!(region_of(3, 5, n), RegionKind::EyeClearance);
        assert_eq!(region_of(2, 2, n), RegionKind::EyeBall);
        assert_eq!(region_of(4, 4, n), RegionKind::EyeBall);
        // Separator.
        assert_eq!(region_of(7, 0, n), RegionKind::EyeClearance);
        assert_eq!(region_of(0, n - 8, n), RegionKind::EyeClearance);
        assert_eq!(region_of(n - 8, 7, n), RegionKind::EyeClearance);
        // Format information strip stays data.
        assert_eq!(region_of(8, 0, n), RegionKind::DataModule);
        assert_eq!(region_of(0, 8, n), RegionKind::DataModule);
        assert_eq!(region_of(8, n - 1, n), RegionKind::DataModule);
    }

    #[test]
    fn test_mirrored_corners() {
        let n = 29;
        assert_eq!(region_of(0, n - 1, n), RegionKind::EyeFrame);
        assert_eq!(region_of(3, n - 4, n), RegionKind::EyeBall);
        assert_eq!(region_of(n - 1, 0, n), RegionKind::EyeFrame);
        assert_eq!(region_of(n - 3, 2, n), RegionKind::EyeBall);
        assert_eq!(eye_corner_of(0, n - 1, n), Some(EyeCorner::TopRight));
        assert_eq!(eye_corner_of(n - 1, n - 1, n), None);
        assert_eq!(EyeCorner::BottomLeft.origin(n), (n - 7, 0));
    }

    #[test]
    fn test_invalid_size() {
        assert!(matches!(classify(22), Err(QrStyleError::InvalidGrid(_))));
        assert!(matches!(classify(19), Err(QrStyleError::InvalidGrid(_))));
    }
}
