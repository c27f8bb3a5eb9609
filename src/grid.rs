//! The square module matrix every render pass starts from.

use tracing::debug;

use crate::error::{QrStyleError, Result};
use crate::qrcode::{QrCode, QrCodeEcc};

/// Smallest legal side length (version 1).
pub const MIN_GRID_SIZE: usize = 21;
/// Largest legal side length (version 40).
pub const MAX_GRID_SIZE: usize = 177;

/// An N×N grid of dark/light modules, addressed by `(row, col)`.
///
/// Produced once per `(text, level)` pair and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ModuleGrid {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Builds a grid from row-major module colors.
    ///
    /// # Errors
    ///
    /// Returns [`QrStyleError::InvalidGrid`] if `size` is even, outside 21..=177, or does not
    /// match the number of modules.
    pub fn new(size: usize, modules: Vec<bool>) -> Result<Self> {
        validate_size(size)?;
        if modules.len() != size * size {
            return Err(QrStyleError::InvalidGrid(format!(
                "expected {} modules for a {size}x{size} grid, got {}",
                size * size,
                modules.len()
            )));
        }
        Ok(Self { size, modules })
    }

    /// Side length in modules.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the module at `(row, col)` is dark. Out-of-range coordinates are light.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.modules[row * self.size + col]
    }

    /// Counts the dark modules in the grid.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }

    /// Renders the grid as text, two characters per module, with a light border.
    pub fn to_ascii(&self, border: usize) -> String {
        let side = self.size + 2 * border;
        let mut out = String::with_capacity(side * (side * 2 + 1));
        for y in 0..side {
            for x in 0..side {
                let dark = y >= border && x >= border && self.is_dark(y - border, x - border);
                out.push_str(if dark { "██" } else { "  " });
            }
            out.push('\n');
        }
        out
    }
}

impl From<QrCode> for ModuleGrid {
    fn from(qr: QrCode) -> Self {
        let size = qr.size() as usize;
        Self {
            size,
            modules: qr.into_modules(),
        }
    }
}

/// Encodes `text` at the requested error correction level.
///
/// # Errors
///
/// Returns [`QrStyleError::Encoding`] when the text exceeds version 40 capacity at `ecl`.
///
/// # Example
///
/// ```rust
/// use qrstyle::{grid::encode, qrcode::QrCodeEcc};
///
/// let grid = encode("https://example.com", QrCodeEcc::High).unwrap();
/// assert_eq!(grid.size() % 2, 1);
/// ```
pub fn encode(text: &str, ecl: QrCodeEcc) -> Result<ModuleGrid> {
    let qr = QrCode::encode_text(text, ecl)?;
    debug!(
        version = qr.version().value(),
        mask = qr.mask().value(),
        ecl = %ecl,
        "encoded {} bytes",
        text.len()
    );
    Ok(ModuleGrid::from(qr))
}

pub(crate) fn validate_size(size: usize) -> Result<()> {
    if size % 2 == 0 || !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
        return Err(QrStyleError::InvalidGrid(format!(
            "grid side must be odd and within {MIN_GRID_SIZE}..={MAX_GRID_SIZE}, got {size}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outer_ring_dark(grid: &ModuleGrid, top: usize, left: usize) -> bool {
        (0..7).all(|i| {
            grid.is_dark(top, left + i)
                && grid.is_dark(top + 6, left + i)
                && grid.is_dark(top + i, left)
                && grid.is_dark(top + i, left + 6)
        })
    }

    #[test]
    fn test_encoded_grids_are_odd_and_keep_finder_rings() {
        let texts = ["hello", "HELLO WORLD", "0123456789", "https://example.com/qr/abc123"];
        for ecl in [QrCodeEcc::Low, QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
            for text in texts {
                let grid = encode(text, ecl).unwrap();
                let n = grid.size();
                assert_eq!(n % 2, 1);
                assert!(n >= MIN_GRID_SIZE);
                assert!(outer_ring_dark(&grid, 0, 0));
                assert!(outer_ring_dark(&grid, 0, n - 7));
                assert!(outer_ring_dark(&grid, n - 7, 0));
            }
        }
    }

    #[test]
    fn test_oversized_payload_is_an_encoding_error() {
        let text = "z".repeat(4000);
        let err = encode(&text, QrCodeEcc::Low).unwrap_err();
        assert!(matches!(err, QrStyleError::Encoding(_)));
    }

    #[test]
    fn test_invalid_grids_are_rejected() {
        assert!(matches!(ModuleGrid::new(20, vec![false; 400]), Err(QrStyleError::InvalidGrid(_))));
        assert!(matches!(ModuleGrid::new(19, vec![false; 361]), Err(QrStyleError::InvalidGrid(_))));
        assert!(matches!(ModuleGrid::new(21, vec![false; 10]), Err(QrStyleError::InvalidGrid(_))));
        assert!(ModuleGrid::new(41, vec![false; 41 * 41]).is_ok());
    }

    #[test]
    fn test_ascii_preview_dimensions() {
        let grid = encode("hi", QrCodeEcc::Low).unwrap();
        let text = grid.to_ascii(4);
        assert_eq!(text.lines().count(), 21 + 8);
        assert!(text.lines().all(|l| l.chars().count() == (21 + 8) * 2));
    }
}
