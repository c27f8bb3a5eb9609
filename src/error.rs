use thiserror::Error;

use crate::qrcode::DataTooLong;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, QrStyleError>;

/// Everything that can go wrong between a payload string and a finished image.
///
/// None of these are retried internally; the same inputs always fail the same way.
#[derive(Debug, Error)]
pub enum QrStyleError {
    /// The payload does not fit the chosen error correction level at version 40.
    #[error("QR encoding error: {0}")]
    Encoding(#[from] DataTooLong),
    /// A module grid with an impossible shape was handed to the renderer.
    #[error("Invalid module grid: {0}")]
    InvalidGrid(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The logo bytes could not be decoded as an image.
    #[error("Failed to load logo image: {0}")]
    AssetLoad(#[source] image::ImageError),
    #[error("Invalid value: {0}")]
    Parse(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Canvas sizing and surface failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Canvas size {size}px is too small for a {modules}x{modules} grid (module size {module_size:.3}px)")]
    ModuleTooSmall {
        size: u32,
        modules: usize,
        module_size: f64,
    },
    #[error("Canvas size {0}px is outside the supported range 1..={max}", max = crate::surface::MAX_CANVAS_SIZE)]
    CanvasSize(u32),
    #[error("Logo size {logo}px does not fit a {size}px canvas")]
    LogoSize { logo: u32, size: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(#[source] image::ImageError),
}
