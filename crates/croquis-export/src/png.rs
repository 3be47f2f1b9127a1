//! PNG serialization of rendered frames.
//!
//! Uses the [`image`] crate's PNG encoder on the frame's raw RGBA
//! bytes. Pure functions with no I/O -- they return encoded bytes.

use croquis_filters::PixelBuffer;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

/// Errors that can occur while exporting a frame.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Export was requested before any frame had been rendered.
    #[error("no frame has been rendered yet; nothing to save")]
    EmptyExport,

    /// The PNG encoder rejected the frame.
    #[error("failed to encode PNG: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// Encode a frame as PNG bytes.
///
/// # Errors
///
/// Returns [`ExportError::PngEncode`] if encoding fails.
pub fn to_png(frame: &PixelBuffer) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    let encoder = PngEncoder::new(&mut bytes);
    encoder.write_image(
        frame.data(),
        frame.width(),
        frame.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Encode the most recently displayed frame, if one exists.
///
/// This is the save-frame entry point: the runtime retains the last
/// presented frame and passes it here on demand.
///
/// # Errors
///
/// Returns [`ExportError::EmptyExport`] when `frame` is `None` (nothing
/// has been rendered yet), or [`ExportError::PngEncode`] if encoding
/// fails.
pub fn latest_to_png(frame: Option<&PixelBuffer>) -> Result<Vec<u8>, ExportError> {
    frame.map_or(Err(ExportError::EmptyExport), to_png)
}
