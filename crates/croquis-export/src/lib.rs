//! croquis-export: pure raster serializers (sans-IO).
//!
//! Converts a rendered [`PixelBuffer`] into encoded image bytes.
//! Currently supports PNG (lossless, matching the save-frame feature of
//! the live app). Writing the bytes anywhere is the caller's concern.

pub mod png;

pub use png::{ExportError, latest_to_png, to_png};
