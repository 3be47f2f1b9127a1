//! Grayscale conversion.
//!
//! Every filter starts from a single-channel luminance map computed
//! with the ITU-R BT.601 weights: `0.299*R + 0.587*G + 0.114*B`.
//!
//! Two constructors mirror the two precisions the filters need:
//! [`LuminanceMap::quantized`] truncates each sample to 8-bit range
//! (sketch and cartoon), while [`LuminanceMap::precise`] keeps full
//! floating-point samples for headroom before later clamping (charcoal).

use crate::types::{Dimensions, PixelBuffer};

/// BT.601 red weight.
const WEIGHT_R: f32 = 0.299;
/// BT.601 green weight.
const WEIGHT_G: f32 = 0.587;
/// BT.601 blue weight.
const WEIGHT_B: f32 = 0.114;

/// Weighted luminance of one RGB triple.
fn luma(r: u8, g: u8, b: u8) -> f32 {
    f32::from(r).mul_add(
        WEIGHT_R,
        f32::from(g).mul_add(WEIGHT_G, f32::from(b) * WEIGHT_B),
    )
}

/// One grayscale sample per pixel of a source frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LuminanceMap {
    dimensions: Dimensions,
    samples: Vec<f32>,
}

impl LuminanceMap {
    /// Compute the map with each sample truncated to `[0, 255]`,
    /// matching 8-bit grayscale semantics.
    #[must_use = "returns the luminance map"]
    pub fn quantized(frame: &PixelBuffer) -> Self {
        Self::build(frame, |v| v.clamp(0.0, 255.0).trunc())
    }

    /// Compute the map at full floating-point precision.
    #[must_use = "returns the luminance map"]
    pub fn precise(frame: &PixelBuffer) -> Self {
        Self::build(frame, |v| v)
    }

    fn build(frame: &PixelBuffer, post: impl Fn(f32) -> f32) -> Self {
        let dimensions = frame.dimensions();
        let data = frame.data();
        let mut samples = Vec::with_capacity(dimensions.pixel_count());
        for rgba in data.chunks_exact(crate::types::CHANNELS) {
            samples.push(post(luma(rgba[0], rgba[1], rgba[2])));
        }
        Self {
            dimensions,
            samples,
        }
    }

    /// Dimensions of the source frame.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// All samples, row-major.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// The sample at `(x, y)`.
    #[must_use]
    pub fn sample(&self, x: u32, y: u32) -> f32 {
        self.samples[y as usize * self.dimensions.width as usize + x as usize]
    }
}
