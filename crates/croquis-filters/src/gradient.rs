//! Sobel gradient magnitude computation.
//!
//! Convolves a [`LuminanceMap`] with the fixed 3x3 Sobel kernel pair
//! and stores `sqrt(gx^2 + gy^2)` per pixel. Only interior pixels are
//! computed: the 3x3 window needs a full neighborhood, so the outermost
//! ring is left at magnitude 0. Frames narrower or shorter than 3
//! pixels have no interior and produce an all-zero map.

use crate::luminance::LuminanceMap;
use crate::types::Dimensions;

/// Horizontal Sobel kernel, row-major, center aligned to the pixel.
pub const SOBEL_X: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];

/// Vertical Sobel kernel, row-major, center aligned to the pixel.
pub const SOBEL_Y: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];

/// Gradient magnitude per pixel of a source frame.
///
/// Deterministic pure function of its input map.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientMap {
    dimensions: Dimensions,
    magnitudes: Vec<f32>,
}

impl GradientMap {
    /// Convolve `luminance` with the Sobel kernels.
    #[must_use = "returns the gradient magnitude map"]
    pub fn sobel(luminance: &LuminanceMap) -> Self {
        let dimensions = luminance.dimensions();
        let width = dimensions.width as usize;
        let samples = luminance.samples();
        let mut magnitudes = vec![0.0; dimensions.pixel_count()];

        for y in 1..dimensions.height.saturating_sub(1) {
            for x in 1..dimensions.width.saturating_sub(1) {
                let mut gx = 0.0_f32;
                let mut gy = 0.0_f32;
                let mut k = 0;
                for ky in 0..3_u32 {
                    for kx in 0..3_u32 {
                        let sx = (x + kx - 1) as usize;
                        let sy = (y + ky - 1) as usize;
                        let value = samples[sy * width + sx];
                        gx = SOBEL_X[k].mul_add(value, gx);
                        gy = SOBEL_Y[k].mul_add(value, gy);
                        k += 1;
                    }
                }
                magnitudes[y as usize * width + x as usize] = gx.hypot(gy);
            }
        }

        Self {
            dimensions,
            magnitudes,
        }
    }

    /// Dimensions of the source frame.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// All magnitudes, row-major. Border entries are always 0.
    #[must_use]
    pub fn magnitudes(&self) -> &[f32] {
        &self.magnitudes
    }

    /// The magnitude at `(x, y)`.
    #[must_use]
    pub fn magnitude(&self, x: u32, y: u32) -> f32 {
        self.magnitudes[y as usize * self.dimensions.width as usize + x as usize]
    }
}
