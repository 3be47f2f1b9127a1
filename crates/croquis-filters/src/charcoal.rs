//! Charcoal filter: harsh inverted edges, darkened and dusted with
//! grain noise.
//!
//! The only non-pure stage in the pipeline: each invocation differs
//! through the injected [`NoiseSource`]. Callers wanting reproducible
//! output supply a seeded or fixed source.

use crate::gradient::GradientMap;
use crate::luminance::LuminanceMap;
use crate::noise::NoiseSource;
use crate::types::PixelBuffer;

/// Fixed gain applied on top of the caller's strength.
const EDGE_GAIN: f32 = 1.4;
/// Multiplier pushing the whole tone range toward charcoal darkness.
const DARKEN: f32 = 0.8;
/// Width of the signed noise interval: samples land in [-20, +20).
const NOISE_SPAN: f32 = 40.0;

/// Render `frame` as a charcoal drawing.
///
/// Per interior pixel: `v = (255 - clamp(magnitude * strength * 1.4)) * 0.8`
/// plus a uniform noise term `(u - 0.5) * 40` with `u` drawn from
/// `noise`, clamped to `[0, 255]`. Output is grayscale with alpha 255;
/// the border ring keeps the opaque black default.
///
/// Luminance is taken at full floating-point precision (no 8-bit
/// truncation before convolution), giving the gradients headroom
/// before the final clamp.
#[must_use = "returns the filtered frame"]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn charcoal<N>(frame: &PixelBuffer, strength: f32, noise: &mut N) -> PixelBuffer
where
    N: NoiseSource + ?Sized,
{
    let gradient = GradientMap::sobel(&LuminanceMap::precise(frame));
    let dimensions = frame.dimensions();
    let mut data = PixelBuffer::opaque_black(dimensions).into_data();

    for y in 1..dimensions.height.saturating_sub(1) {
        for x in 1..dimensions.width.saturating_sub(1) {
            let magnitude = gradient.magnitude(x, y) * strength * EDGE_GAIN;
            let mut v = (255.0 - magnitude.clamp(0.0, 255.0)) * DARKEN;
            let grain = (noise.next_unit() - 0.5) * NOISE_SPAN;
            v = (v + grain).clamp(0.0, 255.0);

            let value = v as u8;
            let i = frame.offset(x, y);
            data[i] = value;
            data[i + 1] = value;
            data[i + 2] = value;
        }
    }

    PixelBuffer::from_parts(dimensions, data)
}
