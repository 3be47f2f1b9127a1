//! Cartoon filter: posterized colors with black outlines.
//!
//! Color quantization and outline detection run independently, so
//! silhouette edges stay crisp regardless of how flat the color regions
//! become. Level count and threshold are fixed constants; `strength`
//! only scales the gradient magnitude compared against the threshold.

use crate::gradient::GradientMap;
use crate::luminance::LuminanceMap;
use crate::types::{CHANNELS, PixelBuffer};

/// Number of discrete steps per color channel.
const QUANT_LEVELS: f32 = 6.0;
/// Quantization step size: `255 / (levels - 1)`.
const QUANT_STEP: f32 = 255.0 / (QUANT_LEVELS - 1.0);
/// Constant brightening added after quantization, for a mildly
/// smoothed cel-shade look.
const BRIGHTEN: f32 = 4.0;
/// Scaled gradient magnitudes above this become black outline pixels.
const EDGE_THRESHOLD: f32 = 80.0;

/// Snap one channel value to the nearest quantization level, then
/// brighten and clamp.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(value: u8) -> u8 {
    let snapped = (f32::from(value) / QUANT_STEP).round() * QUANT_STEP;
    (snapped + BRIGHTEN).min(255.0) as u8
}

/// Render `frame` as a cel-shaded cartoon.
///
/// Every pixel (border included) takes its quantized, brightened color
/// unless the Sobel magnitude scaled by `strength` exceeds the outline
/// threshold, in which case the pixel is forced to black. Border pixels
/// always carry magnitude 0, so they can never become outline. Alpha is
/// 255 everywhere.
#[must_use = "returns the filtered frame"]
pub fn cartoon(frame: &PixelBuffer, strength: f32) -> PixelBuffer {
    let gradient = GradientMap::sobel(&LuminanceMap::quantized(frame));
    let dimensions = frame.dimensions();
    let source = frame.data();
    let mut data = Vec::with_capacity(dimensions.byte_len());

    for (pixel, &magnitude) in source
        .chunks_exact(CHANNELS)
        .zip(gradient.magnitudes().iter())
    {
        if magnitude * strength > EDGE_THRESHOLD {
            data.extend_from_slice(&[0, 0, 0, 255]);
        } else {
            data.extend_from_slice(&[
                quantize(pixel[0]),
                quantize(pixel[1]),
                quantize(pixel[2]),
                255,
            ]);
        }
    }

    PixelBuffer::from_parts(dimensions, data)
}
