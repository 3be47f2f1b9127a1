//! Linear interpolation between the original frame and a filtered one.

use crate::types::{CHANNELS, FilterError, PixelBuffer};

/// Blend `effect` over `original` by factor `t`.
///
/// Per R/G/B channel the output is `original * (1 - t) + effect * t`,
/// computed in lerp form (`original + t * (effect - original)`) so that
/// blending a buffer with itself is exactly the identity for every `t`,
/// and `t = 0` / `t = 1` reproduce the inputs bit-for-bit. The result
/// is clamped to `[0, 255]` (which also covers extrapolating `t`
/// outside `[0, 1]` — such values are not rejected) and truncated to a
/// byte. Alpha is forced to 255.
///
/// # Errors
///
/// Returns [`FilterError::DimensionMismatch`] if the buffers differ in
/// width or height.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn blend(
    original: &PixelBuffer,
    effect: &PixelBuffer,
    t: f32,
) -> Result<PixelBuffer, FilterError> {
    if original.dimensions() != effect.dimensions() {
        return Err(FilterError::DimensionMismatch {
            expected: original.dimensions(),
            actual: effect.dimensions(),
        });
    }

    let dimensions = original.dimensions();
    let mut data = Vec::with_capacity(dimensions.byte_len());

    for (src, dst) in original
        .data()
        .chunks_exact(CHANNELS)
        .zip(effect.data().chunks_exact(CHANNELS))
    {
        for c in 0..3 {
            let o = f32::from(src[c]);
            let e = f32::from(dst[c]);
            let mixed = t.mul_add(e - o, o).clamp(0.0, 255.0);
            data.push(mixed as u8);
        }
        data.push(255);
    }

    Ok(PixelBuffer::from_parts(dimensions, data))
}
