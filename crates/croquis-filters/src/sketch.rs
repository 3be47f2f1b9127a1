//! Pencil sketch filter: inverted Sobel edges in grayscale.
//!
//! Strong gradients become dark strokes on a light background. The
//! border ring is not convolved and keeps the opaque black default.

use crate::gradient::GradientMap;
use crate::luminance::LuminanceMap;
use crate::types::PixelBuffer;

/// Fixed gain applied on top of the caller's strength.
const EDGE_GAIN: f32 = 1.1;

/// Render `frame` as an inverted-edge pencil sketch.
///
/// Per interior pixel: `edge = 255 - clamp(magnitude * strength * 1.1)`,
/// written to all three color channels with alpha 255. Strength 0
/// yields an all-white interior; very large strengths saturate every
/// gradient to black.
#[must_use = "returns the filtered frame"]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sketch(frame: &PixelBuffer, strength: f32) -> PixelBuffer {
    let gradient = GradientMap::sobel(&LuminanceMap::quantized(frame));
    let dimensions = frame.dimensions();
    let mut data = PixelBuffer::opaque_black(dimensions).into_data();

    for y in 1..dimensions.height.saturating_sub(1) {
        for x in 1..dimensions.width.saturating_sub(1) {
            let magnitude = gradient.magnitude(x, y);
            let edge = (255.0 - (magnitude * strength * EDGE_GAIN).clamp(0.0, 255.0)) as u8;
            let i = frame.offset(x, y);
            data[i] = edge;
            data[i + 1] = edge;
            data[i + 2] = edge;
        }
    }

    PixelBuffer::from_parts(dimensions, data)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn output_is_strictly_grayscale() {
        let frame = PixelBuffer::from_fn(8, 8, |x, y| {
            [
                u8::try_from((x * 31) % 256).unwrap(),
                u8::try_from((y * 57) % 256).unwrap(),
                u8::try_from(((x + y) * 11) % 256).unwrap(),
                255,
            ]
        })
        .unwrap();
        let out = sketch(&frame, 1.5);
        for y in 0..8 {
            for x in 0..8 {
                let [r, g, b, a] = out.pixel(x, y);
                assert_eq!(r, g, "R != G at ({x},{y})");
                assert_eq!(g, b, "G != B at ({x},{y})");
                assert_eq!(a, 255, "alpha != 255 at ({x},{y})");
            }
        }
    }

    #[test]
    fn white_frame_has_all_white_interior() {
        // Uniform input -> zero gradient -> edge value 255 everywhere
        // inside the border ring.
        let frame = PixelBuffer::filled(5, 5, [255, 255, 255, 255]).unwrap();
        let out = sketch(&frame, 1.5);
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(out.pixel(x, y), [255, 255, 255, 255]);
            }
        }
    }

    #[test]
    fn zero_strength_whitens_interior_of_any_frame() {
        let frame = PixelBuffer::from_fn(6, 6, |x, _y| {
            if x < 3 {
                [0, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            }
        })
        .unwrap();
        let out = sketch(&frame, 0.0);
        for y in 1..5 {
            for x in 1..5 {
                assert_eq!(out.pixel(x, y), [255, 255, 255, 255]);
            }
        }
    }

    #[test]
    fn huge_strength_saturates_edges_to_black() {
        let frame = PixelBuffer::from_fn(6, 6, |x, _y| {
            if x < 3 {
                [0, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            }
        })
        .unwrap();
        let out = sketch(&frame, 1_000.0);
        // Pixels adjacent to the seam carry the maximum response.
        assert_eq!(out.pixel(2, 2), [0, 0, 0, 255]);
        assert_eq!(out.pixel(3, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn border_ring_is_opaque_black() {
        let frame = PixelBuffer::filled(5, 5, [255, 255, 255, 255]).unwrap();
        let out = sketch(&frame, 1.5);
        for x in 0..5 {
            assert_eq!(out.pixel(x, 0), [0, 0, 0, 255]);
            assert_eq!(out.pixel(x, 4), [0, 0, 0, 255]);
        }
        for y in 0..5 {
            assert_eq!(out.pixel(0, y), [0, 0, 0, 255]);
            assert_eq!(out.pixel(4, y), [0, 0, 0, 255]);
        }
    }

    #[test]
    fn degenerate_frame_is_all_border() {
        let frame = PixelBuffer::filled(2, 2, [200, 100, 50, 255]).unwrap();
        let out = sketch(&frame, 1.5);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(out.pixel(x, y), [0, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn input_frame_is_not_mutated() {
        let frame = PixelBuffer::filled(5, 5, [10, 20, 30, 255]).unwrap();
        let copy = frame.clone();
        let _ = sketch(&frame, 1.5);
        assert_eq!(frame, copy);
    }
}
