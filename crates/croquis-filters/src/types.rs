//! Shared types for the croquis filter pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can convert frames at the
/// I/O edges without depending on `image` directly.
pub use image::RgbaImage;

/// Number of interleaved channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Total number of pixels.
    #[must_use]
    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of bytes an interleaved RGBA buffer of this size occupies.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        self.pixel_count() * CHANNELS
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An immutable frame of interleaved RGBA pixel data.
///
/// Every pipeline stage consumes a `PixelBuffer` and allocates a fresh
/// one for its output — inputs are never mutated, so the original frame
/// stays intact for the final blend against the filtered result.
///
/// Invariants (enforced at construction):
/// - `width > 0` and `height > 0`
/// - `data.len() == width * height * 4`
///
/// Pipeline outputs additionally guarantee alpha 255 on every pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer from raw interleaved RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyFrame`] if either dimension is zero,
    /// or [`FilterError::InvalidBufferLength`] if `data` is not exactly
    /// `width * height * 4` bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, FilterError> {
        if width == 0 || height == 0 {
            return Err(FilterError::EmptyFrame);
        }
        let dimensions = Dimensions { width, height };
        if data.len() != dimensions.byte_len() {
            return Err(FilterError::InvalidBufferLength {
                dimensions,
                expected: dimensions.byte_len(),
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer by evaluating `f(x, y)` for every pixel.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyFrame`] if either dimension is zero.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [u8; 4],
    ) -> Result<Self, FilterError> {
        if width == 0 || height == 0 {
            return Err(FilterError::EmptyFrame);
        }
        let dimensions = Dimensions { width, height };
        let mut data = Vec::with_capacity(dimensions.byte_len());
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer with every pixel set to `rgba`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyFrame`] if either dimension is zero.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, FilterError> {
        Self::from_fn(width, height, |_, _| rgba)
    }

    /// Allocate an all-black, fully opaque output frame.
    ///
    /// Used by filter stages as the starting canvas: the interior is
    /// overwritten per pixel while the border ring keeps the black
    /// default with alpha 255.
    pub(crate) fn opaque_black(dimensions: Dimensions) -> Self {
        let mut data = vec![0; dimensions.byte_len()];
        for alpha in data.iter_mut().skip(3).step_by(CHANNELS) {
            *alpha = 255;
        }
        Self {
            width: dimensions.width,
            height: dimensions.height,
            data,
        }
    }

    /// Assemble a buffer from parts already known to satisfy the
    /// invariants (internal fast path for pipeline stages).
    pub(crate) const fn from_parts(dimensions: Dimensions, data: Vec<u8>) -> Self {
        Self {
            width: dimensions.width,
            height: dimensions.height,
            data,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Both dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// The raw interleaved RGBA bytes, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return the underlying bytes.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of the pixel at `(x, y)`.
    #[must_use]
    pub const fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// The `[R, G, B, A]` channels of the pixel at `(x, y)`.
    ///
    /// Coordinates outside the frame return opaque black, matching the
    /// border default of pipeline outputs.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 255];
        }
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Convert to an [`image::RgbaImage`] for encoding or display.
    ///
    /// The byte layout is identical; this only changes the wrapper type.
    #[must_use]
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }

    /// Build a buffer from a decoded [`image::RgbaImage`].
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyFrame`] if the image has a zero
    /// dimension.
    pub fn from_rgba_image(image: &RgbaImage) -> Result<Self, FilterError> {
        Self::from_raw(image.width(), image.height(), image.as_raw().clone())
    }
}

/// Which artistic filter runs on each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Inverted Sobel edges: dark pencil strokes on white.
    #[default]
    Sketch,
    /// Posterized colors with black outlines.
    Cartoon,
    /// Darkened inverted edges with grain noise.
    Charcoal,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sketch => "sketch",
            Self::Cartoon => "cartoon",
            Self::Charcoal => "charcoal",
        };
        f.write_str(name)
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sketch" => Ok(Self::Sketch),
            "cartoon" => Ok(Self::Cartoon),
            "charcoal" => Ok(Self::Charcoal),
            other => Err(format!(
                "unknown filter mode '{other}' (expected sketch, cartoon, or charcoal)"
            )),
        }
    }
}

/// Per-frame filter parameters, supplied by the control surface on
/// every tick.
///
/// The pipeline clamps output channel values only — it does not clamp
/// these inputs. Callers are expected to keep `strength` non-negative
/// and `blend` within `[0, 1]` (the UI exposes strength over 0.1–5).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Edge/effect intensity multiplier.
    pub strength: f32,

    /// Mix between original (0) and fully filtered (1) output.
    pub blend: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            strength: 1.5,
            blend: 1.0,
        }
    }
}

/// Errors that can occur in the filter pipeline.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Blend inputs differ in size.
    #[error("pixel buffers differ in size: {expected} vs {actual}")]
    DimensionMismatch {
        /// Dimensions of the first (original) buffer.
        expected: Dimensions,
        /// Dimensions of the second (effect) buffer.
        actual: Dimensions,
    },

    /// Raw pixel data does not match the declared dimensions.
    #[error("pixel data is {actual} bytes but {dimensions} requires {expected}")]
    InvalidBufferLength {
        /// The declared frame dimensions.
        dimensions: Dimensions,
        /// Required byte count (`width * height * 4`).
        expected: usize,
        /// Provided byte count.
        actual: usize,
    },

    /// A frame dimension was zero.
    #[error("pixel buffer dimensions must be non-zero")]
    EmptyFrame,
}
