//! croquis-filters: pure per-frame artistic filter pipeline (sans-IO).
//!
//! Turns one RGBA frame into a filtered, blended output frame through:
//! luminance -> Sobel gradients -> filter variant (sketch / cartoon /
//! charcoal) -> blend against the original.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! pixel buffers and returns new ones. Frame acquisition, display, and
//! file output live in `croquis-runtime` and `croquis-export`.
//!
//! Every stage allocates a fresh buffer; nothing is mutated in place.
//! The only non-determinism is the charcoal grain, drawn from a
//! caller-supplied [`NoiseSource`].

pub mod blend;
pub mod cartoon;
pub mod charcoal;
pub mod gradient;
pub mod luminance;
pub mod noise;
pub mod sketch;
pub mod types;

pub use blend::blend;
pub use gradient::GradientMap;
pub use luminance::LuminanceMap;
pub use noise::{FixedNoise, Lcg, NoiseSource};
pub use types::{Dimensions, FilterError, FilterMode, FilterParams, PixelBuffer};

/// Run the full per-frame pipeline: selected filter, then blend.
///
/// # Pipeline steps
///
/// 1. Apply the filter selected by `mode` at `params.strength`
/// 2. Blend the filtered frame over the original by `params.blend`
///
/// `noise` is consulted only by the charcoal filter; the other modes
/// never draw from it.
///
/// # Errors
///
/// Returns [`FilterError::DimensionMismatch`] if the blend inputs
/// disagree in size. This cannot happen for buffers produced by step 1,
/// but the contract is kept explicit for callers composing stages
/// manually.
pub fn process_frame<N>(
    frame: &PixelBuffer,
    mode: FilterMode,
    params: &FilterParams,
    noise: &mut N,
) -> Result<PixelBuffer, FilterError>
where
    N: NoiseSource + ?Sized,
{
    // 1. Selected filter variant.
    let filtered = match mode {
        FilterMode::Sketch => sketch::sketch(frame, params.strength),
        FilterMode::Cartoon => cartoon::cartoon(frame, params.strength),
        FilterMode::Charcoal => charcoal::charcoal(frame, params.strength, noise),
    };

    // 2. Blend between original and effect.
    blend::blend(frame, &filtered, params.blend)
}
