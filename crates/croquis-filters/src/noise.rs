//! Injectable randomness for the charcoal filter.
//!
//! Charcoal grain is the one non-deterministic stage in the pipeline,
//! so its randomness is a capability the caller supplies rather than
//! ambient state. Production code seeds an [`Lcg`] from OS entropy;
//! tests substitute [`FixedNoise`] for exact pixel assertions.

/// A source of uniform random reals in `[0, 1)`.
pub trait NoiseSource {
    /// The next uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f32;
}

/// Multiplier from the PCG family of linear congruential generators.
const LCG_MUL: u64 = 6_364_136_223_846_793_005;
/// Odd increment paired with [`LCG_MUL`].
const LCG_INC: u64 = 1_442_695_040_888_963_407;

/// Seedable linear congruential generator.
///
/// Quality is far below cryptographic standards and entirely adequate
/// for visual grain. A fixed seed reproduces the same grain sequence,
/// which is what the CLI's `--seed` flag exposes.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Create a generator from an explicit seed.
    #[must_use]
    pub const fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Create a generator seeded from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`getrandom::Error`] if the platform entropy source is
    /// unavailable.
    pub fn from_entropy() -> Result<Self, getrandom::Error> {
        Ok(Self::from_seed(getrandom::u64()?))
    }
}

impl NoiseSource for Lcg {
    #[allow(clippy::cast_precision_loss)]
    fn next_unit(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
        // Top 24 bits give exactly the precision of an f32 mantissa.
        ((self.state >> 40) as f32) / 16_777_216.0
    }
}

/// A source that returns the same sample forever.
///
/// Exists for deterministic testing; `FixedNoise(0.5)` makes the
/// charcoal noise term exactly zero.
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(pub f32);

impl NoiseSource for FixedNoise {
    fn next_unit(&mut self) -> f32 {
        self.0
    }
}
