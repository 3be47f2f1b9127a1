//! Collaborator traits at the loop's boundaries.
//!
//! The render loop itself owns no devices: frames come from a
//! [`FrameSource`], per-tick settings from a [`ControlSurface`], and
//! finished frames go to a [`FrameSink`]. Implementations wrap a
//! camera, a UI, a window -- or, in tests and the CLI, plain vectors
//! and files.

use croquis_filters::PixelBuffer;

use crate::types::{AcquisitionError, FrameControls};

/// Supplies the current frame on demand.
///
/// Dimensions are expected to stay fixed for the source's lifetime;
/// a source whose dimensions change must be rebuilt (the loop holds no
/// dimension-dependent state, but downstream sinks may).
pub trait FrameSource {
    /// Acquire the next frame.
    ///
    /// `Ok(None)` signals the end of the stream: the loop stops
    /// rescheduling and returns to Idle without error.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError`] when a frame cannot be provided.
    fn next_frame(&mut self) -> Result<Option<PixelBuffer>, AcquisitionError>;
}

/// Supplies the filter mode and parameters for each tick.
///
/// Read once at tick start, so a mid-tick settings change applies from
/// the following frame.
pub trait ControlSurface {
    /// The settings to use for the next frame.
    fn current(&mut self) -> FrameControls;
}

/// Accepts each finished frame for presentation.
pub trait FrameSink {
    /// Present one frame. Called exactly once per tick.
    fn present(&mut self, frame: &PixelBuffer);
}

/// A control surface that always returns the same settings.
#[derive(Debug, Clone, Copy)]
pub struct FixedControls(pub FrameControls);

impl ControlSurface for FixedControls {
    fn current(&mut self) -> FrameControls {
        self.0
    }
}

/// A source that plays back a pre-loaded sequence of frames, then ends
/// the stream.
#[derive(Debug)]
pub struct SequenceSource {
    frames: std::vec::IntoIter<PixelBuffer>,
}

impl SequenceSource {
    /// Create a source over `frames`, yielding them in order.
    #[must_use]
    pub fn new(frames: Vec<PixelBuffer>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl FrameSource for SequenceSource {
    fn next_frame(&mut self) -> Result<Option<PixelBuffer>, AcquisitionError> {
        Ok(self.frames.next())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use croquis_filters::{FilterMode, FilterParams};

    #[test]
    fn fixed_controls_returns_the_same_reading() {
        let controls = FrameControls {
            mode: FilterMode::Cartoon,
            params: FilterParams {
                strength: 2.0,
                blend: 0.5,
            },
        };
        let mut surface = FixedControls(controls);
        assert_eq!(surface.current(), controls);
        assert_eq!(surface.current(), controls);
    }

    #[test]
    fn sequence_source_yields_then_ends() {
        let a = PixelBuffer::filled(2, 2, [1, 1, 1, 255]).unwrap();
        let b = PixelBuffer::filled(2, 2, [2, 2, 2, 255]).unwrap();
        let mut source = SequenceSource::new(vec![a.clone(), b.clone()]);

        assert_eq!(source.next_frame().unwrap(), Some(a));
        assert_eq!(source.next_frame().unwrap(), Some(b));
        assert_eq!(source.next_frame().unwrap(), None);
        // Stays ended.
        assert_eq!(source.next_frame().unwrap(), None);
    }
}
