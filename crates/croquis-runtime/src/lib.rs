//! croquis-runtime: the render loop that drives the filter pipeline.
//!
//! Owns the capture -> filter -> blend -> present cycle at frame
//! cadence, behind three collaborator traits ([`FrameSource`],
//! [`ControlSurface`], [`FrameSink`]) so the same loop runs against a
//! camera, a file sequence, or test fixtures. Retains the last
//! presented frame for on-demand PNG export.

pub mod collaborators;
pub mod render;
pub mod types;

pub use collaborators::{ControlSurface, FixedControls, FrameSink, FrameSource, SequenceSource};
pub use render::RenderLoop;
pub use types::{AcquisitionError, FrameControls, LoopState, RuntimeError, TickReport};
