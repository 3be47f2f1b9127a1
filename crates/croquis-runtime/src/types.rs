//! Shared types for the croquis render loop.

use std::time::Duration;

use croquis_export::ExportError;
use croquis_filters::{FilterError, FilterMode, FilterParams};

/// Render loop lifecycle state.
///
/// The loop starts `Idle`, becomes `Running` while ticking, and
/// returns to `Idle` when the stream ends or acquisition fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not ticking; no stream is being consumed.
    Idle,
    /// Consuming frames at the configured cadence.
    Running,
}

/// The control-surface reading taken at the start of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameControls {
    /// Which filter variant to run.
    pub mode: FilterMode,
    /// Strength and blend factor for this frame.
    pub params: FilterParams,
}

/// Summary of one completed tick, for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TickReport {
    /// Zero-based index of the frame within the current run.
    pub frame_index: u64,
    /// Filter mode that was applied.
    pub mode: FilterMode,
    /// Wall-clock time the full capture->present pipeline took.
    pub elapsed: Duration,
}

/// The capture collaborator could not provide a frame.
///
/// Not retried automatically: the loop transitions back to Idle and
/// surfaces the error to the caller.
#[derive(Debug, thiserror::Error)]
#[error("frame acquisition failed: {reason}")]
pub struct AcquisitionError {
    /// Human-readable description from the capture collaborator.
    pub reason: String,
}

impl AcquisitionError {
    /// Wrap a capture-side failure description.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the render loop.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The capture collaborator failed to deliver a frame.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// A pipeline stage failed.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Exporting the last frame failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquisition_error_message_includes_reason() {
        let err = AcquisitionError::new("camera unplugged");
        assert_eq!(err.to_string(), "frame acquisition failed: camera unplugged");
    }

    #[test]
    fn runtime_error_is_transparent_over_sources() {
        let err = RuntimeError::from(AcquisitionError::new("no device"));
        assert_eq!(err.to_string(), "frame acquisition failed: no device");

        let err = RuntimeError::from(ExportError::EmptyExport);
        assert_eq!(
            err.to_string(),
            "no frame has been rendered yet; nothing to save"
        );
    }

    #[test]
    fn frame_controls_default_matches_filter_defaults() {
        let controls = FrameControls::default();
        assert_eq!(controls.mode, FilterMode::Sketch);
        assert!((controls.params.strength - 1.5).abs() < f32::EPSILON);
        assert!((controls.params.blend - 1.0).abs() < f32::EPSILON);
    }
}
