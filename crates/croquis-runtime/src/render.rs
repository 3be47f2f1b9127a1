//! The per-frame render loop.
//!
//! One tick pulls a frame from the source, reads the control surface,
//! runs the selected filter, blends against the original, and hands the
//! result to the sink. The loop is pull-based with exactly one frame in
//! flight: the next tick is scheduled only after the current one
//! completes, so a slow tick delays the schedule instead of queueing
//! frames. Implemented as a plain loop (no recursion), matching the
//! self-rescheduling-callback semantics of a display-refresh driver.

use std::time::{Duration, Instant};

use croquis_export::ExportError;
use croquis_filters::{FilterError, FilterMode, NoiseSource, PixelBuffer, blend, cartoon, charcoal, sketch};

use crate::collaborators::{ControlSurface, FrameSink, FrameSource};
use crate::types::{LoopState, RuntimeError, TickReport};

/// Frames-per-second estimate over a one-second sliding window.
#[derive(Debug)]
struct FpsCounter {
    window_start: Instant,
    frames_this_window: u32,
    current: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames_this_window: 0,
            current: 0.0,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn record(&mut self) {
        self.frames_this_window += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed >= Duration::from_secs(1) {
            self.current = self.frames_this_window as f32 / elapsed.as_secs_f32();
            self.frames_this_window = 0;
            self.window_start = Instant::now();
        }
    }
}

/// Orchestrates capture -> filter -> blend -> present at frame cadence.
///
/// Generic over its three collaborators; the charcoal noise source is
/// injected at construction so a seeded generator makes whole runs
/// reproducible.
pub struct RenderLoop<S, C, K> {
    source: S,
    controls: C,
    sink: K,
    noise: Box<dyn NoiseSource>,
    frame_interval: Duration,
    state: LoopState,
    frame_index: u64,
    last_frame: Option<PixelBuffer>,
    fps: FpsCounter,
}

impl<S, C, K> RenderLoop<S, C, K>
where
    S: FrameSource,
    C: ControlSurface,
    K: FrameSink,
{
    /// Create an idle loop.
    ///
    /// `frame_interval` is the target spacing between ticks;
    /// [`Duration::ZERO`] runs unpaced (every tick starts as soon as
    /// the previous one finishes).
    pub fn new(
        source: S,
        controls: C,
        sink: K,
        noise: Box<dyn NoiseSource>,
        frame_interval: Duration,
    ) -> Self {
        Self {
            source,
            controls,
            sink,
            noise,
            frame_interval,
            state: LoopState::Idle,
            frame_index: 0,
            last_frame: None,
            fps: FpsCounter::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Number of frames presented in this run so far.
    #[must_use]
    pub const fn frames_rendered(&self) -> u64 {
        self.frame_index
    }

    /// Latest frames-per-second estimate (0 until the first full
    /// one-second window completes).
    #[must_use]
    pub const fn fps(&self) -> f32 {
        self.fps.current
    }

    /// The most recently presented frame, if any.
    #[must_use]
    pub const fn last_frame(&self) -> Option<&PixelBuffer> {
        self.last_frame.as_ref()
    }

    /// Encode the most recently presented frame as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::EmptyExport`] if no frame has been
    /// presented yet, or [`ExportError::PngEncode`] if encoding fails.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        croquis_export::latest_to_png(self.last_frame.as_ref())
    }

    /// Run one tick: acquire, filter, blend, present.
    ///
    /// Returns `Ok(None)` when the stream has ended (the loop is Idle
    /// again). A blend dimension mismatch is not fatal: the blend step
    /// is skipped with a warning and the filtered frame is presented
    /// unblended.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Acquisition`] when the source fails; the
    /// loop transitions back to Idle and does not retry.
    pub fn tick(&mut self) -> Result<Option<TickReport>, RuntimeError> {
        let started = Instant::now();

        let frame = match self.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                if self.state == LoopState::Running {
                    tracing::info!(frames = self.frame_index, "stream ended");
                }
                self.state = LoopState::Idle;
                return Ok(None);
            }
            Err(err) => {
                tracing::error!(error = %err, "frame acquisition failed; stopping");
                self.state = LoopState::Idle;
                return Err(err.into());
            }
        };
        self.state = LoopState::Running;

        let controls = self.controls.current();
        let filtered = match controls.mode {
            FilterMode::Sketch => sketch::sketch(&frame, controls.params.strength),
            FilterMode::Cartoon => cartoon::cartoon(&frame, controls.params.strength),
            FilterMode::Charcoal => {
                charcoal::charcoal(&frame, controls.params.strength, self.noise.as_mut())
            }
        };
        let presented = match blend(&frame, &filtered, controls.params.blend) {
            Ok(blended) => blended,
            Err(FilterError::DimensionMismatch { expected, actual }) => {
                // Skip the blend for this frame rather than aborting the
                // stream; present the filter output directly.
                tracing::warn!(%expected, %actual, "blend skipped: dimension mismatch");
                filtered
            }
            Err(other) => return Err(other.into()),
        };

        self.sink.present(&presented);
        self.last_frame = Some(presented);
        self.fps.record();

        let report = TickReport {
            frame_index: self.frame_index,
            mode: controls.mode,
            elapsed: started.elapsed(),
        };
        self.frame_index += 1;
        tracing::debug!(
            frame = report.frame_index,
            mode = %report.mode,
            elapsed_ms = report.elapsed.as_millis(),
            "tick complete"
        );
        Ok(Some(report))
    }

    /// Run until the stream ends or acquisition fails.
    ///
    /// Ticks are paced to the configured frame interval; a tick that
    /// overruns it simply delays the next one (no queueing, no dropped
    /// frames -- the loop is pull-based).
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Acquisition`] when the source fails.
    /// The loop is Idle afterwards either way.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        tracing::info!(interval_ms = self.frame_interval.as_millis(), "loop started");
        self.state = LoopState::Running;
        loop {
            let tick_start = Instant::now();
            if self.tick()?.is_none() {
                return Ok(());
            }
            let elapsed = tick_start.elapsed();
            if let Some(remaining) = self.frame_interval.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::collaborators::{FixedControls, SequenceSource};
    use crate::types::{AcquisitionError, FrameControls};
    use croquis_filters::{FilterMode, FilterParams, FixedNoise};

    /// Sink that records every presented frame.
    #[derive(Debug, Default)]
    struct RecordingSink {
        frames: Vec<PixelBuffer>,
    }

    impl FrameSink for &mut RecordingSink {
        fn present(&mut self, frame: &PixelBuffer) {
            self.frames.push(frame.clone());
        }
    }

    /// Source that always fails.
    struct BrokenCamera;

    impl FrameSource for BrokenCamera {
        fn next_frame(&mut self) -> Result<Option<PixelBuffer>, AcquisitionError> {
            Err(AcquisitionError::new("device disconnected"))
        }
    }

    fn test_frames(count: usize) -> Vec<PixelBuffer> {
        (0..count)
            .map(|i| {
                PixelBuffer::filled(6, 6, [u8::try_from(i * 40).unwrap(), 80, 120, 255]).unwrap()
            })
            .collect()
    }

    fn sketch_controls() -> FixedControls {
        FixedControls(FrameControls {
            mode: FilterMode::Sketch,
            params: FilterParams {
                strength: 1.5,
                blend: 1.0,
            },
        })
    }

    #[test]
    fn run_presents_every_frame_then_goes_idle() {
        let mut sink = RecordingSink::default();
        let mut render_loop = RenderLoop::new(
            SequenceSource::new(test_frames(3)),
            sketch_controls(),
            &mut sink,
            Box::new(FixedNoise(0.5)),
            Duration::ZERO,
        );

        render_loop.run().unwrap();

        assert_eq!(render_loop.state(), LoopState::Idle);
        assert_eq!(render_loop.frames_rendered(), 3);
        drop(render_loop);
        assert_eq!(sink.frames.len(), 3);
        for frame in &sink.frames {
            assert_eq!(frame.width(), 6);
            assert_eq!(frame.height(), 6);
        }
    }

    #[test]
    fn tick_reports_then_signals_stream_end() {
        let mut sink = RecordingSink::default();
        let mut render_loop = RenderLoop::new(
            SequenceSource::new(test_frames(1)),
            sketch_controls(),
            &mut sink,
            Box::new(FixedNoise(0.5)),
            Duration::ZERO,
        );

        let report = render_loop.tick().unwrap().unwrap();
        assert_eq!(report.frame_index, 0);
        assert_eq!(report.mode, FilterMode::Sketch);
        assert_eq!(render_loop.state(), LoopState::Running);

        assert!(render_loop.tick().unwrap().is_none());
        assert_eq!(render_loop.state(), LoopState::Idle);
    }

    #[test]
    fn acquisition_failure_surfaces_and_idles() {
        let mut sink = RecordingSink::default();
        let mut render_loop = RenderLoop::new(
            BrokenCamera,
            sketch_controls(),
            &mut sink,
            Box::new(FixedNoise(0.5)),
            Duration::ZERO,
        );

        let result = render_loop.run();
        assert!(matches!(result, Err(RuntimeError::Acquisition(_))));
        assert_eq!(render_loop.state(), LoopState::Idle);
        assert_eq!(render_loop.frames_rendered(), 0);
    }

    #[test]
    fn export_before_any_frame_is_empty_export() {
        let mut sink = RecordingSink::default();
        let render_loop = RenderLoop::new(
            SequenceSource::new(test_frames(1)),
            sketch_controls(),
            &mut sink,
            Box::new(FixedNoise(0.5)),
            Duration::ZERO,
        );
        assert!(matches!(
            render_loop.export_png(),
            Err(ExportError::EmptyExport)
        ));
    }

    #[test]
    fn export_after_run_returns_png_of_last_frame() {
        let mut sink = RecordingSink::default();
        let mut render_loop = RenderLoop::new(
            SequenceSource::new(test_frames(2)),
            sketch_controls(),
            &mut sink,
            Box::new(FixedNoise(0.5)),
            Duration::ZERO,
        );
        render_loop.run().unwrap();

        let bytes = render_loop.export_png().unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);

        // Last frame retained by the loop matches what the sink saw.
        let retained = render_loop.last_frame().cloned();
        drop(render_loop);
        assert_eq!(retained.as_ref(), sink.frames.last());
    }

    #[test]
    fn presented_frames_are_fully_opaque() {
        let mut sink = RecordingSink::default();
        let mut render_loop = RenderLoop::new(
            SequenceSource::new(test_frames(2)),
            FixedControls(FrameControls {
                mode: FilterMode::Cartoon,
                params: FilterParams {
                    strength: 1.5,
                    blend: 0.5,
                },
            }),
            &mut sink,
            Box::new(FixedNoise(0.5)),
            Duration::ZERO,
        );
        render_loop.run().unwrap();
        drop(render_loop);
        for frame in &sink.frames {
            for y in 0..frame.height() {
                for x in 0..frame.width() {
                    assert_eq!(frame.pixel(x, y)[3], 255);
                }
            }
        }
    }
}
