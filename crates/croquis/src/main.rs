//! Apply the sketch, cartoon, or charcoal filter to a sequence of image
//! frames and write the results as numbered PNGs.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use croquis_filters::{FilterMode, FilterParams, Lcg, PixelBuffer};
use croquis_runtime::{
    AcquisitionError, FixedControls, FrameControls, FrameSink, FrameSource, RenderLoop,
};

/// Run the artistic filter pipeline over still images, treating them as
/// a frame sequence.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input image paths, processed in order as consecutive frames.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory for the filtered frames (created if missing).
    #[arg(short, long)]
    output: PathBuf,

    /// Filter to apply: sketch, cartoon, or charcoal.
    #[arg(long, default_value = "sketch")]
    mode: FilterMode,

    /// Edge sensitivity multiplier.
    #[arg(long, default_value_t = 1.5)]
    strength: f32,

    /// Blend factor between the original (0.0) and the filtered frame (1.0).
    #[arg(long, default_value_t = 1.0)]
    blend: f32,

    /// Seed for the charcoal grain; omit for a fresh seed per run.
    #[arg(long)]
    seed: Option<u64>,

    /// Pace frames to this rate instead of running as fast as possible.
    #[arg(long, value_name = "FPS")]
    fps: Option<f64>,
}

/// Feeds the input images to the loop one per tick, then ends the
/// stream.
struct ImageFileSource {
    paths: std::vec::IntoIter<PathBuf>,
}

impl ImageFileSource {
    fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: paths.into_iter(),
        }
    }
}

impl FrameSource for ImageFileSource {
    fn next_frame(&mut self) -> Result<Option<PixelBuffer>, AcquisitionError> {
        let Some(path) = self.paths.next() else {
            return Ok(None);
        };
        let image = image::open(&path)
            .map_err(|e| AcquisitionError::new(format!("{}: {e}", path.display())))?;
        let frame = PixelBuffer::from_rgba_image(&image.to_rgba8())
            .map_err(|e| AcquisitionError::new(format!("{}: {e}", path.display())))?;
        Ok(Some(frame))
    }
}

/// Writes each presented frame as `frame-NNNN.png` in the output
/// directory. Presentation is infallible by contract, so the first
/// write failure is stored and checked after the run.
struct PngDirSink {
    dir: PathBuf,
    index: u32,
    failure: Option<String>,
}

impl PngDirSink {
    fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            index: 0,
            failure: None,
        }
    }

    fn into_failure(self) -> Option<String> {
        self.failure
    }
}

impl FrameSink for &mut PngDirSink {
    fn present(&mut self, frame: &PixelBuffer) {
        let path = self.dir.join(format!("frame-{:04}.png", self.index));
        self.index += 1;
        if self.failure.is_some() {
            return;
        }
        match croquis_export::to_png(frame) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(&path, bytes) {
                    self.failure = Some(format!("{}: {e}", path.display()));
                } else {
                    eprintln!("Wrote {}", path.display());
                }
            }
            Err(e) => self.failure = Some(format!("{}: {e}", path.display())),
        }
    }
}

fn frame_interval(fps: Option<f64>) -> Result<Duration, String> {
    match fps {
        None => Ok(Duration::ZERO),
        Some(rate) if rate > 0.0 => Ok(Duration::from_secs_f64(1.0 / rate)),
        Some(rate) => Err(format!("--fps must be positive, got {rate}")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let interval = frame_interval(args.fps)?;
    let noise = match args.seed {
        Some(seed) => Lcg::from_seed(seed),
        None => Lcg::from_entropy()
            .map_err(|e| format!("entropy source unavailable: {e}"))?,
    };

    std::fs::create_dir_all(&args.output)?;

    let frame_count = args.inputs.len();
    eprintln!(
        "Processing {frame_count} frame(s) with mode={}, strength={}, blend={}",
        args.mode, args.strength, args.blend
    );

    let mut sink = PngDirSink::new(args.output.clone());
    let mut render_loop = RenderLoop::new(
        ImageFileSource::new(args.inputs),
        FixedControls(FrameControls {
            mode: args.mode,
            params: FilterParams {
                strength: args.strength,
                blend: args.blend,
            },
        }),
        &mut sink,
        Box::new(noise),
        interval,
    );

    render_loop.run()?;
    let rendered = render_loop.frames_rendered();
    drop(render_loop);

    if let Some(failure) = sink.into_failure() {
        return Err(failure.into());
    }

    eprintln!(
        "Done. {rendered} frame(s) written to {}",
        args.output.display()
    );
    Ok(())
}
