use anyhow::{Context, Result};
use clap::Parser;
use hand_guard::core_modules::geometry::Thresholds;
use hand_guard::{
    ConsoleSink, DisplaySink, FramePipeline, FrameSequenceSource, PipelineConfig, SessionEnd, VideoSource,
};
use log::{error, info};
use std::path::PathBuf;

#[cfg(feature = "opencv")]
mod camera;
#[cfg(feature = "opencv")]
mod window;

const WINDOW_TITLE: &str = "Real-Time Hand Distance Warning System";

#[derive(Parser, Debug)]
#[command(name = "live_guard", about = "Warns when a hand gets close to the on-screen safety zone")]
struct Args {
    /// Camera device index.
    #[arg(long, default_value_t = 0, conflicts_with = "frames")]
    camera: i32,
    /// Replay image files from this directory instead of using a camera.
    #[arg(long, value_name = "DIR")]
    frames: Option<PathBuf>,
    /// Never open a window; log a status line periodically instead.
    #[arg(long)]
    headless: bool,
    /// Processing rate to throttle down to.
    #[arg(long, default_value_t = 15.0)]
    target_fps: f64,
    /// Distance (pixels) at or below which the state is WARNING.
    #[arg(long, default_value_t = 150.0)]
    warning_threshold: f64,
    /// Distance (pixels) at or below which the state is DANGER.
    #[arg(long, default_value_t = 50.0)]
    danger_threshold: f64,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            target_fps: self.target_fps,
            thresholds: Thresholds {
                warning: self.warning_threshold,
                danger: self.danger_threshold,
            },
            ..PipelineConfig::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // --- 1. Collaborators ---
    let config = args.pipeline_config();
    let mut source = open_source(&args)?;
    let mut sink = open_sink(&args, config.status_interval);

    // --- 2. Session ---
    let mut pipeline = FramePipeline::new(config);
    let summary = pipeline
        .run(source.as_mut(), sink.as_mut())
        .context("proximity session aborted")?;

    match summary.end {
        SessionEnd::ReadFailed(reason) => error!("Failed to read frame from source: {reason}"),
        SessionEnd::QuitRequested => info!("quit requested after {} frames", summary.frames),
        SessionEnd::EndOfStream => info!("source exhausted after {} frames", summary.frames),
    }
    Ok(())
}

fn open_source(args: &Args) -> Result<Box<dyn VideoSource>> {
    if let Some(dir) = &args.frames {
        let source = FrameSequenceSource::open(dir)
            .with_context(|| format!("could not open frame directory {}", dir.display()))?;
        return Ok(Box::new(source));
    }

    #[cfg(feature = "opencv")]
    {
        let source = camera::CameraSource::open(args.camera)
            .with_context(|| format!("Could not open webcam {}", args.camera))?;
        Ok(Box::new(source))
    }

    #[cfg(not(feature = "opencv"))]
    {
        anyhow::bail!(
            "camera {} requested, but live_guard was built without the `opencv` feature; pass --frames <DIR>",
            args.camera
        )
    }
}

fn open_sink(args: &Args, status_interval: u64) -> Box<dyn DisplaySink> {
    if args.headless {
        return Box::new(ConsoleSink::new(status_interval));
    }

    #[cfg(feature = "opencv")]
    {
        hand_guard::select_sink(
            || window::WindowSink::open(WINDOW_TITLE).map(|w| Box::new(w) as Box<dyn DisplaySink>),
            status_interval,
        )
    }

    #[cfg(not(feature = "opencv"))]
    {
        log::warn!("{WINDOW_TITLE}: no window support in this build. Running in console mode only.");
        Box::new(ConsoleSink::new(status_interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_library() {
        let args = Args::parse_from(["live_guard"]);
        let config = args.pipeline_config();
        assert_eq!(config.thresholds, Thresholds::default());
        assert_eq!(config.target_fps, 15.0);
        assert!(!args.headless);
    }

    #[test]
    fn thresholds_come_from_flags() {
        let args = Args::parse_from([
            "live_guard",
            "--frames",
            "clips/desk",
            "--headless",
            "--warning-threshold",
            "220",
            "--danger-threshold",
            "80",
        ]);
        let config = args.pipeline_config();
        assert_eq!(config.thresholds.warning, 220.0);
        assert_eq!(config.thresholds.danger, 80.0);
        assert_eq!(args.frames, Some(PathBuf::from("clips/desk")));
    }

    #[test]
    fn camera_and_frames_are_exclusive() {
        assert!(Args::try_parse_from(["live_guard", "--camera", "1", "--frames", "x"]).is_err());
    }

    #[test]
    fn headless_sink_never_renders() {
        let args = Args::parse_from(["live_guard", "--headless"]);
        assert!(!open_sink(&args, 30).renders_frames());
    }
}
