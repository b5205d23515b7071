// THEORY:
// A `DisplaySink` is where a finished frame goes. There are two kinds, chosen
// once at startup and never re-checked:
// - a windowed sink, which paints the overlay and shows the frame, and owns
//   the quit key;
// - the `ConsoleSink`, used when no display is available, which logs a status
//   line every `interval` frames and never asks to quit.
//
// `select_sink` performs the capability probe: it tries to open the window and
// degrades to the console when that fails.

use crate::error::Result;
use crate::core_modules::indicator::format_distance;
use crate::pipeline::FrameAnalysis;
use image::RgbImage;
use log::{info, warn};

pub trait DisplaySink {
    /// Whether frames are actually put on screen (and so want on-frame extras
    /// like the FPS counter).
    fn renders_frames(&self) -> bool;

    fn show(&mut self, frame: &RgbImage, analysis: &FrameAnalysis) -> Result<()>;

    /// `true` once the user has asked to stop.
    fn poll_quit(&mut self) -> bool;

    fn teardown(&mut self);
}

/// Logs a status line every `interval` frames instead of drawing.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    interval: u64,
    last_line: Option<String>,
}

impl ConsoleSink {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            last_line: None,
        }
    }

    /// The most recent status line that was logged.
    pub fn last_line(&self) -> Option<&str> {
        self.last_line.as_deref()
    }
}

pub fn status_line(analysis: &FrameAnalysis) -> String {
    format!(
        "State: {}, Distance: {}, FPS: {:.1}",
        analysis.state,
        format_distance(analysis.distance),
        analysis.fps
    )
}

impl DisplaySink for ConsoleSink {
    fn renders_frames(&self) -> bool {
        false
    }

    fn show(&mut self, _frame: &RgbImage, analysis: &FrameAnalysis) -> Result<()> {
        if analysis.frame_index % self.interval == 0 {
            let line = status_line(analysis);
            info!("{line}");
            self.last_line = Some(line);
        }
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        false
    }

    fn teardown(&mut self) {}
}

/// Opens the windowed sink, or falls back to a `ConsoleSink` if the display
/// is unavailable.
pub fn select_sink<F>(open_window: F, status_interval: u64) -> Box<dyn DisplaySink>
where
    F: FnOnce() -> Result<Box<dyn DisplaySink>>,
{
    match open_window() {
        Ok(sink) => sink,
        Err(err) => {
            warn!("GUI not available ({err}). Running in console mode only.");
            Box::new(ConsoleSink::new(status_interval))
        }
    }
}
