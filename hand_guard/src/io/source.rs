// THEORY:
// A `VideoSource` is anything that hands the pipeline one color frame at a
// time. The pipeline owns the source for the whole session and never retries:
// `Ok(None)` means the stream is over, and an `Err` ends the session just the
// same. Device configuration is a request, not a guarantee.
//
// `FrameSequenceSource` replays a fixed list of frames, either image files on
// disk (sorted by file name) or frames already in memory. It lets the full
// pipeline run without a camera attached.

use crate::error::{GuardError, Result};
use image::RgbImage;
use log::{debug, info};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

pub trait VideoSource {
    /// Requests a capture size and rate. Returns `false` if the request was not applied.
    fn configure(&mut self, width: u32, height: u32, fps: f64) -> bool;

    /// The next frame, or `None` once the stream has ended.
    fn read(&mut self) -> Result<Option<RgbImage>>;

    /// Frees the underlying device. Further reads report end of stream.
    fn release(&mut self);
}

const FRAME_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "ppm"];

enum Frames {
    Files(VecDeque<PathBuf>),
    Memory(VecDeque<RgbImage>),
}

/// Plays back a finite sequence of frames.
pub struct FrameSequenceSource {
    frames: Frames,
}

impl FrameSequenceSource {
    /// Collects every image file in `dir`, ordered by file name.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && has_frame_extension(path))
            .collect();
        if paths.is_empty() {
            return Err(GuardError::Source(format!("no image frames found in {}", dir.display())));
        }
        paths.sort();
        info!("replaying {} frames from {}", paths.len(), dir.display());
        Ok(Self {
            frames: Frames::Files(paths.into()),
        })
    }

    pub fn from_frames(frames: impl IntoIterator<Item = RgbImage>) -> Self {
        Self {
            frames: Frames::Memory(frames.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        match &self.frames {
            Frames::Files(paths) => paths.len(),
            Frames::Memory(frames) => frames.len(),
        }
    }
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl VideoSource for FrameSequenceSource {
    fn configure(&mut self, width: u32, height: u32, fps: f64) -> bool {
        debug!("frame sequence ignores capture request {width}x{height} @ {fps}");
        false
    }

    fn read(&mut self) -> Result<Option<RgbImage>> {
        match &mut self.frames {
            Frames::Memory(frames) => Ok(frames.pop_front()),
            Frames::Files(paths) => match paths.pop_front() {
                Some(path) => Ok(Some(image::open(&path)?.to_rgb8())),
                None => Ok(None),
            },
        }
    }

    fn release(&mut self) {
        match &mut self.frames {
            Frames::Files(paths) => paths.clear(),
            Frames::Memory(frames) => frames.clear(),
        }
    }
}
