// THEORY:
// This file is the entry point for the `hand_guard` library crate. It exposes
// the `FramePipeline` and its data structures (`PipelineConfig`,
// `FrameAnalysis`, `SessionSummary`) as the high-level interface, plus the
// collaborator traits (`VideoSource`, `DisplaySink`, `Canvas`) a front-end
// implements to plug in a camera and a window.
//
// The stages under `core_modules` are public so they can be tested and reused
// individually, but a front-end normally needs nothing beyond the re-exports
// below.

pub mod core_modules;
pub mod error;
pub mod io;
pub mod pipeline;

pub use core_modules::boundary::{BoundaryZone, ZoneSize};
pub use core_modules::contour::{Centroid, CentroidMethod, Contour};
pub use core_modules::geometry::{Point, SafetyState, Thresholds, classify, distance};
pub use core_modules::hand_detector::{DetectorConfig, Detection, HandDetector};
pub use core_modules::overlay::{Canvas, Color, DrawCommand, ImageCanvas, Overlay, TextPlacement};
pub use error::{GuardError, Result};
pub use io::{ConsoleSink, DisplaySink, FrameSequenceSource, VideoSource, select_sink};
pub use pipeline::{FrameAnalysis, FramePipeline, PipelineConfig, SessionEnd, SessionSummary};
