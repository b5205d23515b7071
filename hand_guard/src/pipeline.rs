// THEORY:
// The `pipeline` module is the top-level API of the proximity guard. It wires
// the core stages into the per-frame loop and owns the little state that has
// to survive from one frame to the next.
//
// One iteration:
//   ACQUIRE → DETECT → MEASURE_CLASSIFY → RENDER → THROTTLE → (loop) | TERMINATE
//
// 1.  **Acquire**: read from the `VideoSource` and mirror horizontally so the
//     picture behaves like a mirror for someone facing the camera. End of
//     stream or a read error terminates the session; there are no retries.
// 2.  **Detect**: run the `HandDetector`.
// 3.  **Measure & Classify**: a present hand is measured against the zone
//     center and classified. An absent hand is `Safe` at infinite distance.
// 4.  **Render**: zone, hand overlay, state indicator and (for windowed sinks)
//     the measured FPS, collected into an `Overlay` the sink paints.
// 5.  **Throttle**: sleep whatever is left of the per-frame budget.
//
// Everything runs on the caller's thread. Session state (frame counter, FPS
// window, throttle timestamp) lives in `FramePipeline` fields.

use crate::core_modules::boundary::{BoundaryZone, ZoneSize, draw_virtual_boundary};
use crate::core_modules::geometry::{self, SafetyState, Thresholds, classify};
use crate::core_modules::hand_detector::{DetectorConfig, Detection, HandDetector};
use crate::core_modules::indicator::{draw_fps, draw_state_indicator};
use crate::core_modules::overlay::Overlay;
use crate::error::Result;
use crate::io::{DisplaySink, VideoSource};
use image::RgbImage;
use image::imageops::flip_horizontal_in_place;
use log::{error, info, warn};
use std::time::{Duration, Instant};

/// Configuration for the FramePipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Capture size requested from the video source.
    pub capture_width: u32,
    pub capture_height: u32,
    /// Capture rate requested from the video source.
    pub capture_fps: f64,
    /// Processing rate the loop throttles down to.
    pub target_fps: f64,
    pub zone_size: ZoneSize,
    pub thresholds: Thresholds,
    pub detector: DetectorConfig,
    /// Draw the measured frame rate on frames that reach a window.
    pub show_fps: bool,
    /// Frames per FPS measurement window, and per console status line.
    pub status_interval: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capture_width: 640,
            capture_height: 480,
            capture_fps: 30.0,
            target_fps: 15.0,
            zone_size: ZoneSize::default(),
            thresholds: Thresholds::default(),
            detector: DetectorConfig::default(),
            show_fps: true,
            status_interval: 30,
        }
    }
}

/// Everything the pipeline learned about one frame.
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    /// 1-based position of the frame in the session.
    pub frame_index: u64,
    pub detection: Detection,
    pub zone: BoundaryZone,
    /// Centroid-to-zone-center distance; `f64::INFINITY` without a hand.
    pub distance: f64,
    pub state: SafetyState,
    /// Most recent frame-rate measurement.
    pub fps: f64,
    pub overlay: Overlay,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEnd {
    EndOfStream,
    QuitRequested,
    ReadFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub frames: u64,
    pub end: SessionEnd,
}

/// Frame rate measured over fixed windows of frames. Between measurements the
/// last value is reported unchanged.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    window: u64,
    frames: u64,
    window_start: Instant,
    current: f64,
}

impl FpsMeter {
    pub fn new(window: u64, initial: f64) -> Self {
        Self::starting_at(window, initial, Instant::now())
    }

    pub fn starting_at(window: u64, initial: f64, start: Instant) -> Self {
        Self {
            window: window.max(1),
            frames: 0,
            window_start: start,
            current: initial,
        }
    }

    /// Counts one frame finished at `now` and returns the current estimate.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        self.frames += 1;
        if self.frames % self.window == 0 {
            let elapsed = now.saturating_duration_since(self.window_start).as_secs_f64();
            if elapsed > 0.0 {
                self.current = self.window as f64 / elapsed;
            }
            self.window_start = now;
        }
        self.current
    }

    pub fn current(&self) -> f64 {
        self.current
    }
}

/// Keeps the loop at or below a target rate.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    budget: Duration,
    last: Instant,
}

impl FrameThrottle {
    pub fn new(target_fps: f64) -> Self {
        let budget = if target_fps > 0.0 && target_fps.is_finite() {
            Duration::from_secs_f64(1.0 / target_fps)
        } else {
            Duration::ZERO
        };
        Self {
            budget,
            last: Instant::now(),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time still owed to the current frame at `now`; never negative.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.budget.saturating_sub(now.saturating_duration_since(self.last))
    }

    /// Sleeps off the rest of the budget and starts the next frame.
    pub fn wait(&mut self) {
        let remaining = self.remaining_at(Instant::now());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        self.last = Instant::now();
    }

    pub fn restart(&mut self) {
        self.last = Instant::now();
    }
}

/// The per-session driver: one instance per video stream.
pub struct FramePipeline {
    config: PipelineConfig,
    detector: HandDetector,
    fps: FpsMeter,
    throttle: FrameThrottle,
    frame_index: u64,
    draw_fps: bool,
}

impl FramePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            detector: HandDetector::new(config.detector.clone()),
            fps: FpsMeter::new(config.status_interval, config.target_fps),
            throttle: FrameThrottle::new(config.target_fps),
            frame_index: 0,
            draw_fps: config.show_fps,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn frames_processed(&self) -> u64 {
        self.frame_index
    }

    /// Detect, measure, classify and render one (already mirrored) frame.
    pub fn process_frame(&mut self, frame: &RgbImage) -> FrameAnalysis {
        self.frame_index += 1;
        let mut overlay = Overlay::new();

        // --- Detect ---
        let detection = self.detector.detect(frame);

        // --- Measure & Classify ---
        let zone = draw_virtual_boundary(frame.dimensions(), self.config.zone_size, &mut overlay);
        let (distance, state) = match detection.centroid() {
            Some(centroid) => {
                let d = geometry::distance(centroid, zone.center);
                (d, classify(d, &self.config.thresholds))
            }
            None => (f64::INFINITY, SafetyState::Safe),
        };

        // --- Render ---
        self.detector.draw_detection(&mut overlay, &detection);
        draw_state_indicator(&mut overlay, state, distance, frame.height());

        let fps = self.fps.tick_at(Instant::now());
        if self.draw_fps {
            draw_fps(&mut overlay, fps, frame.height());
        }

        FrameAnalysis {
            frame_index: self.frame_index,
            detection,
            zone,
            distance,
            state,
            fps,
            overlay,
        }
    }

    /// Runs the acquire/process/show loop until the stream ends, a read fails
    /// or the sink asks to quit. The source is released and the sink torn down
    /// on every exit path.
    pub fn run<S, D>(&mut self, source: &mut S, sink: &mut D) -> Result<SessionSummary>
    where
        S: VideoSource + ?Sized,
        D: DisplaySink + ?Sized,
    {
        info!("Hand Distance Warning System Started");
        if !source.configure(
            self.config.capture_width,
            self.config.capture_height,
            self.config.capture_fps,
        ) {
            warn!(
                "video source did not accept {}x{} @ {} fps; using its native format",
                self.config.capture_width, self.config.capture_height, self.config.capture_fps
            );
        }
        self.draw_fps = self.config.show_fps && sink.renders_frames();
        if sink.renders_frames() {
            info!("Press 'q' to quit");
        }

        let outcome = self.drive(source, sink);

        source.release();
        sink.teardown();
        info!("Hand Distance Warning System Stopped");

        let end = outcome?;
        Ok(SessionSummary {
            frames: self.frame_index,
            end,
        })
    }

    fn drive<S, D>(&mut self, source: &mut S, sink: &mut D) -> Result<SessionEnd>
    where
        S: VideoSource + ?Sized,
        D: DisplaySink + ?Sized,
    {
        self.throttle.restart();
        loop {
            // --- Acquire ---
            let mut frame = match source.read() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!("video stream ended after {} frames", self.frame_index);
                    return Ok(SessionEnd::EndOfStream);
                }
                Err(err) => {
                    error!("Failed to read frame: {err}");
                    return Ok(SessionEnd::ReadFailed(err.to_string()));
                }
            };
            flip_horizontal_in_place(&mut frame);

            let analysis = self.process_frame(&frame);
            sink.show(&frame, &analysis)?;

            if sink.poll_quit() {
                return Ok(SessionEnd::QuitRequested);
            }

            // --- Throttle ---
            self.throttle.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_meter_holds_its_value_between_windows() {
        let start = Instant::now();
        let mut meter = FpsMeter::starting_at(30, 15.0, start);
        for i in 1..30 {
            assert_eq!(meter.tick_at(start + Duration::from_millis(i * 10)), 15.0);
        }
        // 30 frames in 1.5 s.
        let fps = meter.tick_at(start + Duration::from_millis(1500));
        assert!((fps - 20.0).abs() < 1e-9);
        assert_eq!(meter.tick_at(start + Duration::from_millis(1600)), fps);
    }

    #[test]
    fn fps_meter_ignores_zero_length_windows() {
        let start = Instant::now();
        let mut meter = FpsMeter::starting_at(1, 15.0, start);
        assert_eq!(meter.tick_at(start), 15.0);
    }

    #[test]
    fn throttle_never_owes_negative_time() {
        let throttle = FrameThrottle::new(15.0);
        let late = Instant::now() + Duration::from_secs(1);
        assert_eq!(throttle.remaining_at(late), Duration::ZERO);
        assert!(throttle.remaining_at(Instant::now()) <= throttle.budget());
    }

    #[test]
    fn throttle_budget_matches_target_rate() {
        let budget = FrameThrottle::new(20.0).budget().as_secs_f64();
        assert!((budget - 0.05).abs() < 1e-9);
        assert_eq!(FrameThrottle::new(0.0).budget(), Duration::ZERO);
    }

    #[test]
    fn no_hand_means_safe_at_infinity() {
        let mut pipeline = FramePipeline::new(PipelineConfig::default());
        let analysis = pipeline.process_frame(&RgbImage::new(640, 480));
        assert_eq!(analysis.frame_index, 1);
        assert_eq!(analysis.detection, Detection::Absent);
        assert_eq!(analysis.state, SafetyState::Safe);
        assert!(analysis.distance.is_infinite());
        assert!(analysis.overlay.contains_text("Distance: N/A"));
    }

    #[test]
    fn fps_text_follows_configuration() {
        let mut with_fps = FramePipeline::new(PipelineConfig::default());
        assert!(with_fps.process_frame(&RgbImage::new(64, 48)).overlay.contains_text("FPS: 15.0"));

        let mut without_fps = FramePipeline::new(PipelineConfig {
            show_fps: false,
            ..PipelineConfig::default()
        });
        assert!(!without_fps.process_frame(&RgbImage::new(64, 48)).overlay.contains_text("FPS"));
    }
}
