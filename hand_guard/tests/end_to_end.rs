use hand_guard::core_modules::indicator::ALERT_TEXT;
use hand_guard::{
    CentroidMethod, Detection, DisplaySink, FrameAnalysis, FramePipeline, FrameSequenceSource,
    GuardError, ImageCanvas, PipelineConfig, Point, SafetyState, SessionEnd, VideoSource,
};
use image::{Rgb, RgbImage};

const SKIN: Rgb<u8> = Rgb([220, 170, 140]);
const BACKDROP: Rgb<u8> = Rgb([20, 40, 90]);

fn frame_with_blob(x0: u32, y0: u32, width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(640, 480, |x, y| {
        if (x0..x0 + width).contains(&x) && (y0..y0 + height).contains(&y) {
            SKIN
        } else {
            BACKDROP
        }
    })
}

fn fast_config() -> PipelineConfig {
    PipelineConfig {
        target_fps: 1000.0,
        ..PipelineConfig::default()
    }
}

/// Paints every frame like a window would, remembers what it saw, and asks to
/// quit after `quit_after` frames if set.
#[derive(Default)]
struct RecordingSink {
    analyses: Vec<FrameAnalysis>,
    labels: Vec<Vec<String>>,
    quit_after: Option<usize>,
    torn_down: bool,
}

impl DisplaySink for RecordingSink {
    fn renders_frames(&self) -> bool {
        true
    }

    fn show(&mut self, frame: &RgbImage, analysis: &FrameAnalysis) -> hand_guard::Result<()> {
        let mut painted = frame.clone();
        let mut canvas = ImageCanvas::new(&mut painted);
        analysis.overlay.paint(&mut canvas)?;
        self.labels
            .push(canvas.into_labels().into_iter().map(|l| l.text).collect());
        self.analyses.push(analysis.clone());
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        self.quit_after.is_some_and(|n| self.analyses.len() >= n)
    }

    fn teardown(&mut self) {
        self.torn_down = true;
    }
}

struct FailingSource {
    frames_before_failure: usize,
    released: bool,
}

impl VideoSource for FailingSource {
    fn configure(&mut self, _width: u32, _height: u32, _fps: f64) -> bool {
        true
    }

    fn read(&mut self) -> hand_guard::Result<Option<RgbImage>> {
        if self.frames_before_failure == 0 {
            return Err(GuardError::Source("camera disconnected".into()));
        }
        self.frames_before_failure -= 1;
        Ok(Some(RgbImage::new(640, 480)))
    }

    fn release(&mut self) {
        self.released = true;
    }
}

#[test]
fn centered_hand_sized_blob_is_danger() {
    // 40 x 50 = 2000 px, centered on (320, 240); symmetric under mirroring.
    let mut source = FrameSequenceSource::from_frames(vec![frame_with_blob(300, 216, 40, 50)]);
    let mut sink = RecordingSink::default();
    let mut pipeline = FramePipeline::new(fast_config());

    let summary = pipeline.run(&mut source, &mut sink).unwrap();
    assert_eq!(summary.frames, 1);
    assert_eq!(summary.end, SessionEnd::EndOfStream);

    let analysis = &sink.analyses[0];
    let centroid = analysis.detection.centroid().expect("hand should be detected");
    assert!((centroid.x - 320).abs() <= 4, "centroid {centroid:?}");
    assert!((centroid.y - 240).abs() <= 4, "centroid {centroid:?}");
    assert!(analysis.distance <= 5.0);
    assert_eq!(analysis.state, SafetyState::Danger);
    assert!(analysis.overlay.contains_text(ALERT_TEXT));
    assert!(sink.labels[0].iter().any(|t| t == "DANGER DANGER"));
    assert!(sink.labels[0].iter().any(|t| t == "State: DANGER"));
}

#[test]
fn tiny_blob_is_ignored_and_safe() {
    // 10 x 10 = 100 px, far below the detection floor once halved.
    let mut source = FrameSequenceSource::from_frames(vec![frame_with_blob(315, 235, 10, 10)]);
    let mut sink = RecordingSink::default();
    FramePipeline::new(fast_config()).run(&mut source, &mut sink).unwrap();

    let analysis = &sink.analyses[0];
    assert_eq!(analysis.detection, Detection::Absent);
    assert_eq!(analysis.state, SafetyState::Safe);
    assert!(analysis.distance.is_infinite());
    assert!(!analysis.overlay.contains_text(ALERT_TEXT));
}

#[test]
fn frames_are_mirrored_before_detection() {
    // Right of center in the raw frame, so left of center once mirrored.
    let mut source = FrameSequenceSource::from_frames(vec![frame_with_blob(400, 216, 40, 50)]);
    let mut sink = RecordingSink::default();
    FramePipeline::new(fast_config()).run(&mut source, &mut sink).unwrap();

    let analysis = &sink.analyses[0];
    let centroid = analysis.detection.centroid().unwrap();
    assert!((centroid.x - 220).abs() <= 4, "centroid {centroid:?}");
    assert_eq!(analysis.state, SafetyState::Warning);
    assert!(!analysis.overlay.contains_text(ALERT_TEXT));
}

#[test]
fn detected_coordinates_are_even() {
    let mut pipeline = FramePipeline::new(fast_config());
    let analysis = pipeline.process_frame(&frame_with_blob(123, 77, 151, 99));
    let Detection::Present { contour, centroid } = analysis.detection else {
        panic!("expected a detection");
    };
    assert_eq!(centroid.method, CentroidMethod::Moments);
    assert!(contour.points.iter().all(|p| p.x % 2 == 0 && p.y % 2 == 0));
    assert_eq!(analysis.zone.center, Point::new(320, 240));
}

#[test]
fn quit_signal_stops_the_session() {
    let frames = (0..5).map(|_| RgbImage::new(640, 480));
    let mut source = FrameSequenceSource::from_frames(frames);
    let mut sink = RecordingSink {
        quit_after: Some(2),
        ..RecordingSink::default()
    };

    let summary = FramePipeline::new(fast_config()).run(&mut source, &mut sink).unwrap();
    assert_eq!(summary.end, SessionEnd::QuitRequested);
    assert_eq!(summary.frames, 2);
    assert!(sink.torn_down);
    // The source is released on exit, so nothing is left to read.
    assert!(source.read().unwrap().is_none());
}

#[test]
fn read_failure_ends_the_session_cleanly() {
    let mut source = FailingSource {
        frames_before_failure: 3,
        released: false,
    };
    let mut sink = RecordingSink::default();

    let summary = FramePipeline::new(fast_config()).run(&mut source, &mut sink).unwrap();
    assert_eq!(summary.frames, 3);
    assert!(matches!(summary.end, SessionEnd::ReadFailed(ref msg) if msg.contains("camera disconnected")));
    assert!(source.released);
    assert!(sink.torn_down);
}

#[test]
fn fps_overlay_only_reaches_rendering_sinks() {
    let mut source = FrameSequenceSource::from_frames(vec![RgbImage::new(640, 480)]);
    let mut sink = RecordingSink::default();
    FramePipeline::new(fast_config()).run(&mut source, &mut sink).unwrap();
    assert!(sink.analyses[0].overlay.contains_text("FPS:"));

    let mut source = FrameSequenceSource::from_frames(vec![RgbImage::new(640, 480)]);
    let mut console = hand_guard::ConsoleSink::new(1);
    FramePipeline::new(fast_config()).run(&mut source, &mut console).unwrap();
    assert_eq!(console.last_line(), Some("State: SAFE, Distance: N/A, FPS: 1000.0"));
}
