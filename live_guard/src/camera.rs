use hand_guard::{GuardError, VideoSource};
use image::RgbImage;
use log::{debug, warn};
use opencv::{
    core::Mat,
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};

/// A webcam opened through OpenCV's video I/O.
pub struct CameraSource {
    capture: VideoCapture,
    frame: Mat,
}

fn source_error(err: opencv::Error) -> GuardError {
    GuardError::Source(err.to_string())
}

impl CameraSource {
    pub fn open(index: i32) -> hand_guard::Result<Self> {
        let capture = VideoCapture::new(index, videoio::CAP_ANY).map_err(source_error)?;
        if !capture.is_opened().map_err(source_error)? {
            return Err(GuardError::Source(format!("camera {index} is not available")));
        }
        Ok(Self {
            capture,
            frame: Mat::default(),
        })
    }
}

impl VideoSource for CameraSource {
    fn configure(&mut self, width: u32, height: u32, fps: f64) -> bool {
        let requests = [
            (videoio::CAP_PROP_FRAME_WIDTH, width as f64),
            (videoio::CAP_PROP_FRAME_HEIGHT, height as f64),
            (videoio::CAP_PROP_FPS, fps),
        ];
        let mut applied = true;
        for (property, value) in requests {
            match self.capture.set(property, value) {
                Ok(true) => {}
                Ok(false) => applied = false,
                Err(err) => {
                    debug!("camera rejected property {property}: {err}");
                    applied = false;
                }
            }
        }
        applied
    }

    fn read(&mut self) -> hand_guard::Result<Option<RgbImage>> {
        if !self.capture.read(&mut self.frame).map_err(source_error)? || self.frame.empty() {
            return Ok(None);
        }
        bgr_mat_to_rgb(&self.frame).map(Some)
    }

    fn release(&mut self) {
        if let Err(err) = self.capture.release() {
            warn!("failed to release camera: {err}");
        }
    }
}

/// Copies a BGR `Mat` into an `RgbImage`.
pub fn bgr_mat_to_rgb(bgr: &Mat) -> hand_guard::Result<RgbImage> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0).map_err(source_error)?;
    let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
    let bytes = rgb.data_bytes().map_err(source_error)?.to_vec();
    RgbImage::from_raw(width, height, bytes)
        .ok_or_else(|| GuardError::Source(format!("unexpected buffer size for {width}x{height} frame")))
}
