use hand_guard::core_modules::overlay::{Canvas, Color};
use hand_guard::{DisplaySink, FrameAnalysis, GuardError, Point};
use image::RgbImage;
use log::warn;
use opencv::{
    core::{self, Mat, Scalar, Vector},
    highgui, imgproc,
    prelude::*,
};

fn sink_error(err: opencv::Error) -> GuardError {
    GuardError::Sink(err.to_string())
}

fn render_error(err: opencv::Error) -> GuardError {
    GuardError::Render(err.to_string())
}

fn cv_point(point: Point) -> core::Point {
    core::Point::new(point.x, point.y)
}

fn bgr(color: Color) -> Scalar {
    Scalar::new(color.blue as f64, color.green as f64, color.red as f64, 0.0)
}

/// Copies an `RgbImage` into a fresh BGR `Mat`.
pub fn rgb_to_bgr_mat(frame: &RgbImage) -> hand_guard::Result<Mat> {
    let mut rgb = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        core::CV_8UC3,
        Scalar::all(0.0),
    )
    .map_err(sink_error)?;
    rgb.data_bytes_mut().map_err(sink_error)?.copy_from_slice(frame.as_raw());

    let mut bgr = Mat::default();
    imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0).map_err(sink_error)?;
    Ok(bgr)
}

/// Rasterizes an overlay into a BGR `Mat` with OpenCV's drawing functions.
pub struct MatCanvas<'a> {
    mat: &'a mut Mat,
}

impl<'a> MatCanvas<'a> {
    pub fn new(mat: &'a mut Mat) -> Self {
        Self { mat }
    }
}

impl Canvas for MatCanvas<'_> {
    fn dimensions(&self) -> (u32, u32) {
        (self.mat.cols() as u32, self.mat.rows() as u32)
    }

    fn rectangle(&mut self, top_left: Point, bottom_right: Point, color: Color, thickness: i32) -> hand_guard::Result<()> {
        imgproc::rectangle_points(
            &mut *self.mat,
            cv_point(top_left),
            cv_point(bottom_right),
            bgr(color),
            thickness,
            imgproc::LINE_8,
            0,
        )
        .map_err(render_error)
    }

    fn filled_circle(&mut self, center: Point, radius: i32, color: Color) -> hand_guard::Result<()> {
        imgproc::circle(
            &mut *self.mat,
            cv_point(center),
            radius,
            bgr(color),
            imgproc::FILLED,
            imgproc::LINE_8,
            0,
        )
        .map_err(render_error)
    }

    fn polyline(&mut self, points: &[Point], color: Color, thickness: i32) -> hand_guard::Result<()> {
        let points: Vector<core::Point> = points.iter().copied().map(cv_point).collect();
        imgproc::polylines(&mut *self.mat, &points, true, bgr(color), thickness, imgproc::LINE_8, 0)
            .map_err(render_error)
    }

    fn text(&mut self, text: &str, origin: Point, scale: f64, color: Color, thickness: i32) -> hand_guard::Result<()> {
        imgproc::put_text(
            &mut *self.mat,
            text,
            cv_point(origin),
            imgproc::FONT_HERSHEY_SIMPLEX,
            scale,
            bgr(color),
            thickness,
            imgproc::LINE_AA,
            false,
        )
        .map_err(render_error)
    }

    fn text_size(&self, text: &str, scale: f64, thickness: i32) -> hand_guard::Result<(i32, i32)> {
        let mut baseline = 0;
        let size = imgproc::get_text_size(text, imgproc::FONT_HERSHEY_SIMPLEX, scale, thickness, &mut baseline)
            .map_err(render_error)?;
        Ok((size.width, size.height))
    }
}

/// A highgui window. Owns the 'q' quit key.
pub struct WindowSink {
    title: String,
}

impl WindowSink {
    /// Opens the window; fails when no display is available.
    pub fn open(title: &str) -> hand_guard::Result<Self> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE).map_err(sink_error)?;
        Ok(Self {
            title: title.to_string(),
        })
    }
}

impl DisplaySink for WindowSink {
    fn renders_frames(&self) -> bool {
        true
    }

    fn show(&mut self, frame: &RgbImage, analysis: &FrameAnalysis) -> hand_guard::Result<()> {
        let mut output = rgb_to_bgr_mat(frame)?;
        analysis.overlay.paint(&mut MatCanvas::new(&mut output))?;
        highgui::imshow(&self.title, &output).map_err(sink_error)
    }

    fn poll_quit(&mut self) -> bool {
        match highgui::wait_key(1) {
            Ok(key) => key != -1 && (key & 0xFF) == 'q' as i32,
            Err(err) => {
                warn!("key polling failed: {err}");
                false
            }
        }
    }

    fn teardown(&mut self) {
        if let Err(err) = highgui::destroy_all_windows() {
            warn!("failed to close windows: {err}");
        }
    }
}
