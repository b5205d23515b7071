// THEORY:
// The `HandDetector` is the engine of the segmentation layer. It implements a
// "Skin Mask, Largest Blob" strategy: rather than modelling a hand's shape, it
// assumes that the biggest skin-colored region in view is the hand.
//
// Algorithm steps:
// 1.  **Downscale**: the frame is halved in each dimension before any per-pixel
//     work. Steps 2 to 6 run at this reduced resolution.
// 2.  **Skin Mask**: pixels are converted to 8-bit HSV and tested against the
//     skin band (see `mask`).
// 3.  **Morphology**: two dilations then one erosion with a 3x3 element close
//     small gaps and absorb speckle.
// 4.  **Outer Contours**: only outer borders are kept; holes are ignored.
// 5.  **Largest Blob**: the contour with the greatest polygon area wins. If it
//     encloses fewer than `min_area` half-resolution pixels it is noise, and
//     the detector reports `Detection::Absent`.
// 6.  **Centroid**: area-weighted first moments, or the bounding-box center if
//     the polygon has zero area. The result records which branch was taken.
// 7.  **Scale Back**: centroid and every contour point are multiplied by the
//     inverse of the downscale factor to land in original-frame coordinates.
//
// The detector is stateless across frames: no tracking, no history. Every
// degenerate input (empty mask, tiny blob, zero moments) has a defined result
// and nothing here can fail.

use crate::core_modules::contour::{self, Centroid, Contour};
use crate::core_modules::geometry::Point;
use crate::core_modules::hsv::hsv::HsvRange;
use crate::core_modules::mask;
use crate::core_modules::overlay::{Color, Overlay};
use image::RgbImage;
use log::debug;

/// Tunable parameters for skin segmentation.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// The integer factor the frame is shrunk by before detection.
    pub downscale: i32,
    /// Inclusive HSV band treated as skin.
    pub skin_range: HsvRange,
    pub dilate_iterations: u32,
    pub erode_iterations: u32,
    /// Smallest accepted contour area, in downscaled pixels.
    pub min_area: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            downscale: 2,
            skin_range: HsvRange::skin(),
            dilate_iterations: 2,
            erode_iterations: 1,
            min_area: 500.0,
        }
    }
}

/// The outcome of one detection call. Contour and centroid always travel together.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Present { contour: Contour, centroid: Centroid },
    Absent,
}

impl Detection {
    pub fn is_present(&self) -> bool {
        matches!(self, Detection::Present { .. })
    }

    pub fn centroid(&self) -> Option<Point> {
        match self {
            Detection::Present { centroid, .. } => Some(centroid.point),
            Detection::Absent => None,
        }
    }
}

/// Locates the most likely hand region in a color frame.
#[derive(Debug, Clone, Default)]
pub struct HandDetector {
    config: DetectorConfig,
}

impl HandDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn detect(&self, frame: &RgbImage) -> Detection {
        if frame.width() == 0 || frame.height() == 0 {
            return Detection::Absent;
        }
        let factor = self.config.downscale.max(1);

        // --- 1. Downscale ---
        let small = mask::downscale(frame, 1.0 / factor as f64);

        // --- 2. Skin Mask & Morphology ---
        let raw = mask::in_range(&small, &self.config.skin_range);
        let cleaned = mask::close_gaps(raw, self.config.dilate_iterations, self.config.erode_iterations);

        // --- 3. Outer Contours ---
        let contours = contour::external_contours(&cleaned);
        if contours.is_empty() {
            return Detection::Absent;
        }

        // --- 4. Largest Blob & Area Gate ---
        let Some((largest, area)) = contour::largest_by_area(contours) else {
            return Detection::Absent;
        };
        if area < self.config.min_area {
            debug!("largest skin blob rejected: area {area:.1} < {}", self.config.min_area);
            return Detection::Absent;
        }

        // --- 5. Centroid & Scale Back ---
        match largest.centroid() {
            Some(centroid) => {
                let centroid = centroid.scaled(factor);
                debug!(
                    "hand detected: area {area:.1}, centroid ({}, {}) via {:?}",
                    centroid.point.x, centroid.point.y, centroid.method
                );
                Detection::Present {
                    contour: largest.scaled(factor),
                    centroid,
                }
            }
            None => Detection::Absent,
        }
    }

    /// Adds the hand outline, a centroid marker and the bounding box to `overlay`.
    /// Does nothing for `Detection::Absent`.
    pub fn draw_detection(&self, overlay: &mut Overlay, detection: &Detection) {
        let Detection::Present { contour, centroid } = detection else {
            return;
        };

        overlay.polyline(contour.points.clone(), Color::GREEN, 2);
        overlay.filled_circle(centroid.point, 5, Color::BLUE);
        if let Some(rect) = contour.bounding_rect() {
            overlay.rectangle(rect.top_left(), rect.bottom_right(), Color::YELLOW, 2);
        }
    }
}
