// THEORY:
// The `mask` module is the first spatial stage of hand detection. It takes a
// full-resolution color frame and produces a clean binary mask of "probably
// skin" pixels at half resolution.
//
// Steps:
// 1.  **Downscale**: halving each dimension quarters the per-pixel work for
//     every later stage. Accuracy loss is bounded by the 2x scale-back.
// 2.  **Threshold**: each pixel is converted to 8-bit HSV and tested against an
//     inclusive `HsvRange`. Inside → 255, outside → 0.
// 3.  **Close then trim**: dilation runs more iterations than erosion. Small
//     gaps between fingers and speckle holes get filled, and the net effect on
//     the region is a slight growth rather than a shrink.
//
// The mask is a transient `GrayImage`; it never leaves a single detection call.

use crate::core_modules::hsv::hsv::{Hsv, HsvRange};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Resizes `frame` by `factor` in both dimensions. Each output dimension is
/// rounded and never drops below one pixel.
pub fn downscale(frame: &RgbImage, factor: f64) -> RgbImage {
    let width = scaled_dimension(frame.width(), factor);
    let height = scaled_dimension(frame.height(), factor);
    if width == frame.width() && height == frame.height() {
        return frame.clone();
    }
    imageops::resize(frame, width, height, FilterType::Triangle)
}

fn scaled_dimension(dimension: u32, factor: f64) -> u32 {
    ((dimension as f64 * factor).round() as u32).max(1)
}

/// Marks every pixel whose HSV value falls inside `range`.
pub fn in_range(frame: &RgbImage, range: &HsvRange) -> GrayImage {
    let mut mask = GrayImage::new(frame.width(), frame.height());
    for (x, y, pixel) in frame.enumerate_pixels() {
        let value = if range.contains(Hsv::from(pixel)) {
            FOREGROUND
        } else {
            BACKGROUND
        };
        mask.put_pixel(x, y, Luma([value]));
    }
    mask
}

/// Applies `dilations` passes then `erosions` passes of a 3x3 square element.
pub fn close_gaps(mask: GrayImage, dilations: u32, erosions: u32) -> GrayImage {
    // A chessboard (L-inf) radius of 1 is exactly the 3x3 square.
    let mut cleaned = mask;
    for _ in 0..dilations {
        cleaned = dilate(&cleaned, Norm::LInf, 1);
    }
    for _ in 0..erosions {
        cleaned = erode(&cleaned, Norm::LInf, 1);
    }
    cleaned
}

/// Number of foreground pixels.
pub fn foreground_count(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p.0[0] > BACKGROUND).count()
}
