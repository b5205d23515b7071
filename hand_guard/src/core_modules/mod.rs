pub mod boundary;
pub mod contour;
pub mod geometry;
pub mod hand_detector;
pub mod hsv;
pub mod indicator;
pub mod mask;
pub mod overlay;
