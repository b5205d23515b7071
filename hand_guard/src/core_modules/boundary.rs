// THEORY:
// The `BoundaryZone` is the fixed reference the hand is measured against: a
// rectangle of constant size centered in the frame. It is recomputed every
// frame from the frame dimensions, which are constant within a session, so in
// practice it never moves. Detection results never influence it.
//
// Only the center takes part in classification. The corners are kept because
// they are drawn, and because they pin down the zone geometry in tests.

use crate::core_modules::geometry::Point;
use crate::core_modules::overlay::{Color, Overlay};

/// Width and height of the safety zone in full-resolution pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSize {
    pub width: i32,
    pub height: i32,
}

impl Default for ZoneSize {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryZone {
    pub center: Point,
    pub top_left: Point,
    pub bottom_right: Point,
}

impl BoundaryZone {
    /// The zone of `size` centered in a `width` x `height` frame. All halving
    /// uses floor division.
    pub fn centered(width: u32, height: u32, size: ZoneSize) -> Self {
        let center = Point::new(width as i32 / 2, height as i32 / 2);
        let (half_w, half_h) = (size.width.div_euclid(2), size.height.div_euclid(2));
        Self {
            center,
            top_left: Point::new(center.x - half_w, center.y - half_h),
            bottom_right: Point::new(center.x + half_w, center.y + half_h),
        }
    }

    /// White outline plus a filled marker on the center.
    pub fn draw(&self, overlay: &mut Overlay) {
        overlay.rectangle(self.top_left, self.bottom_right, Color::WHITE, 2);
        overlay.filled_circle(self.center, 5, Color::WHITE);
    }
}

/// Computes the zone for a frame of `dimensions` and adds it to `overlay`.
pub fn draw_virtual_boundary(dimensions: (u32, u32), size: ZoneSize, overlay: &mut Overlay) -> BoundaryZone {
    let zone = BoundaryZone::centered(dimensions.0, dimensions.1, size);
    zone.draw(overlay);
    zone
}
