// THEORY:
// The `contour` module is the shape-analysis layer between the binary mask and
// the hand detector. It turns connected foreground regions into polygons and
// answers three questions about a polygon: how big is it, where is its center
// of mass, and what box encloses it.
//
// Key principles:
// 1.  **Outer borders only**: holes and nested regions are discarded. A hand
//     with a hole in the mask is still one hand.
// 2.  **Simplified chains**: border following yields every border pixel. Runs
//     of points moving in the same unit direction are collapsed to their end
//     points, which keeps the polygon exact while shrinking it considerably.
// 3.  **Polygon moments**: area and first moments come from Green's theorem
//     over the polygon edges, not from counting mask pixels. A polygon that
//     encloses nothing (a line, a single point) has `m00 == 0`.
// 4.  **Tagged centroid**: the zero-area case is an explicit branch that yields
//     a `CentroidMethod::BoundingBox` centroid, so callers can tell a fallback
//     apart from a genuine center of mass.

use crate::core_modules::geometry::Point;
use image::GrayImage;
use imageproc::contours::{self, BorderType};

/// An ordered, closed boundary polygon.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contour {
    pub points: Vec<Point>,
}

/// Zeroth and first spatial moments of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

/// An axis-aligned box in pixel units. `width`/`height` count pixels, so a
/// single point has a 1x1 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingRect {
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Center using integer floor division on the extents.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// How a centroid was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentroidMethod {
    /// Area-weighted first moments.
    Moments,
    /// The polygon encloses no area; the bounding-box center was used instead.
    BoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Centroid {
    pub point: Point,
    pub method: CentroidMethod,
}

impl Centroid {
    pub fn scaled(self, factor: i32) -> Self {
        Self {
            point: self.point.scaled(factor),
            method: self.method,
        }
    }
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Polygon moments via Green's theorem. Orientation is normalized so that
    /// `m00` is never negative.
    pub fn moments(&self) -> Moments {
        let n = self.points.len();
        if n < 3 {
            return Moments::default();
        }

        let mut a00 = 0.0;
        let mut a10 = 0.0;
        let mut a01 = 0.0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let (xi, yi) = (p.x as f64, p.y as f64);
            let (xj, yj) = (q.x as f64, q.y as f64);
            let cross = xi * yj - xj * yi;
            a00 += cross;
            a10 += cross * (xi + xj);
            a01 += cross * (yi + yj);
        }

        let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
        Moments {
            m00: sign * a00 / 2.0,
            m10: sign * a10 / 6.0,
            m01: sign * a01 / 6.0,
        }
    }

    /// Enclosed polygon area (shoelace).
    pub fn area(&self) -> f64 {
        self.moments().m00
    }

    /// Smallest pixel box containing every point; `None` for an empty contour.
    pub fn bounding_rect(&self) -> Option<BoundingRect> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(BoundingRect {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    /// Center of mass, falling back to the bounding-box center when the
    /// polygon has zero area. Coordinates are truncated toward zero.
    pub fn centroid(&self) -> Option<Centroid> {
        let moments = self.moments();
        if moments.m00 != 0.0 {
            return Some(Centroid {
                point: Point::new(
                    (moments.m10 / moments.m00) as i32,
                    (moments.m01 / moments.m00) as i32,
                ),
                method: CentroidMethod::Moments,
            });
        }
        let rect = self.bounding_rect()?;
        Some(Centroid {
            point: rect.center(),
            method: CentroidMethod::BoundingBox,
        })
    }

    /// Returns a copy with every point multiplied by `factor`.
    pub fn scaled(&self, factor: i32) -> Contour {
        Contour {
            points: self.points.iter().map(|p| p.scaled(factor)).collect(),
        }
    }
}

/// Finds the outer borders of every foreground region in `mask`.
pub fn external_contours(mask: &GrayImage) -> Vec<Contour> {
    contours::find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            let points: Vec<Point> = c.points.iter().map(|p| Point::new(p.x, p.y)).collect();
            Contour::new(simplify_chain(&points))
        })
        .collect()
}

/// Collapses horizontal, vertical and diagonal runs to their end points.
pub fn simplify_chain(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |from: Point, to: Point| ((to.x - from.x).signum(), (to.y - from.y).signum());
    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let curr = points[i];
            let next = points[(i + 1) % n];
            step(prev, curr) != step(curr, next)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() {
        points.to_vec()
    } else {
        kept
    }
}

/// The contour with the greatest enclosed area. Ties keep the first one found.
pub fn largest_by_area(contours: Vec<Contour>) -> Option<(Contour, f64)> {
    let mut best: Option<(Contour, f64)> = None;
    for contour in contours {
        let area = contour.area();
        match &best {
            Some((_, best_area)) if area <= *best_area => {}
            _ => best = Some((contour, area)),
        }
    }
    best
}
