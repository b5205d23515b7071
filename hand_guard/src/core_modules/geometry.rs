// THEORY:
// The `geometry` module holds the two pure functions the whole warning system
// hinges on: how far the hand is from the safety zone, and what that distance
// means. Neither function knows about frames, masks or rendering.
//
// Key principles:
// 1.  **Stateless**: `classify` is recomputed every frame from a single scalar.
//     There is no hysteresis and no memory of the previous state.
// 2.  **Infinity is safe**: when no hand is visible the caller passes
//     `f64::INFINITY`, which always lands in `SafetyState::Safe`.
// 3.  **Caller-owned ordering**: `danger <= warning` is expected but not
//     enforced. With inverted thresholds the `Warning` band is simply empty.

use std::fmt;

/// An integer pixel coordinate. Negative values are allowed so that geometry
/// computed outside the frame (e.g. a zone larger than the frame) stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Multiplies both coordinates by an integer factor.
    pub const fn scaled(self, factor: i32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    let dx = (p1.x - p2.x) as f64;
    let dy = (p1.y - p2.y) as f64;
    dx.hypot(dy)
}

/// The three-level proximity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetyState {
    Safe,
    Warning,
    Danger,
}

impl SafetyState {
    pub fn label(self) -> &'static str {
        match self {
            SafetyState::Safe => "SAFE",
            SafetyState::Warning => "WARNING",
            SafetyState::Danger => "DANGER",
        }
    }
}

impl fmt::Display for SafetyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Distance cut-offs, in full-resolution pixels, used by `classify`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// At or below this distance the state is at least `Warning`.
    pub warning: f64,
    /// At or below this distance the state is `Danger`.
    pub danger: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: 150.0,
            danger: 50.0,
        }
    }
}

/// Maps a distance onto a `SafetyState`. Both cut-offs are inclusive.
pub fn classify(distance: f64, thresholds: &Thresholds) -> SafetyState {
    if distance <= thresholds.danger {
        SafetyState::Danger
    } else if distance <= thresholds.warning {
        SafetyState::Warning
    } else {
        SafetyState::Safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        for p in [Point::new(0, 0), Point::new(-7, 13), Point::new(640, 480)] {
            assert_eq!(distance(p, p), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(12, -4);
        let b = Point::new(-30, 99);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn distance_matches_pythagoras() {
        assert_eq!(distance(Point::new(0, 0), Point::new(3, 4)), 5.0);
        assert_eq!(distance(Point::new(320, 240), Point::new(320, 390)), 150.0);
    }

    #[test]
    fn classify_uses_inclusive_boundaries() {
        let t = Thresholds::default();
        assert_eq!(classify(0.0, &t), SafetyState::Danger);
        assert_eq!(classify(50.0, &t), SafetyState::Danger);
        assert_eq!(classify(50.0001, &t), SafetyState::Warning);
        assert_eq!(classify(150.0, &t), SafetyState::Warning);
        assert_eq!(classify(150.0001, &t), SafetyState::Safe);
    }

    #[test]
    fn infinite_distance_is_safe() {
        assert_eq!(classify(f64::INFINITY, &Thresholds::default()), SafetyState::Safe);
    }

    #[test]
    fn custom_thresholds_are_respected() {
        let t = Thresholds {
            warning: 300.0,
            danger: 100.0,
        };
        assert_eq!(classify(99.0, &t), SafetyState::Danger);
        assert_eq!(classify(200.0, &t), SafetyState::Warning);
        assert_eq!(classify(301.0, &t), SafetyState::Safe);
    }

    #[test]
    fn inverted_thresholds_have_no_warning_band() {
        let t = Thresholds {
            warning: 50.0,
            danger: 150.0,
        };
        assert_eq!(classify(100.0, &t), SafetyState::Danger);
        assert_eq!(classify(151.0, &t), SafetyState::Safe);
    }

    #[test]
    fn labels_are_upper_case() {
        assert_eq!(SafetyState::Warning.to_string(), "WARNING");
    }
}
