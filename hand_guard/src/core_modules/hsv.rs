// THEORY (single-pixel color heuristics):
// The `hsv` module turns one RGB pixel into the hue/saturation/value triple the
// skin segmentation thresholds are written against. Like a 1D pixel heuristic
// it never looks at neighbors; the spatial work happens in `mask`.
//
// Scale convention: the 8-bit HSV layout used by common vision libraries.
// - hue:        [0, 180)  (degrees halved so it fits a byte)
// - saturation: [0, 255]  (chroma / value, rescaled)
// - value:      [0, 255]  (max channel)
// The skin range [0,20] x [20,255] x [70,255] is expressed in this scale, so
// the conversion has to match it exactly rather than use a 0..360 float hue.
//
// Hue sector selection follows the usual priority: red wins ties with green,
// green wins ties with blue. Gray pixels (chroma 0) get hue 0 and saturation 0.

pub mod hsv {
    use image::Rgb;

    pub type Channel = u8;

    /// A pixel in 8-bit HSV space.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Hsv {
        /// Hue in half-degrees, 0..180.
        pub hue: Channel,
        /// Saturation, 0..=255.
        pub saturation: Channel,
        /// Value (brightest channel), 0..=255.
        pub value: Channel,
    }

    impl Hsv {
        pub const fn new(hue: Channel, saturation: Channel, value: Channel) -> Self {
            Self {
                hue,
                saturation,
                value,
            }
        }

        pub fn from_rgb(red: Channel, green: Channel, blue: Channel) -> Self {
            let (r, g, b) = (red as i32, green as i32, blue as i32);
            let maximum_channel = r.max(g).max(b);
            let minimum_channel = r.min(g).min(b);
            let chroma = maximum_channel - minimum_channel;

            let saturation = if maximum_channel == 0 {
                0
            } else {
                ((chroma * 255) as f32 / maximum_channel as f32).round() as i32
            };

            let hue = if chroma == 0 {
                0
            } else {
                let (base_difference, sector_offset) = if maximum_channel == r {
                    (g - b, 0)
                } else if maximum_channel == g {
                    (b - r, 2 * chroma)
                } else {
                    (r - g, 4 * chroma)
                };
                // 30 half-degrees per unit of (difference / chroma).
                let mut half_degrees = (30.0 * (base_difference + sector_offset) as f32
                    / chroma as f32)
                    .round() as i32;
                if half_degrees < 0 {
                    half_degrees += 180;
                }
                if half_degrees >= 180 {
                    half_degrees -= 180;
                }
                half_degrees
            };

            Self {
                hue: hue as Channel,
                saturation: saturation.clamp(0, 255) as Channel,
                value: maximum_channel as Channel,
            }
        }
    }

    impl From<Rgb<u8>> for Hsv {
        fn from(pixel: Rgb<u8>) -> Self {
            let [red, green, blue] = pixel.0;
            Hsv::from_rgb(red, green, blue)
        }
    }

    impl From<&Rgb<u8>> for Hsv {
        fn from(pixel: &Rgb<u8>) -> Self {
            Hsv::from(*pixel)
        }
    }

    /// An inclusive box in HSV space.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HsvRange {
        pub lower: Hsv,
        pub upper: Hsv,
    }

    impl HsvRange {
        pub const fn new(lower: Hsv, upper: Hsv) -> Self {
            Self { lower, upper }
        }

        /// The skin-tone band: hue 0..=20, saturation 20..=255, value 70..=255.
        pub const fn skin() -> Self {
            Self {
                lower: Hsv::new(0, 20, 70),
                upper: Hsv::new(20, 255, 255),
            }
        }

        #[inline]
        pub fn contains(&self, pixel: Hsv) -> bool {
            (self.lower.hue..=self.upper.hue).contains(&pixel.hue)
                && (self.lower.saturation..=self.upper.saturation).contains(&pixel.saturation)
                && (self.lower.value..=self.upper.value).contains(&pixel.value)
        }
    }

    impl Default for HsvRange {
        fn default() -> Self {
            Self::skin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::hsv::*;

    #[test]
    fn primaries_land_on_the_half_degree_scale() {
        assert_eq!(Hsv::from_rgb(255, 0, 0), Hsv::new(0, 255, 255));
        assert_eq!(Hsv::from_rgb(0, 255, 0), Hsv::new(60, 255, 255));
        assert_eq!(Hsv::from_rgb(0, 0, 255), Hsv::new(120, 255, 255));
    }

    #[test]
    fn magenta_wraps_below_180() {
        // 300 degrees -> 150 half-degrees.
        assert_eq!(Hsv::from_rgb(255, 0, 255).hue, 150);
    }

    #[test]
    fn grays_have_no_hue_or_saturation() {
        assert_eq!(Hsv::from_rgb(0, 0, 0), Hsv::new(0, 0, 0));
        assert_eq!(Hsv::from_rgb(128, 128, 128), Hsv::new(0, 0, 128));
    }

    #[test]
    fn typical_skin_tone_is_inside_the_skin_range() {
        let skin = Hsv::from_rgb(220, 170, 140);
        assert_eq!(skin.value, 220);
        assert!((10..=12).contains(&skin.hue));
        assert!(HsvRange::skin().contains(skin));
    }

    #[test]
    fn dark_and_blue_pixels_are_rejected() {
        let range = HsvRange::skin();
        assert!(!range.contains(Hsv::from_rgb(60, 40, 30)));
        assert!(!range.contains(Hsv::from_rgb(30, 60, 200)));
        assert!(!range.contains(Hsv::from_rgb(200, 200, 200)));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = HsvRange::skin();
        assert!(range.contains(Hsv::new(0, 20, 70)));
        assert!(range.contains(Hsv::new(20, 255, 255)));
        assert!(!range.contains(Hsv::new(21, 255, 255)));
        assert!(!range.contains(Hsv::new(10, 19, 255)));
        assert!(!range.contains(Hsv::new(10, 255, 69)));
    }
}
