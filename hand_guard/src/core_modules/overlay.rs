// THEORY:
// Rendering is split in two. The core decides WHAT goes on screen and records
// it as an `Overlay`, an ordered list of `DrawCommand`s. A `Canvas` decides HOW
// to rasterize those commands for a particular backend.
//
// This keeps every renderer in the core (boundary, hand outline, state
// indicator, FPS counter) a pure function of its inputs, testable by inspecting
// the command list. The backends stay thin:
// - `ImageCanvas` draws shapes into an `RgbImage` with `imageproc`. No font is
//   bundled, so text is resolved to a position and kept as a `TextLabel`.
// - The OpenCV canvas in `live_guard` draws everything, including Hershey text.
//
// Horizontally centered text is resolved at paint time because only the
// backend knows its own font metrics.

use crate::core_modules::geometry::Point;
use crate::error::Result;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        Rgb([color.red, color.green, color.blue])
    }
}

/// Where a piece of text is anchored. Coordinates are the text baseline origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextPlacement {
    At(Point),
    /// Centered across the canvas width on baseline `y`.
    CenteredHorizontally { y: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rectangle {
        top_left: Point,
        bottom_right: Point,
        color: Color,
        thickness: i32,
    },
    FilledCircle {
        center: Point,
        radius: i32,
        color: Color,
    },
    /// A closed outline through `points`.
    Polyline {
        points: Vec<Point>,
        color: Color,
        thickness: i32,
    },
    Text {
        text: String,
        placement: TextPlacement,
        scale: f64,
        color: Color,
        thickness: i32,
    },
}

/// An ordered list of draw commands for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub commands: Vec<DrawCommand>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn rectangle(&mut self, top_left: Point, bottom_right: Point, color: Color, thickness: i32) {
        self.push(DrawCommand::Rectangle {
            top_left,
            bottom_right,
            color,
            thickness,
        });
    }

    pub fn filled_circle(&mut self, center: Point, radius: i32, color: Color) {
        self.push(DrawCommand::FilledCircle {
            center,
            radius,
            color,
        });
    }

    pub fn polyline(&mut self, points: Vec<Point>, color: Color, thickness: i32) {
        self.push(DrawCommand::Polyline {
            points,
            color,
            thickness,
        });
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        placement: TextPlacement,
        scale: f64,
        color: Color,
        thickness: i32,
    ) {
        self.push(DrawCommand::Text {
            text: text.into(),
            placement,
            scale,
            color,
            thickness,
        });
    }

    /// Every text string, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replays every command onto `canvas`, in order.
    pub fn paint<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<()> {
        for command in &self.commands {
            match command {
                DrawCommand::Rectangle {
                    top_left,
                    bottom_right,
                    color,
                    thickness,
                } => canvas.rectangle(*top_left, *bottom_right, *color, *thickness)?,
                DrawCommand::FilledCircle {
                    center,
                    radius,
                    color,
                } => canvas.filled_circle(*center, *radius, *color)?,
                DrawCommand::Polyline {
                    points,
                    color,
                    thickness,
                } => canvas.polyline(points, *color, *thickness)?,
                DrawCommand::Text {
                    text,
                    placement,
                    scale,
                    color,
                    thickness,
                } => {
                    let origin = match placement {
                        TextPlacement::At(point) => *point,
                        TextPlacement::CenteredHorizontally { y } => {
                            let (text_width, _) = canvas.text_size(text, *scale, *thickness)?;
                            let (width, _) = canvas.dimensions();
                            Point::new((width as i32 - text_width) / 2, *y)
                        }
                    };
                    canvas.text(text, origin, *scale, *color, *thickness)?
                }
            }
        }
        Ok(())
    }
}

/// The rendering primitives a display backend has to provide.
pub trait Canvas {
    fn dimensions(&self) -> (u32, u32);
    fn rectangle(&mut self, top_left: Point, bottom_right: Point, color: Color, thickness: i32) -> Result<()>;
    fn filled_circle(&mut self, center: Point, radius: i32, color: Color) -> Result<()>;
    fn polyline(&mut self, points: &[Point], color: Color, thickness: i32) -> Result<()>;
    fn text(&mut self, text: &str, origin: Point, scale: f64, color: Color, thickness: i32) -> Result<()>;
    /// Width and height of `text` in pixels.
    fn text_size(&self, text: &str, scale: f64, thickness: i32) -> Result<(i32, i32)>;
}

/// Text that an `ImageCanvas` positioned but did not rasterize.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub origin: Point,
    pub color: Color,
}

// Rough metrics of a simplex stroke font at scale 1.0.
const GLYPH_ADVANCE: f64 = 20.0;
const GLYPH_HEIGHT: f64 = 22.0;

/// Draws into an `RgbImage` using `imageproc`.
pub struct ImageCanvas<'a> {
    image: &'a mut RgbImage,
    labels: Vec<TextLabel>,
}

impl<'a> ImageCanvas<'a> {
    pub fn new(image: &'a mut RgbImage) -> Self {
        Self {
            image,
            labels: Vec::new(),
        }
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn into_labels(self) -> Vec<TextLabel> {
        self.labels
    }
}

impl Canvas for ImageCanvas<'_> {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn rectangle(&mut self, top_left: Point, bottom_right: Point, color: Color, thickness: i32) -> Result<()> {
        let (x0, x1) = (top_left.x.min(bottom_right.x), top_left.x.max(bottom_right.x));
        let (y0, y1) = (top_left.y.min(bottom_right.y), top_left.y.max(bottom_right.y));
        // Thick outlines grow outwards and inwards around the nominal edge.
        let half = thickness.max(1) / 2;
        for inset in -half..thickness.max(1) - half {
            let (left, top) = (x0 + inset, y0 + inset);
            let (right, bottom) = (x1 - inset, y1 - inset);
            if right < left || bottom < top {
                break;
            }
            let rect = Rect::at(left, top).of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
            draw_hollow_rect_mut(&mut *self.image, rect, Rgb::from(color));
        }
        Ok(())
    }

    fn filled_circle(&mut self, center: Point, radius: i32, color: Color) -> Result<()> {
        draw_filled_circle_mut(&mut *self.image, (center.x, center.y), radius, Rgb::from(color));
        Ok(())
    }

    fn polyline(&mut self, points: &[Point], color: Color, thickness: i32) -> Result<()> {
        let n = points.len();
        if n == 0 {
            return Ok(());
        }
        for i in 0..n {
            let start = points[i];
            let end = points[(i + 1) % n];
            for offset in 0..thickness.max(1) {
                let o = offset as f32;
                draw_line_segment_mut(
                    &mut *self.image,
                    (start.x as f32 + o, start.y as f32 + o),
                    (end.x as f32 + o, end.y as f32 + o),
                    Rgb::from(color),
                );
            }
        }
        Ok(())
    }

    fn text(&mut self, text: &str, origin: Point, _scale: f64, color: Color, _thickness: i32) -> Result<()> {
        self.labels.push(TextLabel {
            text: text.to_string(),
            origin,
            color,
        });
        Ok(())
    }

    fn text_size(&self, text: &str, scale: f64, thickness: i32) -> Result<(i32, i32)> {
        let width = (text.chars().count() as f64 * GLYPH_ADVANCE * scale).round() as i32 + thickness;
        let height = (GLYPH_HEIGHT * scale).round() as i32 + thickness;
        Ok((width, height))
    }
}
