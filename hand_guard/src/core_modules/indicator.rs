// THEORY:
// The state indicator is the user-facing half of classification. Two lines of
// status text sit in the top-left corner in the state's color, and a DANGER
// frame additionally gets a large centered alert.
//
// The alert is drawn the same way on every DANGER frame. Blinking would need a
// timer that spans frames, and this renderer only ever sees one frame.

use crate::core_modules::geometry::{Point, SafetyState};
use crate::core_modules::overlay::{Color, Overlay, TextPlacement};

pub const ALERT_TEXT: &str = "DANGER DANGER";

const STATUS_SCALE: f64 = 0.8;
const STATUS_THICKNESS: i32 = 2;
const ALERT_SCALE: f64 = 1.5;
const ALERT_THICKNESS: i32 = 3;
const FPS_SCALE: f64 = 0.7;

pub fn state_color(state: SafetyState) -> Color {
    match state {
        SafetyState::Safe => Color::GREEN,
        SafetyState::Warning => Color::YELLOW,
        SafetyState::Danger => Color::RED,
    }
}

/// Whole-pixel distance, or `N/A` when no hand is in view.
pub fn format_distance(distance: f64) -> String {
    if distance.is_finite() {
        format!("{}", distance.trunc() as i64)
    } else {
        String::from("N/A")
    }
}

/// Adds the status lines, and the centered alert for `Danger`, to `overlay`.
/// `frame_height` positions the alert on the vertical middle.
pub fn draw_state_indicator(overlay: &mut Overlay, state: SafetyState, distance: f64, frame_height: u32) {
    let color = state_color(state);

    overlay.text(
        format!("State: {}", state.label()),
        TextPlacement::At(Point::new(10, 30)),
        STATUS_SCALE,
        color,
        STATUS_THICKNESS,
    );
    overlay.text(
        format!("Distance: {}", format_distance(distance)),
        TextPlacement::At(Point::new(10, 60)),
        STATUS_SCALE,
        color,
        STATUS_THICKNESS,
    );

    if state == SafetyState::Danger {
        overlay.text(
            ALERT_TEXT,
            TextPlacement::CenteredHorizontally {
                y: frame_height as i32 / 2,
            },
            ALERT_SCALE,
            Color::RED,
            ALERT_THICKNESS,
        );
    }
}

/// Measured frame rate in the bottom-left corner.
pub fn draw_fps(overlay: &mut Overlay, fps: f64, frame_height: u32) {
    overlay.text(
        format!("FPS: {fps:.1}"),
        TextPlacement::At(Point::new(10, frame_height as i32 - 10)),
        FPS_SCALE,
        Color::WHITE,
        2,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::overlay::DrawCommand;

    fn text_colors(overlay: &Overlay) -> Vec<Color> {
        overlay
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn safe_state_renders_two_green_lines() {
        let mut overlay = Overlay::new();
        draw_state_indicator(&mut overlay, SafetyState::Safe, 321.9, 480);
        assert_eq!(overlay.texts().collect::<Vec<_>>(), vec!["State: SAFE", "Distance: 321"]);
        assert_eq!(text_colors(&overlay), vec![Color::GREEN, Color::GREEN]);
    }

    #[test]
    fn warning_state_is_yellow_without_alert() {
        let mut overlay = Overlay::new();
        draw_state_indicator(&mut overlay, SafetyState::Warning, 99.0, 480);
        assert!(!overlay.contains_text(ALERT_TEXT));
        assert_eq!(text_colors(&overlay), vec![Color::YELLOW, Color::YELLOW]);
    }

    #[test]
    fn danger_state_adds_centered_alert() {
        let mut overlay = Overlay::new();
        draw_state_indicator(&mut overlay, SafetyState::Danger, 12.7, 480);
        assert_eq!(overlay.len(), 3);
        assert_eq!(
            overlay.commands[2],
            DrawCommand::Text {
                text: ALERT_TEXT.to_string(),
                placement: TextPlacement::CenteredHorizontally { y: 240 },
                scale: 1.5,
                color: Color::RED,
                thickness: 3,
            }
        );
        assert!(overlay.contains_text("Distance: 12"));
    }

    #[test]
    fn infinite_distance_is_not_a_number_on_screen() {
        assert_eq!(format_distance(f64::INFINITY), "N/A");
        assert_eq!(format_distance(0.0), "0");
    }

    #[test]
    fn fps_sits_above_the_bottom_edge() {
        let mut overlay = Overlay::new();
        draw_fps(&mut overlay, 14.96, 480);
        let DrawCommand::Text { text, placement, .. } = &overlay.commands[0] else {
            panic!("expected text");
        };
        assert_eq!(text, "FPS: 15.0");
        assert_eq!(*placement, TextPlacement::At(Point::new(10, 470)));
    }
}
