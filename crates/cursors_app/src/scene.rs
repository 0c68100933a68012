//! Render Adapter
//!
//! Turns an [`AnimationState`] into a [`DrawList`]. Nothing here mutates
//! state; the same state always produces the same list.

use crate::state::AnimationState;
use cursors_animation::Viewport;
use cursors_core::paint::Outline;
use cursors_core::{Color, DrawList, Point, TextAnchor};

/// Sprite side length as a fraction of the display width
pub const SPRITE_SIZE_RATIO: f32 = 0.02;

/// Arrow outline vertices as fractions of the display width, relative to the
/// sprite's top-left corner
const ARROW_OUTLINE: [(f32, f32); 7] = [
    (0.0, 0.0),
    (0.0, 0.015),
    (0.006, 0.01),
    (0.012, 0.025),
    (0.015, 0.022),
    (0.009, 0.011),
    (0.018, 0.011),
];

pub const BACKGROUND: Color = Color::BLACK;
pub const BUTTON_BORDER_WIDTH: f32 = 3.0;

pub const TITLE: &str = "CURSORS";
pub const START_LABEL: &str = "START";
pub const IDLE_INSTRUCTIONS: &str = "Click START - your mouse becomes a cursor!";
pub const EXIT_HINT: &str = "Press ESC to exit";
pub const TRACKING_INSTRUCTIONS: &str = "Your mouse is now a cursor! Move it around!";

/// Title size as a fraction of the display height
pub const TITLE_SIZE_RATIO: f32 = 0.2;
/// Label size as a fraction of the display height
pub const LABEL_SIZE_RATIO: f32 = 0.04;
/// Title drop shadow offset in pixels, on both axes
pub const TITLE_SHADOW_OFFSET: f32 = 5.0;

pub fn button_color() -> Color {
    Color::from_hex(0x00FF00)
}

pub fn button_hover_color() -> Color {
    Color::from_hex(0x00C800)
}

pub fn title_color() -> Color {
    Color::from_hex(0xB40000)
}

pub fn title_shadow_color() -> Color {
    Color::from_hex(0x780000)
}

/// Top-left corner of the title
pub fn title_position(viewport: Viewport) -> Point {
    Point::new(
        (viewport.width / 2.0).trunc() - viewport.width_px(0.25),
        viewport.height_px(0.08),
    )
}

/// Center of the bottom hint line, shared by both modes
pub fn hint_center(viewport: Viewport) -> Point {
    Point::new(
        (viewport.width / 2.0).trunc(),
        viewport.height - viewport.height_px(0.05),
    )
}

fn draw_title(list: &mut DrawList, viewport: Viewport) {
    let size = viewport.height_px(TITLE_SIZE_RATIO);
    let position = title_position(viewport);
    let shadow = position + Point::new(TITLE_SHADOW_OFFSET, TITLE_SHADOW_OFFSET);
    list.text(TITLE, shadow, size, title_shadow_color(), TextAnchor::TopLeft);
    list.text(TITLE, position, size, title_color(), TextAnchor::TopLeft);
}

/// Arrow outline centered on the sprite origin, in pixels
pub fn cursor_outline(viewport: Viewport) -> Outline {
    let half = viewport.width_px(SPRITE_SIZE_RATIO) / 2.0;
    ARROW_OUTLINE
        .iter()
        .map(|&(x, y)| {
            Point::new(
                viewport.width_px(x) - half,
                viewport.width_px(y) - half,
            )
        })
        .collect()
}

/// Build the draw list for the current frame
///
/// Background and title first. While idle the activation button and its
/// labels come next, under the cursors. While tracking the instruction line
/// is drawn over the cursors.
pub fn build_draw_list(state: &AnimationState) -> DrawList {
    let viewport = state.viewport();
    let label_size = viewport.height_px(LABEL_SIZE_RATIO);
    let mut list = DrawList::new();
    list.clear(BACKGROUND);
    draw_title(&mut list, viewport);

    if !state.is_tracking() {
        let rect = state.button_rect();
        let fill = if state.is_button_hovered() {
            button_hover_color()
        } else {
            button_color()
        };
        list.fill_rect(rect, fill);
        list.stroke_rect(rect, Color::WHITE, BUTTON_BORDER_WIDTH);
        list.text(
            START_LABEL,
            rect.center(),
            label_size,
            Color::WHITE,
            TextAnchor::Center,
        );

        let center = viewport.center();
        let below_button = Point::new(
            center.x.trunc(),
            center.y.trunc() + viewport.height_px(0.08),
        );
        list.text(
            IDLE_INSTRUCTIONS,
            below_button,
            label_size,
            Color::WHITE,
            TextAnchor::Center,
        );
        list.text(
            EXIT_HINT,
            hint_center(viewport),
            label_size,
            Color::WHITE,
            TextAnchor::Center,
        );
    }

    let outline = cursor_outline(viewport);
    for cursor in state.cursors() {
        list.draw_sprite(&outline, cursor.color, cursor.position, cursor.rotation_angle);
    }

    if state.is_tracking() {
        list.text(
            TRACKING_INSTRUCTIONS,
            hint_center(viewport),
            label_size,
            Color::WHITE,
            TextAnchor::Center,
        );
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::state::FrameInput;
    use cursors_core::{DrawCommand, InputEvent, MouseButton};
    use std::time::Duration;

    fn state() -> AnimationState {
        let config = SimulationConfig::default().with_seed(11);
        AnimationState::new(Viewport::new(1000.0, 1000.0), &config).unwrap()
    }

    fn activated() -> AnimationState {
        let mut state = state();
        let center = state.button_rect().center();
        let input = FrameInput::new(center).with_event(InputEvent::ButtonPress {
            position: center,
            button: MouseButton::Middle,
        });
        state.update(&input, Duration::ZERO);
        state
    }

    fn texts(list: &DrawList) -> Vec<&str> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn find_text<'a>(list: &'a DrawList, wanted: &str) -> Option<&'a DrawCommand> {
        list.commands()
            .iter()
            .find(|c| matches!(c, DrawCommand::Text { text, .. } if text == wanted))
    }

    fn polygon_colors(list: &DrawList) -> Vec<Color> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillPolygon { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_outline_scales_with_width() {
        let outline = cursor_outline(Viewport::new(1000.0, 500.0));
        assert_eq!(outline.len(), 7);
        // Sprite is 20px wide, so the tip sits 10px up and left of center
        assert_eq!(outline[0], Point::new(-10.0, -10.0));
        assert_eq!(outline[3], Point::new(2.0, 15.0));
    }

    #[test]
    fn test_idle_scene_layers() {
        let list = build_draw_list(&state());
        let commands = list.commands();

        assert_eq!(commands.len(), 1 + 2 + 2 + 3 + 10);
        assert_eq!(commands[0], DrawCommand::Clear(Color::BLACK));
        assert!(matches!(
            commands[1],
            DrawCommand::Text { color, .. } if color == title_shadow_color()
        ));
        assert!(matches!(
            commands[2],
            DrawCommand::Text { color, .. } if color == title_color()
        ));
        assert!(matches!(commands[3], DrawCommand::FillRect { .. }));
        assert!(matches!(
            commands[4],
            DrawCommand::StrokeRect { color, width, .. } if color == Color::WHITE && width == 3.0
        ));
        assert_eq!(
            texts(&list),
            [TITLE, TITLE, START_LABEL, IDLE_INSTRUCTIONS, EXIT_HINT]
        );
        assert!(commands[8..]
            .iter()
            .all(|c| matches!(c, DrawCommand::FillPolygon { .. })));
    }

    #[test]
    fn test_title_shadow_sits_behind_and_offset() {
        let list = build_draw_list(&state());
        let DrawCommand::Text {
            position: shadow, ..
        } = &list.commands()[1]
        else {
            panic!("expected the title shadow");
        };
        let DrawCommand::Text {
            position,
            size,
            anchor,
            ..
        } = &list.commands()[2]
        else {
            panic!("expected the title");
        };

        // 1000x1000: x = 500 - 250, y = trunc(0.08 * 1000), size = trunc(0.2 * 1000)
        assert_eq!(*position, Point::new(250.0, 80.0));
        assert_eq!(*shadow, Point::new(255.0, 85.0));
        assert_eq!(*size, 200.0);
        assert_eq!(*anchor, TextAnchor::TopLeft);
    }

    #[test]
    fn test_start_label_is_centered_on_button() {
        let state = state();
        let list = build_draw_list(&state);

        let Some(DrawCommand::Text {
            position,
            size,
            color,
            anchor,
            ..
        }) = find_text(&list, START_LABEL)
        else {
            panic!("expected the START label");
        };
        assert_eq!(*position, state.button_rect().center());
        assert_eq!(*size, 40.0);
        assert_eq!(*color, Color::WHITE);
        assert_eq!(*anchor, TextAnchor::Center);
    }

    #[test]
    fn test_exit_hint_sits_near_bottom() {
        let list = build_draw_list(&state());
        let Some(DrawCommand::Text { position, .. }) = find_text(&list, EXIT_HINT) else {
            panic!("expected the exit hint");
        };
        assert_eq!(*position, Point::new(500.0, 950.0));

        let Some(DrawCommand::Text { position, .. }) = find_text(&list, IDLE_INSTRUCTIONS) else {
            panic!("expected the instructions");
        };
        assert_eq!(*position, Point::new(500.0, 580.0));
    }

    #[test]
    fn test_button_darkens_on_hover() {
        let mut state = state();
        let center = state.button_rect().center();
        state.update(&FrameInput::new(center), Duration::ZERO);

        let list = build_draw_list(&state);
        assert!(list.commands().iter().any(|c| matches!(
            c,
            DrawCommand::FillRect { color, .. } if *color == button_hover_color()
        )));
    }

    #[test]
    fn test_tracking_scene_swaps_labels() {
        let list = build_draw_list(&activated());

        assert_eq!(list.len(), 1 + 2 + 10 + 1);
        assert!(!list.commands().iter().any(|c| matches!(
            c,
            DrawCommand::FillRect { .. } | DrawCommand::StrokeRect { .. }
        )));
        assert_eq!(texts(&list), [TITLE, TITLE, TRACKING_INSTRUCTIONS]);

        // Instructions are drawn over the cursors, where the exit hint was
        let Some(DrawCommand::Text { position, .. }) = list.commands().last() else {
            panic!("expected the instructions last");
        };
        assert_eq!(*position, hint_center(Viewport::new(1000.0, 1000.0)));
    }

    #[test]
    fn test_sprite_colors_match_cursors() {
        let state = state();
        let list = build_draw_list(&state);
        let colors: Vec<Color> = state.cursors().iter().map(|c| c.color).collect();
        assert_eq!(polygon_colors(&list), colors);
    }
}
