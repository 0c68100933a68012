//! Input conversion from winit events
//!
//! Only key presses and button presses reach the tick. Releases, wheel and
//! touch input are dropped here.

use cursors_platform::{InputEvent, KeyCode, MouseButton, Point};
use winit::event::{ElementState, MouseButton as WinitMouseButton};
use winit::keyboard::{Key, NamedKey};

/// Convert a winit logical key to a platform-agnostic key code
pub fn convert_key(key: &Key) -> KeyCode {
    match key {
        Key::Named(named) => match named {
            NamedKey::Escape => KeyCode::ESCAPE,
            NamedKey::Enter => KeyCode::ENTER,
            NamedKey::Space => KeyCode::SPACE,
            NamedKey::Tab => KeyCode::TAB,
            NamedKey::Backspace => KeyCode::BACKSPACE,
            _ => KeyCode::UNKNOWN,
        },
        Key::Character(text) => text
            .chars()
            .next()
            .map_or(KeyCode::UNKNOWN, KeyCode::from_char),
        _ => KeyCode::UNKNOWN,
    }
}

/// A key press, or `None` for releases
pub fn keyboard_event(key: &Key, state: ElementState) -> Option<InputEvent> {
    match state {
        ElementState::Pressed => Some(InputEvent::KeyPress(convert_key(key))),
        ElementState::Released => None,
    }
}

pub fn convert_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}

/// A button press at the last known pointer position, or `None` for releases
pub fn mouse_event(
    button: WinitMouseButton,
    state: ElementState,
    position: Point,
) -> Option<InputEvent> {
    match state {
        ElementState::Pressed => Some(InputEvent::ButtonPress {
            position,
            button: convert_mouse_button(button),
        }),
        ElementState::Released => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_maps_to_exit_request() {
        let event = keyboard_event(&Key::Named(NamedKey::Escape), ElementState::Pressed);
        assert_eq!(event, Some(InputEvent::KeyPress(KeyCode::ESCAPE)));
        assert!(event.is_some_and(|e| e.is_exit_request()));
    }

    #[test]
    fn characters_map_case_insensitively() {
        assert_eq!(convert_key(&Key::Character("q".into())), KeyCode::from_char('Q'));
        assert_eq!(convert_key(&Key::Named(NamedKey::F1)), KeyCode::UNKNOWN);
    }

    #[test]
    fn releases_are_dropped() {
        assert_eq!(
            keyboard_event(&Key::Named(NamedKey::Enter), ElementState::Released),
            None
        );
        assert_eq!(
            mouse_event(WinitMouseButton::Left, ElementState::Released, Point::ZERO),
            None
        );
    }

    #[test]
    fn any_button_press_carries_position() {
        let event = mouse_event(
            WinitMouseButton::Right,
            ElementState::Pressed,
            Point::new(12.0, 34.0),
        );
        assert_eq!(
            event,
            Some(InputEvent::ButtonPress {
                position: Point::new(12.0, 34.0),
                button: MouseButton::Right,
            })
        );
    }
}
