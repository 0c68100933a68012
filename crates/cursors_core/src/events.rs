//! Input events
//!
//! The tick only understands three kinds of input. Platform backends convert
//! their native events into these and drop everything else.

use crate::geometry::Point;

/// An input event drained once per tick
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// The platform asked the process to quit (window closed, signal)
    Quit,
    /// A key went down
    KeyPress(KeyCode),
    /// A pointer button went down at `position`
    ButtonPress {
        position: Point,
        button: MouseButton,
    },
}

impl InputEvent {
    /// Whether this event ends the process
    pub fn is_exit_request(&self) -> bool {
        matches!(
            self,
            InputEvent::Quit | InputEvent::KeyPress(KeyCode::ESCAPE)
        )
    }
}

/// Pointer buttons
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Virtual key codes (platform-agnostic)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const BACKSPACE: KeyCode = KeyCode(0x08);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);

    // Unknown/unmapped key
    pub const UNKNOWN: KeyCode = KeyCode(0);

    /// Map a single character to its key code (letters are case-insensitive)
    pub fn from_char(c: char) -> KeyCode {
        match c {
            'a'..='z' => KeyCode(c.to_ascii_uppercase() as u32),
            'A'..='Z' | '0'..='9' => KeyCode(c as u32),
            ' ' => KeyCode::SPACE,
            _ => KeyCode::UNKNOWN,
        }
    }

    /// Parse a key name as used in scenario files ("escape", "enter", "q", ...)
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let lowered = name.trim().to_ascii_lowercase();
        let key = match lowered.as_str() {
            "escape" | "esc" => KeyCode::ESCAPE,
            "enter" | "return" => KeyCode::ENTER,
            "space" => KeyCode::SPACE,
            "tab" => KeyCode::TAB,
            "backspace" => KeyCode::BACKSPACE,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphanumeric() => KeyCode::from_char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_requests() {
        assert!(InputEvent::Quit.is_exit_request());
        assert!(InputEvent::KeyPress(KeyCode::ESCAPE).is_exit_request());
        assert!(!InputEvent::KeyPress(KeyCode::ENTER).is_exit_request());
        assert!(!InputEvent::ButtonPress {
            position: Point::new(1.0, 1.0),
            button: MouseButton::Left,
        }
        .is_exit_request());
    }

    #[test]
    fn test_key_names() {
        assert_eq!(KeyCode::from_name("Escape"), Some(KeyCode::ESCAPE));
        assert_eq!(KeyCode::from_name("esc"), Some(KeyCode::ESCAPE));
        assert_eq!(KeyCode::from_name("q"), Some(KeyCode(0x51)));
        assert_eq!(KeyCode::from_name("Q"), Some(KeyCode(0x51)));
        assert_eq!(KeyCode::from_name("7"), Some(KeyCode(0x37)));
        assert_eq!(KeyCode::from_name("f13"), None);
        assert_eq!(KeyCode::from_name(""), None);
    }
}
