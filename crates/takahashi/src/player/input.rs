//! Input events to logical commands.
//!
//! The window layer translates its own key and pointer events into these
//! types, so the bindings can be exercised without a window.

use super::Command;

/// Keys the presenter reacts to. Letter keys are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    ArrowRight,
    ArrowDown,
    ArrowLeft,
    ArrowUp,
    Space,
    PageDown,
    PageUp,
    Home,
    End,
    Escape,
    Percent,
    Question,
    Char(char),
}

pub fn command_for_key(key: KeyInput) -> Option<Command> {
    let command = match key {
        KeyInput::ArrowRight | KeyInput::ArrowDown | KeyInput::Space | KeyInput::PageDown => {
            Command::Next
        }
        KeyInput::ArrowLeft | KeyInput::ArrowUp | KeyInput::PageUp => Command::Previous,
        KeyInput::Home => Command::First,
        KeyInput::End => Command::Last,
        KeyInput::Escape => Command::Exit,
        KeyInput::Percent => Command::TogglePercentage,
        KeyInput::Question => Command::ToggleHelp,
        KeyInput::Char(c) => match c.to_ascii_lowercase() {
            'f' => Command::ToggleFullscreen,
            'p' => Command::ToggleProgress,
            'c' => Command::ToggleCounter,
            't' => Command::ToggleTimer,
            'h' => Command::ToggleAll,
            'r' => Command::ResetTimer,
            'o' => Command::ToggleOverview,
            'a' => Command::ToggleAnimations,
            'e' => Command::Export,
            _ => return None,
        },
    };
    Some(command)
}

/// Tap navigation: left third goes back, right third goes forward, the middle
/// third is a dead zone. Taps on controls never navigate.
pub fn command_for_tap(x: f32, width: f32, on_control: bool) -> Option<Command> {
    if on_control || width <= 0.0 {
        return None;
    }
    let third = width / 3.0;
    if x < third {
        Some(Command::Previous)
    } else if x >= third * 2.0 {
        Some(Command::Next)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_keys() {
        for key in [
            KeyInput::ArrowRight,
            KeyInput::ArrowDown,
            KeyInput::Space,
            KeyInput::PageDown,
        ] {
            assert_eq!(command_for_key(key), Some(Command::Next));
        }
        for key in [KeyInput::ArrowLeft, KeyInput::ArrowUp, KeyInput::PageUp] {
            assert_eq!(command_for_key(key), Some(Command::Previous));
        }
        assert_eq!(command_for_key(KeyInput::Home), Some(Command::First));
        assert_eq!(command_for_key(KeyInput::End), Some(Command::Last));
    }

    #[test]
    fn test_letters_are_case_insensitive() {
        assert_eq!(
            command_for_key(KeyInput::Char('H')),
            command_for_key(KeyInput::Char('h'))
        );
        assert_eq!(
            command_for_key(KeyInput::Char('O')),
            Some(Command::ToggleOverview)
        );
    }

    #[test]
    fn test_symbol_keys() {
        assert_eq!(
            command_for_key(KeyInput::Percent),
            Some(Command::TogglePercentage)
        );
        assert_eq!(command_for_key(KeyInput::Question), Some(Command::ToggleHelp));
        assert_eq!(command_for_key(KeyInput::Escape), Some(Command::Exit));
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(command_for_key(KeyInput::Char('z')), None);
    }

    #[test]
    fn test_tap_thirds() {
        assert_eq!(command_for_tap(10.0, 900.0, false), Some(Command::Previous));
        assert_eq!(command_for_tap(299.0, 900.0, false), Some(Command::Previous));
        assert_eq!(command_for_tap(300.0, 900.0, false), None);
        assert_eq!(command_for_tap(450.0, 900.0, false), None);
        assert_eq!(command_for_tap(600.0, 900.0, false), Some(Command::Next));
        assert_eq!(command_for_tap(899.0, 900.0, false), Some(Command::Next));
    }

    #[test]
    fn test_tap_on_control_is_ignored() {
        assert_eq!(command_for_tap(10.0, 900.0, true), None);
        assert_eq!(command_for_tap(890.0, 900.0, true), None);
    }
}
