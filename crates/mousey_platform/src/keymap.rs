//! Translation from winit's physical key codes and mouse buttons to the
//! engine's own input identifiers. Keys the engine does not expose map to
//! `None` and are dropped by the event source.

use mousey_core::{Key, MouseButton};
use winit::event::MouseButton as WinitButton;
use winit::keyboard::KeyCode;

pub fn map_key_code(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Digit0 => Key::Num0,
        KeyCode::Digit1 => Key::Num1,
        KeyCode::Digit2 => Key::Num2,
        KeyCode::Digit3 => Key::Num3,
        KeyCode::Digit4 => Key::Num4,
        KeyCode::Digit5 => Key::Num5,
        KeyCode::Digit6 => Key::Num6,
        KeyCode::Digit7 => Key::Num7,
        KeyCode::Digit8 => Key::Num8,
        KeyCode::Digit9 => Key::Num9,
        KeyCode::Enter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Space => Key::Space,
        KeyCode::Minus => Key::Hyphen,
        KeyCode::Equal => Key::Equal,
        KeyCode::BracketLeft => Key::LeftBracket,
        KeyCode::BracketRight => Key::RightBracket,
        KeyCode::Backslash => Key::Backslash,
        KeyCode::Semicolon => Key::Semicolon,
        KeyCode::Comma => Key::Comma,
        KeyCode::Period => Key::Period,
        KeyCode::Slash => Key::Slash,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::F13 => Key::F13,
        KeyCode::F14 => Key::F14,
        KeyCode::F15 => Key::F15,
        KeyCode::F16 => Key::F16,
        KeyCode::F17 => Key::F17,
        KeyCode::F18 => Key::F18,
        KeyCode::F19 => Key::F19,
        KeyCode::F20 => Key::F20,
        KeyCode::F21 => Key::F21,
        KeyCode::F22 => Key::F22,
        KeyCode::F23 => Key::F23,
        KeyCode::F24 => Key::F24,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::PrintScreen => Key::PrintScreen,
        KeyCode::ScrollLock => Key::ScrollLock,
        KeyCode::Pause => Key::Pause,
        KeyCode::Insert => Key::Insert,
        KeyCode::Home => Key::Home,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Delete => Key::Delete,
        KeyCode::End => Key::End,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::NumLock => Key::NumLock,
        KeyCode::NumpadDivide => Key::NumpadDivide,
        KeyCode::NumpadMultiply => Key::NumpadMultiply,
        KeyCode::NumpadSubtract => Key::NumpadMinus,
        KeyCode::NumpadAdd => Key::NumpadPlus,
        KeyCode::NumpadEqual => Key::NumpadEqual,
        KeyCode::NumpadEnter => Key::NumpadEnter,
        KeyCode::NumpadDecimal => Key::NumpadDecimal,
        KeyCode::Numpad0 => Key::Numpad0,
        KeyCode::Numpad1 => Key::Numpad1,
        KeyCode::Numpad2 => Key::Numpad2,
        KeyCode::Numpad3 => Key::Numpad3,
        KeyCode::Numpad4 => Key::Numpad4,
        KeyCode::Numpad5 => Key::Numpad5,
        KeyCode::Numpad6 => Key::Numpad6,
        KeyCode::Numpad7 => Key::Numpad7,
        KeyCode::Numpad8 => Key::Numpad8,
        KeyCode::Numpad9 => Key::Numpad9,
        KeyCode::ContextMenu => Key::Application,
        KeyCode::ControlLeft => Key::LeftCtrl,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::AltLeft => Key::LeftAlt,
        KeyCode::SuperLeft => Key::LeftSystem,
        KeyCode::ControlRight => Key::RightCtrl,
        KeyCode::ShiftRight => Key::RightShift,
        KeyCode::AltRight => Key::RightAlt,
        KeyCode::SuperRight => Key::RightSystem,
        _ => return None,
    };
    Some(key)
}

pub fn map_mouse_button(button: WinitButton) -> Option<MouseButton> {
    match button {
        WinitButton::Left => Some(MouseButton::Left),
        WinitButton::Middle => Some(MouseButton::Middle),
        WinitButton::Right => Some(MouseButton::Right),
        WinitButton::Back => Some(MouseButton::X1),
        WinitButton::Forward => Some(MouseButton::X2),
        WinitButton::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_map_to_matching_number_keys() {
        assert_eq!(map_key_code(KeyCode::Digit0), Some(Key::Num0));
        assert_eq!(map_key_code(KeyCode::Digit1), Some(Key::Num1));
        assert_eq!(map_key_code(KeyCode::Digit9), Some(Key::Num9));
    }

    #[test]
    fn test_modifiers_map_by_side() {
        assert_eq!(map_key_code(KeyCode::ControlLeft), Some(Key::LeftCtrl));
        assert_eq!(map_key_code(KeyCode::ControlRight), Some(Key::RightCtrl));
        assert_eq!(map_key_code(KeyCode::SuperLeft), Some(Key::LeftSystem));
    }

    #[test]
    fn test_arrows_and_punctuation() {
        assert_eq!(map_key_code(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(map_key_code(KeyCode::Minus), Some(Key::Hyphen));
        assert_eq!(map_key_code(KeyCode::NumpadSubtract), Some(Key::NumpadMinus));
    }

    #[test]
    fn test_unexposed_keys_are_dropped() {
        assert_eq!(map_key_code(KeyCode::MediaPlayPause), None);
        assert_eq!(map_key_code(KeyCode::Fn), None);
    }

    #[test]
    fn test_extra_mouse_buttons_map_to_x1_x2() {
        assert_eq!(map_mouse_button(WinitButton::Back), Some(MouseButton::X1));
        assert_eq!(map_mouse_button(WinitButton::Forward), Some(MouseButton::X2));
        assert_eq!(map_mouse_button(WinitButton::Other(7)), None);
    }
}
