//! Double-buffered keyboard and mouse state.
//!
//! Two snapshots are kept: `current` is what the event pump has seen so far,
//! `previous` is what `current` looked like at the end of the last frame.
//! Edge queries compare the two:
//!
//! - **held** (`is_down`): `current[k]`
//! - **pressed** (`is_pressed`): `current[k] && !previous[k]`
//! - **released** (`is_released`): `!current[k] && previous[k]`
//!
//! The engine loop calls [`InputState::snapshot`] exactly once per frame, after
//! the update and fixed-step callbacks and before the next poll. An edge is
//! therefore visible for one whole frame and then disappears.

macro_rules! keys {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Physical keys exposed to scripts.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Key {
            $($variant),+
        }

        impl Key {
            pub const ALL: &'static [Key] = &[$(Key::$variant),+];
            pub const COUNT: usize = Self::ALL.len();

            /// Name used in the script-facing `Key` table.
            pub fn name(self) -> &'static str {
                match self {
                    $(Key::$variant => $name),+
                }
            }

            pub fn from_name(name: &str) -> Option<Key> {
                match name {
                    $($name => Some(Key::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

keys! {
    A => "A", B => "B", C => "C", D => "D", E => "E", F => "F", G => "G",
    H => "H", I => "I", J => "J", K => "K", L => "L", M => "M", N => "N",
    O => "O", P => "P", Q => "Q", R => "R", S => "S", T => "T", U => "U",
    V => "V", W => "W", X => "X", Y => "Y", Z => "Z",
    Num0 => "Num0", Num1 => "Num1", Num2 => "Num2", Num3 => "Num3", Num4 => "Num4",
    Num5 => "Num5", Num6 => "Num6", Num7 => "Num7", Num8 => "Num8", Num9 => "Num9",
    Enter => "Enter",
    Escape => "Escape",
    Backspace => "Backspace",
    Tab => "Tab",
    Space => "Space",
    Hyphen => "Hyphen",
    Equal => "Equal",
    LeftBracket => "LeftBracket",
    RightBracket => "RightBracket",
    Backslash => "Backslash",
    Semicolon => "Semicolon",
    Comma => "Comma",
    Period => "Period",
    Slash => "Slash",
    F1 => "F1", F2 => "F2", F3 => "F3", F4 => "F4", F5 => "F5", F6 => "F6",
    F7 => "F7", F8 => "F8", F9 => "F9", F10 => "F10", F11 => "F11", F12 => "F12",
    F13 => "F13", F14 => "F14", F15 => "F15", F16 => "F16", F17 => "F17", F18 => "F18",
    F19 => "F19", F20 => "F20", F21 => "F21", F22 => "F22", F23 => "F23", F24 => "F24",
    CapsLock => "CapsLock",
    PrintScreen => "PrintScreen",
    ScrollLock => "ScrollLock",
    Pause => "Pause",
    Insert => "Insert",
    Home => "Home",
    PageUp => "PageUp",
    PageDown => "PageDown",
    Delete => "Delete",
    End => "End",
    Right => "Right",
    Left => "Left",
    Down => "Down",
    Up => "Up",
    NumLock => "NumLock",
    NumpadDivide => "NumpadDivide",
    NumpadMultiply => "NumpadMultiply",
    NumpadMinus => "NumpadMinus",
    NumpadPlus => "NumpadPlus",
    NumpadEqual => "NumpadEqual",
    NumpadEnter => "NumpadEnter",
    NumpadDecimal => "NumpadDecimal",
    Numpad0 => "Numpad0", Numpad1 => "Numpad1", Numpad2 => "Numpad2", Numpad3 => "Numpad3",
    Numpad4 => "Numpad4", Numpad5 => "Numpad5", Numpad6 => "Numpad6", Numpad7 => "Numpad7",
    Numpad8 => "Numpad8", Numpad9 => "Numpad9",
    Application => "Application",
    LeftCtrl => "LeftCtrl",
    LeftShift => "LeftShift",
    LeftAlt => "LeftAlt",
    LeftSystem => "LeftSystem",
    RightCtrl => "RightCtrl",
    RightShift => "RightShift",
    RightAlt => "RightAlt",
    RightSystem => "RightSystem",
}

impl Key {
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    X1,
    X2,
}

impl MouseButton {
    pub const ALL: &'static [MouseButton] = &[
        MouseButton::Left,
        MouseButton::Middle,
        MouseButton::Right,
        MouseButton::X1,
        MouseButton::X2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Middle => "Middle",
            Self::Right => "Right",
            Self::X1 => "X1",
            Self::X2 => "X2",
        }
    }

    pub fn from_name(name: &str) -> Option<MouseButton> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }

    fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    current: [bool; Key::COUNT],
    previous: [bool; Key::COUNT],
    mouse_current: u8,
    mouse_previous: u8,
    mouse_position: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            current: [false; Key::COUNT],
            previous: [false; Key::COUNT],
            mouse_current: 0,
            mouse_previous: 0,
            mouse_position: (0.0, 0.0),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        self.current[key.index()] = true;
    }

    pub fn key_up(&mut self, key: Key) {
        self.current[key.index()] = false;
    }

    pub fn mouse_down(&mut self, button: MouseButton) {
        self.mouse_current |= button.mask();
    }

    pub fn mouse_up(&mut self, button: MouseButton) {
        self.mouse_current &= !button.mask();
    }

    pub fn set_mouse_position(&mut self, x: f64, y: f64) {
        self.mouse_position = (x, y);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.current[key.index()]
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.current[key.index()] && !self.previous[key.index()]
    }

    pub fn is_released(&self, key: Key) -> bool {
        !self.current[key.index()] && self.previous[key.index()]
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_current & button.mask() != 0
    }

    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_current & button.mask() != 0 && self.mouse_previous & button.mask() == 0
    }

    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_current & button.mask() == 0 && self.mouse_previous & button.mask() != 0
    }

    pub fn mouse_position(&self) -> (f64, f64) {
        self.mouse_position
    }

    /// Let go of every key and button. `previous` is kept, so anything that
    /// was held reports as released on the next query.
    pub fn release_all(&mut self) {
        self.current = [false; Key::COUNT];
        self.mouse_current = 0;
    }

    /// Copy `current` into `previous`. Called once per frame by the engine loop.
    pub fn snapshot(&mut self) {
        self.previous = self.current;
        self.mouse_previous = self.mouse_current;
    }

    /// True when no edge is pending for any key or button.
    pub fn is_settled(&self) -> bool {
        self.current == self.previous && self.mouse_current == self.mouse_previous
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
