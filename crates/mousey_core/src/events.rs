//! Platform events and the per-frame event pump.
//!
//! The platform layer translates its native events into [`PlatformEvent`]s and
//! hands them over through an [`EventSource`]. [`EventPump::poll`] applies them
//! to the `current` half of the [`InputState`]; it never touches `previous`.

use crate::input::{InputState, Key, MouseButton};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    CursorMoved { x: f64, y: f64 },
    Resized { width: u32, height: u32 },
    /// The window stopped receiving input; nothing held stays held.
    FocusLost,
    Quit,
}

/// Anything that can hand over its pending events without blocking.
pub trait EventSource {
    fn drain(&mut self, sink: &mut dyn FnMut(PlatformEvent));
}

impl EventSource for Vec<PlatformEvent> {
    fn drain(&mut self, sink: &mut dyn FnMut(PlatformEvent)) {
        for event in std::mem::take(self) {
            sink(event);
        }
    }
}

#[derive(Debug, Default)]
pub struct EventPump {
    closing: bool,
}

impl EventPump {
    pub fn new() -> Self {
        Self { closing: false }
    }

    /// Drain every pending event into `input`. Returns how many were applied.
    pub fn poll<S: EventSource + ?Sized>(&mut self, source: &mut S, input: &mut InputState) -> usize {
        let mut applied = 0;
        source.drain(&mut |event| {
            self.apply(event, input);
            applied += 1;
        });
        applied
    }

    pub fn apply(&mut self, event: PlatformEvent, input: &mut InputState) {
        match event {
            PlatformEvent::KeyDown(key) => input.key_down(key),
            PlatformEvent::KeyUp(key) => input.key_up(key),
            PlatformEvent::MouseDown(button) => input.mouse_down(button),
            PlatformEvent::MouseUp(button) => input.mouse_up(button),
            PlatformEvent::CursorMoved { x, y } => input.set_mouse_position(x, y),
            // Size is re-queried from the platform every frame.
            PlatformEvent::Resized { width, height } => {
                log::debug!("Window resized to {}x{}", width, height);
            }
            PlatformEvent::FocusLost => {
                log::debug!("Focus lost, releasing held input");
                input.release_all();
            }
            PlatformEvent::Quit => {
                if !self.closing {
                    log::info!("Quit requested");
                }
                self.closing = true;
            }
        }
    }

    /// Latched once a quit event has been seen.
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn request_close(&mut self) {
        self.closing = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_applies_key_and_mouse_events() {
        let mut pump = EventPump::new();
        let mut input = InputState::new();
        let mut events = vec![
            PlatformEvent::KeyDown(Key::A),
            PlatformEvent::MouseDown(MouseButton::Middle),
            PlatformEvent::CursorMoved { x: 12.5, y: 40.0 },
        ];

        let applied = pump.poll(&mut events, &mut input);
        assert_eq!(applied, 3);
        assert!(events.is_empty());
        assert!(input.is_down(Key::A));
        assert!(input.is_mouse_down(MouseButton::Middle));
        assert_eq!(input.mouse_position(), (12.5, 40.0));
        assert!(!pump.is_closing());
    }

    #[test]
    fn test_poll_with_no_events_is_a_no_op() {
        let mut pump = EventPump::new();
        let mut input = InputState::new();
        let mut events: Vec<PlatformEvent> = Vec::new();
        assert_eq!(pump.poll(&mut events, &mut input), 0);
        assert_eq!(input, InputState::new());
    }

    #[test]
    fn test_poll_does_not_touch_previous() {
        let mut pump = EventPump::new();
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.snapshot();

        let mut events = vec![PlatformEvent::KeyUp(Key::Up)];
        pump.poll(&mut events, &mut input);
        // previous still remembers the key as held
        assert!(input.is_released(Key::Up));
    }

    #[test]
    fn test_quit_latches_closing() {
        let mut pump = EventPump::new();
        let mut input = InputState::new();
        let mut events = vec![PlatformEvent::Quit, PlatformEvent::KeyDown(Key::Escape)];
        pump.poll(&mut events, &mut input);
        assert!(pump.is_closing());
        // Events after the quit are still applied.
        assert!(input.is_down(Key::Escape));

        let mut none: Vec<PlatformEvent> = Vec::new();
        pump.poll(&mut none, &mut input);
        assert!(pump.is_closing());
    }

    #[test]
    fn test_focus_loss_releases_held_input() {
        let mut pump = EventPump::new();
        let mut input = InputState::new();
        let mut events = vec![
            PlatformEvent::KeyDown(Key::Right),
            PlatformEvent::MouseDown(MouseButton::Left),
        ];
        pump.poll(&mut events, &mut input);
        input.snapshot();

        let mut events = vec![PlatformEvent::FocusLost];
        pump.poll(&mut events, &mut input);
        assert!(!input.is_down(Key::Right));
        assert!(input.is_released(Key::Right));
        assert!(!input.is_mouse_down(MouseButton::Left));
        assert!(!pump.is_closing());
    }

    #[test]
    fn test_mouse_up_clears_only_its_bit() {
        let mut pump = EventPump::new();
        let mut input = InputState::new();
        let mut events = vec![
            PlatformEvent::MouseDown(MouseButton::Left),
            PlatformEvent::MouseDown(MouseButton::Right),
            PlatformEvent::MouseUp(MouseButton::Left),
        ];
        pump.poll(&mut events, &mut input);
        assert!(!input.is_mouse_down(MouseButton::Left));
        assert!(input.is_mouse_down(MouseButton::Right));
    }
}
