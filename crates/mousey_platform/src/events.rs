//! Non-blocking winit event source.
//!
//! winit normally owns the main loop through `run_app`. The engine loop wants
//! to own it instead, so events are pulled with `pump_app_events` and a zero
//! timeout once per frame.

use std::sync::Arc;
use std::time::Duration;

use mousey_core::{EventSource, PlatformEvent};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::error::PlatformError;
use crate::keymap::{map_key_code, map_mouse_button};
use crate::window::{create_window, WindowConfig};

const STARTUP_PUMP_LIMIT: usize = 100;
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

pub struct DesktopEvents {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    exited: bool,
}

impl DesktopEvents {
    /// Create the event loop and pump it until the window exists.
    pub fn open(config: &WindowConfig) -> Result<Self, PlatformError> {
        let mut event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut startup = Startup {
            config,
            window: None,
            error: None,
        };
        for _ in 0..STARTUP_PUMP_LIMIT {
            let status = event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut startup);
            if let PumpStatus::Exit(code) = status {
                return Err(PlatformError::ExitedDuringStartup(code));
            }
            if startup.window.is_some() || startup.error.is_some() {
                break;
            }
        }
        if let Some(err) = startup.error {
            return Err(err);
        }
        let window = startup.window.ok_or(PlatformError::NoWindow)?;

        Ok(Self {
            event_loop,
            window,
            exited: false,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl EventSource for DesktopEvents {
    fn drain(&mut self, sink: &mut dyn FnMut(PlatformEvent)) {
        if self.exited {
            sink(PlatformEvent::Quit);
            return;
        }
        let mut translate = Translate {
            sink,
            window_id: self.window.id(),
        };
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut translate);
        if let PumpStatus::Exit(code) = status {
            log::debug!("Event loop exited with code {}", code);
            self.exited = true;
            (translate.sink)(PlatformEvent::Quit);
        }
    }
}

struct Startup<'a> {
    config: &'a WindowConfig,
    window: Option<Arc<Window>>,
    error: Option<PlatformError>,
}

impl ApplicationHandler for Startup<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }
        match create_window(event_loop, self.config) {
            Ok(window) => self.window = Some(window),
            Err(err) => self.error = Some(err),
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

struct Translate<'a> {
    sink: &'a mut dyn FnMut(PlatformEvent),
    window_id: WindowId,
}

impl ApplicationHandler for Translate<'_> {
    fn resumed(&mut self, _: &ActiveEventLoop) {}

    fn window_event(&mut self, _: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if id != self.window_id {
            return;
        }
        if let Some(event) = translate_window_event(event) {
            (self.sink)(event);
        }
    }
}

fn translate_window_event(event: WindowEvent) -> Option<PlatformEvent> {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(PlatformEvent::Quit),
        WindowEvent::Resized(size) => Some(PlatformEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::KeyboardInput { event, .. } => {
            let PhysicalKey::Code(code) = event.physical_key else {
                return None;
            };
            let key = map_key_code(code)?;
            Some(match event.state {
                ElementState::Pressed => PlatformEvent::KeyDown(key),
                ElementState::Released => PlatformEvent::KeyUp(key),
            })
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let button = map_mouse_button(button)?;
            Some(match state {
                ElementState::Pressed => PlatformEvent::MouseDown(button),
                ElementState::Released => PlatformEvent::MouseUp(button),
            })
        }
        WindowEvent::Focused(false) => Some(PlatformEvent::FocusLost),
        WindowEvent::CursorMoved { position, .. } => Some(PlatformEvent::CursorMoved {
            x: position.x,
            y: position.y,
        }),
        _ => None,
    }
}
