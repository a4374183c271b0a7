use std::time::Instant;

use mousey_core::{EventSource, Platform, PlatformEvent, ScreenProjection};
use mousey_platform::DesktopEvents;
use mousey_render::ScreenRenderer;

/// The real window and GPU surface behind the engine loop.
pub struct DesktopPlatform {
    // Field order is drop order: the surface goes before the event loop.
    screen: ScreenRenderer,
    events: DesktopEvents,
}

impl DesktopPlatform {
    pub fn new(events: DesktopEvents, screen: ScreenRenderer) -> Self {
        Self { screen, events }
    }
}

impl EventSource for DesktopPlatform {
    fn drain(&mut self, sink: &mut dyn FnMut(PlatformEvent)) {
        self.events.drain(sink);
    }
}

impl Platform for DesktopPlatform {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn window_size(&self) -> (u32, u32) {
        let size = self.events.window().inner_size();
        (size.width, size.height)
    }

    fn prepare_surface(&mut self, projection: &ScreenProjection) -> bool {
        self.screen.prepare(projection)
    }

    fn present(&mut self) {
        self.events.window().pre_present_notify();
        self.screen.present();
    }
}
