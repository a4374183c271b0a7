//! Engine loop: the per-frame orchestration of event polling, fixed-timestep
//! simulation, script callbacks and presentation.
//!
//! Every iteration runs the same ordered steps:
//!
//!   1. poll platform events into `InputState` (may latch the close flag)
//!   2. measure the frame delta, call `update(dt)` once
//!   3. call `physics_update(fixed_dt)` for every whole fixed step accumulated
//!   4. snapshot input (`previous = current`)
//!   5. re-query the window size, clear the surface, set up the projection
//!   6. call `render()`
//!   7. present
//!
//! The close flag is only checked at the top of an iteration, so a frame whose
//! poll sees the quit event still runs to completion.

use std::time::Instant;

use thiserror::Error;

use crate::events::{EventPump, EventSource};
use crate::input::InputState;
use crate::time::FrameClock;
use crate::viewport::ScreenProjection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    NotStarted,
    Running,
    Closing,
    Stopped,
}

/// The four entry points a script host may define.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Callback {
    Initialize,
    Update(f64),
    PhysicsUpdate(f64),
    Render,
}

impl Callback {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Update(_) => "update",
            Self::PhysicsUpdate(_) => "physics_update",
            Self::Render => "render",
        }
    }
}

/// Read-only view of engine state handed to every callback.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub input: &'a InputState,
    pub viewport: (u32, u32),
    pub frame: u64,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct CallbackError(pub String);

/// Script environment driven by the loop.
///
/// A host reports its own failures by returning `Err`; the loop logs them and
/// carries on with the next step.
pub trait ScriptHost {
    fn invoke(&mut self, callback: Callback, frame: &FrameContext<'_>) -> Result<(), CallbackError>;
}

/// Window and render surface collaborator.
pub trait Platform: EventSource {
    fn now(&self) -> Instant;

    fn window_size(&self) -> (u32, u32);

    /// Clear the surface and install `projection`. Returns `false` when there
    /// is nothing to draw into this frame (minimised, surface lost).
    fn prepare_surface(&mut self, projection: &ScreenProjection) -> bool;

    fn present(&mut self);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    pub presented: u64,
    pub callback_failures: u64,
}

const FPS_LOG_INTERVAL: u64 = 600;

pub struct EngineLoop<P: Platform, H: ScriptHost> {
    platform: P,
    host: H,
    input: InputState,
    pump: EventPump,
    clock: FrameClock,
    state: LoopState,
    stats: LoopStats,
}

impl<P: Platform, H: ScriptHost> EngineLoop<P, H> {
    pub fn new(platform: P, host: H) -> Self {
        Self::with_clock(platform, host, FrameClock::new())
    }

    pub fn with_clock(platform: P, host: H, clock: FrameClock) -> Self {
        Self {
            platform,
            host,
            input: InputState::new(),
            pump: EventPump::new(),
            clock,
            state: LoopState::NotStarted,
            stats: LoopStats::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn should_close(&self) -> bool {
        self.pump.is_closing()
    }

    pub fn request_close(&mut self) {
        self.pump.request_close();
    }

    /// Enter `Running` and call `initialize` once.
    pub fn start(&mut self) {
        if self.state != LoopState::NotStarted {
            return;
        }
        self.state = LoopState::Running;
        let ctx = FrameContext {
            input: &self.input,
            viewport: self.platform.window_size(),
            frame: 0,
        };
        dispatch(&mut self.host, &mut self.stats, Callback::Initialize, &ctx);
        // Time spent in initialize does not count as simulation time.
        self.clock.restart(self.platform.now());
        log::info!("Engine loop running (fixed dt {:.4}s)", self.clock.fixed_dt);
    }

    /// Run one full iteration. Returns `false` if the loop is not running.
    pub fn frame(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }

        // (1) poll
        self.pump.poll(&mut self.platform, &mut self.input);
        if self.pump.is_closing() {
            self.state = LoopState::Closing;
        }

        let viewport = self.platform.window_size();
        let frame = self.clock.frame_count + 1;

        // (2) variable-rate update
        let dt = self.clock.tick(self.platform.now());
        let ctx = FrameContext {
            input: &self.input,
            viewport,
            frame,
        };
        dispatch(&mut self.host, &mut self.stats, Callback::Update(dt), &ctx);

        // (3) fixed-rate steps
        let fixed_dt = self.clock.fixed_dt;
        while self.clock.should_step() {
            dispatch(&mut self.host, &mut self.stats, Callback::PhysicsUpdate(fixed_dt), &ctx);
        }

        // (4) input snapshot
        self.input.snapshot();
        debug_assert!(self.input.is_settled());

        // (5) surface setup, sized from the window every frame
        let projection = ScreenProjection::new(self.platform.window_size());
        if self.platform.prepare_surface(&projection) {
            // (6) render
            let ctx = FrameContext {
                input: &self.input,
                viewport: (projection.width, projection.height),
                frame,
            };
            dispatch(&mut self.host, &mut self.stats, Callback::Render, &ctx);
            // (7) present
            self.platform.present();
            self.stats.presented += 1;
        }

        self.stats.frames += 1;
        if self.stats.frames % FPS_LOG_INTERVAL == 0 {
            log::debug!(
                "{:.1} fps ({:.2}ms), {} fixed steps",
                self.clock.smoothed_fps,
                self.clock.smoothed_frame_time_ms,
                self.clock.fixed_step_count
            );
        }
        true
    }

    /// Top of an iteration: a latched close moves the loop to `Closing`
    /// without running another frame. Otherwise runs one frame.
    pub fn step(&mut self) -> bool {
        if self.state == LoopState::Running && self.should_close() {
            self.state = LoopState::Closing;
        }
        self.frame()
    }

    /// Run until the close flag is observed at the top of an iteration.
    pub fn run(&mut self) {
        self.start();
        while self.step() {}
        self.stop();
    }

    fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        log::info!(
            "Engine loop stopped after {} frames ({} callback failures)",
            self.stats.frames,
            self.stats.callback_failures
        );
    }

    /// Tear the loop apart, handing back the collaborators for release.
    pub fn into_parts(self) -> (P, H) {
        (self.platform, self.host)
    }
}

fn dispatch<H: ScriptHost>(
    host: &mut H,
    stats: &mut LoopStats,
    callback: Callback,
    ctx: &FrameContext<'_>,
) {
    if let Err(err) = host.invoke(callback, ctx) {
        stats.callback_failures += 1;
        log::error!("Script {} error: {}", callback.name(), err);
    }
}
