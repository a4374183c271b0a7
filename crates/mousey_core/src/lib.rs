pub mod engine;
pub mod events;
pub mod input;
pub mod time;
pub mod viewport;

pub use engine::{
    Callback, CallbackError, EngineLoop, FrameContext, LoopState, LoopStats, Platform, ScriptHost,
};
pub use events::{EventPump, EventSource, PlatformEvent};
pub use input::{InputState, Key, MouseButton};
pub use time::FrameClock;
pub use viewport::ScreenProjection;
