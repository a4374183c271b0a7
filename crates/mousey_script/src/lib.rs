pub mod api;
mod audio;
pub mod host;
pub mod math;

pub use api::FrameSnapshot;
pub use host::{LuaHost, ScriptError, ScriptStatus};
pub use math::{Rect2, Vector2};
