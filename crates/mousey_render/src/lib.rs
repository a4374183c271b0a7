pub mod gpu_context;
pub mod projection;
pub mod screen;

pub use gpu_context::{GpuContext, RenderError};
pub use projection::{ProjectionBuffer, ProjectionUniform};
pub use screen::ScreenRenderer;
