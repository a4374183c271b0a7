pub mod error;
pub mod events;
pub mod keymap;
pub mod project;
pub mod window;

pub use error::{ConfigError, PlatformError};
pub use events::DesktopEvents;
pub use project::{Project, ProjectFile, PROJECT_FILE_NAME};
pub use window::WindowConfig;
