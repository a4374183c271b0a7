use std::path::{Path, PathBuf};
use std::sync::Arc;

use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Icon, Window, WindowAttributes, WindowLevel};

use crate::error::PlatformError;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub icon: Option<PathBuf>,
    pub resizable: bool,
    pub always_on_top: bool,
    pub borderless: bool,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            width: 800,
            height: 600,
            icon: None,
            resizable: false,
            always_on_top: false,
            borderless: false,
            fullscreen: false,
        }
    }
}

impl WindowConfig {
    pub fn attributes(&self) -> WindowAttributes {
        let mut attrs = WindowAttributes::default()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(self.width, self.height))
            .with_resizable(self.resizable)
            .with_decorations(!self.borderless);

        if self.always_on_top {
            attrs = attrs.with_window_level(WindowLevel::AlwaysOnTop);
        }
        if self.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        if let Some(icon) = self.icon.as_deref().and_then(load_icon) {
            attrs = attrs.with_window_icon(Some(icon));
        }
        attrs
    }
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &WindowConfig,
) -> Result<Arc<Window>, PlatformError> {
    let window = event_loop.create_window(config.attributes())?;
    log::info!(
        "Window created: '{}' {}x{}",
        config.title,
        config.width,
        config.height
    );
    Ok(Arc::new(window))
}

/// A missing or unreadable icon is not fatal; the window just keeps the
/// platform default.
fn load_icon(path: &Path) -> Option<Icon> {
    let image = match image::open(path) {
        Ok(image) => image.into_rgba8(),
        Err(err) => {
            log::warn!("Failed to load window icon '{}': {}", path.display(), err);
            return None;
        }
    };
    let (width, height) = image.dimensions();
    match Icon::from_rgba(image.into_raw(), width, height) {
        Ok(icon) => Some(icon),
        Err(err) => {
            log::warn!("Window icon '{}' rejected: {}", path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_generated_project() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "Untitled");
        assert_eq!((config.width, config.height), (800, 600));
        assert!(config.icon.is_none());
        assert!(!config.resizable && !config.always_on_top);
        assert!(!config.borderless && !config.fullscreen);
    }

    #[test]
    fn test_missing_icon_degrades_to_none() {
        assert!(load_icon(Path::new("__missing_icon_for_test__.png")).is_none());
    }

    #[test]
    fn test_valid_icon_loads() {
        let mut path = std::env::temp_dir();
        path.push(format!("mousey_test_icon_{}.png", std::process::id()));
        image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .expect("failed to write test icon");

        assert!(load_icon(&path).is_some());

        let _ = std::fs::remove_file(&path);
    }
}
