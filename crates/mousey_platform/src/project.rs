use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::window::WindowConfig;

pub const PROJECT_FILE_NAME: &str = "project.yaml";
pub const DEFAULT_SCRIPT: &str = "main.lua";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    pub window: WindowSection,
    #[serde(
        default = "default_script",
        skip_serializing_if = "is_default_script"
    )]
    pub script: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WindowSection {
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub resizable: bool,
    #[serde(default)]
    pub always_on_top: bool,
    #[serde(default)]
    pub borderless: bool,
    #[serde(default)]
    pub fullscreen: bool,
}

fn default_script() -> String {
    DEFAULT_SCRIPT.to_string()
}

fn is_default_script(script: &String) -> bool {
    script == DEFAULT_SCRIPT
}

impl Default for ProjectFile {
    fn default() -> Self {
        let window = WindowConfig::default();
        Self {
            window: WindowSection {
                title: window.title,
                icon: None,
                width: window.width,
                height: window.height,
                resizable: window.resizable,
                always_on_top: window.always_on_top,
                borderless: window.borderless,
                fullscreen: window.fullscreen,
            },
            script: default_script(),
        }
    }
}

/// A loaded project: the parsed file plus the directory relative paths
/// inside it resolve against.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub root: PathBuf,
    pub file: ProjectFile,
}

impl Project {
    /// Load `project.yaml` from `root`, writing the default file first if it
    /// does not exist yet.
    pub fn open(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(PROJECT_FILE_NAME);
        if !path.exists() {
            write_default_project(&path)?;
        }
        let file = load_project_from_path(&path)?;
        Ok(Self {
            root: root.to_path_buf(),
            file,
        })
    }

    pub fn window_config(&self) -> WindowConfig {
        let section = &self.file.window;
        WindowConfig {
            title: section.title.clone(),
            width: section.width,
            height: section.height,
            icon: section
                .icon
                .as_deref()
                .filter(|icon| !icon.is_empty())
                .map(|icon| self.root.join(icon)),
            resizable: section.resizable,
            always_on_top: section.always_on_top,
            borderless: section.borderless,
            fullscreen: section.fullscreen,
        }
    }

    pub fn script_path(&self) -> PathBuf {
        self.root.join(&self.file.script)
    }
}

pub fn write_default_project(path: &Path) -> Result<(), ConfigError> {
    let body = serde_yaml::to_string(&ProjectFile::default()).map_err(|source| {
        ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, body).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Generated default project file at {}", path.display());
    Ok(())
}

pub fn load_project_from_path(path: &Path) -> Result<ProjectFile, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let project: ProjectFile = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_project(&project).map_err(|reason| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(project)
}

fn validate_project(project: &ProjectFile) -> Result<(), String> {
    let window = &project.window;
    if window.width == 0 || window.height == 0 {
        return Err(format!(
            "window size must be at least 1x1, got {}x{}",
            window.width, window.height
        ));
    }
    if project.script.trim().is_empty() {
        return Err("script path is empty".to_string());
    }
    if window.fullscreen && window.borderless {
        log::warn!("Both fullscreen and borderless are set; fullscreen takes precedence");
    }
    Ok(())
}
