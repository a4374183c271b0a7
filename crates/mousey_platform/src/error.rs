use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access project file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse project file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to serialize default project file {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid project file {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("event loop exited during startup (code {0})")]
    ExitedDuringStartup(i32),
    #[error("platform never resumed; no window was created")]
    NoWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_failure_names_the_file() {
        let source = <serde_yaml::Error as serde::ser::Error>::custom("unsupported value");
        let err = ConfigError::Serialize {
            path: PathBuf::from("game/project.yaml"),
            source,
        };
        let message = err.to_string();
        assert!(message.starts_with("failed to serialize default project file"));
        assert!(message.contains("game/project.yaml"));
        assert!(message.contains("unsupported value"));
    }
}
