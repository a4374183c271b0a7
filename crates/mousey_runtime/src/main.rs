//! Mousey runtime: opens the project's window, runs its Lua entry script
//! through the engine loop, and exits once the window is closed.
//!
//! Usage: `mousey_runtime [PROJECT_DIR]` (defaults to the current directory).
//! The project directory holds `project.yaml`, generated with defaults when
//! missing, and the entry script (`main.lua` unless configured otherwise).

mod desktop;

use std::ffi::OsString;
use std::path::PathBuf;

use mousey_audio::AudioDevice;
use mousey_core::EngineLoop;
use mousey_platform::{ConfigError, DesktopEvents, PlatformError, Project};
use mousey_render::{GpuContext, RenderError, ScreenRenderer};
use mousey_script::{LuaHost, ScriptError};
use thiserror::Error;

use desktop::DesktopPlatform;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

fn project_dir(mut args: impl Iterator<Item = OsString>) -> PathBuf {
    args.nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

fn run(root: PathBuf) -> Result<(), StartupError> {
    let project = Project::open(&root)?;

    // Held for the whole run so the device outlives every sound.
    let audio = match AudioDevice::acquire() {
        Ok(device) => Some(device),
        Err(err) => {
            log::warn!("{}. Running without sound.", err);
            None
        }
    };

    let events = DesktopEvents::open(&project.window_config())?;
    let gpu = GpuContext::new(events.window().clone())?;
    let platform = DesktopPlatform::new(events, ScreenRenderer::new(gpu));
    let host = LuaHost::new(project.script_path(), audio.as_ref())?;
    log::info!("{}", host.status());

    let mut engine = EngineLoop::new(platform, host);
    engine.run();
    let stats = engine.stats();

    let (platform, host) = engine.into_parts();
    drop(host);
    drop(platform);
    if let Some(device) = &audio {
        let refs = device.ref_count();
        if refs > 1 {
            log::warn!("Audio device still has {} other references after shutdown", refs - 1);
        }
    }
    drop(audio);

    log::info!(
        "Shut down cleanly: {} frames, {} presented",
        stats.frames,
        stats.presented
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let root = project_dir(std::env::args_os());
    log::info!("Mousey starting in {}", root.display());

    if let Err(err) = run(root) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
