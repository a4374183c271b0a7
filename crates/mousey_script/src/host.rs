//! Lua-backed [`ScriptHost`].
//!
//! The entry script is executed once at startup. After that the engine loop
//! calls the four global functions `initialize`, `update(dt)`,
//! `physics_update(fixed_dt)` and `render()`; any of them may be absent, in
//! which case that step is skipped. Scripts only ever see copies of engine
//! state, refreshed before each call.

use std::path::{Path, PathBuf};

use mlua::prelude::*;
use mousey_audio::AudioDevice;
use mousey_core::{Callback, CallbackError, FrameContext, ScriptHost};
use thiserror::Error;

use crate::api::{self, FrameSnapshot};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load script {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: LuaError,
    },
    #[error("failed to set up script API: {0}")]
    Api(#[from] LuaError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStatus {
    /// Entry script executed; callbacks are dispatched.
    Loaded,
    /// No entry script on disk; every callback is a no-op.
    Empty,
}

impl ScriptStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Loaded => "script: loaded",
            Self::Empty => "script: none",
        }
    }
}

impl std::fmt::Display for ScriptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub struct LuaHost {
    lua: Lua,
    script_path: PathBuf,
    status: ScriptStatus,
}

impl LuaHost {
    /// Build the `Mousey` API and run the entry script. A missing script gives
    /// an empty host; a script that fails to compile or run is an error.
    pub fn new(script_path: PathBuf, audio: Option<&AudioDevice>) -> Result<Self, ScriptError> {
        let lua = Lua::new();
        let root = script_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        api::register(&lua, &root, audio)?;

        let mut host = Self {
            lua,
            script_path,
            status: ScriptStatus::Empty,
        };
        host.load_entry_script()?;
        Ok(host)
    }

    pub fn status(&self) -> ScriptStatus {
        self.status
    }

    fn load_entry_script(&mut self) -> Result<(), ScriptError> {
        if !self.script_path.exists() {
            log::warn!(
                "Script not found: {}. Running without callbacks.",
                self.script_path.display()
            );
            self.status = ScriptStatus::Empty;
            return Ok(());
        }

        let source = std::fs::read_to_string(&self.script_path).map_err(|source| {
            ScriptError::Read {
                path: self.script_path.clone(),
                source,
            }
        })?;
        self.lua
            .load(&source)
            .set_name(self.script_path.to_string_lossy())
            .exec()
            .map_err(|source| ScriptError::Load {
                path: self.script_path.clone(),
                source,
            })?;

        self.status = ScriptStatus::Loaded;
        log::info!("Script loaded: {}", self.script_path.display());
        Ok(())
    }

    fn call(&self, callback: Callback) -> LuaResult<()> {
        let Some(function) = self.lua.globals().get::<Option<LuaFunction>>(callback.name())? else {
            return Ok(());
        };
        match callback {
            Callback::Update(dt) | Callback::PhysicsUpdate(dt) => function.call::<()>(dt),
            Callback::Initialize | Callback::Render => function.call::<()>(()),
        }
    }
}

impl ScriptHost for LuaHost {
    fn invoke(&mut self, callback: Callback, frame: &FrameContext<'_>) -> Result<(), CallbackError> {
        if self.status != ScriptStatus::Loaded {
            return Ok(());
        }
        self.lua.set_app_data(FrameSnapshot::capture(frame));
        self.call(callback)
            .map_err(|err| CallbackError(err.to_string()))
    }
}
