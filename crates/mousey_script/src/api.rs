//! The `Mousey` global table.
//!
//! Layout:
//!   Mousey.Key.<Name>, Mousey.MouseButton.<Name>   -- integer constants
//!   Mousey.Keyboard.is_down/is_pressed/is_released(key)  -- constant or name
//!   Mousey.Mouse.is_down/is_pressed/is_released(button), Mouse.get_position()
//!   Mousey.Viewport.get_size(), Mousey.get_frame()
//!   Mousey.Vector2(...), Mousey.Rect2(...), deg_to_rad, rad_to_deg
//!   Mousey.Sound(path), Mousey.Music(path)          -- only with an audio device
//!
//! The table is built once. Input and viewport functions read the
//! [`FrameSnapshot`] the host stores as app data before every callback.

use std::path::Path;

use mlua::prelude::*;
use mousey_audio::AudioDevice;
use mousey_core::{FrameContext, InputState, Key, MouseButton};

use crate::math::{self, Vector2};

/// Copy of the engine state a callback may observe.
#[derive(Debug, Clone, Default)]
pub struct FrameSnapshot {
    pub input: InputState,
    pub viewport: (u32, u32),
    pub frame: u64,
}

impl FrameSnapshot {
    pub fn capture(frame: &FrameContext<'_>) -> Self {
        Self {
            input: frame.input.clone(),
            viewport: frame.viewport,
            frame: frame.frame,
        }
    }
}

fn with_frame<R>(lua: &Lua, f: impl FnOnce(&FrameSnapshot) -> R) -> R {
    match lua.app_data_ref::<FrameSnapshot>() {
        Some(snapshot) => f(&snapshot),
        None => f(&FrameSnapshot::default()),
    }
}

/// Keys and buttons arrive either as the integer constants from
/// `Mousey.Key`/`Mousey.MouseButton` or by name (`"Space"`).
fn index_arg(value: &LuaValue) -> Option<usize> {
    match value {
        LuaValue::Integer(index) => usize::try_from(*index).ok(),
        LuaValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 => Some(*n as usize),
        _ => None,
    }
}

fn name_arg(value: &LuaValue) -> Option<String> {
    match value {
        LuaValue::String(name) => name.to_str().ok().map(|name| name.to_string()),
        _ => None,
    }
}

fn key_arg(value: LuaValue) -> LuaResult<Key> {
    index_arg(&value)
        .and_then(|i| Key::ALL.get(i).copied())
        .or_else(|| name_arg(&value).and_then(|name| Key::from_name(&name)))
        .ok_or_else(|| LuaError::runtime(format!("invalid key {:?}", value)))
}

fn button_arg(value: LuaValue) -> LuaResult<MouseButton> {
    index_arg(&value)
        .and_then(|i| MouseButton::ALL.get(i).copied())
        .or_else(|| name_arg(&value).and_then(|name| MouseButton::from_name(&name)))
        .ok_or_else(|| LuaError::runtime(format!("invalid mouse button {:?}", value)))
}

pub fn register(lua: &Lua, root: &Path, audio: Option<&AudioDevice>) -> LuaResult<()> {
    let mousey = lua.create_table()?;

    let keys = lua.create_table()?;
    for (index, key) in Key::ALL.iter().enumerate() {
        keys.set(key.name(), index)?;
    }
    mousey.set("Key", keys)?;

    let buttons = lua.create_table()?;
    for (index, button) in MouseButton::ALL.iter().enumerate() {
        buttons.set(button.name(), index)?;
    }
    mousey.set("MouseButton", buttons)?;

    mousey.set("Keyboard", keyboard_table(lua)?)?;
    mousey.set("Mouse", mouse_table(lua)?)?;

    let viewport = lua.create_table()?;
    viewport.set(
        "get_size",
        lua.create_function(|lua, ()| {
            let (width, height) = with_frame(lua, |frame| frame.viewport);
            Ok(Vector2::new(width as f64, height as f64))
        })?,
    )?;
    mousey.set("Viewport", viewport)?;
    mousey.set(
        "get_frame",
        lua.create_function(|lua, ()| Ok(with_frame(lua, |frame| frame.frame)))?,
    )?;

    mousey.set("Vector2", lua.create_function(math::construct_vector2)?)?;
    mousey.set("Rect2", lua.create_function(math::construct_rect2)?)?;
    mousey.set("deg_to_rad", lua.create_function(|_, deg: f64| Ok(math::deg_to_rad(deg)))?)?;
    mousey.set("rad_to_deg", lua.create_function(|_, rad: f64| Ok(math::rad_to_deg(rad)))?)?;

    match audio {
        Some(device) => crate::audio::register(lua, &mousey, device, root)?,
        None => log::warn!("No audio device; Mousey.Sound and Mousey.Music are unavailable"),
    }

    lua.globals().set("Mousey", mousey)?;
    lua.globals().set("print", lua.create_function(script_print)?)?;
    Ok(())
}

fn keyboard_table(lua: &Lua) -> LuaResult<LuaTable> {
    let table = lua.create_table()?;
    table.set(
        "is_down",
        lua.create_function(|lua, key: LuaValue| {
            let key = key_arg(key)?;
            Ok(with_frame(lua, |frame| frame.input.is_down(key)))
        })?,
    )?;
    table.set(
        "is_pressed",
        lua.create_function(|lua, key: LuaValue| {
            let key = key_arg(key)?;
            Ok(with_frame(lua, |frame| frame.input.is_pressed(key)))
        })?,
    )?;
    table.set(
        "is_released",
        lua.create_function(|lua, key: LuaValue| {
            let key = key_arg(key)?;
            Ok(with_frame(lua, |frame| frame.input.is_released(key)))
        })?,
    )?;
    Ok(table)
}

fn mouse_table(lua: &Lua) -> LuaResult<LuaTable> {
    let table = lua.create_table()?;
    table.set(
        "is_down",
        lua.create_function(|lua, button: LuaValue| {
            let button = button_arg(button)?;
            Ok(with_frame(lua, |frame| frame.input.is_mouse_down(button)))
        })?,
    )?;
    table.set(
        "is_pressed",
        lua.create_function(|lua, button: LuaValue| {
            let button = button_arg(button)?;
            Ok(with_frame(lua, |frame| frame.input.is_mouse_pressed(button)))
        })?,
    )?;
    table.set(
        "is_released",
        lua.create_function(|lua, button: LuaValue| {
            let button = button_arg(button)?;
            Ok(with_frame(lua, |frame| frame.input.is_mouse_released(button)))
        })?,
    )?;
    table.set(
        "get_position",
        lua.create_function(|lua, ()| {
            let (x, y) = with_frame(lua, |frame| frame.input.mouse_position());
            Ok(Vector2::new(x, y))
        })?,
    )?;
    Ok(table)
}

/// Join `args` the way Lua's own `print` does: `tostring` each, tab separated.
pub(crate) fn format_print_args(lua: &Lua, args: LuaMultiValue) -> LuaResult<String> {
    let tostring: LuaFunction = lua.globals().get("tostring")?;
    let mut parts = Vec::with_capacity(args.len());
    for value in args {
        parts.push(tostring.call::<String>(value)?);
    }
    Ok(parts.join("\t"))
}

fn script_print(lua: &Lua, args: LuaMultiValue) -> LuaResult<()> {
    let line = format_print_args(lua, args)?;
    log::info!(target: "script", "{}", line);
    Ok(())
}
