use std::path::Path;

use kira::backend::Backend;
use mlua::prelude::*;
use mousey_audio::{AudioDevice, Music, Sound};

struct LuaSound<B: Backend + 'static>(Sound<B>);

struct LuaMusic<B: Backend + 'static>(Music<B>);

impl<B: Backend + 'static> LuaUserData for LuaSound<B> {
    fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
        methods.add_method_mut("play", |_, this, ()| this.0.play().map_err(LuaError::external));
        methods.add_method_mut("pause", |_, this, ()| {
            this.0.pause();
            Ok(())
        });
        methods.add_method_mut("stop", |_, this, ()| {
            this.0.stop();
            Ok(())
        });
    }
}

impl<B: Backend + 'static> LuaUserData for LuaMusic<B> {
    fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
        methods.add_method_mut("play", |_, this, ()| this.0.play().map_err(LuaError::external));
        methods.add_method_mut("pause", |_, this, ()| {
            this.0.pause();
            Ok(())
        });
        methods.add_method_mut("stop", |_, this, ()| {
            this.0.stop();
            Ok(())
        });
        methods.add_method_mut("set_looping", |_, this, looping: bool| {
            this.0.set_looping(looping);
            Ok(())
        });
        methods.add_method("is_looping", |_, this, ()| Ok(this.0.is_looping()));
    }
}

/// Add `Sound(path)` and `Music(path)` to `mousey`. Paths resolve against
/// `root`. Each constructor closure holds a device reference for as long as
/// the Lua state lives.
pub fn register<B>(lua: &Lua, mousey: &LuaTable, device: &AudioDevice<B>, root: &Path) -> LuaResult<()>
where
    B: Backend + 'static,
    AudioDevice<B>: Send,
    Sound<B>: Send,
    Music<B>: Send,
{
    let (sound_device, sound_root) = (device.clone(), root.to_path_buf());
    let sound = lua.create_function(move |_, path: String| {
        let sound = sound_device
            .load_sound(&sound_root.join(path))
            .map_err(LuaError::external)?;
        Ok(LuaSound(sound))
    })?;
    mousey.set("Sound", sound)?;

    let (music_device, music_root) = (device.clone(), root.to_path_buf());
    let music = lua.create_function(move |_, path: String| {
        let music = music_device
            .load_music(&music_root.join(path))
            .map_err(LuaError::external)?;
        Ok(LuaMusic(music))
    })?;
    mousey.set("Music", music)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kira::backend::mock::MockBackend;
    use kira::AudioManager;
    use mousey_audio::SharedDevice;
    use std::path::PathBuf;

    fn mock_device() -> AudioDevice<MockBackend> {
        let shared: &'static SharedDevice<AudioManager<MockBackend>> =
            Box::leak(Box::new(SharedDevice::new()));
        AudioDevice::acquire_from(shared).expect("mock backend should open")
    }

    fn write_test_wav(dir: &Path, name: &str) -> PathBuf {
        let samples: Vec<i16> = (0..400).map(|i| ((i % 40) as i16 - 20) * 400).collect();
        let data_len = (samples.len() * 2) as u32;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&16000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        let path = dir.join(name);
        std::fs::write(&path, bytes).expect("failed to write test wav");
        path
    }

    #[test]
    fn test_sound_and_music_from_lua() {
        let root = std::env::temp_dir();
        let name = format!("mousey_lua_blip_{}.wav", std::process::id());
        let wav = write_test_wav(&root, &name);
        let device = mock_device();

        let lua = Lua::new();
        let mousey = lua.create_table().unwrap();
        register(&lua, &mousey, &device, &root).unwrap();
        lua.globals().set("Mousey", mousey).unwrap();
        lua.globals().set("clip_name", name.as_str()).unwrap();

        lua.load(
            r#"
            local sound = Mousey.Sound(clip_name)
            sound:play()
            sound:pause()
            sound:play()
            sound:stop()

            local music = Mousey.Music(clip_name)
            looping_before = music:is_looping()
            music:set_looping(true)
            looping_after = music:is_looping()
            music:play()

            local ok, err = pcall(Mousey.Sound, "__missing_clip__.wav")
            missing_ok = ok
            missing_msg = tostring(err)
            "#,
        )
        .exec()
        .expect("audio script should run");

        let globals = lua.globals();
        assert!(!globals.get::<bool>("looping_before").unwrap());
        assert!(globals.get::<bool>("looping_after").unwrap());
        assert!(!globals.get::<bool>("missing_ok").unwrap());
        assert!(globals
            .get::<String>("missing_msg")
            .unwrap()
            .contains("__missing_clip__.wav"));

        // Constructors and live clips each hold a reference until the state goes.
        assert!(device.ref_count() >= 3);
        drop(globals);
        drop(lua);
        assert_eq!(device.ref_count(), 1);

        let _ = std::fs::remove_file(&wav);
    }
}
