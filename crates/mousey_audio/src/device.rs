use std::fmt::Debug;
use std::path::{Path, PathBuf};

use kira::backend::Backend;
use kira::sound::static_sound::StaticSoundData;
use kira::sound::FromFileError;
use kira::{AudioManager, AudioManagerSettings, DefaultBackend};
use thiserror::Error;

use crate::clip::{Music, Sound};
use crate::shared::{DeviceGuard, SharedDevice};

static DEVICE: SharedDevice<AudioManager<DefaultBackend>> = SharedDevice::new();

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to open audio device: {0}")]
    Device(String),
    #[error("failed to load sound {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: FromFileError,
    },
    #[error("failed to play sound: {0}")]
    Play(String),
    #[error("audio device is closed")]
    Closed,
}

/// Handle on a shared output device. Each handle counts as one reference;
/// the device closes when the last handle (including those held by sounds)
/// is dropped.
pub struct AudioDevice<B: Backend + 'static = DefaultBackend> {
    guard: DeviceGuard<'static, AudioManager<B>>,
}

impl AudioDevice {
    /// Take a reference on the process-wide device.
    pub fn acquire() -> Result<Self, AudioError> {
        Self::acquire_from(&DEVICE)
    }
}

impl<B> AudioDevice<B>
where
    B: Backend + 'static,
    B::Settings: Default,
    B::Error: Debug,
{
    pub fn acquire_from(shared: &'static SharedDevice<AudioManager<B>>) -> Result<Self, AudioError> {
        let guard = shared.acquire(|| {
            let manager = AudioManager::<B>::new(AudioManagerSettings::default())
                .map_err(|e| AudioError::Device(format!("{:?}", e)))?;
            log::info!("Audio device opened");
            Ok::<_, AudioError>(manager)
        })?;
        Ok(Self { guard })
    }
}

impl<B: Backend + 'static> AudioDevice<B> {
    /// Handles currently alive on this device, sounds included.
    pub fn ref_count(&self) -> usize {
        self.guard.ref_count()
    }

    pub fn load_sound(&self, path: &Path) -> Result<Sound<B>, AudioError> {
        Ok(Sound::new(self.clone(), load_clip_data(path)?))
    }

    pub fn load_music(&self, path: &Path) -> Result<Music<B>, AudioError> {
        Ok(Music::new(self.clone(), load_clip_data(path)?))
    }

    pub(crate) fn with_backend<R>(
        &self,
        f: impl FnOnce(&mut AudioManager<B>) -> Result<R, AudioError>,
    ) -> Result<R, AudioError> {
        self.guard.with(f).unwrap_or(Err(AudioError::Closed))
    }
}

impl<B: Backend + 'static> Clone for AudioDevice<B> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
        }
    }
}

pub fn load_clip_data(path: &Path) -> Result<StaticSoundData, AudioError> {
    StaticSoundData::from_file(path).map_err(|source| AudioError::Load {
        path: path.to_path_buf(),
        source,
    })
}
