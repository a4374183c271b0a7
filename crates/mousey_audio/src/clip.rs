use kira::backend::Backend;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::{DefaultBackend, Tween};

use crate::device::{AudioDevice, AudioError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Started,
    Resumed,
}

/// Decoded audio plus the handle of its current playback, if any.
struct Clip<B: Backend + 'static> {
    device: AudioDevice<B>,
    data: StaticSoundData,
    handle: Option<StaticSoundHandle>,
    paused: bool,
}

impl<B: Backend + 'static> Clip<B> {
    fn new(device: AudioDevice<B>, data: StaticSoundData) -> Self {
        Self {
            device,
            data,
            handle: None,
            paused: false,
        }
    }

    fn playback_data(&self, looping: bool) -> StaticSoundData {
        let data = self.data.clone();
        if looping {
            data.loop_region(..)
        } else {
            data
        }
    }

    /// Resume if paused, otherwise restart from the beginning.
    fn play(&mut self, looping: bool) -> Result<Playback, AudioError> {
        if self.paused {
            if let Some(handle) = &mut self.handle {
                let _ = handle.resume(Tween::default());
                self.paused = false;
                return Ok(Playback::Resumed);
            }
        }
        self.stop();

        let data = self.playback_data(looping);
        let handle = self.device.with_backend(|manager| {
            manager
                .play(data)
                .map_err(|e| AudioError::Play(format!("{:?}", e)))
        })?;
        self.handle = Some(handle);
        Ok(Playback::Started)
    }

    fn pause(&mut self) {
        if let Some(handle) = &mut self.handle {
            let _ = handle.pause(Tween::default());
            self.paused = true;
        }
    }

    fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            let _ = handle.stop(Tween::default());
        }
        self.paused = false;
    }
}

impl<B: Backend + 'static> Drop for Clip<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One-shot sound effect.
pub struct Sound<B: Backend + 'static = DefaultBackend> {
    clip: Clip<B>,
}

impl<B: Backend + 'static> Sound<B> {
    pub(crate) fn new(device: AudioDevice<B>, data: StaticSoundData) -> Self {
        Self {
            clip: Clip::new(device, data),
        }
    }

    pub fn play(&mut self) -> Result<(), AudioError> {
        self.clip.play(false).map(|_| ())
    }

    pub fn pause(&mut self) {
        self.clip.pause();
    }

    pub fn stop(&mut self) {
        self.clip.stop();
    }
}

/// Background track. Looping takes effect on the next `play`.
pub struct Music<B: Backend + 'static = DefaultBackend> {
    clip: Clip<B>,
    looping: bool,
}

impl<B: Backend + 'static> Music<B> {
    pub(crate) fn new(device: AudioDevice<B>, data: StaticSoundData) -> Self {
        Self {
            clip: Clip::new(device, data),
            looping: false,
        }
    }

    pub fn play(&mut self) -> Result<(), AudioError> {
        self.clip.play(self.looping).map(|_| ())
    }

    pub fn pause(&mut self) {
        self.clip.pause();
    }

    pub fn stop(&mut self) {
        self.clip.stop();
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::load_clip_data;
    use crate::test_support::{mock_device, write_test_wav};
    use kira::backend::mock::MockBackend;

    fn clip(name_hint: &str) -> Clip<MockBackend> {
        let path = write_test_wav(name_hint);
        let data = load_clip_data(&path).expect("wav should load");
        let _ = std::fs::remove_file(&path);
        Clip::new(mock_device(), data)
    }

    #[test]
    fn test_pause_then_play_resumes() {
        let mut clip = clip("resume");
        assert_eq!(clip.play(false).unwrap(), Playback::Started);

        clip.pause();
        assert!(clip.paused);
        assert_eq!(clip.play(false).unwrap(), Playback::Resumed);
        assert!(!clip.paused);
        assert!(clip.handle.is_some());
    }

    #[test]
    fn test_play_while_playing_restarts() {
        let mut clip = clip("restart");
        clip.play(false).unwrap();
        assert_eq!(clip.play(false).unwrap(), Playback::Started);
        assert!(clip.handle.is_some());
    }

    #[test]
    fn test_stop_clears_paused() {
        let mut clip = clip("stop");
        clip.play(false).unwrap();
        clip.pause();
        clip.stop();
        assert!(!clip.paused);
        assert!(clip.handle.is_none());
        assert_eq!(clip.play(false).unwrap(), Playback::Started);
    }

    #[test]
    fn test_pause_before_play_is_ignored() {
        let mut clip = clip("idle_pause");
        clip.pause();
        assert!(!clip.paused);
        assert_eq!(clip.play(false).unwrap(), Playback::Started);
    }

    #[test]
    fn test_looping_sets_full_loop_region() {
        let clip = clip("loop");
        assert!(clip.playback_data(true).settings.loop_region.is_some());
        assert!(clip.playback_data(false).settings.loop_region.is_none());
    }

    #[test]
    fn test_music_looping_applies_on_play() {
        let device = mock_device();
        let path = write_test_wav("music");
        let mut music = device.load_music(&path).expect("wav should load");
        let _ = std::fs::remove_file(&path);

        assert!(!music.is_looping());
        music.set_looping(true);
        assert!(music.is_looping());
        music.play().expect("mock backend plays");
        assert!(music.clip.handle.is_some());
        music.stop();
        assert!(music.clip.handle.is_none());
    }
}
