use std::path::PathBuf;

use kira::backend::mock::MockBackend;
use kira::AudioManager;

use crate::device::AudioDevice;
use crate::shared::SharedDevice;

/// A device on its own leaked slot, so tests never share a refcount.
pub fn mock_device() -> AudioDevice<MockBackend> {
    let shared: &'static SharedDevice<AudioManager<MockBackend>> =
        Box::leak(Box::new(SharedDevice::new()));
    AudioDevice::acquire_from(shared).expect("mock backend should open")
}

/// Short 16-bit mono PCM file in the temp dir.
pub fn write_test_wav(name_hint: &str) -> PathBuf {
    let samples: Vec<i16> = (0..800)
        .map(|i| ((i as f32 * 0.1).sin() * 8000.0) as i16)
        .collect();
    let data_len = (samples.len() * 2) as u32;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&8000u32.to_le_bytes());
    bytes.extend_from_slice(&16000u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }

    let path = std::env::temp_dir().join(format!(
        "mousey_test_{}_{}.wav",
        name_hint,
        std::process::id()
    ));
    std::fs::write(&path, bytes).expect("failed to write test wav");
    path
}
