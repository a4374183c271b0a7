pub mod clip;
pub mod device;
pub mod shared;
#[cfg(test)]
mod test_support;

pub use clip::{Music, Sound};
pub use device::{AudioDevice, AudioError};
pub use shared::{DeviceGuard, SharedDevice};
