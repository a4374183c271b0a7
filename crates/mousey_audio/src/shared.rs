//! Reference-counted ownership of a process-wide device.
//!
//! The first [`SharedDevice::acquire`] opens the backend, every further one
//! only bumps the count, and dropping the last [`DeviceGuard`] closes it again.
//! All bookkeeping happens under one mutex, so guards may be created and
//! dropped from anywhere.

use std::sync::{Mutex, MutexGuard, PoisonError};

struct DeviceSlot<B> {
    backend: Option<B>,
    refs: usize,
}

pub struct SharedDevice<B> {
    slot: Mutex<DeviceSlot<B>>,
}

impl<B> SharedDevice<B> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(DeviceSlot {
                backend: None,
                refs: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeviceSlot<B>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take a reference, opening the backend with `open` if nobody holds one.
    /// A failed open leaves the count untouched.
    pub fn acquire<E>(&self, open: impl FnOnce() -> Result<B, E>) -> Result<DeviceGuard<'_, B>, E> {
        let mut slot = self.lock();
        if slot.backend.is_none() {
            slot.backend = Some(open()?);
            log::debug!("Device opened");
        }
        slot.refs += 1;
        Ok(DeviceGuard { device: self })
    }

    pub fn ref_count(&self) -> usize {
        self.lock().refs
    }
}

impl<B> Default for SharedDevice<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// One counted reference to an open device.
pub struct DeviceGuard<'a, B> {
    device: &'a SharedDevice<B>,
}

impl<B> DeviceGuard<'_, B> {
    pub fn ref_count(&self) -> usize {
        self.device.ref_count()
    }

    /// Run `f` against the backend while holding the device lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut B) -> R) -> Option<R> {
        let mut slot = self.device.lock();
        slot.backend.as_mut().map(f)
    }
}

impl<B> Clone for DeviceGuard<'_, B> {
    fn clone(&self) -> Self {
        self.device.lock().refs += 1;
        Self {
            device: self.device,
        }
    }
}

impl<B> Drop for DeviceGuard<'_, B> {
    fn drop(&mut self) {
        let closed = {
            let mut slot = self.device.lock();
            slot.refs = slot.refs.saturating_sub(1);
            if slot.refs == 0 {
                slot.backend.take()
            } else {
                None
            }
        };
        // Backend teardown runs outside the lock.
        if closed.is_some() {
            drop(closed);
            log::debug!("Device closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn is_open<B>(device: &SharedDevice<B>) -> bool {
        device.lock().backend.is_some()
    }

    struct FakeBackend {
        closes: Arc<AtomicUsize>,
        plays: usize,
    }

    impl Drop for FakeBackend {
        fn drop(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Counters {
        opens: AtomicUsize,
        closes: Arc<AtomicUsize>,
    }

    impl Counters {
        fn new() -> Self {
            Self {
                opens: AtomicUsize::new(0),
                closes: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn open(&self) -> Result<FakeBackend, String> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(FakeBackend {
                closes: self.closes.clone(),
                plays: 0,
            })
        }

        fn opens(&self) -> usize {
            self.opens.load(Ordering::SeqCst)
        }

        fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_first_acquire_opens_last_release_closes() {
        let device = SharedDevice::new();
        let counters = Counters::new();

        let a = device.acquire(|| counters.open()).unwrap();
        let b = device.acquire(|| counters.open()).unwrap();
        assert_eq!(counters.opens(), 1);
        assert_eq!(device.ref_count(), 2);

        drop(a);
        assert!(is_open(&device));
        assert_eq!(counters.closes(), 0);

        drop(b);
        assert!(!is_open(&device));
        assert_eq!(device.ref_count(), 0);
        assert_eq!(counters.closes(), 1);
    }

    #[test]
    fn test_reopens_after_full_release() {
        let device = SharedDevice::new();
        let counters = Counters::new();

        drop(device.acquire(|| counters.open()).unwrap());
        let guard = device.acquire(|| counters.open()).unwrap();
        assert_eq!(counters.opens(), 2);
        assert_eq!(counters.closes(), 1);
        drop(guard);
        assert_eq!(counters.closes(), 2);
    }

    #[test]
    fn test_failed_open_does_not_count() {
        let device: SharedDevice<FakeBackend> = SharedDevice::new();
        let result = device.acquire(|| Err::<FakeBackend, _>("no device"));
        assert!(result.is_err());
        assert_eq!(device.ref_count(), 0);
        assert!(!is_open(&device));
    }

    #[test]
    fn test_clone_adds_a_reference() {
        let device = SharedDevice::new();
        let counters = Counters::new();

        let a = device.acquire(|| counters.open()).unwrap();
        let b = a.clone();
        assert_eq!(device.ref_count(), 2);
        assert_eq!(b.ref_count(), 2);
        drop(a);
        assert!(is_open(&device));
        drop(b);
        assert_eq!(counters.closes(), 1);
    }

    #[test]
    fn test_with_reaches_the_shared_backend() {
        let device = SharedDevice::new();
        let counters = Counters::new();

        let a = device.acquire(|| counters.open()).unwrap();
        let b = device.acquire(|| counters.open()).unwrap();
        a.with(|backend| backend.plays += 1);
        b.with(|backend| backend.plays += 1);
        assert_eq!(a.with(|backend| backend.plays), Some(2));
    }

    #[test]
    fn test_guards_from_many_threads() {
        let device: Arc<SharedDevice<FakeBackend>> = Arc::new(SharedDevice::new());
        let counters = Arc::new(Counters::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let device = device.clone();
                let counters = counters.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let guard = device.acquire(|| counters.open()).unwrap();
                        guard.with(|backend| backend.plays += 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(device.ref_count(), 0);
        assert!(!is_open(&device));
        assert_eq!(counters.opens(), counters.closes());
    }
}
