//! Game window attention signal
//!
//! The host hands over its window handle once the swap chain exists. Until
//! then, or when the setting is off, flashing is a no-op.

use std::sync::atomic::{AtomicIsize, Ordering};

use squad_ready_core::{SharedSettings, WindowFlasher};

#[cfg(target_os = "windows")]
pub mod windows;

type FlashFn = fn(isize);

#[cfg(target_os = "windows")]
fn native_flash(handle: isize) {
    windows::flash_window(handle);
}

#[cfg(not(target_os = "windows"))]
fn native_flash(handle: isize) {
    tracing::debug!(handle, "window flash not supported on this platform");
}

/// Flashes the game window when the settings allow it
pub struct WindowFlash {
    handle: AtomicIsize,
    settings: SharedSettings,
    backend: FlashFn,
}

impl WindowFlash {
    pub fn new(settings: SharedSettings) -> Self {
        Self::with_backend(settings, native_flash)
    }

    pub fn with_backend(settings: SharedSettings, backend: FlashFn) -> Self {
        Self {
            handle: AtomicIsize::new(0),
            settings,
            backend,
        }
    }

    /// Register the game window. Zero clears it.
    pub fn set_window(&self, handle: isize) {
        let previous = self.handle.swap(handle, Ordering::AcqRel);
        if previous != handle {
            tracing::debug!(handle, "game window registered");
        }
    }

    pub fn window(&self) -> Option<isize> {
        match self.handle.load(Ordering::Acquire) {
            0 => None,
            handle => Some(handle),
        }
    }
}

impl WindowFlasher for WindowFlash {
    fn flash(&self) {
        if !self.settings.read(|s| s.flash_window) {
            return;
        }
        if let Some(handle) = self.window() {
            (self.backend)(handle);
        }
    }
}

impl std::fmt::Debug for WindowFlash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowFlash")
            .field("handle", &self.window())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    // fn pointers can't capture, so each test gets its own counter
    static FLASHES_GATED: AtomicUsize = AtomicUsize::new(0);
    static FLASHES_HANDLE: AtomicIsize = AtomicIsize::new(0);

    #[test]
    fn test_flash_requires_window_and_setting() {
        fn count(_: isize) {
            FLASHES_GATED.fetch_add(1, Ordering::SeqCst);
        }
        let settings = SharedSettings::default();
        let flash = WindowFlash::with_backend(settings.clone(), count);

        flash.flash();
        assert_eq!(FLASHES_GATED.load(Ordering::SeqCst), 0);

        flash.set_window(0x1234);
        flash.flash();
        assert_eq!(FLASHES_GATED.load(Ordering::SeqCst), 1);

        settings.update(|s| s.flash_window = false);
        flash.flash();
        assert_eq!(FLASHES_GATED.load(Ordering::SeqCst), 1);

        settings.update(|s| s.flash_window = true);
        flash.set_window(0);
        flash.flash();
        assert_eq!(FLASHES_GATED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_flash_receives_registered_handle() {
        fn record(handle: isize) {
            FLASHES_HANDLE.store(handle, Ordering::SeqCst);
        }
        let flash = WindowFlash::with_backend(SharedSettings::default(), record);
        flash.set_window(77);
        flash.flash();

        assert_eq!(FLASHES_HANDLE.load(Ordering::SeqCst), 77);
        assert_eq!(flash.window(), Some(77));
    }
}
