//! Win32 taskbar flash

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    FLASHW_ALL, FLASHW_TIMERNOFG, FLASHWINFO, FlashWindowEx,
};

/// Flashes until the window comes to the foreground, capped at this count
const FLASH_COUNT: u32 = 100;

pub fn flash_window(handle: isize) {
    let info = FLASHWINFO {
        cbSize: std::mem::size_of::<FLASHWINFO>() as u32,
        hwnd: HWND(handle as *mut core::ffi::c_void),
        dwFlags: FLASHW_ALL | FLASHW_TIMERNOFG,
        uCount: FLASH_COUNT,
        dwTimeout: 0,
    };

    // Return value is the previous window state, not an error
    let _ = unsafe { FlashWindowEx(&info) };
}
