//! Thin wrappers over the raw Win32 calls. Everything unsafe lives here;
//! the [`Platform`](projguard_core::platform::Platform) impl only delegates.
pub mod displays;
pub mod windows;

use projguard_core::Rect;
use windows_sys::Win32::Foundation::RECT;

/// Fixed UTF-16 buffers come back NUL-terminated (or full).
pub(crate) fn from_wide(buf: &[u16]) -> String {
    let len = buf.iter().position(|c| *c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

pub(crate) fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

pub(crate) const fn rect_from(rect: RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}
